//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

use aihub_types::{api::PayState, conversation::ChatType, event::NoticeLevel};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(24, 24, 27);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(39, 39, 42);
pub const BG_SURFACE: Color32 = Color32::from_rgb(52, 52, 56);
pub const BG_INPUT: Color32 = Color32::from_rgb(18, 18, 21);
pub const BG_USER_BUBBLE: Color32 = Color32::from_rgb(55, 48, 163);
pub const BG_ERROR_BUBBLE: Color32 = Color32::from_rgb(60, 22, 22);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(228, 228, 231);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(161, 161, 170);
pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const LIKED: Color32 = Color32::from_rgb(244, 63, 94);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_INPUT;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}

pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => ACCENT,
        NoticeLevel::Success => SUCCESS,
        NoticeLevel::Warning => WARNING,
        NoticeLevel::Error => ERROR,
    }
}

pub fn pay_state_color(state: PayState) -> Color32 {
    match state {
        PayState::Paid => SUCCESS,
        PayState::Pending => WARNING,
        PayState::Failed => ERROR,
        PayState::Other => TEXT_SECONDARY,
    }
}

/// Badge colour in the conversation list
pub fn chat_type_color(chat_type: ChatType) -> Color32 {
    match chat_type {
        ChatType::Normal => TEXT_SECONDARY,
        ChatType::Psychological => SUCCESS,
        ChatType::Interview => WARNING,
    }
}
