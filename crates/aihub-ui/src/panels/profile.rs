//! Profile panel: user card, avatar upload, usage counts and order history.

use egui::{self, Align, Layout, RichText, ScrollArea};

use aihub_core::store::StoreStats;
use aihub_types::session::UserCache;
use crate::panels::{avatar_badge, avatar_glyph, login_required};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    None,
    Refresh,
    PickAvatar,
    Rename(String),
    /// Open the payment form of a pending order
    Pay(String),
    Logout,
}

pub fn profile_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    user: &UserCache,
    stats: StoreStats,
    signed_in: bool,
) -> ProfileAction {
    let mut action = ProfileAction::None;

    if !signed_in {
        login_required(ui, "your profile");
        return action;
    }

    // User card
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                avatar_badge(ui, &avatar_glyph(user.avatar_url.as_deref(), &user.nickname), ACCENT);
                ui.vertical(|ui| {
                    let mut editing = false;
                    let mut done = false;
                    if let Some(name) = state.nickname_edit.as_mut() {
                        editing = true;
                        ui.horizontal(|ui| {
                            let response = ui.add(egui::TextEdit::singleline(name).desired_width(160.0));
                            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                            if ui.small_button("Save").clicked() || entered {
                                done = true;
                            }
                        });
                    }
                    if done {
                        if let Some(name) = state.finish_nickname_edit() {
                            action = ProfileAction::Rename(name);
                        }
                    }
                    if !editing {
                        ui.horizontal(|ui| {
                            ui.heading(RichText::new(&user.nickname).color(TEXT_PRIMARY));
                            if ui.small_button("✏").on_hover_text("Change nickname").clicked() {
                                state.begin_nickname_edit(&user.nickname);
                            }
                        });
                    }
                    let quota = state
                        .profile
                        .as_ref()
                        .map(|p| format!("Remaining messages: {}", p.quota))
                        .unwrap_or_else(|| "Remaining messages: -".to_string());
                    ui.label(RichText::new(quota).color(TEXT_SECONDARY).small());
                });
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Log out").clicked() {
                        action = ProfileAction::Logout;
                    }
                    if state.profile_loading || state.orders_loading {
                        ui.spinner();
                    } else if ui.button("Refresh").clicked() {
                        action = ProfileAction::Refresh;
                    }
                    let label = if state.uploading_avatar { "Uploading..." } else { "Change avatar" };
                    if ui
                        .add_enabled(!state.uploading_avatar, egui::Button::new(label))
                        .on_hover_text("Images under 2MB")
                        .clicked()
                    {
                        action = ProfileAction::PickAvatar;
                    }
                });
            });
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        stat(ui, "Dialogues", stats.conversations);
        stat(ui, "Messages", stats.messages);
    });

    ui.add_space(8.0);
    ui.label(RichText::new("Orders").color(ACCENT).strong());
    ui.separator();

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        if state.orders.is_empty() && !state.orders_loading {
            ui.label(RichText::new("No orders yet").color(TEXT_SECONDARY));
        }
        egui::Grid::new("orders_grid").striped(true).num_columns(5).show(ui, |ui| {
            for title in ["Product", "Amount", "Time", "Status", ""] {
                ui.label(RichText::new(title).color(TEXT_SECONDARY).small());
            }
            ui.end_row();

            for order in &state.orders {
                ui.label(RichText::new(&order.product_name).color(TEXT_PRIMARY));
                ui.label(RichText::new(format!("¥{:.2}", order.total_amount)).color(TEXT_PRIMARY));
                ui.label(
                    RichText::new(order.order_time.as_deref().unwrap_or("-"))
                        .color(TEXT_SECONDARY)
                        .small(),
                );
                ui.label(RichText::new(&order.pay_status).color(pay_state_color(order.pay_state())));
                if order.can_pay() {
                    if ui.small_button("Pay").clicked() {
                        action = ProfileAction::Pay(order.order_id.clone());
                    }
                } else {
                    ui.label("");
                }
                ui.end_row();
            }
        });
    });

    action
}

fn stat(ui: &mut egui::Ui, label: &str, value: usize) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(value.to_string()).color(TEXT_PRIMARY).size(20.0));
                ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
            });
        });
}
