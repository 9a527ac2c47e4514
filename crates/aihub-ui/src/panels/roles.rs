//! Roles panel: searchable persona list with a detail pane.

use egui::{self, Align, Layout, RichText, ScrollArea};

use crate::panels::{avatar_badge, avatar_glyph};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolesAction {
    None,
    Refresh,
    /// Like toggle for a role id; the card is already toggled optimistically
    ToggleLike(i64),
    StartChat(i64),
}

pub fn roles_panel(ui: &mut egui::Ui, state: &mut UiState, signed_in: bool) -> RolesAction {
    let mut action = RolesAction::None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Roles").color(TEXT_PRIMARY).strong());
        ui.add(
            egui::TextEdit::singleline(&mut state.role_search)
                .hint_text("Search by name or description")
                .desired_width(260.0),
        );
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if state.roles_loading {
                ui.spinner();
            } else if ui.button("Refresh").clicked() {
                action = RolesAction::Refresh;
            }
        });
    });
    ui.separator();

    egui::SidePanel::right("role_detail")
        .resizable(true)
        .default_width(320.0)
        .show_inside(ui, |ui| match state.selected_role() {
            Some(card) => {
                ui.horizontal(|ui| {
                    avatar_badge(ui, &avatar_glyph(Some(&card.avatar), &card.name), BG_SURFACE);
                    ui.heading(RichText::new(&card.name).color(TEXT_PRIMARY));
                });
                ui.label(RichText::new(card.chat_type.label()).color(chat_type_color(card.chat_type)).small());
                ui.add_space(6.0);
                ui.label(RichText::new(&card.description).color(TEXT_PRIMARY));
                ui.add_space(6.0);
                ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    ui.label(RichText::new(&card.prompt).color(TEXT_SECONDARY).small());
                });
                ui.add_space(8.0);
                let id = card.id;
                let liked = card.liked;
                let likes = card.likes;
                ui.horizontal(|ui| {
                    if ui.button("Start chat").clicked() {
                        action = RolesAction::StartChat(id);
                    }
                    let heart = RichText::new(format!("{} {}", if liked { "♥" } else { "♡" }, likes))
                        .color(if liked { LIKED } else { TEXT_SECONDARY });
                    if ui.add_enabled(signed_in, egui::Button::new(heart)).clicked() {
                        action = RolesAction::ToggleLike(id);
                    }
                });
            }
            None => {
                ui.label(RichText::new("Pick a role to see its details").color(TEXT_SECONDARY));
            }
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        let mut clicked = None;
        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let visible = state.visible_roles();
            if visible.is_empty() && !state.roles_loading {
                ui.label(RichText::new("No roles found").color(TEXT_SECONDARY));
            }
            for card in visible {
                let selected = state.selected_role == Some(card.id);
                let frame = egui::Frame::default()
                    .fill(if selected { BG_SURFACE } else { BG_SECONDARY })
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            avatar_badge(ui, &avatar_glyph(Some(&card.avatar), &card.name), BG_PRIMARY);
                            ui.vertical(|ui| {
                                ui.label(RichText::new(&card.name).color(TEXT_PRIMARY).strong());
                                ui.label(RichText::new(&card.description).color(TEXT_SECONDARY).small());
                            });
                        });
                    });
                if frame.response.interact(egui::Sense::click()).clicked() {
                    clicked = Some(card.id);
                }
                ui.add_space(4.0);
            }
        });
        if clicked.is_some() {
            state.selected_role = clicked;
        }
    });

    if let RolesAction::ToggleLike(id) = action {
        if let Some(card) = state.role_mut(id) {
            card.toggle_like();
        }
    }
    action
}
