//! Login panel: access code in, token out.

use egui::{self, RichText, Vec2};
use crate::state::UiState;
use crate::theme::*;

/// Render the login form. Returns the trimmed code when the user submits.
pub fn login_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<String> {
    let mut submitted = None;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(320.0);
                ui.heading(RichText::new("AI Hub").color(ACCENT).strong());
                ui.label(
                    RichText::new("Enter the access code from the official account")
                        .color(TEXT_SECONDARY)
                        .small(),
                );
                ui.add_space(12.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.login_code)
                        .hint_text("Access code")
                        .desired_width(f32::INFINITY),
                );

                if let Some(error) = &state.login_error {
                    ui.label(RichText::new(error).color(ERROR).small());
                }
                ui.add_space(8.0);

                let enabled = !state.logging_in && !state.login_code.trim().is_empty();
                let label = if state.logging_in { "Logging in..." } else { "Log in" };
                let button = ui.add_enabled(
                    enabled,
                    egui::Button::new(RichText::new(label).color(TEXT_PRIMARY).strong())
                        .fill(if enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(320.0, 30.0)),
                );

                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (enter && enabled) || button.clicked() {
                    state.logging_in = true;
                    state.login_error = None;
                    submitted = Some(state.login_code.trim().to_string());
                }
            });
    });

    submitted
}
