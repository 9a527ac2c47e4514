pub mod chat;
pub mod login;
pub mod products;
pub mod profile;
pub mod roles;

use egui::{Color32, RichText};

use aihub_types::config::is_image_reference;
use crate::theme::*;

/// Text glyph for an avatar/icon reference. Image URLs cannot be drawn
/// without an image loader, so they fall back to the first letter of `name`.
pub fn avatar_glyph(reference: Option<&str>, name: &str) -> String {
    match reference {
        Some(r) if !r.is_empty() && !is_image_reference(r) => r.to_string(),
        _ => name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string()),
    }
}

/// Round-ish badge with an avatar glyph
pub(crate) fn avatar_badge(ui: &mut egui::Ui, glyph: &str, fill: Color32) {
    egui::Frame::default()
        .fill(fill)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(egui::Margin::symmetric(8, 4))
        .show(ui, |ui| {
            ui.label(RichText::new(glyph).color(TEXT_PRIMARY).strong());
        });
}

/// Centered "please log in" placeholder for pages that need a session
pub(crate) fn login_required(ui: &mut egui::Ui, what: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            RichText::new(format!("Log in to see {}", what))
                .color(TEXT_SECONDARY),
        );
    });
}
