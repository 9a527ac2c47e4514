//! Products panel: quota packages for sale.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use crate::panels::login_required;
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductsAction {
    None,
    Refresh,
    Buy(i64),
}

const CARD_WIDTH: f32 = 220.0;

pub fn products_panel(ui: &mut egui::Ui, state: &UiState, signed_in: bool) -> ProductsAction {
    let mut action = ProductsAction::None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Store").color(TEXT_PRIMARY).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if state.products_loading {
                ui.spinner();
            } else if signed_in && ui.button("Refresh").clicked() {
                action = ProductsAction::Refresh;
            }
        });
    });
    ui.separator();

    if !signed_in {
        login_required(ui, "the store");
        return action;
    }

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        if state.products.is_empty() && !state.products_loading {
            ui.label(RichText::new("No products available").color(TEXT_SECONDARY));
        }
        ui.horizontal_wrapped(|ui| {
            for product in &state.products {
                egui::Frame::default()
                    .fill(BG_SECONDARY)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.label(RichText::new(&product.product_name).color(TEXT_PRIMARY).strong());
                        if !product.product_desc.is_empty() {
                            ui.label(RichText::new(&product.product_desc).color(TEXT_SECONDARY).small());
                        }
                        ui.add_space(6.0);
                        ui.label(RichText::new(format!("{} messages", product.quota)).color(ACCENT));
                        ui.label(
                            RichText::new(format!("¥{:.2}", product.price))
                                .color(TEXT_PRIMARY)
                                .size(18.0),
                        );
                        ui.add_space(6.0);
                        let buy = egui::Button::new(RichText::new("Buy").color(TEXT_PRIMARY))
                            .fill(ACCENT)
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(CARD_WIDTH, 28.0));
                        if ui.add(buy).clicked() {
                            action = ProductsAction::Buy(product.product_id);
                        }
                    });
            }
        });
    });

    action
}
