//! Chat panel: conversation list on the left, selected conversation on the right.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use aihub_core::store::ConversationStore;
use aihub_types::{
    config::ClientConfig,
    conversation::Conversation,
    message::{ChatMessage, MessageStatus, Sender},
    session::UserCache,
};
use crate::panels::{avatar_badge, avatar_glyph};
use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering the chat panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    None,
    /// Send the text in the selected conversation
    Send(String),
    NewChat,
    Select(String),
    Delete(String),
    ClearContext(String),
}

pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    store: &ConversationStore,
    user: &UserCache,
    config: &ClientConfig,
) -> ChatAction {
    let mut action = ChatAction::None;

    egui::SidePanel::left("conversation_list")
        .resizable(true)
        .default_width(240.0)
        .min_width(180.0)
        .show_inside(ui, |ui| {
            if let Some(a) = conversation_list(ui, state, store) {
                action = a;
            }
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        match store.selected() {
            Some(conversation) => {
                if let Some(a) = conversation_view(ui, state, conversation, user, config) {
                    action = a;
                }
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.label(RichText::new("No conversation yet").color(TEXT_SECONDARY));
                    if ui.button("Start a new chat").clicked() {
                        action = ChatAction::NewChat;
                    }
                });
            }
        }
    });

    action
}

fn conversation_list(ui: &mut egui::Ui, state: &mut UiState, store: &ConversationStore) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.chat_search)
                .hint_text("Search chats")
                .desired_width(ui.available_width() - 36.0),
        );
        if ui.button("+").on_hover_text("New chat").clicked() {
            action = Some(ChatAction::NewChat);
        }
    });
    ui.separator();

    let selected = store.selected_id().map(str::to_string);
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for conversation in store.search(&state.chat_search) {
                let is_selected = selected.as_deref() == Some(conversation.id.as_str());
                let fill = if is_selected { BG_SURFACE } else { BG_SECONDARY };

                let frame = egui::Frame::default()
                    .fill(fill)
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            avatar_badge(
                                ui,
                                &avatar_glyph(conversation.icon.as_deref(), &conversation.title),
                                BG_PRIMARY,
                            );
                            ui.vertical(|ui| {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(&conversation.title).color(TEXT_PRIMARY).strong());
                                    ui.label(
                                        RichText::new(conversation.chat_type.label())
                                            .color(chat_type_color(conversation.chat_type))
                                            .small(),
                                    );
                                });
                                ui.label(RichText::new(&conversation.preview).color(TEXT_SECONDARY).small());
                            });
                            ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    action = Some(ChatAction::Delete(conversation.id.clone()));
                                }
                                ui.label(RichText::new(&conversation.time).color(TEXT_SECONDARY).small());
                                if state.is_streaming(&conversation.id) {
                                    ui.spinner();
                                }
                            });
                        });
                    });

                let clicked = frame.response.interact(egui::Sense::click()).clicked();
                if clicked && !is_selected && action.is_none() {
                    action = Some(ChatAction::Select(conversation.id.clone()));
                }
                ui.add_space(4.0);
            }
        });

    action
}

fn conversation_view(
    ui: &mut egui::Ui,
    state: &mut UiState,
    conversation: &Conversation,
    user: &UserCache,
    config: &ClientConfig,
) -> Option<ChatAction> {
    let mut action = None;
    let streaming = state.is_streaming(&conversation.id);

    // Header
    ui.horizontal(|ui| {
        ui.heading(RichText::new(&conversation.title).color(TEXT_PRIMARY).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui
                .add_enabled(!streaming, egui::Button::new("Clear context"))
                .clicked()
            {
                action = Some(ChatAction::ClearContext(conversation.id.clone()));
            }
            egui::ComboBox::from_id_salt("model_selector")
                .selected_text(&state.model)
                .show_ui(ui, |ui| {
                    for model in &config.models {
                        ui.selectable_value(&mut state.model, model.clone(), model);
                    }
                });
        });
    });
    ui.separator();

    // Messages
    let available_height = ui.available_height() - 90.0;
    ScrollArea::vertical()
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if conversation.messages.is_empty() {
                ui.label(
                    RichText::new(conversation.system_prompt.as_deref().map_or(
                        "Say hello to start the conversation.",
                        |_| "This role has its own instructions. Say hello to start.",
                    ))
                    .color(TEXT_SECONDARY)
                    .italics(),
                );
            }
            for message in conversation.messages.iter() {
                render_message(ui, message, conversation, user);
                ui.add_space(4.0);
            }
        });

    ui.add_space(8.0);

    // Input
    ui.horizontal(|ui| {
        let input = egui::TextEdit::multiline(&mut state.chat_input)
            .hint_text("Type a message... (Ctrl+Enter to send)")
            .desired_rows(2)
            .desired_width(ui.available_width() - 70.0);
        let response = ui.add(input);

        let send_enabled = !state.chat_input.trim().is_empty() && !streaming;
        let send_btn = ui.add_enabled(
            send_enabled,
            egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        let ctrl_enter = response.has_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);
        if (ctrl_enter && send_enabled) || send_btn.clicked() {
            let text = state.chat_input.trim().to_string();
            state.chat_input.clear();
            response.request_focus();
            action = Some(ChatAction::Send(text));
        }
    });

    action
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage, conversation: &Conversation, user: &UserCache) {
    let (glyph, bg, layout) = match message.sender {
        Sender::User => (
            avatar_glyph(user.avatar_url.as_deref(), &user.nickname),
            BG_USER_BUBBLE,
            Layout::right_to_left(Align::Min),
        ),
        Sender::Bot => (
            avatar_glyph(message.avatar.as_deref().or(conversation.icon.as_deref()), &conversation.title),
            if message.status == Some(MessageStatus::Error) { BG_ERROR_BUBBLE } else { BG_SECONDARY },
            Layout::left_to_right(Align::Min),
        ),
    };

    ui.with_layout(layout, |ui| {
        avatar_badge(ui, &glyph, BG_SURFACE);
        egui::Frame::default()
            .fill(bg)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.75);
                ui.vertical(|ui| {
                    match message.status {
                        Some(MessageStatus::Loading) if message.content.is_empty() => {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(RichText::new("Thinking...").color(TEXT_SECONDARY));
                            });
                        }
                        Some(MessageStatus::Loading) => {
                            ui.label(RichText::new(format!("{}▌", message.content)).color(TEXT_PRIMARY));
                        }
                        Some(MessageStatus::Error) => {
                            ui.label(RichText::new(&message.content).color(ERROR));
                        }
                        _ => {
                            ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
                        }
                    }
                    ui.label(RichText::new(&message.timestamp).color(TEXT_SECONDARY).small());
                });
            });
    });
}
