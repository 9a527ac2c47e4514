//! Conversation reducer.
//!
//! `reduce` is the only place message lists are mutated. It takes the
//! conversation by value and returns the next version, so callers never hold
//! a half-updated list. Every bot-side event addresses its message by id.

use aihub_types::{
    conversation::{preview_of, Conversation},
    event::ConversationEvent,
    message::{ChatMessage, MessageStatus, Sender},
};

pub fn reduce(mut conversation: Conversation, event: &ConversationEvent) -> Conversation {
    match event {
        ConversationEvent::UserMessageAppended { user, placeholder } => {
            conversation.preview = preview_of(&user.content);
            conversation.time = user.timestamp.clone();
            conversation.messages.push(user.clone());
            conversation.messages.push(placeholder.clone());
        }
        ConversationEvent::BotChunkReceived { message_id, text } => {
            update_loading_bot(&mut conversation, message_id, |message| {
                message.content.push_str(text);
            });
        }
        ConversationEvent::BotStreamCompleted { message_id } => {
            update_loading_bot(&mut conversation, message_id, |message| {
                message.status = Some(MessageStatus::Success);
            });
        }
        ConversationEvent::BotStreamFailed { message_id, error } => {
            update_loading_bot(&mut conversation, message_id, |message| {
                message.content = error.clone();
                message.status = Some(MessageStatus::Error);
            });
        }
    }
    conversation
}

/// Find-by-id, edit a copy, then replace. Only bot messages still loading
/// accept stream events; anything else is left as is.
fn update_loading_bot<F>(conversation: &mut Conversation, message_id: &str, edit: F)
where
    F: FnOnce(&mut ChatMessage),
{
    let Some(current) = conversation.messages.get(message_id) else {
        log::warn!(
            "Conversation {}: no message {} for stream event",
            conversation.id,
            message_id
        );
        return;
    };
    if current.sender != Sender::Bot || !current.is_loading() {
        log::debug!("Message {} is no longer streaming, event ignored", message_id);
        return;
    }
    let mut next = current.clone();
    edit(&mut next);
    conversation.messages.replace(next);
}
