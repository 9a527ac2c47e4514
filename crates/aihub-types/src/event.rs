use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// Inputs to the conversation reducer.
/// Every variant that touches a bot reply names it by message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConversationEvent {
    /// The user submitted text; the reply placeholder is appended with it
    UserMessageAppended {
        user: ChatMessage,
        placeholder: ChatMessage,
    },

    /// A decoded fragment of the streamed reply
    BotChunkReceived { message_id: String, text: String },

    /// The stream ended normally
    BotStreamCompleted { message_id: String },

    /// The request or the stream failed; `error` replaces the reply content
    BotStreamFailed { message_id: String, error: String },
}

impl ConversationEvent {
    /// Id of the bot message this event targets
    pub fn bot_message_id(&self) -> &str {
        match self {
            ConversationEvent::UserMessageAppended { placeholder, .. } => &placeholder.id,
            ConversationEvent::BotChunkReceived { message_id, .. }
            | ConversationEvent::BotStreamCompleted { message_id }
            | ConversationEvent::BotStreamFailed { message_id, .. } => message_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Events published on the bus for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// A conversation changed; addressed by id, not by what is on screen
    Conversation {
        conversation_id: String,
        event: ConversationEvent,
    },

    /// One-shot user-visible message (toast)
    Notice { level: NoticeLevel, text: String },

    /// Login state, avatar or nickname changed
    SessionChanged,
}

impl AppEvent {
    pub fn info(text: impl Into<String>) -> Self {
        AppEvent::Notice { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        AppEvent::Notice { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        AppEvent::Notice { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        AppEvent::Notice { level: NoticeLevel::Error, text: text.into() }
    }
}
