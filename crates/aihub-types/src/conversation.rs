use serde::{Deserialize, Serialize};

use crate::message::{display_time, MessageLog};

/// Length of the list-entry preview before it is cut off with "..."
pub const PREVIEW_CHARS: usize = 50;

/// Kind of conversation, used for badges in the conversation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    #[default]
    Normal,
    Psychological,
    Interview,
}

impl ChatType {
    /// Infer the chat type from a persona name as the backend names them.
    pub fn from_role_name(name: &str) -> Self {
        if name.contains("Java") || name.contains("面试官") {
            ChatType::Interview
        } else if name.contains("心理") {
            ChatType::Psychological
        } else {
            ChatType::Normal
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ChatType::Normal => "Chat",
            ChatType::Psychological => "Counselling",
            ChatType::Interview => "Interview",
        }
    }
}

/// A persisted conversation with a persona or the default bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    pub preview: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub messages: MessageLog,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub system_prompt: Option<String>,
}

impl Conversation {
    pub fn new(title: impl Into<String>, chat_type: ChatType) -> Self {
        Self {
            id: new_conversation_id(),
            title: title.into(),
            chat_type,
            preview: String::new(),
            time: display_time(),
            icon: None,
            messages: MessageLog::new(),
            system_prompt: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        if !prompt.trim().is_empty() {
            self.system_prompt = Some(prompt);
        }
        self
    }

    pub fn with_preview(mut self, text: &str) -> Self {
        self.preview = preview_of(text);
        self
    }
}

/// `chat_<unix millis>_<9 random alphanumerics>`
pub fn new_conversation_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("chat_{}_{}", millis, suffix)
}

pub fn preview_of(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
