use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Lifecycle of a bot reply. User messages carry no status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Loading,
    Success,
    Error,
}

/// A single message as displayed in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    /// Display time, "HH:MM"
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<MessageStatus>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id: new_message_id(),
            content: text.into(),
            sender: Sender::User,
            timestamp: display_time(),
            avatar,
            status: None,
        }
    }

    /// Empty bot message that stream chunks are appended to.
    pub fn bot_placeholder(avatar: Option<String>) -> Self {
        Self {
            id: new_message_id(),
            content: String::new(),
            sender: Sender::Bot,
            timestamp: display_time(),
            avatar,
            status: Some(MessageStatus::Loading),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Some(MessageStatus::Loading)
    }

    /// Role used when this message is sent back to the completion endpoint
    pub fn wire_role(&self) -> WireRole {
        match self.sender {
            Sender::User => WireRole::User,
            Sender::Bot => WireRole::Assistant,
        }
    }
}

pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn display_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

// ─── MessageLog ──────────────────────────────────────────────

/// Messages of one conversation, keyed by id with an explicit insertion order.
///
/// Updates go through `get_mut`/`replace` by id; the chronological sequence is
/// only materialised by `iter()`. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageLog {
    order: Vec<String>,
    by_id: HashMap<String, ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Append a message. A message whose id is already present replaces the
    /// stored one in place and keeps its position.
    pub fn push(&mut self, message: ChatMessage) {
        if !self.by_id.contains_key(&message.id) {
            self.order.push(message.id.clone());
        }
        self.by_id.insert(message.id.clone(), message);
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatMessage> {
        self.by_id.get_mut(id)
    }

    /// Swap in a new version of an existing message. Returns false for unknown ids.
    pub fn replace(&mut self, message: ChatMessage) -> bool {
        match self.by_id.get_mut(&message.id) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Messages in chronological append order
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.order.last().and_then(|id| self.by_id.get(id))
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.by_id.clear();
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.iter().cloned().collect()
    }
}

impl FromIterator<ChatMessage> for MessageLog {
    fn from_iter<I: IntoIterator<Item = ChatMessage>>(iter: I) -> Self {
        let mut log = MessageLog::new();
        for message in iter {
            log.push(message);
        }
        log
    }
}

impl From<Vec<ChatMessage>> for MessageLog {
    fn from(messages: Vec<ChatMessage>) -> Self {
        messages.into_iter().collect()
    }
}

impl Serialize for MessageLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for MessageLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<ChatMessage>::deserialize(deserializer).map(MessageLog::from)
    }
}

// ─── Completion wire format ──────────────────────────────────

/// Role in the completion request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: WireRole::System, content: text.into() }
    }
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.wire_role(),
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
}
