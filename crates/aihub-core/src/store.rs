//! Conversation store and its persistence.
//!
//! Conversations are kept in a map keyed by id with a separate display order
//! (newest first). The ordered list only exists when rendering or persisting.
//! The whole list is written to storage as one JSON array after every change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use aihub_types::{
    ChatError, Result,
    conversation::Conversation,
    event::ConversationEvent,
};
use crate::ports::StoragePort;
use crate::reducer::reduce;

/// Storage key of the serialized conversation list
pub const CONVERSATIONS_KEY: &str = "aihub:chats";

/// Store handle shared between the UI and in-flight chat sessions.
/// Borrow it for one operation at a time, never across an `.await`.
pub type SharedStore = Rc<RefCell<ConversationStore>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub conversations: usize,
    pub messages: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationStore {
    order: Vec<String>,
    by_id: HashMap<String, Conversation>,
    selected: Option<String>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list. Duplicate ids keep the first entry.
    /// The first conversation is selected.
    pub fn from_list(list: Vec<Conversation>) -> Self {
        let mut store = Self::new();
        for conversation in list {
            if store.by_id.contains_key(&conversation.id) {
                log::warn!("Duplicate conversation id {} dropped", conversation.id);
                continue;
            }
            store.order.push(conversation.id.clone());
            store.by_id.insert(conversation.id.clone(), conversation);
        }
        store.selected = store.order.first().cloned();
        store
    }

    pub fn into_shared(self) -> SharedStore {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.by_id.get(id)
    }

    /// Conversations in display order
    pub fn iter(&self) -> impl Iterator<Item = &Conversation> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn to_list(&self) -> Vec<Conversation> {
        self.iter().cloned().collect()
    }

    /// Put a new conversation at the top of the list and select it.
    /// If the id is already known, the existing entry is only selected.
    pub fn insert_front(&mut self, conversation: Conversation) -> String {
        let id = conversation.id.clone();
        if !self.by_id.contains_key(&id) {
            self.order.insert(0, id.clone());
            self.by_id.insert(id.clone(), conversation);
        }
        self.selected = Some(id.clone());
        id
    }

    /// Select a conversation. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if self.by_id.contains_key(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.as_deref().and_then(|id| self.by_id.get(id))
    }

    /// Delete exactly one conversation. If it was selected, selection moves
    /// to the first remaining conversation, or to none.
    pub fn remove(&mut self, id: &str) -> Option<Conversation> {
        let removed = self.by_id.remove(id)?;
        self.order.retain(|other| other != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = self.order.first().cloned();
        }
        Some(removed)
    }

    /// Route an event to its conversation through the reducer.
    pub fn apply(&mut self, conversation_id: &str, event: &ConversationEvent) -> Result<()> {
        let current = self
            .by_id
            .remove(conversation_id)
            .ok_or_else(|| ChatError::NotFound(format!("conversation {}", conversation_id)))?;
        let next = reduce(current, event);
        self.by_id.insert(conversation_id.to_string(), next);
        Ok(())
    }

    /// Drop all messages of a conversation, keeping the conversation itself.
    pub fn clear_context(&mut self, conversation_id: &str) -> Result<()> {
        let conversation = self
            .by_id
            .get_mut(conversation_id)
            .ok_or_else(|| ChatError::NotFound(format!("conversation {}", conversation_id)))?;
        conversation.messages.clear();
        conversation.preview.clear();
        Ok(())
    }

    /// Case-insensitive match on title or preview, in display order
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|c| {
                needle.is_empty()
                    || c.title.to_lowercase().contains(&needle)
                    || c.preview.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            conversations: self.len(),
            messages: self.iter().map(|c| c.messages.len()).sum(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_list())?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let list: Vec<Conversation> = serde_json::from_slice(bytes)?;
        Ok(Self::from_list(list))
    }
}

// ─── Persistence ─────────────────────────────────────────────

#[derive(Clone)]
pub struct ConversationRepository {
    storage: Rc<dyn StoragePort>,
}

impl ConversationRepository {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    /// Load the persisted list. A missing or unreadable value yields an
    /// empty store; the app must still start.
    pub async fn load(&self) -> ConversationStore {
        match self.storage.get(CONVERSATIONS_KEY).await {
            Ok(Some(bytes)) => match ConversationStore::from_json(&bytes) {
                Ok(store) => {
                    log::info!("Restored {} conversations", store.len());
                    store
                }
                Err(e) => {
                    log::warn!("Stored conversations unreadable ({}), starting empty", e);
                    ConversationStore::new()
                }
            },
            Ok(None) => ConversationStore::new(),
            Err(e) => {
                log::warn!("Failed to read conversations from {}: {}", self.storage.backend_name(), e);
                ConversationStore::new()
            }
        }
    }

    /// Overwrite the persisted list with the store's current content.
    pub async fn save(&self, store: &SharedStore) -> Result<()> {
        let bytes = store.borrow().to_json()?;
        self.storage.set(CONVERSATIONS_KEY, &bytes).await
    }
}
