//! WASM-target tests for aihub-core.
//!
//! Runs EventBus, reducer, decoder and StreamingChatSession tests under
//! wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use aihub_core::chat::StreamingChatSession;
use aihub_core::decoder::Utf8StreamDecoder;
use aihub_core::event_bus::EventBus;
use aihub_core::ports::*;
use aihub_core::reducer::reduce;
use aihub_core::store::{ConversationRepository, ConversationStore, CONVERSATIONS_KEY};
use aihub_types::conversation::{ChatType, Conversation};
use aihub_types::event::{AppEvent, ConversationEvent};
use aihub_types::message::*;
use aihub_types::ChatError;

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_new_is_empty() {
    let bus = EventBus::new();
    assert!(!bus.has_pending());
    assert!(bus.drain().is_empty());
}

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::SessionChanged);
    bus.emit(AppEvent::info("hello"));

    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 2);
    assert!(!bus.has_pending());
}

// ─── Reducer / Decoder Tests ─────────────────────────────

#[wasm_bindgen_test]
fn reducer_appends_user_and_placeholder() {
    let conv = Conversation::new("t", ChatType::Normal);
    let next = reduce(
        conv,
        &ConversationEvent::UserMessageAppended {
            user: ChatMessage::user("hi", None),
            placeholder: ChatMessage::bot_placeholder(None),
        },
    );
    assert_eq!(next.messages.len(), 2);
    assert!(next.messages.last().unwrap().is_loading());
}

#[wasm_bindgen_test]
fn decoder_handles_split_characters() {
    let bytes = "émoji 🎉".as_bytes();
    let mut decoder = Utf8StreamDecoder::new();
    let mut text = String::new();
    for chunk in bytes.chunks(3) {
        text.push_str(&decoder.decode(chunk).unwrap());
    }
    decoder.finish().unwrap();
    assert_eq!(text, "émoji 🎉");
}

// ─── Mock-based Session Tests (async) ────────────────────

struct MockStorage {
    data: RefCell<HashMap<String, Vec<u8>>>,
}

impl MockStorage {
    fn new() -> Self {
        Self { data: RefCell::new(HashMap::new()) }
    }
}

#[async_trait(?Send)]
impl StoragePort for MockStorage {
    async fn get(&self, key: &str) -> aihub_types::Result<Option<Vec<u8>>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> aihub_types::Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> aihub_types::Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> aihub_types::Result<Vec<String>> {
        Ok(self.data.borrow().keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MockCompletion {
    chunks: Vec<&'static str>,
}

#[async_trait(?Send)]
impl CompletionPort for MockCompletion {
    async fn stream_completion(&self, _req: CompletionRequest, _token: &str) -> aihub_types::Result<ByteStream> {
        let chunks: Vec<aihub_types::Result<Vec<u8>>> =
            self.chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

struct MockCompletionError;

#[async_trait(?Send)]
impl CompletionPort for MockCompletionError {
    async fn stream_completion(&self, _req: CompletionRequest, _token: &str) -> aihub_types::Result<ByteStream> {
        Err(ChatError::RequestFailed { status: 500, body: "upstream down".to_string() })
    }
}

fn session_with_conversation() -> (StreamingChatSession, aihub_core::store::SharedStore, Rc<MockStorage>, String) {
    let storage = Rc::new(MockStorage::new());
    let store = ConversationStore::new().into_shared();
    let id = store.borrow_mut().insert_front(Conversation::new("New chat", ChatType::Normal));
    let session = StreamingChatSession::new(
        store.clone(),
        ConversationRepository::new(storage.clone()),
        EventBus::new(),
    );
    (session, store, storage, id)
}

#[wasm_bindgen_test]
async fn session_streams_reply() {
    let (session, store, storage, id) = session_with_conversation();
    let completion = MockCompletion { chunks: vec!["Hel", "lo wo", "rld"] };

    let receipt = session.send_message(&completion, &id, "hello", "gpt-4", Some("tok")).await.unwrap();
    assert_eq!(receipt.status, MessageStatus::Success);

    let messages = store.borrow().get(&id).unwrap().messages.to_vec();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "Hello world");

    // The persisted copy matches what is in memory
    let repo = ConversationRepository::new(storage.clone());
    let reloaded = repo.load().await;
    assert_eq!(reloaded.get(&id).unwrap().messages.to_vec(), messages);
    assert!(storage.data.borrow().contains_key(CONVERSATIONS_KEY));
}

#[wasm_bindgen_test]
async fn session_records_http_error() {
    let (session, store, _storage, id) = session_with_conversation();

    let receipt = session.send_message(&MockCompletionError, &id, "hello", "gpt-4", Some("tok")).await.unwrap();
    assert_eq!(receipt.status, MessageStatus::Error);

    let messages = store.borrow().get(&id).unwrap().messages.to_vec();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].status, Some(MessageStatus::Error));
    assert!(messages[1].content.contains("500"));
}

#[wasm_bindgen_test]
async fn session_without_token_does_nothing() {
    let (session, store, storage, id) = session_with_conversation();
    let completion = MockCompletion { chunks: vec!["x"] };

    let result = session.send_message(&completion, &id, "hello", "gpt-4", None).await;
    assert_eq!(result, Err(ChatError::Unauthenticated));
    assert!(store.borrow().get(&id).unwrap().messages.is_empty());
    assert!(storage.data.borrow().is_empty());
}
