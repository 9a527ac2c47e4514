//! Streaming chat session: one request/response cycle per `send_message`.
//!
//! 1. Append the user message and an empty loading reply (one event)
//! 2. POST the conversation history to the completion endpoint
//! 3. Append each decoded body chunk to the reply
//! 4. Mark the reply `success` at end of stream, or replace it with an error
//!
//! Every step is an event applied to the store by conversation id, followed by
//! a full save of the conversation list. The store is never borrowed across an
//! await, so the UI can render (or the user can switch conversations) mid-stream.

use futures::StreamExt;

use aihub_types::{
    ChatError, Result,
    conversation::Conversation,
    event::{AppEvent, ConversationEvent},
    message::{ChatMessage, CompletionRequest, MessageStatus, WireMessage},
};
use crate::decoder::Utf8StreamDecoder;
use crate::event_bus::EventBus;
use crate::ports::CompletionPort;
use crate::store::{ConversationRepository, SharedStore};

/// What a finished `send_message` left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub conversation_id: String,
    pub user_message_id: String,
    pub bot_message_id: String,
    /// `Success` or `Error`; never `Loading` once the call returns
    pub status: MessageStatus,
}

pub struct StreamingChatSession {
    store: SharedStore,
    repository: ConversationRepository,
    event_bus: EventBus,
}

impl StreamingChatSession {
    pub fn new(store: SharedStore, repository: ConversationRepository, event_bus: EventBus) -> Self {
        Self { store, repository, event_bus }
    }

    /// Send `user_text` in a conversation and stream the reply into it.
    ///
    /// Returns `EmptyInput` or `Unauthenticated` without touching the
    /// conversation or the network. Once the messages are appended, every
    /// failure ends up in the reply (`status = error`) and the call returns Ok.
    /// If the conversation is deleted before the request goes out, nothing is
    /// sent and the call returns `NotFound`.
    ///
    /// Must be spawned via `wasm_bindgen_futures::spawn_local` in the browser.
    pub async fn send_message(
        &self,
        completion: &dyn CompletionPort,
        conversation_id: &str,
        user_text: &str,
        model: &str,
        token: Option<&str>,
    ) -> Result<SendReceipt> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ChatError::Unauthenticated)?;

        let bot_avatar = {
            let store = self.store.borrow();
            let conversation = store
                .get(conversation_id)
                .ok_or_else(|| ChatError::NotFound(format!("conversation {}", conversation_id)))?;
            conversation.icon.clone()
        };

        let user = ChatMessage::user(text, None);
        let placeholder = ChatMessage::bot_placeholder(bot_avatar);
        let user_message_id = user.id.clone();
        let bot_message_id = placeholder.id.clone();

        self.dispatch(
            conversation_id,
            ConversationEvent::UserMessageAppended { user, placeholder },
        )
        .await;

        let request = {
            let store = self.store.borrow();
            match store.get(conversation_id) {
                Some(conversation) => build_request(conversation, model, &bot_message_id),
                None => {
                    log::warn!("Dropping send for {}: conversation deleted", conversation_id);
                    return Err(ChatError::NotFound(format!("conversation {}", conversation_id)));
                }
            }
        };

        log::info!(
            "Sending {} messages to model {} (conversation {})",
            request.messages.len(),
            model,
            conversation_id
        );

        let status = match self
            .stream_reply(completion, conversation_id, &bot_message_id, request, token)
            .await
        {
            Ok(bytes) => {
                log::info!("Reply {} complete ({} bytes)", bot_message_id, bytes);
                self.dispatch(
                    conversation_id,
                    ConversationEvent::BotStreamCompleted { message_id: bot_message_id.clone() },
                )
                .await;
                MessageStatus::Success
            }
            Err(e) => {
                log::error!("Reply {} failed: {}", bot_message_id, e);
                self.dispatch(
                    conversation_id,
                    ConversationEvent::BotStreamFailed {
                        message_id: bot_message_id.clone(),
                        error: failure_summary(&e),
                    },
                )
                .await;
                MessageStatus::Error
            }
        };

        Ok(SendReceipt {
            conversation_id: conversation_id.to_string(),
            user_message_id,
            bot_message_id,
            status,
        })
    }

    /// Consume the response body until it ends. Returns the number of bytes read.
    async fn stream_reply(
        &self,
        completion: &dyn CompletionPort,
        conversation_id: &str,
        bot_message_id: &str,
        request: CompletionRequest,
        token: &str,
    ) -> Result<usize> {
        let mut body = completion.stream_completion(request, token).await?;
        let mut decoder = Utf8StreamDecoder::new();

        while let Some(chunk) = body.next().await {
            let text = decoder.decode(&chunk?)?;
            if text.is_empty() {
                continue;
            }
            self.dispatch(
                conversation_id,
                ConversationEvent::BotChunkReceived {
                    message_id: bot_message_id.to_string(),
                    text,
                },
            )
            .await;
        }

        decoder.finish()?;
        Ok(decoder.consumed())
    }

    /// Apply one event, notify the UI, persist. Returns false if the
    /// conversation no longer exists (deleted mid-stream).
    async fn dispatch(&self, conversation_id: &str, event: ConversationEvent) -> bool {
        let applied = self.store.borrow_mut().apply(conversation_id, &event);
        if let Err(e) = applied {
            log::warn!("Dropping {:?} for {}: {}", event.bot_message_id(), conversation_id, e);
            return false;
        }

        self.event_bus.emit(AppEvent::Conversation {
            conversation_id: conversation_id.to_string(),
            event,
        });

        if let Err(e) = self.repository.save(&self.store).await {
            log::warn!("Failed to persist conversations: {}", e);
        }
        true
    }
}

/// History sent to the completion endpoint: optional system prompt, then every
/// message of the conversation except the reply being produced.
pub fn build_request(conversation: &Conversation, model: &str, exclude_id: &str) -> CompletionRequest {
    let mut messages = Vec::with_capacity(conversation.messages.len() + 1);
    if let Some(prompt) = &conversation.system_prompt {
        messages.push(WireMessage::system(prompt.clone()));
    }
    messages.extend(
        conversation
            .messages
            .iter()
            .filter(|m| m.id != exclude_id)
            .map(WireMessage::from),
    );
    CompletionRequest {
        model: model.to_string(),
        messages,
    }
}

/// Text shown in place of a failed reply
pub fn failure_summary(error: &ChatError) -> String {
    match error {
        ChatError::RequestFailed { status, body } => {
            let body = body.trim();
            if body.is_empty() {
                format!("Request failed (HTTP {})", status)
            } else {
                let snippet: String = body.chars().take(200).collect();
                format!("Request failed (HTTP {}): {}", status, snippet)
            }
        }
        ChatError::Stream(detail) => format!("The reply was interrupted: {}", detail),
        ChatError::Network(detail) => format!("Network error: {}", detail),
        other => format!("Something went wrong: {}", other),
    }
}
