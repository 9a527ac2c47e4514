//! Event bus between the chat core and the UI.
//!
//! Single-threaded (WASM) and shared through `Rc<RefCell<..>>`. The UI drains
//! it once per frame. Conversation state itself lives in the store; events on
//! the bus only tell the UI what changed, so consecutive stream chunks for the
//! same reply are merged while they wait to be drained.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use aihub_types::event::{AppEvent, ConversationEvent};

/// Shared event bus: clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<AppEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Publish an event.
    pub fn emit(&self, event: AppEvent) {
        let mut queue = self.inner.borrow_mut();
        if let Some(last) = queue.back_mut() {
            if merge_chunk(last, &event) {
                return;
            }
        }
        queue.push_back(event);
    }

    /// Drain all pending events in emission order.
    pub fn drain(&self) -> Vec<AppEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `next`'s chunk text onto `last` when both are chunks of the same reply.
fn merge_chunk(last: &mut AppEvent, next: &AppEvent) -> bool {
    match (last, next) {
        (
            AppEvent::Conversation {
                conversation_id: last_conv,
                event: ConversationEvent::BotChunkReceived { message_id: last_msg, text: last_text },
            },
            AppEvent::Conversation {
                conversation_id: next_conv,
                event: ConversationEvent::BotChunkReceived { message_id: next_msg, text: next_text },
            },
        ) if *last_conv == *next_conv && *last_msg == *next_msg => {
            last_text.push_str(next_text);
            true
        }
        _ => false,
    }
}
