// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch of validated push events into the store and its collaborators.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use confab_core::{
    ChannelFrame, ConversationListener, Message, MessageSource, Role, TypingListener,
};
use confab_sync::MessageStore;

use crate::events::{self, PushEvent};

/// Counters over every frame the router has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteTotals {
    /// Frames that reached the store or a collaborator.
    pub routed: u64,
    /// Frames dropped: inactive conversation, or an event kind this
    /// component does not consume.
    pub dropped: u64,
    /// Frames rejected at validation.
    pub malformed: u64,
}

/// Routes validated push events into the store and its collaborators.
///
/// Stateless apart from counters, so the live receive pipeline and offline
/// drivers (the replay tool) share one implementation.
pub struct EventRouter {
    store: Arc<MessageStore>,
    conversations: Arc<dyn ConversationListener + Send + Sync>,
    typing: Arc<dyn TypingListener + Send + Sync>,
    routed: AtomicU64,
    dropped: AtomicU64,
    malformed: AtomicU64,
}

impl EventRouter {
    pub fn new(
        store: Arc<MessageStore>,
        conversations: Arc<dyn ConversationListener + Send + Sync>,
        typing: Arc<dyn TypingListener + Send + Sync>,
    ) -> Self {
        Self {
            store,
            conversations,
            typing,
            routed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
        }
    }

    /// Validates and dispatches one frame.
    ///
    /// Infallible by contract: rejects are counted and logged, and the
    /// stream moves on. One bad frame never stalls the pipeline.
    pub fn route(&self, frame: ChannelFrame) {
        match events::parse_frame(&frame) {
            Ok(Some(PushEvent::MessageInsert { chat_id, message })) => {
                self.deliver(chat_id, message, true);
            }
            Ok(Some(PushEvent::MessageUpdate { chat_id, message })) => {
                self.deliver(chat_id, message, false);
            }
            Ok(Some(PushEvent::ConversationUpdate(change))) => {
                self.conversations.apply_conversation_change(change);
                self.routed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Some(PushEvent::AssistantThinking { chat_id, thinking })) => {
                self.typing.set_typing(&chat_id, thinking);
                self.routed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(None) => {
                debug!(event = %frame.event, "ignoring unrecognized event");
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                warn!(event = %frame.event, error = %err, "rejecting malformed frame");
                self.malformed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Message events apply only to the active conversation; the buffer
    /// never holds rows for a conversation the user is not viewing.
    fn deliver(&self, chat_id: String, message: Message, inserted: bool) {
        if self.store.chat_id().as_deref() != Some(chat_id.as_str()) {
            debug!(chat_id = %chat_id, "dropping message event for inactive conversation");
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let assistant_reply = inserted && message.role == Role::Assistant;
        self.store.add_message(message, Some(MessageSource::Pushed));
        if assistant_reply {
            // The reply landed, so the composing indicator is stale.
            self.typing.set_typing(&chat_id, false);
        }
        self.routed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn totals(&self) -> RouteTotals {
        RouteTotals {
            routed: self.routed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }
}
