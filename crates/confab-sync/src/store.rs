// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The synchronization store: one bounded, always-sorted message buffer per
//! client session.
//!
//! Mutation methods are synchronous and run to completion under the state
//! lock. The suspending operations ([`MessageStore::fetch_messages`],
//! [`MessageStore::load_older`], [`MessageStore::self_clean`]) release the
//! lock across every await and re-validate the active conversation after
//! resuming, so a late completion for a conversation the user has left never
//! touches the buffer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use confab_config::StoreConfig;
use confab_core::{
    ChatContext, Message, MessageBackend, MessageSource, PageQuery, SessionProvider, StoreMessage,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ordering;

/// Point-in-time view of the store, also its internal state.
///
/// `error` holds the rendered message of the most recent fetch failure;
/// mutations that start a new request clear it.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub chat_id: Option<String>,
    pub messages: Vec<StoreMessage>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_older: bool,
}

/// Partial field merge applied by [`MessageStore::update_message`]. Unset
/// fields leave the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct MessageUpdate {
    pub text: Option<String>,
    pub status: Option<String>,
    pub meta: Option<Value>,
    pub pending: Option<bool>,
    pub source: Option<MessageSource>,
}

pub struct MessageStore {
    backend: Arc<dyn MessageBackend + Send + Sync>,
    session: Arc<dyn SessionProvider + Send + Sync>,
    context: Arc<dyn ChatContext + Send + Sync>,
    state: Mutex<StoreSnapshot>,
    max_buffered: usize,
    page_size: usize,
}

impl MessageStore {
    pub fn new(
        config: StoreConfig,
        backend: Arc<dyn MessageBackend + Send + Sync>,
        session: Arc<dyn SessionProvider + Send + Sync>,
        context: Arc<dyn ChatContext + Send + Sync>,
    ) -> Self {
        Self {
            backend,
            session,
            context,
            state: Mutex::new(StoreSnapshot::default()),
            max_buffered: config.max_buffered,
            page_size: config.page_size,
        }
    }

    /// Mutations are short and non-panicking, so a poisoned lock is recovered
    /// rather than propagated.
    fn state(&self) -> MutexGuard<'_, StoreSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Selects the active conversation and fetches its most recent page.
    ///
    /// Setting the already-active id is a no-op. `None` resets the store.
    /// Switching keeps only pending messages that already belong to the new
    /// conversation, so nothing leaks across and in-flight local writes for
    /// the destination survive the switch.
    pub async fn set_chat_id(&self, id: Option<String>) {
        {
            let mut state = self.state();
            if state.chat_id == id {
                return;
            }
            let Some(new_id) = id else {
                *state = StoreSnapshot::default();
                return;
            };
            state
                .messages
                .retain(|m| m.pending && m.chat_id() == new_id);
            debug!(
                chat_id = %new_id,
                preserved = state.messages.len(),
                "switched conversation"
            );
            state.chat_id = Some(new_id);
            state.error = None;
        }
        self.fetch_messages().await;
    }

    /// Inserts a locally-authored message before the server has confirmed it.
    ///
    /// The entry keeps its own id as `temp_id` so the UI key stays stable
    /// when reconciliation later swaps in the server-assigned id.
    pub fn add_optimistic_message(&self, message: Message) {
        let mut state = self.state();
        let idx = ordering::insertion_index(&state.messages, &message);
        state.messages.insert(idx, StoreMessage::optimistic(message));
        Self::evict_overflow(&mut state, self.max_buffered);
    }

    /// Reconciliation entry point for fetched and pushed messages alike.
    ///
    /// Match paths, tried in order: client correlation, server id, pending
    /// content heuristic, genuinely new. The first three replace in place and
    /// settle `pending`; only a new message can grow the buffer. Delivering
    /// the same message twice therefore converges on one entry.
    pub fn add_message(&self, message: Message, source: Option<MessageSource>) {
        let mut state = self.state();

        if message.client_msg_id.is_some() {
            if let Some(pos) = state
                .messages
                .iter()
                .position(|m| ordering::correlates(&message, &m.message))
            {
                Self::settle(&mut state.messages[pos], message, source);
                Self::resort_if_needed(&mut state.messages);
                return;
            }
        }

        if let Some(pos) = state.messages.iter().position(|m| m.id() == message.id) {
            Self::settle(&mut state.messages[pos], message, source);
            Self::resort_if_needed(&mut state.messages);
            return;
        }

        if let Some(pos) = state
            .messages
            .iter()
            .position(|m| ordering::content_match(&message, m))
        {
            Self::settle(&mut state.messages[pos], message, source);
            // The heuristic never inspects message_number, so the settled
            // entry may belong elsewhere in the order.
            ordering::sort_buffer(&mut state.messages);
            return;
        }

        let incoming = StoreMessage {
            message,
            pending: false,
            temp_id: None,
            source: source.unwrap_or_default(),
        };
        let idx = ordering::insertion_index(&state.messages, &incoming.message);
        state.messages.insert(idx, incoming);
        Self::evict_overflow(&mut state, self.max_buffered);
    }

    /// Replaces a matched entry's content in place. `temp_id` is retained for
    /// UI key stability; `source` changes only when the caller provided one.
    fn settle(entry: &mut StoreMessage, message: Message, source: Option<MessageSource>) {
        if let Some(source) = source {
            entry.source = source;
        }
        entry.message = message;
        entry.pending = false;
    }

    fn resort_if_needed(messages: &mut [StoreMessage]) {
        if !ordering::is_sorted(messages) {
            ordering::sort_buffer(messages);
        }
    }

    /// Partial merge by server id. Never moves the entry.
    pub fn update_message(&self, id: &str, updates: MessageUpdate) {
        let mut state = self.state();
        let Some(entry) = state.messages.iter_mut().find(|m| m.id() == id) else {
            return;
        };
        if let Some(text) = updates.text {
            entry.message.text = text;
        }
        if let Some(status) = updates.status {
            entry.message.status = Some(status);
        }
        if let Some(meta) = updates.meta {
            entry.message.meta = Some(meta);
        }
        if let Some(pending) = updates.pending {
            entry.pending = pending;
        }
        if let Some(source) = updates.source {
            entry.source = source;
        }
    }

    /// Empties the buffer and clears the error, keeping the active
    /// conversation selected.
    pub fn clear_messages(&self) {
        let mut state = self.state();
        state.messages.clear();
        state.error = None;
    }

    /// Fetches the most recent page for the active conversation and replaces
    /// the buffer with it.
    ///
    /// The active id is captured before suspending and compared after; a
    /// result for a conversation that is no longer active is discarded
    /// without touching state. On success any pending messages accumulated
    /// since the switch are dropped with the rest of the old buffer: the
    /// page is defined as the authoritative recent window.
    pub async fn fetch_messages(&self) {
        let chat_id = {
            let mut state = self.state();
            let Some(id) = state.chat_id.clone() else {
                return;
            };
            state.loading = true;
            state.error = None;
            id
        };

        let result = self
            .backend
            .fetch_page(
                &chat_id,
                PageQuery {
                    before: None,
                    limit: self.page_size,
                },
            )
            .await;

        let mut state = self.state();
        if state.chat_id.as_deref() != Some(chat_id.as_str()) {
            debug!(requested = %chat_id, "discarding stale page for switched conversation");
            return;
        }
        match result {
            Ok(page) => {
                let count = page.len();
                let mut messages: Vec<StoreMessage> =
                    page.into_iter().map(StoreMessage::fetched).collect();
                ordering::sort_buffer(&mut messages);
                state.messages = messages;
                state.loading = false;
                state.has_older = count == self.page_size;
            }
            Err(err) => {
                warn!(chat_id = %chat_id, error = %err, "page fetch failed");
                state.error = Some(err.to_string());
                state.loading = false;
            }
        }
    }

    /// Fetches the page preceding the oldest buffered message and prepends
    /// it. Requires at least one buffered message for the cursor.
    ///
    /// The capacity bound still trims from the oldest end afterwards, so on
    /// a near-full buffer part of the just-fetched page may be dropped
    /// again. That trade keeps the memory cap absolute.
    pub async fn load_older(&self) {
        let (chat_id, before) = {
            let state = self.state();
            let Some(id) = state.chat_id.clone() else {
                return;
            };
            let Some(oldest) = state.messages.first() else {
                return;
            };
            (id, oldest.message.created_at)
        };

        let result = self
            .backend
            .fetch_page(
                &chat_id,
                PageQuery {
                    before: Some(before),
                    limit: self.page_size,
                },
            )
            .await;

        let mut state = self.state();
        if state.chat_id.as_deref() != Some(chat_id.as_str()) {
            debug!(requested = %chat_id, "discarding stale older page for switched conversation");
            return;
        }
        match result {
            Ok(page) => {
                let count = page.len();
                let mut combined: Vec<StoreMessage> =
                    page.into_iter().map(StoreMessage::fetched).collect();
                combined.append(&mut state.messages);
                ordering::sort_buffer(&mut combined);
                // A message timestamped exactly on the cursor is served in
                // both pages; delivery is at-least-once.
                combined.dedup_by(|a, b| a.id() == b.id());
                state.messages = combined;
                Self::evict_overflow(&mut state, self.max_buffered);
                state.has_older = count == self.page_size;
            }
            Err(err) => {
                warn!(chat_id = %chat_id, error = %err, "older page fetch failed");
                state.error = Some(err.to_string());
            }
        }
    }

    /// Resets the store when no valid session or no active conversation
    /// remains. Idempotent, safe to call on every auth transition.
    pub async fn self_clean(&self) {
        if !self.should_self_clean().await {
            return;
        }
        let mut state = self.state();
        *state = StoreSnapshot::default();
        debug!("store reset to initial state");
    }

    async fn should_self_clean(&self) -> bool {
        match self.session.current_user().await {
            Ok(Some(_)) => self.context.active_chat_id().is_none(),
            Ok(None) => true,
            Err(err) => {
                warn!(error = %err, "session probe failed, treating session as invalid");
                true
            }
        }
    }

    fn evict_overflow(state: &mut StoreSnapshot, max: usize) {
        if state.messages.len() > max {
            let overflow = state.messages.len() - max;
            state.messages.drain(..overflow);
            debug!(evicted = overflow, "buffer over capacity, dropped oldest");
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state().clone()
    }

    pub fn chat_id(&self) -> Option<String> {
        self.state().chat_id.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn has_older(&self) -> bool {
        self.state().has_older
    }
}
