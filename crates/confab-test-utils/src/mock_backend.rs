// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock durable store for deterministic testing.
//!
//! `MockBackend` implements `MessageBackend` with per-conversation queues of
//! scripted pages, an injectable one-shot failure, and a hold/release gate
//! that keeps a fetch suspended until the test lets it resolve. The gate is
//! what makes epoch-guard races reproducible.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use confab_core::{ConfabError, Message, MessageBackend, PageQuery};

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFetch {
    pub chat_id: String,
    pub query: PageQuery,
}

pub struct MockBackend {
    pages: Mutex<HashMap<String, VecDeque<Vec<Message>>>>,
    calls: Mutex<Vec<RecordedFetch>>,
    fail_next: AtomicBool,
    held: Mutex<HashSet<String>>,
    released: Notify,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            held: Mutex::new(HashSet::new()),
            released: Notify::new(),
        }
    }

    /// Scripts the next page served for `chat_id`. Pages queue in FIFO
    /// order; a fetch against an empty queue serves an empty page.
    pub async fn queue_page(&self, chat_id: &str, page: Vec<Message>) {
        self.pages
            .lock()
            .await
            .entry(chat_id.to_string())
            .or_default()
            .push_back(page);
    }

    /// Makes the next `fetch_page` call fail, one time.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Keeps fetches for `chat_id` suspended until [`release`](Self::release).
    pub async fn hold(&self, chat_id: &str) {
        self.held.lock().await.insert(chat_id.to_string());
    }

    /// Lets held fetches for `chat_id` resume.
    pub async fn release(&self, chat_id: &str) {
        self.held.lock().await.remove(chat_id);
        self.released.notify_waiters();
    }

    /// All `fetch_page` calls observed so far, in order.
    pub async fn recorded_calls(&self) -> Vec<RecordedFetch> {
        self.calls.lock().await.clone()
    }

    /// Number of `fetch_page` calls observed so far. A call is recorded when
    /// it starts, before any hold gate, so tests can wait for a fetch to be
    /// in flight.
    pub async fn fetch_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBackend for MockBackend {
    async fn fetch_page(
        &self,
        chat_id: &str,
        query: PageQuery,
    ) -> Result<Vec<Message>, ConfabError> {
        self.calls.lock().await.push(RecordedFetch {
            chat_id: chat_id.to_string(),
            query,
        });

        loop {
            // Arm the waiter before checking, so a release between the check
            // and the await is not missed.
            let released = self.released.notified();
            if !self.held.lock().await.contains(chat_id) {
                break;
            }
            released.await;
        }

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ConfabError::Backend {
                source: std::io::Error::other("injected backend failure").into(),
            });
        }

        let page = self
            .pages
            .lock()
            .await
            .get_mut(chat_id)
            .and_then(|queue| queue.pop_front());
        Ok(page.unwrap_or_default())
    }
}
