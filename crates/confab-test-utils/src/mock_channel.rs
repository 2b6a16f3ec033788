// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock push channel for deterministic testing.
//!
//! `MockPushChannel` implements `PushChannel` with injectable inbound frames
//! and a recorded subscription history, so adapter tests can drive the
//! receive loop without a transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use confab_core::{ChannelFrame, ConfabError, PushChannel};

pub struct MockPushChannel {
    inbound: Mutex<VecDeque<ChannelFrame>>,
    notify: Notify,
    connected: AtomicBool,
    closed: AtomicBool,
    subscriptions: Mutex<Vec<String>>,
}

impl MockPushChannel {
    pub fn new() -> Self {
        Self {
            inbound: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Queues a frame for the next `receive()` call.
    pub async fn inject_frame(&self, frame: ChannelFrame) {
        self.inbound.lock().await.push_back(frame);
        self.notify.notify_one();
    }

    /// Every user id passed to `subscribe()`, in call order.
    pub async fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().await.clone()
    }
}

impl Default for MockPushChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushChannel for MockPushChannel {
    async fn subscribe(&self, user_id: &str) -> Result<(), ConfabError> {
        self.subscriptions.lock().await.push(user_id.to_string());
        self.closed.store(false, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn receive(&self) -> Result<ChannelFrame, ConfabError> {
        loop {
            // Arm the waiter before the checks so a close or inject landing
            // in between is not missed.
            let notified = self.notify.notified();
            if self.closed.load(Ordering::SeqCst) {
                return Err(ConfabError::Channel {
                    message: "subscription closed".into(),
                    source: None,
                });
            }
            if let Some(frame) = self.inbound.lock().await.pop_front() {
                return Ok(frame);
            }
            notified.await;
        }
    }

    async fn close(&self) -> Result<(), ConfabError> {
        self.closed.store(true, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
