// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live push-channel lifecycle: per-user subscription, receive pipeline,
//! shutdown.
//!
//! The pipeline is two tasks: a reader draining the transport into a bounded
//! queue, and a dispatcher routing frames out of it. The split keeps the
//! transport drained even while a routed mutation briefly holds the store
//! lock, with the queue bounding how far the dispatcher may fall behind.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use confab_config::ChannelConfig;
use confab_core::{ChannelFrame, ConfabError, PushChannel};

use crate::router::{EventRouter, RouteTotals};

/// Diagnostic view of the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterStatus {
    pub connected: bool,
    pub user_id: Option<String>,
    pub totals: RouteTotals,
}

#[derive(Default)]
struct Lifecycle {
    user_id: Option<String>,
    cancel: Option<CancellationToken>,
    reader: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

/// Owns the subscription to the push channel and the tasks that service it.
///
/// Constructed once at the application root and shared; there is no global
/// instance and no global installation flag.
pub struct ChannelAdapter {
    channel: Arc<dyn PushChannel + Send + Sync>,
    router: Arc<EventRouter>,
    event_buffer: usize,
    lifecycle: Mutex<Lifecycle>,
}

impl ChannelAdapter {
    pub fn new(
        config: ChannelConfig,
        channel: Arc<dyn PushChannel + Send + Sync>,
        router: Arc<EventRouter>,
    ) -> Self {
        Self {
            channel,
            router,
            event_buffer: config.event_buffer,
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /// Subscribes for `user_id` and starts the pipeline.
    ///
    /// Idempotent per user: a repeat call for the already-subscribed user is
    /// a no-op. A call for a different user tears the previous subscription
    /// down first, so one adapter never serves two users at once.
    pub async fn initialize(&self, user_id: &str) -> Result<(), ConfabError> {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.user_id.as_deref() == Some(user_id)
            && lifecycle
                .dispatcher
                .as_ref()
                .is_some_and(|task| !task.is_finished())
        {
            debug!(user_id, "channel adapter already initialized");
            return Ok(());
        }
        self.teardown(&mut lifecycle).await;

        self.channel.subscribe(user_id).await?;

        let cancel = CancellationToken::new();
        let (frames_tx, frames_rx) = mpsc::channel(self.event_buffer);
        let reader = tokio::spawn(read_frames(
            self.channel.clone(),
            frames_tx,
            cancel.clone(),
        ));
        let dispatcher = tokio::spawn(dispatch_frames(self.router.clone(), frames_rx));

        lifecycle.user_id = Some(user_id.to_string());
        lifecycle.cancel = Some(cancel);
        lifecycle.reader = Some(reader);
        lifecycle.dispatcher = Some(dispatcher);
        info!(user_id, "channel adapter initialized");
        Ok(())
    }

    /// Stops the pipeline and closes the subscription. Safe to call
    /// repeatedly or when never initialized.
    pub async fn shutdown(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        self.teardown(&mut lifecycle).await;
    }

    async fn teardown(&self, lifecycle: &mut Lifecycle) {
        if let Some(cancel) = lifecycle.cancel.take() {
            cancel.cancel();
        }
        if let Some(user_id) = lifecycle.user_id.take() {
            if let Err(err) = self.channel.close().await {
                warn!(user_id, error = %err, "channel close failed during teardown");
            }
            info!(user_id, "channel adapter stopped");
        }
        // Reader first: it holds the queue sender, and the dispatcher only
        // finishes once that side hangs up.
        if let Some(reader) = lifecycle.reader.take() {
            if let Err(err) = reader.await {
                warn!(error = %err, "reader task ended abnormally");
            }
        }
        if let Some(dispatcher) = lifecycle.dispatcher.take() {
            if let Err(err) = dispatcher.await {
                warn!(error = %err, "dispatcher task ended abnormally");
            }
        }
    }

    pub async fn status(&self) -> AdapterStatus {
        let lifecycle = self.lifecycle.lock().await;
        AdapterStatus {
            connected: self.channel.is_connected(),
            user_id: lifecycle.user_id.clone(),
            totals: self.router.totals(),
        }
    }
}

/// Drains the transport into the queue until cancelled or the stream closes.
async fn read_frames(
    channel: Arc<dyn PushChannel + Send + Sync>,
    frames: mpsc::Sender<ChannelFrame>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("reader cancelled");
                break;
            }
            received = channel.receive() => match received {
                Ok(frame) => {
                    if frames.send(frame).await.is_err() {
                        // Dispatcher gone; nothing left to route to.
                        break;
                    }
                }
                Err(err) => {
                    if cancel.is_cancelled() {
                        debug!("reader stopped");
                    } else {
                        warn!(error = %err, "push channel closed");
                    }
                    break;
                }
            },
        }
    }
}

/// Routes queued frames until the reader hangs up.
async fn dispatch_frames(router: Arc<EventRouter>, mut frames: mpsc::Receiver<ChannelFrame>) {
    while let Some(frame) = frames.recv().await {
        router.route(frame);
    }
    debug!("dispatcher drained");
}
