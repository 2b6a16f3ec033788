// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push channel collaborator trait for the per-user event stream.

use async_trait::async_trait;

use crate::error::ConfabError;
use crate::types::ChannelFrame;

/// A publish/subscribe channel delivering server events for one user.
///
/// Pull-based: the channel adapter owns the receive loop and calls
/// [`receive`](PushChannel::receive) until it errors (closed stream) or the
/// adapter shuts down. Frame payloads are opaque JSON at this layer.
#[async_trait]
pub trait PushChannel {
    /// Subscribes to the event stream for `user_id`.
    async fn subscribe(&self, user_id: &str) -> Result<(), ConfabError>;

    /// Receives the next frame from the stream.
    ///
    /// Errors once the subscription is closed or the transport fails.
    async fn receive(&self) -> Result<ChannelFrame, ConfabError>;

    /// Tears down the subscription. Safe to call when not subscribed.
    async fn close(&self) -> Result<(), ConfabError>;

    /// Whether a subscription is currently established.
    fn is_connected(&self) -> bool;
}
