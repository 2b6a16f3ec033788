// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and the Confab sync engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Author role of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// How a buffered message entered the store.
///
/// Consumed by UI layers to decide whether to animate a message in; it has no
/// bearing on ordering or identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    /// Loaded from the durable store, or written locally.
    #[default]
    Fetched,
    /// Delivered over the push channel.
    Pushed,
}

/// A server-canonical message row.
///
/// All fields the server does not always populate default on deserialization,
/// so partial rows arriving over the push channel map cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned unique id. Optimistic writes carry a temporary id here
    /// until the server confirms.
    pub id: String,
    /// Owning conversation id.
    pub chat_id: String,
    pub role: Role,
    #[serde(default)]
    pub text: String,
    /// Author, when known.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Opaque structured annotations (image attachments, report payloads).
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    /// Client-generated correlation id, set at optimistic-write time and
    /// echoed back by the server for reconciliation.
    #[serde(default)]
    pub client_msg_id: Option<String>,
    /// Opaque delivery status ("thinking", "complete", ...).
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub context_injected: bool,
    /// Server-assigned monotonically increasing sequence number per
    /// conversation. Primary sort key when present on both sides of a
    /// comparison.
    #[serde(default)]
    pub message_number: Option<i64>,
    #[serde(default)]
    pub mode: Option<String>,
}

/// A message as held in the sync store: the server row plus local-only state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMessage {
    #[serde(flatten)]
    pub message: Message,
    /// True until server confirmation has been observed.
    #[serde(default)]
    pub pending: bool,
    /// The original client-side id, retained across reconciliation so UI keys
    /// stay stable when the server id replaces the temporary one.
    #[serde(default)]
    pub temp_id: Option<String>,
    #[serde(default)]
    pub source: MessageSource,
}

impl StoreMessage {
    /// Wraps a confirmed message loaded from the durable store.
    pub fn fetched(message: Message) -> Self {
        Self {
            message,
            pending: false,
            temp_id: None,
            source: MessageSource::Fetched,
        }
    }

    /// Wraps an optimistic local write: pending, keyed by its own temporary id.
    ///
    /// Optimistic writes are the user's own text and are never animated, so
    /// the source stays [`MessageSource::Fetched`].
    pub fn optimistic(message: Message) -> Self {
        let temp_id = Some(message.id.clone());
        Self {
            message,
            pending: true,
            temp_id,
            source: MessageSource::Fetched,
        }
    }

    pub fn id(&self) -> &str {
        &self.message.id
    }

    pub fn chat_id(&self) -> &str {
        &self.message.chat_id
    }
}

/// A conversation row, as carried by `conversation-update` push events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

/// A change to the user's conversation list.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationChange {
    Added(Conversation),
    Updated(Conversation),
    Removed { id: String },
}

/// The authenticated user, as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Cursor query for one page of message history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageQuery {
    /// Exclusive upper bound on `created_at`; `None` requests the newest page.
    pub before: Option<DateTime<Utc>>,
    /// Maximum number of messages to return.
    pub limit: usize,
}

/// One raw event from the push channel: event name plus opaque payload.
///
/// Frames are validated into a typed event union at the channel adapter
/// boundary before any data reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
    pub event: String,
    pub payload: serde_json::Value,
}
