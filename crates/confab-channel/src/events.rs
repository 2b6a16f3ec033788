// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated push event union.
//!
//! Frame payloads arrive as opaque JSON; everything is checked into typed
//! shape here, at the boundary, so no duck-typed data ever reaches the store
//! or its collaborators.

use serde::Deserialize;
use serde_json::Value;

use confab_core::{ChannelFrame, ConfabError, ConversationChange, Message};

/// One validated push event, discriminated by wire event name.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// `message-insert`: a new message row in some conversation.
    MessageInsert { chat_id: String, message: Message },
    /// `message-update`: a changed message row; same store routing as insert.
    MessageUpdate { chat_id: String, message: Message },
    /// `conversation-update`: a thread-list change.
    ConversationUpdate(ConversationChange),
    /// `assistant-thinking`: composing-presence for one conversation.
    AssistantThinking { chat_id: String, thinking: bool },
}

#[derive(Deserialize)]
struct MessagePayload {
    chat_id: String,
    message: Message,
}

#[derive(Deserialize)]
struct ConversationPayload {
    #[serde(rename = "eventType")]
    event_type: ConversationEventType,
    data: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum ConversationEventType {
    Insert,
    Update,
    Delete,
}

// Deletions replay only the row key, not the full row.
#[derive(Deserialize)]
struct DeletedRow {
    id: String,
}

#[derive(Deserialize)]
struct ThinkingPayload {
    chat_id: String,
    status: String,
}

/// Validates a raw frame into a typed event.
///
/// `Ok(None)` means an event name this component does not consume: the wire
/// multiplexes further kinds (voice, image) owned elsewhere. A recognized
/// event with a payload of the wrong shape is an error.
pub fn parse_frame(frame: &ChannelFrame) -> Result<Option<PushEvent>, ConfabError> {
    let event = frame.event.as_str();
    let parsed = match event {
        "message-insert" => {
            let payload: MessagePayload = decode(event, &frame.payload)?;
            PushEvent::MessageInsert {
                chat_id: payload.chat_id,
                message: payload.message,
            }
        }
        "message-update" => {
            let payload: MessagePayload = decode(event, &frame.payload)?;
            PushEvent::MessageUpdate {
                chat_id: payload.chat_id,
                message: payload.message,
            }
        }
        "conversation-update" => {
            let payload: ConversationPayload = decode(event, &frame.payload)?;
            let change = match payload.event_type {
                ConversationEventType::Insert => {
                    ConversationChange::Added(decode(event, &payload.data)?)
                }
                ConversationEventType::Update => {
                    ConversationChange::Updated(decode(event, &payload.data)?)
                }
                ConversationEventType::Delete => {
                    let row: DeletedRow = decode(event, &payload.data)?;
                    ConversationChange::Removed { id: row.id }
                }
            };
            PushEvent::ConversationUpdate(change)
        }
        "assistant-thinking" => {
            let payload: ThinkingPayload = decode(event, &frame.payload)?;
            PushEvent::AssistantThinking {
                chat_id: payload.chat_id,
                thinking: payload.status == "thinking",
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(parsed))
}

fn decode<'de, T: Deserialize<'de>>(event: &str, payload: &'de Value) -> Result<T, ConfabError> {
    T::deserialize(payload).map_err(|err| ConfabError::MalformedPayload {
        event: event.to_string(),
        detail: err.to_string(),
    })
}
