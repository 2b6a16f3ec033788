// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic message and frame fixtures.
//!
//! Every timestamp is an offset in seconds from a fixed base instant, so
//! tests can assert exact orderings without touching the wall clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use confab_core::{ChannelFrame, Conversation, Message, Role};

/// Base instant all fixture timestamps offset from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

/// A user message at `base_time() + offset_secs`, without a sequence number.
pub fn message(id: &str, chat_id: &str, offset_secs: i64) -> Message {
    Message {
        id: id.into(),
        chat_id: chat_id.into(),
        role: Role::User,
        text: "hello".into(),
        user_id: Some("user-1".into()),
        user_name: Some("Test User".into()),
        created_at: base_time() + Duration::seconds(offset_secs),
        meta: None,
        client_msg_id: None,
        status: None,
        context_injected: false,
        message_number: None,
        mode: None,
    }
}

/// A user message carrying a server-assigned sequence number.
pub fn numbered_message(id: &str, chat_id: &str, offset_secs: i64, number: i64) -> Message {
    let mut msg = message(id, chat_id, offset_secs);
    msg.message_number = Some(number);
    msg
}

/// An assistant message (no authoring user).
pub fn assistant_message(id: &str, chat_id: &str, offset_secs: i64) -> Message {
    let mut msg = message(id, chat_id, offset_secs);
    msg.role = Role::Assistant;
    msg.user_id = None;
    msg.user_name = None;
    msg
}

/// A page of `count` consecutive messages starting at `first_offset` seconds,
/// one second apart, ids derived from chat and offset.
pub fn page(chat_id: &str, first_offset: i64, count: usize) -> Vec<Message> {
    (0..count as i64)
        .map(|i| {
            message(
                &format!("{chat_id}-m{}", first_offset + i),
                chat_id,
                first_offset + i,
            )
        })
        .collect()
}

/// A `message-insert` frame as the server publishes it.
pub fn insert_frame(chat_id: &str, message: &Message) -> ChannelFrame {
    ChannelFrame {
        event: "message-insert".into(),
        payload: json!({ "chat_id": chat_id, "message": message }),
    }
}

/// A `message-update` frame as the server publishes it.
pub fn update_frame(chat_id: &str, message: &Message) -> ChannelFrame {
    ChannelFrame {
        event: "message-update".into(),
        payload: json!({ "chat_id": chat_id, "message": message }),
    }
}

/// An `assistant-thinking` frame; `thinking` false publishes status "idle".
pub fn thinking_frame(chat_id: &str, thinking: bool) -> ChannelFrame {
    ChannelFrame {
        event: "assistant-thinking".into(),
        payload: json!({
            "chat_id": chat_id,
            "status": if thinking { "thinking" } else { "idle" },
        }),
    }
}

/// A conversation row last updated at `base_time() + updated_offset_secs`.
pub fn conversation(id: &str, updated_offset_secs: i64) -> Conversation {
    Conversation {
        id: id.into(),
        user_id: Some("user-1".into()),
        title: Some(format!("thread {id}")),
        mode: None,
        created_at: base_time(),
        updated_at: base_time() + Duration::seconds(updated_offset_secs),
        meta: None,
    }
}

/// A `conversation-update` frame carrying a full row, `event_type` INSERT or
/// UPDATE.
pub fn conversation_upsert_frame(event_type: &str, conversation: &Conversation) -> ChannelFrame {
    ChannelFrame {
        event: "conversation-update".into(),
        payload: json!({ "eventType": event_type, "data": conversation }),
    }
}

/// A `conversation-update` DELETE frame; deletions carry only the row id.
pub fn conversation_delete_frame(id: &str) -> ChannelFrame {
    ChannelFrame {
        event: "conversation-update".into(),
        payload: json!({ "eventType": "DELETE", "data": { "id": id } }),
    }
}
