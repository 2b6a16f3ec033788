// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listener traits for push events that bypass the message buffer.
//!
//! `conversation-update` and `assistant-thinking` events concern state the
//! sync store does not own; the channel adapter forwards them through these
//! seams instead. Both are synchronous: implementations are expected to be
//! cheap in-memory state updates.

use crate::types::ConversationChange;

/// Target of `conversation-update` routing.
pub trait ConversationListener {
    /// Applies one change to the conversation list.
    fn apply_conversation_change(&self, change: ConversationChange);
}

/// Target of `assistant-thinking` routing.
pub trait TypingListener {
    /// Sets or clears the "assistant is thinking" flag for a conversation.
    fn set_typing(&self, chat_id: &str, active: bool);
}
