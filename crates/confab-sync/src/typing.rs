// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typing-indicator collaborator fed by pushed `assistant-thinking` events.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use confab_core::TypingListener;

/// Set of conversations whose assistant is currently composing. Kept outside
/// the message buffer: a thinking indicator is presence, not a message.
#[derive(Debug, Default)]
pub struct TypingIndicator {
    active: Mutex<HashSet<String>>,
}

impl TypingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, HashSet<String>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_typing(&self, chat_id: &str) -> bool {
        self.active().contains(chat_id)
    }

    /// Conversations whose assistant is currently composing, sorted by id.
    pub fn snapshot(&self) -> Vec<String> {
        let mut chats: Vec<String> = self.active().iter().cloned().collect();
        chats.sort();
        chats
    }
}

impl TypingListener for TypingIndicator {
    fn set_typing(&self, chat_id: &str, active: bool) {
        let mut set = self.active();
        if active {
            set.insert(chat_id.to_string());
        } else {
            set.remove(chat_id);
        }
    }
}
