// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation-list collaborator fed by pushed `conversation-update` events.

use std::sync::{Mutex, MutexGuard, PoisonError};

use confab_core::{Conversation, ConversationChange, ConversationListener};

/// Thread list kept sorted by `updated_at`, newest first, the order a
/// sidebar renders it in.
#[derive(Debug, Default)]
pub struct ConversationList {
    threads: Mutex<Vec<Conversation>>,
}

impl ConversationList {
    pub fn new() -> Self {
        Self::default()
    }

    fn threads(&self) -> MutexGuard<'_, Vec<Conversation>> {
        self.threads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<Conversation> {
        self.threads().clone()
    }

    /// Upsert keyed by id. Covers both added and updated rows: the push
    /// channel may replay either, and an update can arrive before the row
    /// was ever seen.
    fn upsert(&self, conversation: Conversation) {
        let mut threads = self.threads();
        match threads.iter_mut().find(|t| t.id == conversation.id) {
            Some(existing) => *existing = conversation,
            None => threads.push(conversation),
        }
        threads.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

impl ConversationListener for ConversationList {
    fn apply_conversation_change(&self, change: ConversationChange) {
        match change {
            ConversationChange::Added(conversation)
            | ConversationChange::Updated(conversation) => self.upsert(conversation),
            ConversationChange::Removed { id } => {
                self.threads().retain(|t| t.id != id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn conversation(id: &str, updated_secs: i64) -> Conversation {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(updated_secs);
        Conversation {
            id: id.into(),
            user_id: Some("u-1".into()),
            title: Some(format!("thread {id}")),
            mode: None,
            created_at: at,
            updated_at: at,
            meta: None,
        }
    }

    #[test]
    fn newest_thread_sorts_first() {
        let list = ConversationList::new();
        list.apply_conversation_change(ConversationChange::Added(conversation("a", 10)));
        list.apply_conversation_change(ConversationChange::Added(conversation("b", 30)));
        list.apply_conversation_change(ConversationChange::Added(conversation("c", 20)));

        let ids: Vec<String> = list.snapshot().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn update_replaces_and_reorders() {
        let list = ConversationList::new();
        list.apply_conversation_change(ConversationChange::Added(conversation("a", 10)));
        list.apply_conversation_change(ConversationChange::Added(conversation("b", 20)));

        let mut bumped = conversation("a", 40);
        bumped.title = Some("renamed".into());
        list.apply_conversation_change(ConversationChange::Updated(bumped));

        let threads = list.snapshot();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].id, "a");
        assert_eq!(threads[0].title.as_deref(), Some("renamed"));
    }

    #[test]
    fn update_for_an_unseen_row_inserts_it() {
        let list = ConversationList::new();
        list.apply_conversation_change(ConversationChange::Updated(conversation("a", 10)));
        assert_eq!(list.snapshot().len(), 1);
    }

    #[test]
    fn removal_is_idempotent() {
        let list = ConversationList::new();
        list.apply_conversation_change(ConversationChange::Added(conversation("a", 10)));
        list.apply_conversation_change(ConversationChange::Removed { id: "a".into() });
        list.apply_conversation_change(ConversationChange::Removed { id: "a".into() });
        assert!(list.snapshot().is_empty());
    }
}
