// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Active-conversation collaborator trait.

/// The application's conversation selection, owned outside the sync store.
///
/// The store keeps its own `chat_id` for routing and epoch checks; this trait
/// answers the broader question "does the application consider any
/// conversation selected at all", which feeds the self-clean decision.
pub trait ChatContext {
    /// Currently selected conversation id, if any.
    fn active_chat_id(&self) -> Option<String>;
}
