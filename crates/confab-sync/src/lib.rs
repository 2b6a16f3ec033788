// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-resident synchronization store for conversation messages.
//!
//! [`MessageStore`] owns one bounded, always-sorted buffer for the active
//! conversation and reconciles three input streams into it: optimistic local
//! writes, fetched pages, and pushed events. [`ConversationList`] and
//! [`TypingIndicator`] are the side collaborators pushed events fan out to.
//!
//! The [`ordering`] module holds the comparator and identity predicates every
//! mutation path shares.

pub mod conversations;
pub mod ordering;
pub mod store;
pub mod typing;

pub use conversations::ConversationList;
pub use store::{MessageStore, MessageUpdate, StoreSnapshot};
pub use typing::TypingIndicator;
