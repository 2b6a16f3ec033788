// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Confab sync engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Confab workspace. The sync store and the
//! channel adapter consume every external system through the traits defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ConfabError;
pub use types::{
    ChannelFrame, Conversation, ConversationChange, Message, MessageSource, PageQuery, Role,
    SessionUser, StoreMessage,
};

// Re-export all collaborator traits at crate root.
pub use traits::{
    ChatContext, ConversationListener, MessageBackend, PushChannel, SessionProvider,
    TypingListener,
};
