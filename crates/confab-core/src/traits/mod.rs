// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Confab sync engine.
//!
//! The sync store consumes every external system through one of these narrow
//! seams; suspending traits use `#[async_trait]` for dynamic dispatch
//! compatibility.

pub mod backend;
pub mod channel;
pub mod context;
pub mod listeners;
pub mod session;

// Re-export all traits at the traits module level for convenience.
pub use backend::MessageBackend;
pub use channel::PushChannel;
pub use context::ChatContext;
pub use listeners::{ConversationListener, TypingListener};
pub use session::SessionProvider;
