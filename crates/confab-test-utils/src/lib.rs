// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Confab integration tests.
//!
//! Provides mock collaborators and deterministic fixtures for fast,
//! CI-runnable tests without a server.
//!
//! # Components
//!
//! - [`MockBackend`] - scripted durable store with a hold/release gate for
//!   reproducing in-flight-fetch races
//! - [`MockPushChannel`] - push channel with frame injection
//! - [`MockSession`] - combined session and conversation-selection state
//! - [`fixtures`] - deterministic messages, pages, and frames

pub mod fixtures;
pub mod mock_backend;
pub mod mock_channel;
pub mod mock_session;

pub use fixtures::{
    assistant_message, base_time, conversation, conversation_delete_frame,
    conversation_upsert_frame, insert_frame, message, numbered_message, page, thinking_frame,
    update_frame,
};
pub use mock_backend::{MockBackend, RecordedFetch};
pub use mock_channel::MockPushChannel;
pub use mock_session::MockSession;
