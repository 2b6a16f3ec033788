// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable-store collaborator trait for paginated history fetches.

use async_trait::async_trait;

use crate::error::ConfabError;
use crate::types::{Message, PageQuery};

/// The durable message store, reached over the network.
///
/// The sync store is an in-memory cache of this collaborator; it never writes
/// through it and performs no authorization checks of its own.
#[async_trait]
pub trait MessageBackend {
    /// Fetches up to `query.limit` messages for `chat_id`, ordered ascending
    /// by `created_at`.
    ///
    /// `query.before` is an exclusive upper bound on `created_at`, used as the
    /// pagination cursor when loading older history.
    async fn fetch_page(
        &self,
        chat_id: &str,
        query: PageQuery,
    ) -> Result<Vec<Message>, ConfabError>;
}
