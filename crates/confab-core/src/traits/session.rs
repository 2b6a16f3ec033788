// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session collaborator trait for authentication state probes.

use async_trait::async_trait;

use crate::error::ConfabError;
use crate::types::SessionUser;

/// Read-only view of the authentication session.
///
/// Consumed by the store's self-clean probe: no current user means the store
/// must reset rather than keep another user's data in memory.
#[async_trait]
pub trait SessionProvider {
    /// Returns the currently authenticated user, or `None` when signed out.
    async fn current_user(&self) -> Result<Option<SessionUser>, ConfabError>;
}
