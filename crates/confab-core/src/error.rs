// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Confab sync engine.

use thiserror::Error;

/// The primary error type used across all Confab collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum ConfabError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable-store errors (network failure, query failure, bad server data).
    #[error("backend error: {source}")]
    Backend {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Push channel errors (subscription failure, closed stream, transport).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session collaborator errors (auth probe failure, expired token).
    #[error("session error: {message}")]
    Session {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A push frame whose payload does not match its event's expected shape.
    #[error("malformed `{event}` payload: {detail}")]
    MalformedPayload { event: String, detail: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
