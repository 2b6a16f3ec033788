// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-zero buffer sizes and recognizable log levels.

use crate::diagnostic::ConfigError;
use crate::model::ConfabConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConfabConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.store.max_buffered == 0 {
        errors.push(ConfigError::Validation {
            message: "store.max_buffered must be at least 1".to_string(),
        });
    }

    if config.store.page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "store.page_size must be at least 1".to_string(),
        });
    }

    // A page larger than the buffer would be partially evicted on arrival,
    // breaking the has-older heuristic.
    if config.store.page_size > config.store.max_buffered {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.page_size ({}) must not exceed store.max_buffered ({})",
                config.store.page_size, config.store.max_buffered
            ),
        });
    }

    if config.channel.event_buffer == 0 {
        errors.push(ConfigError::Validation {
            message: "channel.event_buffer must be at least 1".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
