// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./confab.toml` > `~/.config/confab/confab.toml` > `/etc/confab/confab.toml`
//! with environment variable overrides via `CONFAB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ConfabConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/confab/confab.toml` (system-wide)
/// 3. `~/.config/confab/confab.toml` (user XDG config)
/// 4. `./confab.toml` (local directory)
/// 5. `CONFAB_*` environment variables
pub fn load_config() -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::file("/etc/confab/confab.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("confab/confab.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("confab.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CONFAB_STORE_MAX_BUFFERED` must map to
/// `store.max_buffered`, not `store.max.buffered`.
fn env_provider() -> Env {
    Env::prefixed("CONFAB_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped, lowercased env var name to a dotted config path.
///
/// Example: CONFAB_STORE_MAX_BUFFERED arrives as "store_max_buffered" and
/// maps to "store.max_buffered". Unrecognized sections pass through
/// unchanged and surface later as unknown-key errors.
fn map_env_key(key: &str) -> String {
    key.replacen("store_", "store.", 1)
        .replacen("channel_", "channel.", 1)
        .replacen("log_", "log.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_dotted_paths() {
        assert_eq!(map_env_key("store_max_buffered"), "store.max_buffered");
        assert_eq!(map_env_key("store_page_size"), "store.page_size");
        assert_eq!(map_env_key("channel_event_buffer"), "channel.event_buffer");
        assert_eq!(map_env_key("log_level"), "log.level");
    }

    #[test]
    fn unrecognized_sections_pass_through() {
        assert_eq!(map_env_key("other_key"), "other_key");
    }
}
