// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for the Confab workspace.
//!
//! TOML files merge in order (defaults, `/etc/confab/confab.toml`, the XDG
//! user file, `./confab.toml`, `CONFAB_` environment variables) into models
//! that reject unknown keys. Failures come back as miette diagnostics with
//! source spans and typo suggestions; well-formed values then pass through
//! collected semantic validation.
//!
//! # Usage
//!
//! ```no_run
//! use confab_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("buffer cap: {}", config.store.max_buffered);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ChannelConfig, ConfabConfig, LogConfig, StoreConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// The binary's entry point: figment layering, then semantic validation,
/// with figment failures bridged to diagnostics spanning the file that
/// introduced the bad key.
pub fn load_and_validate() -> Result<ConfabConfig, Vec<ConfigError>> {
    let config = loader::load_config()
        .map_err(|err| diagnostic::figment_to_config_errors(err, &collect_toml_sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// The string stands in for the whole file hierarchy; spans point into it
/// under the name `<inline>`.
pub fn load_and_validate_str(toml_content: &str) -> Result<ConfabConfig, Vec<ConfigError>> {
    let config = loader::load_config_from_str(toml_content).map_err(|err| {
        let sources = vec![("<inline>".to_string(), toml_content.to_string())];
        diagnostic::figment_to_config_errors(err, &sources)
    })?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Snapshot the TOML files figment may have read, keyed the way figment
/// reports them, so diagnostics can resolve spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![std::path::PathBuf::from("/etc/confab/confab.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("confab/confab.toml"));
    }
    // figment resolves a relative `confab.toml` against the working
    // directory, so the snapshot key must be the absolute form.
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join("confab.toml"))
            .unwrap_or_else(|_| "confab.toml".into()),
    );

    candidates
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
