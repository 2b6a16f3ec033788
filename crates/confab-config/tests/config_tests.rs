// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Confab configuration system.

use confab_config::diagnostic::suggest_key;
use confab_config::model::ConfabConfig;
use confab_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_confab_config() {
    let toml = r#"
[store]
max_buffered = 200
page_size = 25

[channel]
event_buffer = 64

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.store.max_buffered, 200);
    assert_eq!(config.store.page_size, 25);
    assert_eq!(config.channel.event_buffer, 64);
    assert_eq!(config.log.level, "debug");
}

/// Unknown field in [store] section produces an UnknownField error.
#[test]
fn unknown_field_in_store_produces_error() {
    let toml = r#"
[store]
max_bufferred = 200
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_bufferred"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.store.max_buffered, 500);
    assert_eq!(config.store.page_size, 50);
    assert_eq!(config.channel.event_buffer, 256);
    assert_eq!(config.log.level, "info");
}

/// A dotted override (the shape produced by CONFAB_STORE_PAGE_SIZE) maps to
/// store.page_size, not store.page.size.
#[test]
fn env_style_override_maps_to_store_page_size() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[store]
page_size = 25
"#;

    let config: ConfabConfig = Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("store.page_size", 10))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.store.page_size, 10);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: ConfabConfig = Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::file("/nonexistent/path/confab.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.store.max_buffered, 500);
}

/// An explicit path loads that file's values over the defaults.
#[test]
fn explicit_path_overrides_defaults() {
    use std::io::Write;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("confab.toml");
    let mut file = std::fs::File::create(&path).expect("create config file");
    writeln!(file, "[store]\nmax_buffered = 64\npage_size = 16").expect("write config");

    let config = load_config_from_path(&path).expect("file should load");
    assert_eq!(config.store.max_buffered, 64);
    assert_eq!(config.store.page_size, 16);
    // Untouched sections keep defaults.
    assert_eq!(config.log.level, "info");
}

/// load_and_validate_str runs semantic validation after deserialization.
#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[store]
max_buffered = 10
page_size = 50
"#;

    let errors = load_and_validate_str(toml).expect_err("page > buffer should fail validation");
    assert!(errors
        .iter()
        .any(|e| format!("{e}").contains("must not exceed")));
}

/// Typo suggestions surface for near-miss keys.
#[test]
fn typo_suggestion_for_store_keys() {
    let valid = &["max_buffered", "page_size"];
    assert_eq!(
        suggest_key("max_buferd", valid),
        Some("max_buffered".to_string())
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn unexpected_top_level_section_rejected() {
    let toml = r#"
[stor]
max_buffered = 200
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("stor"),
        "error should mention the unknown section, got: {err_str}"
    );
}
