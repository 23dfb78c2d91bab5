// tests/config_errors.rs

use std::io::Write;

use assetwatch::config::{load_and_validate, load_for_cli, DEFAULT_CONFIG_FILE};
use assetwatch::errors::AssetError;
use assetwatch_test_utils::builders::ConfigFileBuilder;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn invalid_glob_returns_config_error() {
    let file = config_file(
        r#"
[paths]
styles = ["websrc/styles/[.sass"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(AssetError::ConfigError(msg)) => assert!(msg.contains("styles"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_tool_command_returns_config_error() {
    let file = config_file(
        r#"
[tools]
uglify = "   "
"#,
    );

    match load_and_validate(file.path()) {
        Err(AssetError::ConfigError(msg)) => assert!(msg.contains("uglify"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn unknown_key_is_a_toml_error() {
    let file = config_file(
        r#"
[paths]
stylez = ["a/*.sass"]
"#,
    );
    assert!(matches!(load_and_validate(file.path()), Err(AssetError::TomlError(_))));
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let result = load_for_cli("/nonexistent/assetwatch/Custom.toml");
    assert!(matches!(result, Err(AssetError::IoError(_))));
}

#[test]
fn missing_default_file_means_defaults() {
    // The test working directory is the crate root, which has no config file.
    assert!(!std::path::Path::new(DEFAULT_CONFIG_FILE).exists());
    let cfg = load_for_cli(DEFAULT_CONFIG_FILE).unwrap();
    assert_eq!(cfg.paths().scripts, "websrc/scripts/*.js");
    assert_eq!(cfg.livereload().port, 35729);
}

#[test]
fn builder_rejects_empty_browser_list() {
    let err = ConfigFileBuilder::new().browsers(&[]).try_build().unwrap_err();
    assert!(matches!(err, AssetError::ConfigError(_)));
}
