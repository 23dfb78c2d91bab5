// src/config/mod.rs

//! Configuration loading and validation for assetwatch.
//!
//! - `model.rs`: TOML-backed data model (raw and validated).
//! - `loader.rs`: reading the file, optional default file, project root.
//! - `validate.rs`: `TryFrom<RawConfigFile> for ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    config_root_dir, load_and_validate, load_for_cli, load_from_path, DEFAULT_CONFIG_FILE,
};
pub use model::{
    ConfigFile, LiveReloadSection, PathsSection, RawConfigFile, SharedSection, ToolsSection,
};
