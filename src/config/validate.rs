// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AssetError, Result};
use crate::sources::SourceSet;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AssetError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Run semantic validation against a raw configuration.
///
/// This checks:
/// - every source set has at least one pattern and every pattern compiles
/// - destinations are non-empty and distinct
/// - tool commands are non-empty
/// - the browserslist query list is non-empty
///
/// It does **not** check that the tools are installed; a missing tool shows
/// up as a transform error for the first file that needs it.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_source_sets(cfg)?;
    validate_destinations(cfg)?;
    validate_tools(cfg)?;
    validate_shared(cfg)?;
    Ok(())
}

fn validate_source_sets(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    let sets: [(&str, &[String]); 4] = [
        ("templates", paths.templates.as_slice()),
        ("styles", paths.styles.as_slice()),
        ("scripts", std::slice::from_ref(&paths.scripts)),
        ("scripts_tutti", std::slice::from_ref(&paths.scripts_tutti)),
    ];

    for (name, patterns) in sets {
        if patterns.is_empty() {
            return Err(AssetError::ConfigError(format!(
                "[paths].{name} must contain at least one pattern"
            )));
        }
        SourceSet::new(patterns).map_err(|e| {
            AssetError::ConfigError(format!("[paths].{name}: {e}"))
        })?;
    }
    Ok(())
}

fn validate_destinations(cfg: &RawConfigFile) -> Result<()> {
    let paths = &cfg.paths;
    let dests = [
        ("css_dest", &paths.css_dest),
        ("templates_dest", &paths.templates_dest),
        ("scripts_dest", &paths.scripts_dest),
    ];

    for (name, dest) in dests.iter() {
        if dest.trim().is_empty() {
            return Err(AssetError::ConfigError(format!(
                "[paths].{name} must not be empty"
            )));
        }
    }

    // Pipelines run concurrently; two of them writing into the same
    // directory could clobber each other's outputs.
    if paths.css_dest == paths.templates_dest
        || paths.css_dest == paths.scripts_dest
        || paths.templates_dest == paths.scripts_dest
    {
        return Err(AssetError::ConfigError(
            "[paths] destinations must be distinct directories".to_string(),
        ));
    }

    Ok(())
}

fn validate_tools(cfg: &RawConfigFile) -> Result<()> {
    let tools = &cfg.tools;
    let commands = [
        ("sass", &tools.sass),
        ("pug", &tools.pug),
        ("pug_pretty", &tools.pug_pretty),
        ("uglify", &tools.uglify),
    ];

    for (name, cmd) in commands {
        if cmd.trim().is_empty() {
            return Err(AssetError::ConfigError(format!(
                "[tools].{name} must not be empty"
            )));
        }
    }

    if tools.browsers.is_empty() {
        return Err(AssetError::ConfigError(
            "[tools].browsers must contain at least one query".to_string(),
        ));
    }

    Ok(())
}

fn validate_shared(cfg: &RawConfigFile) -> Result<()> {
    if cfg.shared.dir.trim().is_empty() {
        return Err(AssetError::ConfigError(
            "[shared].dir must not be empty".to_string(),
        ));
    }
    if let Some(cmd) = &cfg.shared.command {
        if cmd.trim().is_empty() {
            return Err(AssetError::ConfigError(
                "[shared].command must not be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}
