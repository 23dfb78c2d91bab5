// src/cli.rs

//! CLI argument parsing using `clap`.

use std::fmt;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assetwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetwatch",
    version,
    about = "Compile stylesheets, templates and scripts; rebuild on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run. Runs `default` (all four asset pipelines) when omitted.
    #[arg(value_enum, value_name = "TASK", default_value_t = TaskName::Default)]
    pub task: TaskName,

    /// Production build: minify, write source maps, fail on the first
    /// broken input file.
    #[arg(long)]
    pub production: bool,

    /// Start a live-reload listener in `watch` mode.
    #[arg(long)]
    pub livereload: bool,

    /// Path to the config file (TOML).
    ///
    /// Default: `Assetwatch.toml` in the current working directory. A missing
    /// default file means built-in defaults.
    #[arg(long, value_name = "PATH", default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved mode, tasks, sources and destinations without
    /// building anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Invocable task names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum TaskName {
    Styles,
    Templates,
    Scripts,
    #[value(name = "scripts_tutti")]
    ScriptsTutti,
    Watch,
    Shared,
    Default,
}

impl TaskName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Styles => "styles",
            TaskName::Templates => "templates",
            TaskName::Scripts => "scripts",
            TaskName::ScriptsTutti => "scripts_tutti",
            TaskName::Watch => "watch",
            TaskName::Shared => "shared",
            TaskName::Default => "default",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
