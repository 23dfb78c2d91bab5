#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use assetwatch::config::{ConfigFile, RawConfigFile};
use assetwatch::errors::Result;
use assetwatch::fs::FileSystem;
use assetwatch::livereload::{NoopNotifier, ReloadNotifier};
use assetwatch::pipeline::TaskEnv;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn templates(mut self, patterns: &[&str]) -> Self {
        self.config.paths.templates = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn styles(mut self, patterns: &[&str]) -> Self {
        self.config.paths.styles = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn scripts(mut self, pattern: &str) -> Self {
        self.config.paths.scripts = pattern.to_string();
        self
    }

    pub fn scripts_tutti(mut self, pattern: &str) -> Self {
        self.config.paths.scripts_tutti = pattern.to_string();
        self
    }

    pub fn scripts_dest(mut self, dest: &str) -> Self {
        self.config.paths.scripts_dest = dest.to_string();
        self
    }

    pub fn uglify(mut self, cmd: &str) -> Self {
        self.config.tools.uglify = cmd.to_string();
        self
    }

    pub fn browsers(mut self, queries: &[&str]) -> Self {
        self.config.tools.browsers = queries.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn shared(mut self, dir: &str, command: Option<&str>) -> Self {
        self.config.shared.dir = dir.to_string();
        self.config.shared.command = command.map(str::to_string);
        self
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifier that remembers every path it was told about.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

impl ReloadNotifier for RecordingNotifier {
    fn notify(&self, paths: &[PathBuf]) {
        self.paths.lock().unwrap().extend_from_slice(paths);
    }
}

/// Task environment rooted at `.` over `fs`, with no live-reload listeners.
pub fn task_env(fs: Arc<dyn FileSystem>) -> TaskEnv {
    TaskEnv::new(".", fs, Arc::new(NoopNotifier))
}

/// Like [`task_env`], but reporting to `notifier`.
pub fn task_env_with_notifier(fs: Arc<dyn FileSystem>, notifier: RecordingNotifier) -> TaskEnv {
    TaskEnv::new(".", fs, Arc::new(notifier))
}
