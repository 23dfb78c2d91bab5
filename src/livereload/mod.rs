// src/livereload/mod.rs

//! Live-reload notifications.
//!
//! Pipelines only see the [`ReloadNotifier`] trait. In watch mode the
//! notifier is a [`LiveReloadHub`] whose events are streamed to browser
//! clients by [`server`]; everywhere else it is a [`NoopNotifier`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

pub mod server;

pub use server::{spawn_server, LiveReloadServer};

/// Default port, the one browser live-reload extensions connect to.
pub const DEFAULT_PORT: u16 = 35729;

const CHANNEL_CAPACITY: usize = 256;

/// Receives the paths a task just wrote.
pub trait ReloadNotifier: Send + Sync + fmt::Debug {
    fn notify(&self, paths: &[PathBuf]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn notify(&self, _paths: &[PathBuf]) {}
}

/// One message sent to live-reload clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadEvent {
    pub command: &'static str,
    pub path: String,
}

impl ReloadEvent {
    pub fn reload(path: &Path) -> Self {
        Self {
            command: "reload",
            path: path.to_string_lossy().replace('\\', "/"),
        }
    }
}

/// Broadcast hub between pipelines and connected clients.
#[derive(Clone)]
pub struct LiveReloadHub {
    sender: broadcast::Sender<ReloadEvent>,
}

impl fmt::Debug for LiveReloadHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveReloadHub")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl Default for LiveReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.sender.subscribe()
    }
}

impl ReloadNotifier for LiveReloadHub {
    fn notify(&self, paths: &[PathBuf]) {
        for path in paths {
            // Source maps are never loaded by the page itself.
            if path.extension().is_some_and(|ext| ext == "map") {
                continue;
            }
            match self.sender.send(ReloadEvent::reload(path)) {
                Ok(count) => debug!(?path, subscribers = count, "reload sent"),
                Err(_) => debug!(?path, "no live-reload clients connected"),
            }
        }
    }
}
