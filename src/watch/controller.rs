// src/watch/controller.rs

use tracing::{debug, info};

use crate::types::TaskKind;

use super::bindings::WatchBinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
}

/// Maps changed paths to the pipelines bound to them.
///
/// Starts `Idle`; [`WatchController::start`] moves it to `Watching` for the
/// rest of the process. Events seen while `Idle` dispatch nothing.
#[derive(Debug)]
pub struct WatchController {
    state: WatchState,
    bindings: Vec<WatchBinding>,
}

impl WatchController {
    pub fn new() -> Self {
        Self {
            state: WatchState::Idle,
            bindings: Vec::new(),
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Register `bindings` and enter `Watching`. A second call is a no-op.
    pub fn start(&mut self, bindings: Vec<WatchBinding>) {
        if self.state == WatchState::Watching {
            debug!("watch controller already started");
            return;
        }
        for b in &bindings {
            info!(binding = ?b, "watching");
        }
        self.bindings = bindings;
        self.state = WatchState::Watching;
    }

    /// Tasks to run for a change at `rel_path`, in binding order.
    pub fn dispatch(&self, rel_path: &str) -> Vec<TaskKind> {
        if self.state != WatchState::Watching {
            return Vec::new();
        }
        self.bindings
            .iter()
            .filter(|b| b.matches(rel_path))
            .map(|b| b.task())
            .collect()
    }
}

impl Default for WatchController {
    fn default() -> Self {
        Self::new()
    }
}
