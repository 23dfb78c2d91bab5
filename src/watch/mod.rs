// src/watch/mod.rs

//! Watch mode.
//!
//! Binds each pipeline's source globs to the pipeline, runs a recursive
//! `notify` watcher on the project root and re-runs the bound pipelines for
//! every matching change. It knows nothing about how a pipeline builds.

pub mod bindings;
pub mod controller;
pub mod path_utils;
pub mod watcher;

pub use bindings::{bindings_for, WatchBinding};
pub use controller::{WatchController, WatchState};
pub use watcher::{run_watch, ReloadEndpoint, WatchOptions};
