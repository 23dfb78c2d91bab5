// src/watch/bindings.rs

use std::fmt;

use crate::pipeline::Pipelines;
use crate::sources::SourceSet;
use crate::types::TaskKind;

/// Glob set bound to one pipeline in watch mode.
#[derive(Clone)]
pub struct WatchBinding {
    task: TaskKind,
    sources: SourceSet,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("task", &self.task)
            .field("patterns", &self.sources.patterns())
            .finish()
    }
}

impl WatchBinding {
    pub fn new(task: TaskKind, sources: SourceSet) -> Self {
        Self { task, sources }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    /// `rel_path` is relative to the project root, `/`-separated.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.sources.matches(rel_path)
    }
}

/// One binding per pipeline, watching exactly what the pipeline reads.
pub fn bindings_for(pipelines: &Pipelines) -> Vec<WatchBinding> {
    pipelines
        .iter()
        .map(|task| WatchBinding::new(task.kind(), task.sources().clone()))
        .collect()
}
