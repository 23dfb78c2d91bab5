// src/dag/graph.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::cli::TaskName;
use crate::errors::{AssetError, Result};
use crate::types::TaskKind;

/// Dependency graph between invocable tasks.
///
/// Edge direction: dep -> task. `default` depends on the four pipelines,
/// which are independent of each other. `watch` and `shared` stand alone.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    graph: DiGraphMap<TaskName, ()>,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    pub fn new() -> Self {
        let mut graph = DiGraphMap::new();
        for name in [TaskName::Watch, TaskName::Shared, TaskName::Default] {
            graph.add_node(name);
        }
        for kind in TaskKind::ALL {
            graph.add_edge(kind.task_name(), TaskName::Default, ());
        }
        Self { graph }
    }

    /// Fails if the graph has a cycle.
    pub fn validate(&self) -> Result<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(AssetError::ConfigError(format!(
                "cycle detected in task graph involving '{}'",
                cycle.node_id()
            ))),
        }
    }

    /// Direct dependencies of `name`, in pipeline order.
    pub fn dependencies_of(&self, name: TaskName) -> Vec<TaskName> {
        let mut deps: Vec<TaskName> = self
            .graph
            .neighbors_directed(name, Direction::Incoming)
            .collect();
        deps.sort();
        deps
    }

    /// The pipelines that running `name` builds.
    ///
    /// Empty for `watch` and `shared`, which are not build pipelines.
    pub fn pipelines_for(&self, name: TaskName) -> Vec<TaskKind> {
        if let Some(kind) = TaskKind::from_task_name(name) {
            return vec![kind];
        }
        let mut kinds: Vec<TaskKind> = self
            .dependencies_of(name)
            .into_iter()
            .flat_map(|dep| self.pipelines_for(dep))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_all_four_pipelines() {
        let graph = TaskGraph::new();
        assert_eq!(graph.pipelines_for(TaskName::Default), TaskKind::ALL.to_vec());
    }

    #[test]
    fn single_pipeline_runs_alone() {
        let graph = TaskGraph::new();
        assert_eq!(
            graph.pipelines_for(TaskName::ScriptsTutti),
            vec![TaskKind::ScriptsTutti]
        );
        assert!(graph.dependencies_of(TaskName::Styles).is_empty());
    }

    #[test]
    fn watch_and_shared_build_nothing_directly() {
        let graph = TaskGraph::new();
        assert!(graph.pipelines_for(TaskName::Watch).is_empty());
        assert!(graph.pipelines_for(TaskName::Shared).is_empty());
    }

    #[test]
    fn graph_is_acyclic() {
        TaskGraph::new().validate().unwrap();
    }
}
