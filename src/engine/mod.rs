// src/engine/mod.rs

//! Running pipelines by name.
//!
//! The [`TaskGraph`] expands an invocable name to its pipelines; the
//! pipelines then run concurrently and their reports are collected in
//! pipeline order.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cli::TaskName;
use crate::dag::TaskGraph;
use crate::errors::{AssetError, Result};
use crate::pipeline::{PipelineTask, Pipelines, TaskReport};
use crate::types::TaskKind;

/// Run `kinds` concurrently and wait for all of them.
///
/// Every failure is logged; the first one (in pipeline order) is returned.
pub async fn run_tasks(pipelines: &Pipelines, kinds: &[TaskKind]) -> Result<Vec<TaskReport>> {
    let mut handles: Vec<(TaskKind, JoinHandle<Result<TaskReport>>)> = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let task = pipelines
            .get(kind)
            .ok_or_else(|| AssetError::ConfigError(format!("no pipeline registered for '{kind}'")))?;
        handles.push((kind, tokio::spawn(run_one(task))));
    }

    let mut reports = Vec::with_capacity(handles.len());
    let mut first_err = None;
    for (kind, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => Err(AssetError::Other(anyhow::anyhow!(
                "task '{kind}' panicked: {join_err}"
            ))),
        };
        match outcome {
            Ok(report) => reports.push(report),
            Err(err) => {
                error!(task = %kind, error = %err, "task failed");
                first_err.get_or_insert(err);
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

/// Run the pipelines behind an invocable name.
pub async fn run_named(
    graph: &TaskGraph,
    pipelines: &Pipelines,
    name: TaskName,
) -> Result<Vec<TaskReport>> {
    let kinds = graph.pipelines_for(name);
    info!(task = %name, pipelines = ?kinds, "running task");
    run_tasks(pipelines, &kinds).await
}

async fn run_one(task: Arc<dyn PipelineTask>) -> Result<TaskReport> {
    task.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceSet;
    use crate::transform::BoxFuture;
    use std::path::{Path, PathBuf};

    #[derive(Debug)]
    struct StubTask {
        kind: TaskKind,
        fail: bool,
        sources: SourceSet,
        dest: PathBuf,
    }

    impl StubTask {
        fn new(kind: TaskKind, fail: bool) -> Arc<dyn PipelineTask> {
            Arc::new(Self {
                kind,
                fail,
                sources: SourceSet::single("src/**/*").unwrap(),
                dest: PathBuf::from("out"),
            })
        }
    }

    impl PipelineTask for StubTask {
        fn kind(&self) -> TaskKind {
            self.kind
        }
        fn sources(&self) -> &SourceSet {
            &self.sources
        }
        fn destination(&self) -> &Path {
            &self.dest
        }
        fn run(&self) -> BoxFuture<'_, Result<TaskReport>> {
            Box::pin(async move {
                if self.fail {
                    Err(AssetError::Other(anyhow::anyhow!("{} broke", self.kind)))
                } else {
                    Ok(TaskReport::new(self.kind))
                }
            })
        }
    }

    fn all(fail: &[TaskKind]) -> Pipelines {
        Pipelines::new(
            TaskKind::ALL
                .iter()
                .map(|&k| StubTask::new(k, fail.contains(&k)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn default_collects_all_four_reports() {
        let reports = run_named(&TaskGraph::new(), &all(&[]), TaskName::Default)
            .await
            .unwrap();
        let kinds: Vec<TaskKind> = reports.iter().map(|r| r.task).collect();
        assert_eq!(kinds, TaskKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn first_failure_in_pipeline_order_wins() {
        let err = run_tasks(
            &all(&[TaskKind::Scripts, TaskKind::Templates]),
            &TaskKind::ALL,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "templates broke");
    }

    #[tokio::test]
    async fn unknown_pipeline_is_a_config_error() {
        let pipelines = Pipelines::new(vec![StubTask::new(TaskKind::Styles, false)]);
        let err = run_tasks(&pipelines, &[TaskKind::Scripts]).await.unwrap_err();
        assert!(matches!(err, AssetError::ConfigError(_)));
    }
}
