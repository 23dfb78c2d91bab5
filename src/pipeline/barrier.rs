// src/pipeline/barrier.rs

use tracing::error;

use crate::errors::Result;
use crate::transform::{Asset, Transform};
use crate::types::TaskKind;

use super::TaskReport;

/// Per-file error guard around a transform.
///
/// Enabled (development): a [`TransformError`](crate::errors::TransformError)
/// is logged, the file is recorded as skipped and the pipeline moves on.
/// Disabled (production): the error fails the task.
#[derive(Debug, Clone, Copy)]
pub struct FaultBarrier {
    task: TaskKind,
    enabled: bool,
}

impl FaultBarrier {
    pub fn new(task: TaskKind, enabled: bool) -> Self {
        Self { task, enabled }
    }

    /// Run `transform` on `asset`. `Ok(None)` means the file was dropped.
    pub async fn apply(
        &self,
        transform: &dyn Transform,
        asset: Asset,
        report: &mut TaskReport,
    ) -> Result<Option<Asset>> {
        match transform.apply(asset).await {
            Ok(asset) => Ok(Some(asset)),
            Err(err) if self.enabled => {
                error!(
                    task = %self.task,
                    tool = %err.tool,
                    path = ?err.path,
                    "{}; skipping file",
                    err.message
                );
                report.skipped.push(err);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
