// src/pipeline/templates.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::mode::BuildMode;
use crate::sources::SourceSet;
use crate::transform::{Asset, BoxFuture, Transform};
use crate::types::TaskKind;

use super::cache::fingerprint;
use super::{FaultBarrier, IncrementalCache, OutputWriter, PipelineTask, TaskEnv, TaskReport};

/// `templates`: merged shared/local sources → renderer → `.html`.
///
/// The renderer is picked by the caller according to `pretty_output`.
#[derive(Debug)]
pub struct TemplatesTask {
    mode: BuildMode,
    env: TaskEnv,
    sources: SourceSet,
    writer: OutputWriter,
    renderer: Arc<dyn Transform>,
    cache: IncrementalCache,
}

impl TemplatesTask {
    pub fn new(
        mode: BuildMode,
        env: TaskEnv,
        sources: SourceSet,
        dest: PathBuf,
        renderer: Arc<dyn Transform>,
    ) -> Self {
        let writer = OutputWriter::new(Arc::clone(&env.fs), dest);
        Self {
            mode,
            env,
            sources,
            writer,
            renderer,
            cache: IncrementalCache::new(),
        }
    }

    async fn build(&self) -> Result<TaskReport> {
        let kind = TaskKind::Templates;
        let barrier = FaultBarrier::new(kind, self.mode.fault_barrier);
        let mut report = TaskReport::new(kind);

        let files = self.sources.resolve(self.env.fs.as_ref(), &self.env.root)?;
        info!(task = %kind, inputs = files.len(), "rendering templates");

        for file in files {
            let contents = self.env.fs.read_to_string(&file.path)?;
            let print = fingerprint(contents.as_bytes());
            if self.cache.is_unchanged(&file.path, &print) {
                debug!(task = %kind, path = ?file.path, "unchanged since last build");
                report.unchanged += 1;
                continue;
            }

            let asset = Asset::new(&file.path, &file.logical, contents);
            let Some(mut asset) = barrier.apply(self.renderer.as_ref(), asset, &mut report).await? else {
                continue;
            };

            asset.set_extension("html");
            report.written.extend(self.writer.write(asset)?);
            self.cache.record(&file.path, print);
        }

        self.env.announce(&self.mode, kind, &report.written);
        info!(
            task = %kind,
            written = report.written.len(),
            skipped = report.skipped.len(),
            unchanged = report.unchanged,
            "templates done"
        );
        Ok(report)
    }
}

impl PipelineTask for TemplatesTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Templates
    }

    fn sources(&self) -> &SourceSet {
        &self.sources
    }

    fn destination(&self) -> &Path {
        self.writer.dest()
    }

    fn run(&self) -> BoxFuture<'_, Result<TaskReport>> {
        Box::pin(self.build())
    }
}
