// src/pipeline/styles.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::mode::BuildMode;
use crate::sources::{SourceFile, SourceSet};
use crate::transform::{Asset, BoxFuture, Transform};
use crate::types::TaskKind;

use super::{FaultBarrier, OutputWriter, PipelineTask, TaskEnv, TaskReport};

/// `styles`: style compiler (compressed) → vendor prefixer → `.css`.
#[derive(Debug)]
pub struct StylesTask {
    mode: BuildMode,
    env: TaskEnv,
    sources: SourceSet,
    writer: OutputWriter,
    compiler: Arc<dyn Transform>,
    prefixer: Arc<dyn Transform>,
}

impl StylesTask {
    pub fn new(
        mode: BuildMode,
        env: TaskEnv,
        sources: SourceSet,
        dest: PathBuf,
        compiler: Arc<dyn Transform>,
        prefixer: Arc<dyn Transform>,
    ) -> Self {
        let writer = OutputWriter::new(Arc::clone(&env.fs), dest);
        Self {
            mode,
            env,
            sources,
            writer,
            compiler,
            prefixer,
        }
    }

    async fn build(&self) -> Result<TaskReport> {
        let kind = TaskKind::Styles;
        let barrier = FaultBarrier::new(kind, self.mode.fault_barrier);
        let mut report = TaskReport::new(kind);

        let files = self.sources.resolve(self.env.fs.as_ref(), &self.env.root)?;
        info!(task = %kind, inputs = files.len(), "building stylesheets");

        for file in files {
            if is_partial(&file.logical) {
                debug!(task = %kind, path = ?file.path, "partial; compiled only through imports");
                continue;
            }

            let mut asset = self.read(&file)?;
            if self.mode.source_maps {
                asset.init_source_map(&self.env.display_path(&file.path));
            }

            let Some(asset) = barrier.apply(self.compiler.as_ref(), asset, &mut report).await? else {
                continue;
            };
            let Some(mut asset) = barrier.apply(self.prefixer.as_ref(), asset, &mut report).await? else {
                continue;
            };

            asset.set_extension("css");
            report.written.extend(self.writer.write(asset)?);
        }

        self.env.announce(&self.mode, kind, &report.written);
        info!(
            task = %kind,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "stylesheets done"
        );
        Ok(report)
    }

    fn read(&self, file: &SourceFile) -> Result<Asset> {
        let contents = self.env.fs.read_to_string(&file.path)?;
        Ok(Asset::new(&file.path, &file.logical, contents))
    }
}

/// Sass partials (`_name.sass`) produce no output of their own.
fn is_partial(logical: &Path) -> bool {
    logical
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

impl PipelineTask for StylesTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Styles
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
