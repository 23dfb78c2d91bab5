// src/pipeline/scripts.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::mode::BuildMode;
use crate::sources::SourceSet;
use crate::transform::{Asset, BoxFuture, Transform};
use crate::types::TaskKind;

use super::cache::fingerprint;
use super::{
    FaultBarrier, IncrementalCache, OutputWriter, PipelineTask, TaskEnv, TaskReport,
    SCRIPT_FILE_MODE,
};

/// Suffix added to every individually built script.
pub const MIN_SUFFIX: &str = ".min";

/// `scripts`: each top-level script → minifier (production) → `name.min.js`.
#[derive(Debug)]
pub struct ScriptsTask {
    mode: BuildMode,
    env: TaskEnv,
    sources: SourceSet,
    writer: OutputWriter,
    minifier: Arc<dyn Transform>,
    cache: IncrementalCache,
}

impl ScriptsTask {
    pub fn new(
        mode: BuildMode,
        env: TaskEnv,
        sources: SourceSet,
        dest: PathBuf,
        minifier: Arc<dyn Transform>,
    ) -> Self {
        let writer = OutputWriter::new(Arc::clone(&env.fs), dest).with_mode(SCRIPT_FILE_MODE);
        Self {
            mode,
            env,
            sources,
            writer,
            minifier,
            cache: IncrementalCache::new(),
        }
    }

    async fn build(&self) -> Result<TaskReport> {
        let kind = TaskKind::Scripts;
        let barrier = FaultBarrier::new(kind, self.mode.fault_barrier);
        let mut report = TaskReport::new(kind);

        let files = self.sources.resolve(self.env.fs.as_ref(), &self.env.root)?;
        info!(task = %kind, inputs = files.len(), minify = self.mode.minify, "building scripts");

        for file in files {
            let contents = self.env.fs.read_to_string(&file.path)?;
            let print = fingerprint(contents.as_bytes());
            if self.cache.is_unchanged(&file.path, &print) {
                debug!(task = %kind, path = ?file.path, "unchanged since last build");
                report.unchanged += 1;
                continue;
            }

            let mut asset = Asset::new(&file.path, &file.logical, contents);
            if self.mode.source_maps {
                asset.init_source_map(&self.env.display_path(&file.path));
            }

            if self.mode.minify {
                match barrier.apply(self.minifier.as_ref(), asset, &mut report).await? {
                    Some(minified) => asset = minified,
                    None => continue,
                }
            }

            asset.add_stem_suffix(MIN_SUFFIX);
            report.written.extend(self.writer.write(asset)?);
            self.cache.record(&file.path, print);
        }

        self.env.announce(&self.mode, kind, &report.written);
        info!(
            task = %kind,
            written = report.written.len(),
            skipped = report.skipped.len(),
            unchanged = report.unchanged,
            "scripts done"
        );
        Ok(report)
    }
}

impl PipelineTask for ScriptsTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Scripts
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
