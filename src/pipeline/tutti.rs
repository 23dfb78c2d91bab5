// src/pipeline/tutti.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::mode::BuildMode;
use crate::sources::{SourceFile, SourceSet};
use crate::transform::sourcemap::{line_count, SourceMap};
use crate::transform::{Asset, BoxFuture, Transform};
use crate::types::TaskKind;

use super::{FaultBarrier, OutputWriter, PipelineTask, TaskEnv, TaskReport, SCRIPT_FILE_MODE};

/// Output name of the aggregate bundle.
pub const TUTTI_OUTPUT: &str = "tutti.min.js";

/// `scripts_tutti`: every matched script, concatenated in logical-name order,
/// minified (production) into a single `tutti.min.js`.
///
/// Every run rebuilds and rewrites the bundle, so a deleted or clobbered
/// output comes back on the next change.
#[derive(Debug)]
pub struct TuttiTask {
    mode: BuildMode,
    env: TaskEnv,
    sources: SourceSet,
    writer: OutputWriter,
    minifier: Arc<dyn Transform>,
}

impl TuttiTask {
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
        }
    }

    async fn build(&self) -> Result<TaskReport> {
        let kind = TaskKind::ScriptsTutti;
        let barrier = FaultBarrier::new(kind, self.mode.fault_barrier);
        let mut report = TaskReport::new(kind);

        let files = self.sources.resolve(self.env.fs.as_ref(), &self.env.root)?;
        if files.is_empty() {
            info!(task = %kind, "no scripts to bundle");
            return Ok(report);
        }
        info!(task = %kind, inputs = files.len(), minify = self.mode.minify, "bundling scripts");

        let mut asset = self.concatenate(&files)?;

        if self.mode.minify {
            match barrier.apply(self.minifier.as_ref(), asset, &mut report).await? {
                Some(minified) => asset = minified,
                None => return Ok(report),
            }
        }

        report.written.extend(self.writer.write(asset)?);

        self.env.announce(&self.mode, kind, &report.written);
        info!(task = %kind, written = report.written.len(), "bundle done");
        Ok(report)
    }

    /// Join `files` with `\n`, in the order given.
    fn concatenate(&self, files: &[SourceFile]) -> Result<Asset> {
        let mut parts = Vec::with_capacity(files.len());
        for file in files {
            parts.push(self.env.fs.read_to_string(&file.path)?);
        }
        let contents = parts.join("\n");

        let mut asset = Asset::new(&files[0].path, TUTTI_OUTPUT, contents);
        if self.mode.source_maps {
            let maps: Vec<SourceMap> = files
                .iter()
                .zip(&parts)
                .map(|(file, text)| {
                    SourceMap::for_source(
                        Path::new(TUTTI_OUTPUT),
                        &self.env.display_path(&file.path),
                        text,
                    )
                })
                .collect();
            let spans: Vec<(&SourceMap, usize)> = maps
                .iter()
                .zip(&parts)
                .map(|(map, text)| (map, line_count(text)))
                .collect();
            asset.map = Some(SourceMap::concat(Path::new(TUTTI_OUTPUT), &spans));
        }
        Ok(asset)
    }
}

impl PipelineTask for TuttiTask {
    fn kind(&self) -> TaskKind {
        TaskKind::ScriptsTutti
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
