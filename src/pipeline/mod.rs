// src/pipeline/mod.rs

//! The four asset pipelines.
//!
//! Each pipeline is a linear chain over the files of one [`SourceSet`]:
//! read, optionally guard with the [`FaultBarrier`], optionally skip
//! unchanged files via an [`IncrementalCache`] (templates and scripts only),
//! run the transforms, rename, and write through an [`OutputWriter`]. Which
//! optional steps run is decided by the [`BuildMode`] handed to the task
//! constructor.
//!
//! - [`styles`]: style compiler + vendor prefixer → `.css`
//! - [`templates`]: template renderer → `.html`
//! - [`scripts`]: per-file minify → `.min.js`
//! - [`tutti`]: concatenate + minify → `tutti.min.js`

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::{AssetError, Result, TransformError};
use crate::fs::FileSystem;
use crate::livereload::ReloadNotifier;
use crate::mode::BuildMode;
use crate::sources::{relative_slash_path, SourceSet};
use crate::transform::{Autoprefixer, BoxFuture, CommandTransform, Transform};
use crate::types::TaskKind;

pub mod barrier;
pub mod cache;
pub mod output;
pub mod scripts;
pub mod styles;
pub mod templates;
pub mod tutti;

pub use barrier::FaultBarrier;
pub use cache::IncrementalCache;
pub use output::OutputWriter;
pub use scripts::ScriptsTask;
pub use styles::StylesTask;
pub use templates::TemplatesTask;
pub use tutti::TuttiTask;

/// Permission bits forced on every script output.
pub const SCRIPT_FILE_MODE: u32 = 0o644;

/// Everything a task needs from its surroundings.
#[derive(Clone)]
pub struct TaskEnv {
    /// Project root; source patterns and destinations are relative to it.
    pub root: PathBuf,
    pub fs: Arc<dyn FileSystem>,
    pub notifier: Arc<dyn ReloadNotifier>,
}

impl fmt::Debug for TaskEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEnv")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl TaskEnv {
    pub fn new(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        notifier: Arc<dyn ReloadNotifier>,
    ) -> Self {
        Self {
            root: root.into(),
            fs,
            notifier,
        }
    }

    /// Source path as shown in source maps: relative to the project root.
    pub(crate) fn display_path(&self, path: &Path) -> PathBuf {
        relative_slash_path(&self.root, path)
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf())
    }

    /// Tell live-reload listeners about fresh outputs.
    pub(crate) fn announce(&self, mode: &BuildMode, task: TaskKind, written: &[PathBuf]) {
        if !mode.live_reload || written.is_empty() {
            return;
        }
        debug!(%task, count = written.len(), "notifying live-reload listeners");
        self.notifier.notify(written);
    }
}

/// Completion record of one task invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub task: TaskKind,
    /// Every file written, outputs and source maps.
    pub written: Vec<PathBuf>,
    /// Inputs dropped by the fault barrier.
    pub skipped: Vec<TransformError>,
    /// Inputs skipped by the incremental cache.
    pub unchanged: usize,
}

impl TaskReport {
    pub fn new(task: TaskKind) -> Self {
        Self {
            task,
            written: Vec::new(),
            skipped: Vec::new(),
            unchanged: 0,
        }
    }
}

/// A named, re-runnable asset pipeline.
pub trait PipelineTask: Send + Sync + fmt::Debug {
    fn kind(&self) -> TaskKind;

    /// Inputs; also what the watcher binds to this task.
    fn sources(&self) -> &SourceSet;

    fn destination(&self) -> &Path;

    /// Run the chain once over the current inputs.
    ///
    /// The returned future resolves only after every output has been written.
    fn run(&self) -> BoxFuture<'_, Result<TaskReport>>;
}

/// The four pipelines of one build, keyed by kind.
#[derive(Debug, Clone)]
pub struct Pipelines {
    tasks: BTreeMap<TaskKind, Arc<dyn PipelineTask>>,
}

impl Pipelines {
    pub fn new(tasks: Vec<Arc<dyn PipelineTask>>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.kind(), t)).collect(),
        }
    }

    /// Wire the pipelines from config, with the external tools as
    /// collaborators.
    pub fn from_config(cfg: &ConfigFile, mode: BuildMode, env: TaskEnv) -> Result<Self> {
        let paths = cfg.paths();
        let tools = cfg.tools();
        let root = env.root.clone();

        let compiler: Arc<dyn Transform> =
            Arc::new(CommandTransform::new("sass", &tools.sass, &root));
        let prefixer: Arc<dyn Transform> = Arc::new(
            Autoprefixer::new(&tools.browsers)
                .map_err(|e| AssetError::ConfigError(format!("[tools].browsers: {e}")))?,
        );
        let pug_cmd = if mode.pretty_output {
            &tools.pug_pretty
        } else {
            &tools.pug
        };
        let renderer: Arc<dyn Transform> = Arc::new(CommandTransform::new("pug", pug_cmd, &root));
        let minifier: Arc<dyn Transform> =
            Arc::new(CommandTransform::new("uglify", &tools.uglify, &root));

        let styles = StylesTask::new(
            mode,
            env.clone(),
            SourceSet::new(&paths.styles)?,
            root.join(&paths.css_dest),
            compiler,
            prefixer,
        );
        let templates = TemplatesTask::new(
            mode,
            env.clone(),
            SourceSet::new(&paths.templates)?,
            root.join(&paths.templates_dest),
            renderer,
        );
        let scripts = ScriptsTask::new(
            mode,
            env.clone(),
            SourceSet::single(&paths.scripts)?,
            root.join(&paths.scripts_dest),
            Arc::clone(&minifier),
        );
        let tutti = TuttiTask::new(
            mode,
            env,
            SourceSet::single(&paths.scripts_tutti)?,
            root.join(&paths.scripts_dest),
            minifier,
        );

        Ok(Self::new(vec![
            Arc::new(styles),
            Arc::new(templates),
            Arc::new(scripts),
            Arc::new(tutti),
        ]))
    }

    pub fn get(&self, kind: TaskKind) -> Option<Arc<dyn PipelineTask>> {
        self.tasks.get(&kind).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PipelineTask>> {
        self.tasks.values()
    }
}
