#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use assetwatch::fs::FileSystem;
use assetwatch::fs::mock::MockFileSystem;
use assetwatch::mode::BuildMode;
use assetwatch::pipeline::{ScriptsTask, StylesTask, TaskEnv, TemplatesTask, TuttiTask};
use assetwatch::sources::SourceSet;
use assetwatch::transform::Transform;
use assetwatch_test_utils::builders::task_env;

pub const SHARED_TEMPLATES: &str = "webstatic/assets_shared/templates/**/*.pug";
pub const LOCAL_TEMPLATES: &str = "websrc/templates/**/*.pug";
pub const SCRIPTS: &str = "websrc/scripts/*.js";
pub const TUTTI: &str = "websrc/scripts/tutti/**/*.js";

pub const TEMPLATES_DEST: &str = "./templates";
pub const CSS_DEST: &str = "./webstatic/assets/css";
pub const SCRIPTS_DEST: &str = "./webstatic/assets/js";

pub fn mock_env(fs: &MockFileSystem) -> TaskEnv {
    let fs: Arc<dyn FileSystem> = Arc::new(fs.clone());
    task_env(fs)
}

pub fn templates_task(env: TaskEnv, mode: BuildMode, renderer: Arc<dyn Transform>) -> TemplatesTask {
    TemplatesTask::new(
        mode,
        env,
        SourceSet::new(&[SHARED_TEMPLATES, LOCAL_TEMPLATES]).unwrap(),
        PathBuf::from(TEMPLATES_DEST),
        renderer,
    )
}

pub fn styles_task(
    env: TaskEnv,
    mode: BuildMode,
    compiler: Arc<dyn Transform>,
    prefixer: Arc<dyn Transform>,
) -> StylesTask {
    StylesTask::new(
        mode,
        env,
        SourceSet::new(&[
            "webstatic/assets_shared/styles/**/*.sass",
            "websrc/styles/**/*.sass",
        ])
        .unwrap(),
        PathBuf::from(CSS_DEST),
        compiler,
        prefixer,
    )
}

pub fn scripts_task(env: TaskEnv, mode: BuildMode, minifier: Arc<dyn Transform>) -> ScriptsTask {
    let dest = env.root.join("webstatic/assets/js");
    ScriptsTask::new(mode, env, SourceSet::single(SCRIPTS).unwrap(), dest, minifier)
}

pub fn tutti_task(env: TaskEnv, mode: BuildMode, minifier: Arc<dyn Transform>) -> TuttiTask {
    let dest = env.root.join("webstatic/assets/js");
    TuttiTask::new(mode, env, SourceSet::single(TUTTI).unwrap(), dest, minifier)
}
