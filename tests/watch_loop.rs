// tests/watch_loop.rs

mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use assetwatch::errors::Result;
use assetwatch::fs::RealFileSystem;
use assetwatch::livereload::NoopNotifier;
use assetwatch::mode::BuildMode;
use assetwatch::pipeline::{Pipelines, TaskEnv, TemplatesTask};
use assetwatch::sources::SourceSet;
use assetwatch::watch::{run_watch, WatchOptions};
use assetwatch_test_utils::transforms::FakeTool;
use assetwatch_test_utils::{init_tracing, with_timeout};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use common::{LOCAL_TEMPLATES, SHARED_TEMPLATES};

const POLL: Duration = Duration::from_millis(100);

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Start watching `root` with a templates pipeline backed by `renderer`.
fn start(
    root: &Path,
    mode: BuildMode,
    renderer: &FakeTool,
) -> (oneshot::Sender<()>, JoinHandle<Result<()>>) {
    let env = TaskEnv::new(root, Arc::new(RealFileSystem), Arc::new(NoopNotifier));
    let templates = TemplatesTask::new(
        mode,
        env,
        SourceSet::new(&[SHARED_TEMPLATES, LOCAL_TEMPLATES]).unwrap(),
        root.join("templates"),
        renderer.arc(),
    );
    let opts = WatchOptions {
        root: root.to_path_buf(),
        pipelines: Pipelines::new(vec![Arc::new(templates)]),
        mode,
        reload: None,
    };

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(run_watch(opts, async {
        let _ = stop_rx.await;
    }));
    (stop_tx, handle)
}

#[tokio::test]
async fn production_failure_ends_the_loop_with_the_error() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(&root.join("websrc/templates/index.pug"), "p home");

    let renderer = FakeTool::new("pug");
    let (_stop_tx, handle) = start(root, BuildMode::production(), &renderer);

    // Rewritten until the watcher has picked it up and the loop gave up.
    let outcome = with_timeout(async {
        loop {
            write(&root.join("websrc/templates/broken.pug"), "p BROKEN");
            if handle.is_finished() {
                break handle.await.unwrap();
            }
            tokio::time::sleep(POLL).await;
        }
    })
    .await;

    let err = outcome.unwrap_err();
    assert!(err.is_transform(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn development_failure_is_logged_and_the_loop_keeps_running() {
    init_tracing();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let broken = root.join("websrc/templates/broken.pug");

    let renderer = FakeTool::new("pug");
    let (stop_tx, handle) = start(root, BuildMode::development(), &renderer);

    with_timeout(async {
        while !renderer.calls().contains(&broken) {
            write(&broken, "p BROKEN");
            tokio::time::sleep(POLL).await;
        }
    })
    .await;
    assert!(!handle.is_finished());

    // A later change still gets built.
    let output = root.join("templates/ok.html");
    with_timeout(async {
        while !output.exists() {
            write(&root.join("websrc/templates/ok.pug"), "p fine");
            tokio::time::sleep(POLL).await;
        }
    })
    .await;
    assert_eq!(fs::read_to_string(&output).unwrap(), "P FINE");
    assert!(!root.join("templates/broken.html").exists());

    stop_tx.send(()).unwrap();
    with_timeout(handle).await.unwrap().unwrap();
}
