// src/watch/watcher.rs

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{AssetError, Result};
use crate::livereload::{spawn_server, LiveReloadHub};
use crate::mode::BuildMode;
use crate::pipeline::Pipelines;
use crate::types::TaskKind;

use super::bindings::bindings_for;
use super::controller::WatchController;
use super::path_utils::event_rel_path;

/// Where to serve live-reload clients from.
#[derive(Debug, Clone)]
pub struct ReloadEndpoint {
    pub host: String,
    pub port: u16,
    pub hub: LiveReloadHub,
}

/// Everything the watch loop needs.
#[derive(Debug)]
pub struct WatchOptions {
    pub root: PathBuf,
    pub pipelines: Pipelines,
    pub mode: BuildMode,
    /// Set when `mode.live_reload`; the hub must be the pipelines' notifier.
    pub reload: Option<ReloadEndpoint>,
}

/// Watch the project root until `shutdown` resolves.
///
/// No initial build is run. Each changed path that matches a binding spawns
/// one unit of work running the matched pipelines in binding order. With the
/// fault barrier disabled, the first failed task ends the loop with its
/// error; otherwise failures are only logged.
pub async fn run_watch<S>(opts: WatchOptions, shutdown: S) -> Result<()>
where
    S: Future<Output = ()>,
{
    let root = opts.root.canonicalize().unwrap_or_else(|_| opts.root.clone());

    let mut controller = WatchController::new();
    controller.start(bindings_for(&opts.pipelines));

    let server = match opts.reload {
        Some(endpoint) => Some(spawn_server(&endpoint.host, endpoint.port, endpoint.hub).await?),
        None => None,
    };

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("watch loop gone; dropping notify event");
                }
            }
            Err(err) => warn!(error = %err, "file watch error"),
        },
        Config::default(),
    )
    .context("creating file watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {root:?}"))?;
    info!(?root, mode = opts.mode.label(), "file watcher started");

    let (fail_tx, mut fail_rx) = mpsc::unbounded_channel::<AssetError>();
    let strict = !opts.mode.fault_barrier;

    tokio::pin!(shutdown);
    let outcome = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested; stopping watcher");
                break Ok(());
            }
            Some(err) = fail_rx.recv() => {
                error!(error = %err, "task failed in production mode; stopping watcher");
                break Err(err);
            }
            event = event_rx.recv() => match event {
                Some(event) => {
                    for (rel, kinds) in route_event(&root, &controller, event) {
                        // Detached; a strict failure comes back on `fail_tx`.
                        let _ = spawn_unit(
                            opts.pipelines.clone(),
                            kinds,
                            rel,
                            strict,
                            fail_tx.clone(),
                        );
                    }
                }
                None => {
                    debug!("notify channel closed");
                    break Ok(());
                }
            },
        }
    };

    if let Some(server) = server {
        server.shutdown();
    }
    drop(watcher);
    outcome
}

/// Pair every relevant path of `event` with the tasks bound to it.
fn route_event(
    root: &Path,
    controller: &WatchController,
    event: Event,
) -> Vec<(String, Vec<TaskKind>)> {
    if matches!(event.kind, EventKind::Access(_)) {
        return Vec::new();
    }
    debug!(?event, "received notify event");

    let mut routed = Vec::new();
    for path in event.paths {
        let Some(rel) = event_rel_path(root, &path) else {
            warn!(?path, ?root, "could not relativize event path");
            continue;
        };
        let kinds = controller.dispatch(&rel);
        if !kinds.is_empty() {
            routed.push((rel, kinds));
        }
    }
    routed
}

/// Run `kinds` one after another for the change at `rel`.
///
/// In strict mode the first failure is sent on `fail_tx` and the remaining
/// tasks of the unit are not run.
fn spawn_unit(
    pipelines: Pipelines,
    kinds: Vec<TaskKind>,
    rel: String,
    strict: bool,
    fail_tx: mpsc::UnboundedSender<AssetError>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        for kind in kinds {
            let Some(task) = pipelines.get(kind) else {
                continue;
            };
            info!(task = %kind, path = %rel, "change detected; rebuilding");
            if let Err(err) = task.run().await {
                error!(task = %kind, path = %rel, error = %err, "rebuild failed");
                if strict {
                    let _ = fail_tx.send(err);
                    return;
                }
            }
        }
    })
}
