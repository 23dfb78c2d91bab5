// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod http_error;
pub mod livereload;
pub mod logging;
pub mod mode;
pub mod pipeline;
pub mod sources;
pub mod transform;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::{CliArgs, TaskName};
use crate::config::{config_root_dir, load_for_cli, ConfigFile};
use crate::dag::TaskGraph;
use crate::engine::run_named;
use crate::errors::Result;
use crate::exec::SharedDelegator;
use crate::fs::RealFileSystem;
use crate::livereload::{LiveReloadHub, NoopNotifier, ReloadNotifier};
use crate::mode::BuildMode;
use crate::pipeline::{Pipelines, TaskEnv, TaskReport};
use crate::types::TaskKind;
use crate::watch::{run_watch, ReloadEndpoint, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and the project root
/// - the build mode
/// - the pipelines and the task graph
/// - watch mode (with optional live reload) or a one-shot build
/// - Ctrl-C handling in watch mode
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_for_cli(&config_path)?;
    let root = config_root_dir(&config_path);
    let mode = BuildMode::resolve(args.production, Some(args.livereload));

    let graph = TaskGraph::new();
    graph.validate()?;

    info!(task = %args.task, mode = mode.label(), ?root, "assetwatch starting");

    if args.dry_run {
        print_dry_run(&cfg, &root, mode, &graph, args.task);
        return Ok(());
    }

    match args.task {
        TaskName::Shared => {
            let delegator = SharedDelegator::new(&root, cfg.shared());
            let handle = delegator.spawn()?;
            handle.wait().await?;
            Ok(())
        }
        TaskName::Watch => {
            let hub = mode.live_reload.then(LiveReloadHub::new);
            let notifier: Arc<dyn ReloadNotifier> = match &hub {
                Some(hub) => Arc::new(hub.clone()),
                None => Arc::new(NoopNotifier),
            };
            let env = TaskEnv::new(&root, Arc::new(RealFileSystem), notifier);
            let pipelines = Pipelines::from_config(&cfg, mode, env)?;

            let reload = hub.map(|hub| ReloadEndpoint {
                host: cfg.livereload().host.clone(),
                port: cfg.livereload().port,
                hub,
            });

            run_watch(
                WatchOptions {
                    root,
                    pipelines,
                    mode,
                    reload,
                },
                shutdown_signal(),
            )
            .await
        }
        name => {
            let env = TaskEnv::new(&root, Arc::new(RealFileSystem), Arc::new(NoopNotifier));
            let pipelines = Pipelines::from_config(&cfg, mode, env)?;
            let reports = run_named(&graph, &pipelines, name).await?;
            log_summary(&reports);
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn log_summary(reports: &[TaskReport]) {
    for report in reports {
        info!(
            task = %report.task,
            written = report.written.len(),
            skipped = report.skipped.len(),
            unchanged = report.unchanged,
            "task finished"
        );
        for skipped in &report.skipped {
            warn!(task = %report.task, "skipped: {skipped}");
        }
    }
}

/// Print the resolved mode, tasks, sources and destinations.
fn print_dry_run(cfg: &ConfigFile, root: &Path, mode: BuildMode, graph: &TaskGraph, task: TaskName) {
    println!("assetwatch dry-run");
    println!("  root = {}", root.display());
    println!("  task = {task}");
    println!("  mode = {}", mode.label());
    println!(
        "    minify = {}, source_maps = {}, fault_barrier = {}, pretty_output = {}, live_reload = {}",
        mode.minify, mode.source_maps, mode.fault_barrier, mode.pretty_output, mode.live_reload
    );
    println!();

    let kinds = match task {
        TaskName::Watch => TaskKind::ALL.to_vec(),
        other => graph.pipelines_for(other),
    };

    let paths = cfg.paths();
    for kind in &kinds {
        let (sources, dest): (Vec<&str>, &str) = match kind {
            TaskKind::Styles => (paths.styles.iter().map(String::as_str).collect(), paths.css_dest.as_str()),
            TaskKind::Templates => (
                paths.templates.iter().map(String::as_str).collect(),
                paths.templates_dest.as_str(),
            ),
            TaskKind::Scripts => (vec![paths.scripts.as_str()], paths.scripts_dest.as_str()),
            TaskKind::ScriptsTutti => (vec![paths.scripts_tutti.as_str()], paths.scripts_dest.as_str()),
        };
        println!("  - {kind}");
        println!("      sources: {sources:?}");
        println!("      dest: {dest}");
    }

    if task == TaskName::Shared {
        let delegator = SharedDelegator::new(root, cfg.shared());
        println!("  - shared");
        println!("      dir: {}", delegator.dir().display());
        println!("      cmd: {}", delegator.describe());
    }
    if task == TaskName::Watch && mode.live_reload {
        let lr = cfg.livereload();
        println!("  live-reload: {}:{}", lr.host, lr.port);
    }

    debug!("dry-run complete (nothing built)");
}
