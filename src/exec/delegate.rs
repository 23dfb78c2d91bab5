// src/exec/delegate.rs

//! Runs the build of the nested shared-assets project as a child process.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::SharedSection;
use crate::errors::{AssetError, Result};
use crate::transform::command::shell_command;

/// What to run for the shared project.
#[derive(Debug, Clone)]
pub struct SharedDelegator {
    dir: PathBuf,
    command: Option<String>,
}

impl SharedDelegator {
    /// `dir` is resolved against `root`.
    pub fn new(root: &Path, shared: &SharedSection) -> Self {
        Self {
            dir: root.join(&shared.dir),
            command: shared.command.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Human-readable command line.
    pub fn describe(&self) -> String {
        match &self.command {
            Some(cmd) => cmd.clone(),
            None => "<this executable>".to_string(),
        }
    }

    fn build_command(&self) -> Result<Command> {
        let cmd = match &self.command {
            Some(line) => shell_command(line),
            None => {
                let exe = std::env::current_exe().context("locating the current executable")?;
                Command::new(exe)
            }
        };
        Ok(cmd)
    }

    /// Spawn the child and return at once.
    ///
    /// Stdout is logged at `info`, stderr at `warn`. The working directory is
    /// set on the child only.
    pub fn spawn(&self) -> Result<DelegateHandle> {
        let mut cmd = self.build_command()?;
        cmd.current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(dir = ?self.dir, cmd = %self.describe(), "starting shared build");

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning shared build in {:?}", self.dir))?;

        let mut pumps = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            pumps.push(pump_lines(stdout, Stream::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(pump_lines(stderr, Stream::Stderr));
        }

        let dir = self.dir.clone();
        let task = tokio::spawn(async move {
            let status = child.wait().await;
            if let Ok(status) = &status {
                info!(?dir, exit_code = status.code().unwrap_or(-1), "shared build exited");
            }
            status
        });

        Ok(DelegateHandle { task, pumps })
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Log every line of `reader` until EOF; resolves to the line count.
fn pump_lines<R>(reader: R, stream: Stream) -> JoinHandle<usize>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut count = 0;
        while let Ok(Some(line)) = lines.next_line().await {
            match stream {
                Stream::Stdout => info!(target: "assetwatch::shared", "{}", line),
                Stream::Stderr => warn!(target: "assetwatch::shared", "{}", line),
            }
            count += 1;
        }
        count
    })
}

/// Pending shared build.
#[derive(Debug)]
pub struct DelegateHandle {
    task: JoinHandle<std::io::Result<ExitStatus>>,
    pumps: Vec<JoinHandle<usize>>,
}

impl DelegateHandle {
    /// Wait for the child and for its output to be logged; a non-zero exit
    /// is an error.
    pub async fn wait(self) -> Result<ExitStatus> {
        let (status, _) = self.drain().await?;

        if status.success() {
            Ok(status)
        } else {
            Err(AssetError::DelegateFailed(format!(
                "shared build exited with {status}"
            )))
        }
    }

    /// Exit status plus the number of output lines logged.
    async fn drain(self) -> Result<(ExitStatus, usize)> {
        let status = self
            .task
            .await
            .map_err(|e| AssetError::DelegateFailed(format!("waiter task failed: {e}")))??;

        let mut logged = 0;
        for pump in self.pumps {
            logged += pump
                .await
                .map_err(|e| AssetError::DelegateFailed(format!("output pump failed: {e}")))?;
        }
        Ok((status, logged))
    }
}
