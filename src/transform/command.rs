// src/transform/command.rs

//! External tool run as a stdin/stdout filter.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::errors::TransformError;

use super::{Asset, BoxFuture, Transform};

/// Environment variable holding the input file path.
pub const SOURCE_ENV: &str = "ASSETWATCH_SOURCE";
/// Environment variable holding the directory of the input file.
pub const SOURCE_DIR_ENV: &str = "ASSETWATCH_SOURCE_DIR";

/// Runs a shell command with the asset on stdin and takes stdout as the new
/// contents.
///
/// A non-zero exit is reported as a [`TransformError`] carrying the tool's
/// stderr, so the fault barrier can decide whether to skip the file.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    name: String,
    cmd: String,
    cwd: PathBuf,
}

impl CommandTransform {
    pub fn new(name: impl Into<String>, cmd: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            cwd: cwd.into(),
        }
    }

    async fn run(&self, asset: Asset) -> Result<Asset, TransformError> {
        let fail = |message: String| TransformError::new(&self.name, &asset.source, message);

        let mut cmd = shell_command(&self.cmd);
        let source_dir = asset
            .source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        cmd.current_dir(&self.cwd)
            .env(SOURCE_ENV, &asset.source)
            .env(SOURCE_DIR_ENV, &source_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(tool = %self.name, source = ?asset.source, cmd = %self.cmd, "running transform");

        let mut child = cmd
            .spawn()
            .map_err(|e| fail(format!("could not start `{}`: {e}", self.cmd)))?;

        // Feed stdin from its own task so a tool that writes before it has
        // read everything cannot deadlock against us.
        let input = asset.contents.clone().into_bytes();
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                let res = stdin.write_all(&input).await;
                drop(stdin);
                res
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| fail(format!("waiting for `{}`: {e}", self.cmd)))?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                // A tool may legitimately exit without draining stdin; its
                // exit status below is what counts.
                Ok(Err(e)) => trace!(tool = %self.name, error = %e, "stdin closed early"),
                Err(e) => trace!(tool = %self.name, error = %e, "stdin writer task failed"),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("`{}` exited with {}", self.cmd, output.status)
            } else {
                stderr
            };
            return Err(fail(message));
        }

        let contents = String::from_utf8(output.stdout)
            .map_err(|e| fail(format!("output is not valid UTF-8: {e}")))?;

        let mut asset = asset;
        asset.replace_contents(contents);
        Ok(asset)
    }
}

impl Transform for CommandTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&'a self, asset: Asset) -> BoxFuture<'a, Result<Asset, TransformError>> {
        Box::pin(self.run(asset))
    }
}

/// Build a shell command appropriate for the platform.
pub(crate) fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}
