// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Permission bits given to a new output file when the pipeline does not ask
/// for a specific mode.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace `path` with `contents`.
    ///
    /// The write is atomic: readers see either the previous file or the
    /// complete new one. `mode` forces the permission bits; `None` keeps the
    /// bits of an existing file, or uses [`DEFAULT_FILE_MODE`].
    fn write(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()>;

    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Permission bits of a file (`None` where the platform has none).
    fn mode(&self, path: &Path) -> Option<u32>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;

        // Stage next to the target so the final rename stays on one filesystem.
        let mut staged = tempfile::Builder::new()
            .prefix(".assetwatch-")
            .tempfile_in(parent)
            .with_context(|| format!("creating temporary file in {:?}", parent))?;
        staged
            .write_all(contents)
            .with_context(|| format!("writing to file {:?}", path))?;

        let mode = mode
            .or_else(|| self.mode(path))
            .unwrap_or(DEFAULT_FILE_MODE);
        set_mode(staged.path(), mode)
            .with_context(|| format!("setting mode {:o} on {:?}", mode, path))?;

        staged
            .persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing file {:?}", path))?;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    #[cfg(unix)]
    fn mode(&self, path: &Path) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path)
            .ok()
            .map(|meta| meta.permissions().mode() & 0o777)
    }

    #[cfg(not(unix))]
    fn mode(&self, _path: &Path) -> Option<u32> {
        None
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    // set_permissions is not subject to the umask.
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
