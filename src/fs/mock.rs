// src/fs/mock.rs

use super::{FileSystem, DEFAULT_FILE_MODE};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { contents: Vec<u8>, mode: u32 },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for pipeline and source-set tests.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert_file(path.as_ref(), content.into(), DEFAULT_FILE_MODE);
    }

    /// Contents of a file as UTF-8, `None` if absent.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().get(path.as_ref()) {
            Some(MockEntry::File { contents, .. }) => {
                Some(String::from_utf8_lossy(contents).into_owned())
            }
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .lock()
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File { .. }))
            .map(|(p, _)| p.clone())
            .collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert_file(&self, path: &Path, contents: Vec<u8>, mode: u32) {
        let mut files = self.lock();
        files.insert(path.to_path_buf(), MockEntry::File { contents, mode });

        // Parent directories exist implicitly.
        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };

            ensure_dir_entry(&mut files, parent);
            link_child(&mut files, parent, path);
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };

        if parent != path {
            ensure_dir_entry(files, parent);
            link_child(files, parent, path);
        }
    }
}

fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.lock().get(path) {
            Some(MockEntry::File { contents, .. }) => String::from_utf8(contents.clone())
                .map_err(|e| anyhow!("Invalid UTF-8: {}", e)),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8], mode: Option<u32>) -> Result<()> {
        let mode = mode
            .or_else(|| self.mode(path))
            .unwrap_or(DEFAULT_FILE_MODE);
        self.insert_file(path, contents.to_vec(), mode);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lock().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn mode(&self, path: &Path) -> Option<u32> {
        match self.lock().get(path) {
            Some(MockEntry::File { mode, .. }) => Some(*mode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_files_create_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("./websrc/scripts/tutti/a.js", "a");

        assert!(fs.is_dir(Path::new("./websrc/scripts/tutti")));
        assert!(fs.is_dir(Path::new("./websrc")));
        let entries = fs.read_dir(Path::new("./websrc/scripts")).unwrap();
        assert_eq!(entries, vec![PathBuf::from("./websrc/scripts/tutti")]);
    }

    #[test]
    fn write_records_mode() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("./out/a.js"), b"x", Some(0o644)).unwrap();
        assert_eq!(fs.mode(Path::new("./out/a.js")), Some(0o644));
        assert_eq!(fs.contents("./out/a.js").as_deref(), Some("x"));
    }
}
