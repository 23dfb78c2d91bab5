// src/sources.rs

//! Ordered, override-aware glob sets.
//!
//! A [`SourceSet`] is a list of glob patterns relative to the project root.
//! Each pattern has a *base*: its leading components that contain no glob
//! metacharacters (`websrc/templates` for `websrc/templates/**/*.pug`). A
//! matched file's *logical name* is its path relative to that base, and it is
//! the logical name that decides where the output lands and which file wins
//! when two patterns produce the same one: the later pattern does.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::fs::FileSystem;

/// One resolved input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk (`root` joined with the root-relative path).
    pub path: PathBuf,
    /// Path relative to the pattern base.
    pub logical: PathBuf,
}

#[derive(Clone)]
struct SourcePattern {
    raw: String,
    base: PathBuf,
    matcher: GlobMatcher,
}

impl SourcePattern {
    fn new(raw: &str) -> Result<Self> {
        // `*` must stay within one path component so `scripts/*.js` does not
        // pick up `scripts/tutti/x.js`.
        let matcher = GlobBuilder::new(raw)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {raw}"))?
            .compile_matcher();

        Ok(Self {
            raw: raw.to_string(),
            base: glob_base(raw),
            matcher,
        })
    }

    fn collect(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<SourceFile>> {
        let start = if self.base.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(&self.base)
        };
        if !fs.is_dir(&start) {
            debug!(pattern = %self.raw, dir = ?start, "pattern base does not exist; no files");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut stack = vec![start];

        while let Some(dir) = stack.pop() {
            for path in fs.read_dir(&dir)? {
                if fs.is_dir(&path) {
                    stack.push(path);
                } else if fs.is_file(&path) {
                    let Some(rel) = relative_slash_path(root, &path) else {
                        continue;
                    };
                    if !self.matcher.is_match(&rel) {
                        continue;
                    }
                    let logical = Path::new(&rel)
                        .strip_prefix(&self.base)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| PathBuf::from(&rel));
                    files.push(SourceFile { path, logical });
                }
            }
        }

        Ok(files)
    }
}

/// Ordered list of glob patterns; later patterns override earlier ones.
#[derive(Clone)]
pub struct SourceSet {
    patterns: Vec<SourcePattern>,
}

impl fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSet")
            .field("patterns", &self.patterns())
            .finish()
    }
}

impl SourceSet {
    /// Compile the given patterns, in precedence order (lowest first).
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| SourcePattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn single(pattern: &str) -> Result<Self> {
        Self::new(&[pattern])
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.raw.as_str()).collect()
    }

    /// Does any pattern match this root-relative, `/`-separated path?
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matcher.is_match(rel_path))
    }

    /// Resolve the set against `root`.
    ///
    /// Files are returned sorted by logical name. When two patterns yield the
    /// same logical name, only the file from the later pattern is kept.
    pub fn resolve(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<SourceFile>> {
        let mut merged: BTreeMap<PathBuf, SourceFile> = BTreeMap::new();

        for pattern in &self.patterns {
            for file in pattern.collect(fs, root)? {
                let logical = file.logical.clone();
                let path = file.path.clone();
                if let Some(shadowed) = merged.insert(logical.clone(), file) {
                    debug!(
                        ?logical,
                        winner = ?path,
                        shadowed = ?shadowed.path,
                        "source overridden by later pattern"
                    );
                }
            }
        }

        Ok(merged.into_values().collect())
    }
}

/// Leading components of `pattern` that contain no glob metacharacters.
///
/// The last component is never part of the base, even when it is a plain
/// file name.
pub fn glob_base(pattern: &str) -> PathBuf {
    let parts: Vec<&str> = pattern.split('/').collect();
    let mut base = PathBuf::new();

    for part in &parts[..parts.len().saturating_sub(1)] {
        if part.contains(['*', '?', '[', '{']) {
            break;
        }
        base.push(part);
    }
    base
}

/// `path` relative to `root`, with forward slashes.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn logical_names(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.logical.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn base_stops_at_first_glob_component() {
        assert_eq!(glob_base("websrc/templates/**/*.pug"), PathBuf::from("websrc/templates"));
        assert_eq!(glob_base("websrc/scripts/*.js"), PathBuf::from("websrc/scripts"));
        assert_eq!(glob_base("a/{b,c}/d.js"), PathBuf::from("a"));
        assert_eq!(glob_base("static/app.js"), PathBuf::from("static"));
        assert_eq!(glob_base("*.js"), PathBuf::new());
    }

    #[test]
    fn star_does_not_cross_directories() {
        let set = SourceSet::single("websrc/scripts/*.js").unwrap();
        assert!(set.matches("websrc/scripts/app.js"));
        assert!(!set.matches("websrc/scripts/tutti/menu.js"));
    }

    #[test]
    fn later_pattern_overrides_same_logical_name() {
        let fs = MockFileSystem::new();
        fs.add_file("./shared/templates/_footer.pug", "footer shared");
        fs.add_file("./shared/templates/layout.pug", "layout shared");
        fs.add_file("./local/templates/_footer.pug", "footer local");
        fs.add_file("./local/templates/pages/index.pug", "index");

        let set = SourceSet::new(&["shared/templates/**/*.pug", "local/templates/**/*.pug"]).unwrap();
        let files = set.resolve(&fs, Path::new(".")).unwrap();

        assert_eq!(
            logical_names(&files),
            vec!["_footer.pug", "layout.pug", "pages/index.pug"]
        );
        assert_eq!(files[0].path, PathBuf::from("./local/templates/_footer.pug"));
        assert_eq!(files[1].path, PathBuf::from("./shared/templates/layout.pug"));
    }

    #[test]
    fn missing_base_directory_yields_nothing() {
        let fs = MockFileSystem::new();
        let set = SourceSet::single("websrc/styles/**/*.sass").unwrap();
        assert!(set.resolve(&fs, Path::new(".")).unwrap().is_empty());
    }

    #[test]
    fn non_matching_extensions_are_ignored() {
        let fs = MockFileSystem::new();
        fs.add_file("./websrc/styles/main.sass", "a");
        fs.add_file("./websrc/styles/notes.txt", "b");

        let set = SourceSet::single("websrc/styles/**/*.sass").unwrap();
        let files = set.resolve(&fs, Path::new(".")).unwrap();
        assert_eq!(logical_names(&files), vec!["main.sass"]);
    }
}
