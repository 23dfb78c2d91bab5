// src/transform/mod.rs

//! Collaborator seam for the asset pipelines.
//!
//! Every step that actually rewrites file contents (style compiler, vendor
//! prefixer, template renderer, script minifier) is a [`Transform`]: it takes
//! an [`Asset`] and returns the rewritten asset or a [`TransformError`] for
//! that one file.
//!
//! - [`command`] runs an external tool over stdin/stdout.
//! - [`prefix`] applies vendor prefixes in-process with `lightningcss`.
//! - [`sourcemap`] is the source-map record carried along with an asset.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::errors::TransformError;

pub mod command;
pub mod prefix;
pub mod sourcemap;

pub use command::CommandTransform;
pub use prefix::Autoprefixer;
pub use sourcemap::SourceMap;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A file in flight through a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Input file on disk. For an aggregate, the first input.
    pub source: PathBuf,
    /// Output path relative to the task destination.
    pub logical: PathBuf,
    pub contents: String,
    /// Present when source maps are enabled for this build.
    pub map: Option<SourceMap>,
}

impl Asset {
    pub fn new(source: impl Into<PathBuf>, logical: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            logical: logical.into(),
            contents: contents.into(),
            map: None,
        }
    }

    /// Start tracking a source map for this asset, using its current
    /// contents as the original source.
    pub fn init_source_map(&mut self, display_source: &Path) {
        self.map = Some(SourceMap::for_source(
            &self.logical,
            display_source,
            &self.contents,
        ));
    }

    /// Replace the extension of the logical output path.
    pub fn set_extension(&mut self, ext: &str) {
        self.logical.set_extension(ext);
    }

    /// Append `suffix` to the file stem: `app.js` + `.min` is `app.min.js`.
    pub fn add_stem_suffix(&mut self, suffix: &str) {
        let stem = self
            .logical
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.logical.extension() {
            Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
            None => format!("{stem}{suffix}"),
        };
        self.logical.set_file_name(name);
    }

    /// Record new contents produced by a tool that does not report mappings.
    pub fn replace_contents(&mut self, contents: String) {
        self.contents = contents;
        if let Some(map) = self.map.as_mut() {
            map.clear_mappings();
        }
    }
}

/// A pure per-asset rewrite.
pub trait Transform: Send + Sync + std::fmt::Debug {
    /// Short tool name used in logs and errors.
    fn name(&self) -> &str;

    fn apply<'a>(&'a self, asset: Asset) -> BoxFuture<'a, Result<Asset, TransformError>>;
}
