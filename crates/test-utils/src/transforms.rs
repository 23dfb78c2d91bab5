//! Pure-Rust stand-ins for the external build tools.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use assetwatch::errors::TransformError;
use assetwatch::transform::{Asset, BoxFuture, Transform};

/// Marker that makes [`FakeTool`] reject an input.
pub const BROKEN_MARKER: &str = "BROKEN";

/// A deterministic tool: upper-cases its input (or passes it through) and
/// rejects any input containing [`BROKEN_MARKER`].
///
/// Every call is recorded with the source path of the asset.
#[derive(Debug, Clone)]
pub struct FakeTool {
    name: String,
    uppercase: bool,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeTool {
    /// Upper-cases the contents.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uppercase: true,
            calls: Arc::default(),
        }
    }

    /// Leaves the contents untouched.
    pub fn passthrough(name: &str) -> Self {
        Self {
            uppercase: false,
            ..Self::new(name)
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn arc(&self) -> Arc<dyn Transform> {
        Arc::new(self.clone())
    }
}

impl Transform for FakeTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&'a self, mut asset: Asset) -> BoxFuture<'a, Result<Asset, TransformError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(asset.source.clone());

            if asset.contents.contains(BROKEN_MARKER) {
                return Err(TransformError::new(
                    &self.name,
                    &asset.source,
                    format!("unexpected token {BROKEN_MARKER}"),
                ));
            }
            if self.uppercase {
                let upper = asset.contents.to_uppercase();
                asset.replace_contents(upper);
            }
            Ok(asset)
        })
    }
}
