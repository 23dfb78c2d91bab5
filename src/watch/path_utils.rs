// src/watch/path_utils.rs

use std::path::Path;

use crate::sources::relative_slash_path;

/// Event path relative to the (canonical) watch root, `/`-separated.
///
/// Some platforms report events under a different absolute prefix than the
/// one that was watched (symlinked temp dirs on macOS). For those, the path
/// is canonicalized; a removed file cannot be, so its parent is used instead.
pub fn event_rel_path(root: &Path, path: &Path) -> Option<String> {
    if let Some(rel) = relative_slash_path(root, path) {
        return Some(rel);
    }

    let canonical = match path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            let parent = path.parent()?.canonicalize().ok()?;
            parent.join(path.file_name()?)
        }
    };
    relative_slash_path(root, &canonical)
}
