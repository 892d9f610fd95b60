use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MapsError, Result};

/// List the raw dumps in a run directory.
///
/// A file matches when its extension equals `extension` (case-insensitive,
/// without the dot) and, if given, its file name contains `identifier`.
/// Everything else is ignored. Results are sorted by file name so the run
/// order is reproducible.
pub fn discover_runs(dir: &Path, identifier: Option<&str>, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MapsError::FileNotFound(dir.to_path_buf()));
    }

    let extension = extension.trim_start_matches('.');
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !ext_matches {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if identifier.is_some_and(|id| !name.contains(id)) {
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    debug!(dir = %dir.display(), matched = paths.len(), "Discovered run files");
    Ok(paths)
}
