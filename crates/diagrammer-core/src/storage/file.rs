//! Reading and writing diagram files.

use super::ExportArtifact;
use crate::error::{EditorError, EditorResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `artifact` to `path`.
///
/// When `path` is an existing directory the artifact's own file name is
/// used inside it. Returns the path actually written.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> EditorResult<PathBuf> {
    let target = if path.is_dir() {
        path.join(&artifact.file_name)
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                EditorError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
    }

    fs::write(&target, &artifact.bytes)
        .map_err(|e| EditorError::Io(format!("Failed to write {}: {}", target.display(), e)))?;
    log::info!("Exported {} bytes to {}", artifact.len(), target.display());
    Ok(target)
}

/// Read the raw bytes of a diagram file for import.
pub fn read_diagram_file(path: &Path) -> EditorResult<Vec<u8>> {
    fs::read(path).map_err(|e| EditorError::Io(format!("Failed to read {}: {}", path.display(), e)))
}
