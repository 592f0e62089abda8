use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::formats::{extension_of, is_supported};

/// Resolve `input` to the ordered list of image files to use as frames.
///
/// A file yields itself, a directory yields its supported top-level files
/// sorted by path. An empty result is `NoImagesFound`.
pub fn resolve_image_paths(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(Error::InvalidInput(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    let paths = if input.is_file() {
        if !is_supported(input) {
            let ext = extension_of(input).unwrap_or_else(|| "(none)".to_string());
            return Err(Error::InvalidInput(format!(
                "file is not a supported image format: {ext}"
            )));
        }
        vec![input.to_path_buf()]
    } else if input.is_dir() {
        scan_directory(input)?
    } else {
        return Err(Error::InvalidInput(format!(
            "input path is neither file nor directory: {}",
            input.display()
        )));
    };

    if paths.is_empty() {
        return Err(Error::NoImagesFound(input.to_path_buf()));
    }

    info!(?input, count = paths.len(), "resolved image files");
    Ok(paths)
}

fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::InvalidInput(format!("failed to read directory {}: {e}", dir.display()))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::InvalidInput(format!("failed to read directory {}: {e}", dir.display()))
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if !is_supported(&path) {
            debug!(?path, "skipping unsupported file");
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}
