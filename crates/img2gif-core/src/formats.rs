use std::collections::BTreeSet;
use std::path::Path;

/// File extensions (lowercase, with the leading dot) accepted as frames.
pub const SUPPORTED_EXTENSIONS: [&str; 7] =
    [".png", ".jpg", ".jpeg", ".bmp", ".gif", ".tiff", ".webp"];

/// Lowercased extension of `path` including the leading dot, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Whether `path` carries one of the supported extensions (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// A fresh copy of the supported extension set. Mutating the returned set
/// has no effect on the registry.
pub fn supported_formats() -> BTreeSet<String> {
    SUPPORTED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}
