//! Display-name sanitization and destination-path construction.
//!
//! Display names come from remote markup and are untrusted; every path
//! separator is stripped before the name is joined to the download root, so
//! the destination always resolves to a direct child of the root.

use std::path::{Path, PathBuf};

/// File extension for persisted cell dictionaries.
pub const CELL_EXTENSION: &str = ".scel";

/// Removes every path-separator character from a display name.
///
/// An empty result (name consisted solely of separators, or was empty)
/// becomes `_` so the destination file still has a base name.
#[must_use]
pub fn sanitize_display_name(name: &str) -> String {
    let sanitized: String = name.chars().filter(|c| !matches!(c, '/' | '\\')).collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// Destination path for a resource: `<root>/<sanitized-name>.scel`.
#[must_use]
pub fn cell_file_path(download_dir: &Path, display_name: &str) -> PathBuf {
    let name = sanitize_display_name(display_name);
    download_dir.join(format!("{name}{CELL_EXTENSION}"))
}
