//! Plain-text file export for braille output.
//!
//! Files are written byte-for-byte as UTF-8: no BOM, no trailing newline,
//! no normalization. Braille readers and embossers expect exactly the cells
//! that were shown on screen.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Filename used when the caller does not pick one.
pub const DEFAULT_EXPORT_FILENAME: &str = "braille.txt";

/// Write `contents` to `dir/filename`, creating `dir` if needed.
///
/// `filename` must be a bare file name; separators and `..` are rejected so
/// an export can never escape the chosen directory.
pub fn export_text(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    validate_filename(filename)?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(filename);
    std::fs::write(&path, contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        bytes = contents.len(),
        "Exported braille file"
    );
    Ok(path)
}

fn validate_filename(filename: &str) -> Result<()> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Export filename cannot be empty");
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        anyhow::bail!("Export filename '{filename}' must be a plain file name, not a path");
    }
    if trimmed.contains('\0') {
        anyhow::bail!("Export filename contains a NUL byte");
    }
    Ok(())
}
