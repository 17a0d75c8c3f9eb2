use std::path::{Path, PathBuf};

/// Returns `desired` if nothing exists there, otherwise the first free
/// `{stem}_{n}{.ext}` next to it for n = 1, 2, ... Nothing is created, so the
/// result only holds for sequential use.
pub fn resolve_unique_path(desired: &Path) -> PathBuf {
    if !desired.exists() {
        return desired.to_path_buf();
    }

    let stem = desired
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = desired
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|counter| desired.with_file_name(format!("{}_{}{}", stem, counter, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| desired.to_path_buf())
}
