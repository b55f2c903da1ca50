use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default file-name fragment used to recognise dockerfiles.
pub const DEFAULT_PATTERN: &str = "dockerfile";

/// Walk `dir` recursively and collect candidate dockerfiles.
///
/// A path is selected when it is a regular file with no extension, its
/// lower-cased file name contains `pattern`, and it is not executable.
/// Unreadable entries are logged and skipped. Results are sorted so the
/// report is identical across runs.
pub fn discover_dockerfiles(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let pattern = pattern.to_lowercase();
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_some() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains(&pattern) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) if is_executable(&meta) => {
                debug!(path = %path.display(), "ignoring executable file");
            }
            Ok(_) => found.push(path.to_path_buf()),
            Err(err) => warn!(path = %path.display(), error = %err, "cannot stat file"),
        }
    }

    found.sort();
    found
}

/// Read a dockerfile as UTF-8 text.
pub fn read_dockerfile(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read dockerfile: {}", path.display()))
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    false
}
