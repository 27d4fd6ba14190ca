//! Archive discovery shared by retention and sequence recovery.

use super::pattern::ArchivePattern;
use crate::internal;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One archive found on disk. Metadata is captured at scan time so the
/// retention pass sorts and filters on a consistent snapshot.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub sequence: Option<u64>,
    pub modified: SystemTime,
    pub size: u64,
}

/// Lists files in the pattern's directory that match it, skipping `active`
/// (the live log file may match a loose date pattern).
pub(crate) fn collect_archives(
    pattern: &ArchivePattern,
    active: &Path,
) -> Result<Vec<ArchiveEntry>, crate::Error> {
    let dir = pattern.dir();
    let mut archives = Vec::new();

    if !dir.is_dir() {
        return Ok(archives);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if is_active(&path, dir, active) || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(sequence) = pattern.matches(name) else {
            continue;
        };
        let Ok(meta) = entry.metadata() else {
            continue;
        };

        internal::trace("RETENTION", &format!("Found archive: {}", path.display()));
        archives.push(ArchiveEntry {
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            size: meta.len(),
            sequence,
            path,
        });
    }

    Ok(archives)
}

/// `read_dir(".")` yields `./app.log` for an active path of `app.log`.
fn is_active(path: &Path, dir: &Path, active: &Path) -> bool {
    if path == active {
        return true;
    }
    let active_dir = match active.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    active_dir == dir && path.file_name() == active.file_name()
}
