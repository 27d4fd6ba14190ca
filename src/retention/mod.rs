//! Archive retention: without limits, every rollover leaves one more file
//! behind. This module finds a file group's archives and enforces age and
//! count limits on them, oldest first.

mod compress;
mod files;
mod pattern;
mod size;

pub use compress::compress_file;
pub use files::ArchiveEntry;
pub use pattern::{ArchivePattern, DATE_MARKER, SEQUENCE_MARKER};
pub use size::{format_size, parse_size};

use crate::internal;
use files::collect_archives;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// How "oldest" is decided, matching the archive numbering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOrder {
    /// Lowest sequence number first.
    Sequence,
    /// Least recently modified first.
    Modified,
}

/// Limits applied in one retention pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionPolicy {
    pub max_files: Option<usize>,
    pub max_days: Option<u32>,
}

#[derive(Debug, Default)]
pub struct RetentionResult {
    pub removed: Vec<PathBuf>,
    pub freed: u64,
    /// Archives that could not be deleted, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl RetentionResult {
    #[must_use]
    pub fn count(&self) -> usize {
        self.removed.len()
    }

    fn remove(&mut self, archive: &ArchiveEntry) {
        internal::debug(
            "RETENTION",
            &format!("Deleting archive: {}", archive.path.display()),
        );
        match fs::remove_file(&archive.path) {
            Ok(()) => {
                self.removed.push(archive.path.clone());
                self.freed += archive.size;
            }
            Err(e) => {
                internal::warn(
                    "RETENTION",
                    &format!("Failed to delete {}: {e}", archive.path.display()),
                );
                self.failed.push((archive.path.clone(), e.to_string()));
            }
        }
    }
}

/// Archives of the group described by `pattern`, oldest first.
///
/// # Errors
/// Directory traversal failures.
pub fn list_archives(
    pattern: &ArchivePattern,
    active: &Path,
    order: ArchiveOrder,
) -> Result<Vec<ArchiveEntry>, crate::Error> {
    let mut archives = collect_archives(pattern, active)?;
    match order {
        ArchiveOrder::Sequence => archives.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then(a.modified.cmp(&b.modified))
        }),
        ArchiveOrder::Modified => {
            archives.sort_by(|a, b| a.modified.cmp(&b.modified).then(a.path.cmp(&b.path)));
        }
    }
    Ok(archives)
}

/// Highest sequence number among the group's archives.
///
/// # Errors
/// Directory traversal failures.
pub fn highest_sequence(
    pattern: &ArchivePattern,
    active: &Path,
) -> Result<Option<u64>, crate::Error> {
    Ok(collect_archives(pattern, active)?
        .iter()
        .filter_map(|archive| archive.sequence)
        .max())
}

/// Deletes archives older than `policy.max_days`, then the oldest remaining
/// ones until at most `policy.max_files` are left.
///
/// # Errors
/// Directory traversal failures. Individual deletions that fail are recorded
/// in the result instead.
pub fn enforce_retention(
    pattern: &ArchivePattern,
    active: &Path,
    order: ArchiveOrder,
    policy: RetentionPolicy,
    now: SystemTime,
) -> Result<RetentionResult, crate::Error> {
    let mut result = RetentionResult::default();
    if policy.max_files.is_none() && policy.max_days.is_none() {
        return Ok(result);
    }

    let mut archives = list_archives(pattern, active, order)?;

    if let Some(days) = policy.max_days {
        let max_age = Duration::from_secs(u64::from(days) * 86_400);
        archives.retain(|archive| {
            let expired = now
                .duration_since(archive.modified)
                .is_ok_and(|age| age > max_age);
            if expired {
                result.remove(archive);
            }
            !expired
        });
    }

    if let Some(max) = policy.max_files {
        let excess = archives.len().saturating_sub(max);
        for archive in archives.iter().take(excess) {
            result.remove(archive);
        }
    }

    if result.count() > 0 {
        internal::info(
            "RETENTION",
            &format!(
                "Removed {} archives, {} freed",
                result.count(),
                format_size(result.freed)
            ),
        );
    }

    Ok(result)
}
