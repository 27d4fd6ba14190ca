//! Recovering a log file's creation time and archive sequence after a restart.
//!
//! Sources are consulted in order and the first answer wins: filesystem
//! metadata, then the `.li` sidecar next to the log file, then defaults
//! (now, sequence 1). Failures at any step fall through to the next.

use crate::internal;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar key holding the creation time in epoch seconds.
pub const CREATION_TIME_KEY: &str = "creation_time";
/// Sidecar key holding the next archive sequence number.
pub const SEQUENCE_KEY: &str = "sequence";

/// One step of the recovery chain. Return `None` to defer to the next source.
pub trait MetadataSource: Send {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>>;

    fn sequence(&self, _path: &Path) -> Option<u32> {
        None
    }
}

/// Birth time as reported by the filesystem. Not every platform or filesystem has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsMetadata;

impl MetadataSource for OsMetadata {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        let created = fs::metadata(path).ok()?.created().ok()?;
        Some(DateTime::<Utc>::from(created))
    }
}

/// `attribute=value` lines in `<log path with extension .li>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarMetadata;

impl MetadataSource for SidecarMetadata {
    fn creation_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        let secs = read_sidecar_attribute(path, CREATION_TIME_KEY)?
            .parse::<i64>()
            .ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    fn sequence(&self, path: &Path) -> Option<u32> {
        read_sidecar_attribute(path, SEQUENCE_KEY)?.parse().ok()
    }
}

/// What the chain produced for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredMetadata {
    pub creation_time: DateTime<Utc>,
    pub sequence: u32,
}

/// Walks `sources` in order for each attribute, defaulting to `now` and `1`.
#[must_use]
pub fn recover_metadata(
    path: &Path,
    sources: &[Box<dyn MetadataSource>],
    now: DateTime<Utc>,
) -> RecoveredMetadata {
    let creation_time = sources
        .iter()
        .find_map(|source| source.creation_time(path))
        .unwrap_or_else(|| {
            internal::trace(
                "FILE",
                &format!("No creation time for {}, using now", path.display()),
            );
            now
        });
    let sequence = sources
        .iter()
        .find_map(|source| source.sequence(path))
        .unwrap_or(1);

    RecoveredMetadata {
        creation_time,
        sequence,
    }
}

/// The chain used when a target is not given one explicitly.
#[must_use]
pub fn default_sources() -> Vec<Box<dyn MetadataSource>> {
    vec![Box::new(OsMetadata), Box::new(SidecarMetadata)]
}

/// Log path with its extension replaced by `li`.
///
/// A log file that already ends in `.li` has no sidecar, and files that differ
/// only in extension share one.
#[must_use]
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("li")
}

/// Parses sidecar contents; unknown keys and malformed lines are skipped.
#[must_use]
pub fn parse_sidecar(contents: &str, attribute: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim() == attribute).then(|| value.trim().to_string())
    })
}

fn read_sidecar_attribute(path: &Path, attribute: &str) -> Option<String> {
    let sidecar = sidecar_path(path);
    if sidecar == path {
        return None;
    }
    let contents = fs::read_to_string(sidecar).ok()?;
    parse_sidecar(&contents, attribute)
}

/// Rewrites the sidecar for `path`.
pub(crate) fn write_sidecar(path: &Path, metadata: RecoveredMetadata) -> std::io::Result<()> {
    let mut contents = String::new();
    let _ = writeln!(
        contents,
        "{CREATION_TIME_KEY}={}",
        metadata.creation_time.timestamp()
    );
    let _ = writeln!(contents, "{SEQUENCE_KEY}={}", metadata.sequence);
    fs::write(sidecar_path(path), contents)
}
