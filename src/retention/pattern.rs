//! Recognizing a file group's archives on disk from its archive name.
//!
//! The archive name is rendered once with marker values in place of the
//! sequence number and date; the markers then become capture groups in an
//! anchored regex matched against directory entries.

use regex::Regex;
use std::path::{Path, PathBuf};

/// Rendered in place of `${sequence}` when building a pattern.
pub const SEQUENCE_MARKER: &str = "\u{1}seq\u{1}";
/// Rendered in place of `${archive_date}` when building a pattern.
pub const DATE_MARKER: &str = "\u{1}date\u{1}";

#[derive(Debug, Clone)]
pub struct ArchivePattern {
    dir: PathBuf,
    regex: Regex,
}

impl ArchivePattern {
    /// Builds a pattern from an archive path rendered with the markers.
    ///
    /// Returns `None` when a marker lands in the directory part, since
    /// archives spread over several directories cannot be enumerated.
    #[must_use]
    pub fn from_rendered(rendered: &Path) -> Option<Self> {
        let name = rendered.file_name()?.to_str()?;
        let dir = match rendered.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir_text = dir.to_string_lossy();
        if dir_text.contains(SEQUENCE_MARKER) || dir_text.contains(DATE_MARKER) {
            return None;
        }

        let body = regex::escape(name)
            .replace(SEQUENCE_MARKER, r"(?P<seq>\d+)")
            .replace(DATE_MARKER, ".+?");
        let regex = Regex::new(&format!(r"^{body}(?:\.gz)?$")).ok()?;

        Some(Self { dir, regex })
    }

    /// Directory the archives live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `None` if `file_name` is not an archive of this group; otherwise the
    /// sequence number it carries, if the pattern has one.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> Option<Option<u64>> {
        let captures = self.regex.captures(file_name)?;
        Some(
            captures
                .name("seq")
                .and_then(|seq| seq.as_str().parse().ok()),
        )
    }
}
