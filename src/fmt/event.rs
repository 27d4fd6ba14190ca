//! The data every renderer reads from: level, call site, message arguments, and time.

use crate::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;

/// One log call, borrowed for the duration of rendering.
///
/// `message` holds the caller's format string and arguments unevaluated; only
/// the `message` renderer formats them, so targets that filter the level out
/// never pay for it.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub level: Level,
    pub file: &'a str,
    pub function: &'a str,
    pub line: u32,
    pub message: fmt::Arguments<'a>,
    /// Drives both the `time` renderer and rollover evaluation.
    pub timestamp: DateTime<Utc>,
    /// Set only while a file target renders an archive name.
    pub archive: Option<&'a ArchiveContext>,
}

impl<'a> LogEvent<'a> {
    /// Event stamped with the current time and no call-site information.
    #[must_use]
    pub fn new(level: Level, message: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            file: "",
            function: "",
            line: 0,
            message,
            timestamp: Utc::now(),
            archive: None,
        }
    }

    #[must_use]
    pub const fn location(mut self, file: &'a str, function: &'a str, line: u32) -> Self {
        self.file = file;
        self.function = function;
        self.line = line;
        self
    }

    /// Overrides the timestamp, mostly so rollover can be driven deterministically.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub const fn with_archive(mut self, archive: &'a ArchiveContext) -> Self {
        self.archive = Some(archive);
        self
    }
}

/// Values exposed to `${sequence}` and `${archive_date}` while an archive name is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveContext {
    pub sequence: String,
    pub date: String,
}
