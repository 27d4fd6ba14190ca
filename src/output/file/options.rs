//! Rollover, numbering, retention, and buffering policy for a file target.
//!
//! Everything defaults to off: no rollover, sequence numbering, unlimited
//! archives, unbuffered writes, files closed after every write.

use chrono::{DateTime, Datelike, Local, Timelike, Utc, Weekday};

/// When the active file is archived. Exactly one policy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveTiming {
    #[default]
    None,
    /// Archive after a write leaves the file at or above this many bytes.
    Size(u64),
    Minute,
    Hour,
    Day,
    Month,
    Year,
    /// Archive on the first write after midnight starting this weekday.
    Weekday(Weekday),
}

impl ArchiveTiming {
    /// Date policies are checked before a write, `Size` after it.
    #[must_use]
    pub const fn is_date_based(self) -> bool {
        !matches!(self, Self::None | Self::Size(_))
    }

    /// Whether a write at `now` falls in a later period than a file created at `created`.
    ///
    /// Periods are evaluated in local time.
    #[must_use]
    pub fn crossed(self, created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if now <= created {
            return false;
        }
        let created = created.with_timezone(&Local);
        let now = now.with_timezone(&Local);

        match self {
            Self::None | Self::Size(_) => false,
            Self::Year => now.year() != created.year(),
            Self::Month => (now.year(), now.month()) != (created.year(), created.month()),
            Self::Day => now.date_naive() != created.date_naive(),
            Self::Hour => (now.date_naive(), now.hour()) != (created.date_naive(), created.hour()),
            Self::Minute => {
                (now.date_naive(), now.hour(), now.minute())
                    != (created.date_naive(), created.hour(), created.minute())
            }
            Self::Weekday(day) => {
                let back = (7 + now.weekday().num_days_from_monday()
                    - day.num_days_from_monday())
                    % 7;
                let boundary = now.date_naive() - chrono::Days::new(u64::from(back));
                created.date_naive() < boundary
            }
        }
    }
}

/// How archived files are told apart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArchiveNumbering {
    #[default]
    /// Increasing integer suffix (`app.1.log`, `app.2.log`, ...).
    Sequence,
    /// The rollover time formatted with `format` (`app.20261016.log`).
    Date { format: String },
}

impl ArchiveNumbering {
    pub const DEFAULT_DATE_FORMAT: &'static str = "%Y%m%d";

    #[must_use]
    pub fn date(format: impl Into<String>) -> Self {
        Self::Date {
            format: format.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// Flush when the buffer fills.
    Full,
    /// Flush at every newline.
    Line,
    #[default]
    Unbuffered,
}

/// Explicit IO buffering for open handles. Only matters with `keep_files_open`,
/// since closed-after-write files are flushed on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffering {
    pub mode: BufferMode,
    pub capacity: usize,
}

impl Default for Buffering {
    fn default() -> Self {
        Self {
            mode: BufferMode::Unbuffered,
            capacity: 8 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileOptions {
    pub timing: ArchiveTiming,
    pub numbering: ArchiveNumbering,
    /// Archives kept per file group; `None` keeps all.
    pub max_archive_files: Option<usize>,
    /// Archives older than this many days are removed; `None` disables.
    pub max_archive_days: Option<u32>,
    pub buffering: Buffering,
    /// Keep handles open between writes, up to
    /// [`MAX_OPEN_FILES`](super::MAX_OPEN_FILES) besides the current file.
    pub keep_files_open: bool,
    /// Gzip archives after rename (`app.1.log.gz`).
    pub compress_archives: bool,
}

impl FileOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn archive_on_size(mut self, bytes: u64) -> Self {
        self.timing = ArchiveTiming::Size(bytes);
        self
    }

    #[must_use]
    pub const fn archive_every(mut self, timing: ArchiveTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn archive_numbering(mut self, numbering: ArchiveNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    #[must_use]
    pub const fn max_archive_files(mut self, count: usize) -> Self {
        self.max_archive_files = Some(count);
        self
    }

    #[must_use]
    pub const fn max_archive_days(mut self, days: u32) -> Self {
        self.max_archive_days = Some(days);
        self
    }

    #[must_use]
    pub const fn buffering(mut self, mode: BufferMode, capacity: usize) -> Self {
        self.buffering = Buffering { mode, capacity };
        self
    }

    #[must_use]
    pub const fn keep_files_open(mut self, keep: bool) -> Self {
        self.keep_files_open = keep;
        self
    }

    #[must_use]
    pub const fn compress_archives(mut self, compress: bool) -> Self {
        self.compress_archives = compress;
        self
    }
}
