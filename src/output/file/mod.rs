//! Rotating file target.
//!
//! Each write renders the file-name template to a concrete path, tracks that
//! path as a [`LogFile`], and checks the rollover policy: date policies before
//! the write, the size policy after it. Rolling over closes the file, renames
//! it to its archive name, starts a fresh file at the original path, and runs
//! retention on the group's archives.
//!
//! The engine does no locking of its own. Share a target between threads only
//! behind the logger's lock.

mod log_file;
mod metadata;
mod options;

pub use log_file::LogFile;
pub use metadata::{
    CREATION_TIME_KEY, MetadataSource, OsMetadata, RecoveredMetadata, SEQUENCE_KEY,
    SidecarMetadata, default_sources, parse_sidecar, recover_metadata, sidecar_path,
};
pub use options::{ArchiveNumbering, ArchiveTiming, BufferMode, Buffering, FileOptions};

use crate::fmt::{ArchiveContext, Layout, LogEvent, ParseError, RenderError, TimeRenderer};
use crate::internal;
use crate::retention::{self, ArchiveOrder, ArchivePattern, RetentionPolicy};
use chrono::{DateTime, Local, Utc};
use metadata::write_sidecar;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::Sink;

/// Upper bound on name collisions skipped when picking an archive name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Handles kept open for files other than the one being written.
pub const MAX_OPEN_FILES: usize = 16;

/// What one call to [`FileTarget::write`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Resolved path the message was written to.
    pub path: PathBuf,
    /// Bytes handed to the file, trailing newline included.
    pub bytes: usize,
    /// Where the previous contents went if this write triggered a rollover.
    pub archived: Option<PathBuf>,
    /// Archives deleted by retention after the rollover.
    pub removed: Vec<PathBuf>,
}

pub struct FileTarget {
    file_name: Layout,
    archive_file_name: Option<Layout>,
    options: FileOptions,
    files: Vec<LogFile>,
    sources: Vec<Box<dyn MetadataSource>>,
    scratch: String,
    ticks: u64,
}

impl FileTarget {
    /// # Errors
    /// Fails when date numbering carries an invalid strftime pattern.
    pub fn new(file_name: Layout, options: FileOptions) -> Result<Self, ParseError> {
        if let ArchiveNumbering::Date { format } = &options.numbering {
            TimeRenderer::new(format.clone(), false)?;
        }
        Ok(Self {
            file_name,
            archive_file_name: None,
            options,
            files: Vec::new(),
            sources: metadata::default_sources(),
            scratch: String::new(),
            ticks: 0,
        })
    }

    /// Parses `template` against the global registry.
    ///
    /// # Errors
    /// Template or date-format failures.
    pub fn from_template(template: &str, options: FileOptions) -> Result<Self, ParseError> {
        Self::new(Layout::parse(template)?, options)
    }

    /// Names archives with a template instead of `<stem>.<n>.<ext>`.
    /// `${sequence}` and `${archive_date}` render the archive's number and date.
    #[must_use]
    pub fn archive_file_name(mut self, layout: Layout) -> Self {
        self.archive_file_name = Some(layout);
        self
    }

    /// Replaces the metadata recovery chain.
    #[must_use]
    pub fn metadata_sources(mut self, sources: Vec<Box<dyn MetadataSource>>) -> Self {
        self.sources = sources;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &FileOptions {
        &self.options
    }

    /// Files resolved so far, in first-use order.
    #[must_use]
    pub fn tracked_files(&self) -> &[LogFile] {
        &self.files
    }

    /// Appends `message` plus a newline to the file the event resolves to,
    /// archiving before or after as the policy demands.
    ///
    /// # Errors
    /// Rendering the file name, opening, writing, or renaming failed. The
    /// message is lost for this target only.
    pub fn write(
        &mut self,
        event: &LogEvent<'_>,
        message: &str,
    ) -> Result<WriteReport, crate::Error> {
        let path = self.resolve_path(event)?;
        let index = self.track(&path, event)?;
        self.ticks += 1;
        self.files[index].touch(self.ticks);
        if self.options.keep_files_open {
            self.close_idle(index);
        }
        let mut report = WriteReport {
            path,
            ..WriteReport::default()
        };

        let timing = self.options.timing;
        if timing.is_date_based()
            && timing.crossed(self.files[index].creation_time(), event.timestamp)
        {
            self.archive(index, event, &mut report)?;
        }

        let mut line = String::with_capacity(message.len() + 1);
        line.push_str(message);
        line.push('\n');

        let buffering = self.options.buffering;
        let file = &mut self.files[index];
        if let Err(e) = file.append(line.as_bytes(), buffering) {
            let _ = file.close();
            return Err(e.into());
        }
        report.bytes = line.len();

        if let ArchiveTiming::Size(limit) = timing
            && self.files[index].size() >= limit
        {
            self.archive(index, event, &mut report)?;
        }

        if !self.options.keep_files_open {
            self.files[index].close()?;
        }

        Ok(report)
    }

    fn resolve_path(&mut self, event: &LogEvent<'_>) -> Result<PathBuf, crate::Error> {
        self.scratch.clear();
        self.file_name.render(event, &mut self.scratch)?;
        if self.scratch.is_empty() {
            let e = io::Error::new(io::ErrorKind::InvalidInput, "file name rendered empty");
            return Err(e.into());
        }
        Ok(PathBuf::from(shellexpand::tilde(&self.scratch).as_ref()))
    }

    /// Index of the tracked entry for `path`, creating it on first use.
    fn track(&mut self, path: &Path, event: &LogEvent<'_>) -> Result<usize, crate::Error> {
        if let Some(index) = self.files.iter().position(|file| file.path() == path) {
            return Ok(index);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let now = event.timestamp;
        let existing = fs::metadata(path).ok().filter(fs::Metadata::is_file);
        let mut recovered = match existing {
            Some(_) => metadata::recover_metadata(path, &self.sources, now),
            None => RecoveredMetadata {
                creation_time: now,
                sequence: 1,
            },
        };

        if self.options.numbering == ArchiveNumbering::Sequence
            && let Some(pattern) = self.archive_pattern(path, event)?
            && let Some(highest) = retention::highest_sequence(&pattern, path)?
        {
            let next = u32::try_from(highest.saturating_add(1)).unwrap_or(u32::MAX);
            recovered.sequence = recovered.sequence.max(next);
        }

        let size = existing.map_or(0, |meta| meta.len());
        let mut file = LogFile::new(path.to_path_buf(), recovered, size);
        if self.options.keep_files_open {
            file.open(self.options.buffering)?;
        }
        internal::debug(
            "FILE",
            &format!(
                "Tracking {} (sequence {}, {} bytes)",
                path.display(),
                file.sequence(),
                size
            ),
        );

        self.files.push(file);
        let index = self.files.len() - 1;
        self.persist(index);
        Ok(index)
    }

    fn archive(
        &mut self,
        index: usize,
        event: &LogEvent<'_>,
        report: &mut WriteReport,
    ) -> Result<(), crate::Error> {
        let now = event.timestamp;
        let active = self.files[index].path().to_path_buf();
        self.files[index].close()?;

        let sequence = self.files[index].sequence();
        let (target, sequence) = self.free_archive_name(&active, event, sequence)?;
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&active, &target)?;
        internal::info(
            "FILE",
            &format!("Archived {} -> {}", active.display(), target.display()),
        );

        let archived = if self.options.compress_archives {
            retention::compress_file(&target).unwrap_or_else(|e| {
                internal::warn(
                    "FILE",
                    &format!("Failed to compress {}: {e}", target.display()),
                );
                target
            })
        } else {
            target
        };
        report.archived = Some(archived);

        self.files[index].reset(now, sequence.saturating_add(1));
        OpenOptions::new().create(true).append(true).open(&active)?;
        if self.options.keep_files_open {
            self.files[index].open(self.options.buffering)?;
        }
        self.persist(index);

        report.removed = self.enforce_retention(&active, event)?;
        Ok(())
    }

    /// Closes the least recently used handles until at most [`MAX_OPEN_FILES`]
    /// remain besides the one at `current`. Their state stays tracked.
    fn close_idle(&mut self, current: usize) {
        loop {
            let others = self
                .files
                .iter()
                .enumerate()
                .filter(|(i, file)| *i != current && file.is_open())
                .count();
            if others < MAX_OPEN_FILES {
                return;
            }
            let Some(idle) = self
                .files
                .iter_mut()
                .enumerate()
                .filter(|(i, file)| *i != current && file.is_open())
                .min_by_key(|(_, file)| file.last_used())
                .map(|(_, file)| file)
            else {
                return;
            };
            if let Err(e) = idle.close() {
                internal::warn(
                    "FILE",
                    &format!("Failed to flush {}: {e}", idle.path().display()),
                );
            }
        }
    }

    /// First archive name that does not exist yet. Sequence numbering moves to
    /// the next number; date numbering appends `-<n>` to the date.
    fn free_archive_name(
        &mut self,
        active: &Path,
        event: &LogEvent<'_>,
        sequence: u32,
    ) -> Result<(PathBuf, u32), crate::Error> {
        let date = self.archive_date(event.timestamp)?;
        let mut previous: Option<PathBuf> = None;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let (number, date) = match self.options.numbering {
                ArchiveNumbering::Sequence => (sequence.saturating_add(attempt), date.clone()),
                ArchiveNumbering::Date { .. } if attempt == 0 => (sequence, date.clone()),
                ArchiveNumbering::Date { .. } => (sequence, format!("{date}-{attempt}")),
            };
            let context = ArchiveContext {
                sequence: number.to_string(),
                date,
            };
            let candidate = self.archive_path(active, event, &context)?;

            if previous.as_ref() == Some(&candidate) {
                break;
            }
            if candidate != active && !candidate.exists() && !gz_path(&candidate).exists() {
                return Ok((candidate, number));
            }
            previous = Some(candidate);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free archive name for {}", active.display()),
        )
        .into())
    }

    /// Renders the archive template, or falls back to `<stem>.<value>.<ext>`.
    fn archive_path(
        &mut self,
        active: &Path,
        event: &LogEvent<'_>,
        context: &ArchiveContext,
    ) -> Result<PathBuf, crate::Error> {
        let Some(layout) = self.archive_file_name.as_mut() else {
            let value = match self.options.numbering {
                ArchiveNumbering::Sequence => &context.sequence,
                ArchiveNumbering::Date { .. } => &context.date,
            };
            return Ok(default_archive_path(active, value));
        };

        let event = event.with_archive(context);
        self.scratch.clear();
        layout.render(&event, &mut self.scratch)?;
        Ok(PathBuf::from(shellexpand::tilde(&self.scratch).as_ref()))
    }

    fn archive_pattern(
        &mut self,
        active: &Path,
        event: &LogEvent<'_>,
    ) -> Result<Option<ArchivePattern>, crate::Error> {
        let markers = ArchiveContext {
            sequence: retention::SEQUENCE_MARKER.to_string(),
            date: retention::DATE_MARKER.to_string(),
        };
        let rendered = self.archive_path(active, event, &markers)?;
        Ok(ArchivePattern::from_rendered(&rendered))
    }

    fn archive_date(&self, timestamp: DateTime<Utc>) -> Result<String, RenderError> {
        let format = match &self.options.numbering {
            ArchiveNumbering::Date { format } => format.as_str(),
            ArchiveNumbering::Sequence => ArchiveNumbering::DEFAULT_DATE_FORMAT,
        };
        let mut date = String::new();
        write!(date, "{}", timestamp.with_timezone(&Local).format(format))?;
        Ok(date)
    }

    fn enforce_retention(
        &mut self,
        active: &Path,
        event: &LogEvent<'_>,
    ) -> Result<Vec<PathBuf>, crate::Error> {
        let policy = RetentionPolicy {
            max_files: self.options.max_archive_files,
            max_days: self.options.max_archive_days,
        };
        if policy.max_files.is_none() && policy.max_days.is_none() {
            return Ok(Vec::new());
        }

        let Some(pattern) = self.archive_pattern(active, event)? else {
            internal::warn(
                "FILE",
                &format!(
                    "Archives of {} span directories, retention skipped",
                    active.display()
                ),
            );
            return Ok(Vec::new());
        };
        let order = match self.options.numbering {
            ArchiveNumbering::Sequence => ArchiveOrder::Sequence,
            ArchiveNumbering::Date { .. } => ArchiveOrder::Modified,
        };

        let result = retention::enforce_retention(
            &pattern,
            active,
            order,
            policy,
            SystemTime::from(event.timestamp),
        )?;
        Ok(result.removed)
    }

    /// Records the file's metadata in its sidecar when rollover is configured.
    /// A sidecar shared by several tracked files belongs to the first of them.
    fn persist(&self, index: usize) {
        if self.options.timing == ArchiveTiming::None {
            return;
        }
        let file = &self.files[index];
        let sidecar = sidecar_path(file.path());
        if sidecar == file.path() {
            internal::warn(
                "FILE",
                &format!("{} is its own sidecar, metadata not saved", file.path().display()),
            );
            return;
        }
        if let Some(owner) = self.files[..index]
            .iter()
            .find(|other| sidecar_path(other.path()) == sidecar)
        {
            internal::warn(
                "FILE",
                &format!(
                    "Sidecar {} belongs to {}, metadata of {} not saved",
                    sidecar.display(),
                    owner.path().display(),
                    file.path().display()
                ),
            );
            return;
        }
        if let Err(e) = write_sidecar(file.path(), file.metadata()) {
            internal::warn(
                "FILE",
                &format!("Failed to write sidecar for {}: {e}", file.path().display()),
            );
        }
    }
}

impl Sink for FileTarget {
    fn emit(&mut self, event: &LogEvent<'_>, message: &str) -> Result<(), crate::Error> {
        let report = self.write(event, message)?;
        internal::trace(
            "FILE",
            &format!("Wrote {} bytes to {}", report.bytes, report.path.display()),
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        for file in &mut self.files {
            file.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTarget")
            .field("file_name", &self.file_name.source())
            .field(
                "archive_file_name",
                &self.archive_file_name.as_ref().map(Layout::source),
            )
            .field("options", &self.options)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

/// `dir/app.log` + `3` -> `dir/app.3.log`; no extension -> `dir/app.3`.
fn default_archive_path(active: &Path, value: &str) -> PathBuf {
    let stem = active
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let name = match active.extension() {
        Some(ext) => format!("{stem}.{value}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{value}"),
    };
    active.with_file_name(name)
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}
