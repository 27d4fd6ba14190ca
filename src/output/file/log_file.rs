//! Per-path state tracked by a file target.

use super::metadata::RecoveredMetadata;
use super::options::{BufferMode, Buffering};
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, LineWriter, Write};
use std::path::{Path, PathBuf};

/// Open handle with the configured buffering.
#[derive(Debug)]
enum FileWriter {
    Direct(File),
    Full(BufWriter<File>),
    Line(LineWriter<File>),
}

impl FileWriter {
    fn open(path: &Path, buffering: Buffering) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(match buffering.mode {
            BufferMode::Unbuffered => Self::Direct(file),
            BufferMode::Full => Self::Full(BufWriter::with_capacity(buffering.capacity, file)),
            BufferMode::Line => Self::Line(LineWriter::with_capacity(buffering.capacity, file)),
        })
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Direct(file) => file.write(buf),
            Self::Full(writer) => writer.write(buf),
            Self::Line(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Direct(file) => file.flush(),
            Self::Full(writer) => writer.flush(),
            Self::Line(writer) => writer.flush(),
        }
    }
}

/// A resolved log file name plus what the rotation engine knows about it.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: Option<FileWriter>,
    creation_time: DateTime<Utc>,
    /// Number the next archive of this file receives.
    sequence: u32,
    /// Bytes in the file, counting ones still buffered.
    size: u64,
    /// Write tick of the target when this file was last resolved.
    last_used: u64,
}

impl LogFile {
    pub(crate) fn new(path: PathBuf, metadata: RecoveredMetadata, size: u64) -> Self {
        Self {
            path,
            writer: None,
            creation_time: metadata.creation_time,
            sequence: metadata.sequence,
            size,
            last_used: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    pub(crate) const fn last_used(&self) -> u64 {
        self.last_used
    }

    pub(crate) const fn touch(&mut self, tick: u64) {
        self.last_used = tick;
    }

    pub(crate) const fn metadata(&self) -> RecoveredMetadata {
        RecoveredMetadata {
            creation_time: self.creation_time,
            sequence: self.sequence,
        }
    }

    pub(crate) fn open(&mut self, buffering: Buffering) -> io::Result<()> {
        if self.writer.is_none() {
            self.writer = Some(FileWriter::open(&self.path, buffering)?);
        }
        Ok(())
    }

    pub(crate) fn append(&mut self, bytes: &[u8], buffering: Buffering) -> io::Result<()> {
        self.open(buffering)?;
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(bytes)?;
        }
        self.size += bytes.len() as u64;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Flushes and drops the handle.
    pub(crate) fn close(&mut self) -> io::Result<()> {
        let result = self.flush();
        self.writer = None;
        result
    }

    /// State after the old contents were archived away: empty, created at `now`,
    /// next sequence number.
    pub(crate) const fn reset(&mut self, now: DateTime<Utc>, next_sequence: u32) {
        self.creation_time = now;
        self.sequence = next_sequence;
        self.size = 0;
    }
}
