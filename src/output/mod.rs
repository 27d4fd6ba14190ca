//! Targets pair a layout with a sink. The console and rotating-file sinks ship
//! with the crate; the `Sink` trait lets users plug in their own.

mod console;
pub mod file;

pub use console::{ConsoleSink, Stream};
pub use file::{
    ArchiveNumbering, ArchiveTiming, BufferMode, Buffering, CREATION_TIME_KEY, FileOptions,
    FileTarget, LogFile, MAX_OPEN_FILES, MetadataSource, OsMetadata, RecoveredMetadata,
    SEQUENCE_KEY, SidecarMetadata, WriteReport, default_sources, parse_sidecar, recover_metadata,
    sidecar_path,
};

use crate::fmt::{Layout, LogEvent};
use crate::level::Level;
use std::fmt;

/// Where a rendered message ends up.
///
/// `Send` so a logger can be moved behind a mutex and shared across threads.
pub trait Sink: Send {
    /// Persists one rendered message.
    ///
    /// # Errors
    /// I/O errors from the underlying destination. The logger reports them and
    /// moves on to the next target.
    fn emit(&mut self, event: &LogEvent<'_>, message: &str) -> Result<(), crate::Error>;

    /// Pushes buffered bytes to the OS.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn flush(&mut self) -> Result<(), crate::Error> {
        Ok(())
    }
}

/// Adapts a closure into a [`Sink`].
pub struct FnSink<F>(pub F);

impl<F> Sink for FnSink<F>
where
    F: FnMut(&LogEvent<'_>, &str) + Send,
{
    fn emit(&mut self, event: &LogEvent<'_>, message: &str) -> Result<(), crate::Error> {
        (self.0)(event, message);
        Ok(())
    }
}

/// One output destination with its own layout and inclusive level range.
pub struct Target {
    layout: Layout,
    sink: Box<dyn Sink>,
    min_level: Level,
    max_level: Level,
}

impl Target {
    /// Accepts every level until narrowed with [`Target::levels`].
    #[must_use]
    pub fn new(layout: Layout, sink: impl Sink + 'static) -> Self {
        Self {
            layout,
            sink: Box::new(sink),
            min_level: Level::Trace,
            max_level: Level::Fatal,
        }
    }

    /// Stdout target rendering `layout` for levels in `[min_level, max_level]`.
    ///
    /// # Errors
    /// Fails when the layout template does not parse.
    pub fn console(layout: &str, min_level: Level, max_level: Level) -> Result<Self, crate::Error> {
        let layout = Layout::parse(layout)?;
        Ok(Self::new(layout, ConsoleSink::stdout()).levels(min_level, max_level))
    }

    #[must_use]
    pub const fn levels(mut self, min_level: Level, max_level: Level) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn accepts(&self, level: Level) -> bool {
        (self.min_level..=self.max_level).contains(&level)
    }

    #[must_use]
    pub const fn min_level(&self) -> Level {
        self.min_level
    }

    #[must_use]
    pub const fn max_level(&self) -> Level {
        self.max_level
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Renders into `buffer` (cleared first) and hands the result to the sink.
    pub(crate) fn write(
        &mut self,
        event: &LogEvent<'_>,
        buffer: &mut String,
    ) -> Result<(), crate::Error> {
        buffer.clear();
        self.layout.render(event, buffer)?;
        self.sink.emit(event, buffer)
    }

    pub(crate) fn flush(&mut self) -> Result<(), crate::Error> {
        self.sink.flush()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("layout", &self.layout.source())
            .field("min_level", &self.min_level)
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}
