//! Stepwise logger construction. Templates are kept as text until
//! [`LoggerBuilder::build`], which parses them all against one registry.

use super::Logger;
use crate::fmt::{Layout, Registry};
use crate::level::Level;
use crate::output::{
    ArchiveNumbering, ArchiveTiming, BufferMode, ConsoleSink, FileOptions, FileTarget,
    MetadataSource, Stream, Target,
};

/// Layout used by console and file targets that do not set their own.
pub const DEFAULT_LAYOUT: &str = "${time} ${level}: ${message}";

enum Pending {
    Ready(Target),
    Console(ConsoleSettings),
    File(FileSettings),
}

struct ConsoleSettings {
    layout: String,
    stream: Stream,
    min_level: Level,
    max_level: Level,
}

struct FileSettings {
    file_name: String,
    layout: String,
    archive_file_name: Option<String>,
    options: FileOptions,
    sources: Option<Vec<Box<dyn MetadataSource>>>,
    min_level: Level,
    max_level: Level,
}

#[derive(Default)]
pub struct LoggerBuilder {
    pending: Vec<Pending>,
    registry: Option<Registry>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses templates against `registry` instead of the process-wide one.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn console(self) -> ConsoleBuilder {
        ConsoleBuilder {
            parent: self,
            settings: ConsoleSettings {
                layout: DEFAULT_LAYOUT.to_string(),
                stream: Stream::default(),
                min_level: Level::Trace,
                max_level: Level::Fatal,
            },
        }
    }

    /// File target whose path is rendered from `file_name` on every write.
    #[must_use]
    pub fn file(self, file_name: impl Into<String>) -> FileBuilder {
        FileBuilder {
            parent: self,
            settings: FileSettings {
                file_name: file_name.into(),
                layout: DEFAULT_LAYOUT.to_string(),
                archive_file_name: None,
                options: FileOptions::default(),
                sources: None,
                min_level: Level::Trace,
                max_level: Level::Fatal,
            },
        }
    }

    /// Adds an already-assembled target, e.g. one with a custom sink.
    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.pending.push(Pending::Ready(target));
        self
    }

    /// # Errors
    /// The first template that fails to parse, in the order targets were added.
    pub fn build(self) -> Result<Logger, crate::Error> {
        let global;
        let registry = match &self.registry {
            Some(registry) => registry,
            None => {
                global = Registry::global().clone();
                &global
            }
        };

        let mut logger = Logger::new();
        for pending in self.pending {
            let target = match pending {
                Pending::Ready(target) => target,
                Pending::Console(settings) => Target::new(
                    Layout::parse_with(&settings.layout, registry)?,
                    ConsoleSink::new(settings.stream),
                )
                .levels(settings.min_level, settings.max_level),
                Pending::File(settings) => {
                    let mut file = FileTarget::new(
                        Layout::parse_with(&settings.file_name, registry)?,
                        settings.options,
                    )?;
                    if let Some(template) = &settings.archive_file_name {
                        file = file.archive_file_name(Layout::parse_with(template, registry)?);
                    }
                    if let Some(sources) = settings.sources {
                        file = file.metadata_sources(sources);
                    }
                    Target::new(Layout::parse_with(&settings.layout, registry)?, file)
                        .levels(settings.min_level, settings.max_level)
                }
            };
            logger.add_target(target);
        }
        Ok(logger)
    }
}

pub struct ConsoleBuilder {
    parent: LoggerBuilder,
    settings: ConsoleSettings,
}

impl ConsoleBuilder {
    #[must_use]
    pub fn layout(mut self, template: impl Into<String>) -> Self {
        self.settings.layout = template.into();
        self
    }

    #[must_use]
    pub const fn stream(mut self, stream: Stream) -> Self {
        self.settings.stream = stream;
        self
    }

    /// Inclusive level range.
    #[must_use]
    pub const fn levels(mut self, min_level: Level, max_level: Level) -> Self {
        self.settings.min_level = min_level;
        self.settings.max_level = max_level;
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.pending.push(Pending::Console(self.settings));
        self.parent
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    settings: FileSettings,
}

impl FileBuilder {
    #[must_use]
    pub fn layout(mut self, template: impl Into<String>) -> Self {
        self.settings.layout = template.into();
        self
    }

    /// Template for archive names; `${sequence}` and `${archive_date}` are filled in.
    #[must_use]
    pub fn archive_file_name(mut self, template: impl Into<String>) -> Self {
        self.settings.archive_file_name = Some(template.into());
        self
    }

    /// Replaces all rollover options at once.
    #[must_use]
    pub fn options(mut self, options: FileOptions) -> Self {
        self.settings.options = options;
        self
    }

    #[must_use]
    pub const fn archive_on_size(mut self, bytes: u64) -> Self {
        self.settings.options.timing = ArchiveTiming::Size(bytes);
        self
    }

    #[must_use]
    pub const fn archive_every(mut self, timing: ArchiveTiming) -> Self {
        self.settings.options.timing = timing;
        self
    }

    #[must_use]
    pub fn archive_numbering(mut self, numbering: ArchiveNumbering) -> Self {
        self.settings.options.numbering = numbering;
        self
    }

    #[must_use]
    pub const fn max_archive_files(mut self, count: usize) -> Self {
        self.settings.options.max_archive_files = Some(count);
        self
    }

    #[must_use]
    pub const fn max_archive_days(mut self, days: u32) -> Self {
        self.settings.options.max_archive_days = Some(days);
        self
    }

    #[must_use]
    pub fn buffering(mut self, mode: BufferMode, capacity: usize) -> Self {
        self.settings.options = self.settings.options.buffering(mode, capacity);
        self
    }

    #[must_use]
    pub const fn keep_files_open(mut self, keep: bool) -> Self {
        self.settings.options.keep_files_open = keep;
        self
    }

    #[must_use]
    pub const fn compress_archives(mut self, compress: bool) -> Self {
        self.settings.options.compress_archives = compress;
        self
    }

    #[must_use]
    pub fn metadata_sources(mut self, sources: Vec<Box<dyn MetadataSource>>) -> Self {
        self.settings.sources = Some(sources);
        self
    }

    /// Inclusive level range.
    #[must_use]
    pub const fn levels(mut self, min_level: Level, max_level: Level) -> Self {
        self.settings.min_level = min_level;
        self.settings.max_level = max_level;
        self
    }

    #[must_use]
    pub fn done(mut self) -> LoggerBuilder {
        self.parent.pending.push(Pending::File(self.settings));
        self.parent
    }
}
