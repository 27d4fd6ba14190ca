//! Fan-out of log events to targets.
//!
//! A [`Logger`] owns its targets and a scratch buffer, so logging takes
//! `&mut self`. Wrap it in a [`SharedLogger`] to log from several threads.

mod builder;
mod from_config;
mod macros;
mod shared;

pub use builder::{ConsoleBuilder, DEFAULT_LAYOUT, FileBuilder, LoggerBuilder};
pub use shared::SharedLogger;

use crate::fmt::LogEvent;
use crate::internal;
use crate::level::Level;
use crate::output::Target;

#[derive(Debug, Default)]
pub struct Logger {
    targets: Vec<Target>,
    buffer: String,
}

impl Logger {
    /// Logger with no targets; every event is discarded until one is added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn add_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// Renders and emits `event` on every target whose level range includes it.
    ///
    /// Targets that filter the level out run no renderer at all. A failure on
    /// one target is reported through the internal logger and does not stop
    /// the others. Returns `true` when no accepting target failed.
    pub fn log(&mut self, event: LogEvent<'_>) -> bool {
        let mut ok = true;
        for (index, target) in self.targets.iter_mut().enumerate() {
            if !target.accepts(event.level) {
                continue;
            }
            if let Err(e) = target.write(&event, &mut self.buffer) {
                ok = false;
                internal::warn(
                    "LOGGER",
                    &format!("Target {index} dropped a {} message: {e}", event.level),
                );
            }
        }
        ok
    }

    pub fn trace(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Trace, format_args!("{msg}")))
    }

    pub fn debug(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Debug, format_args!("{msg}")))
    }

    pub fn info(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Info, format_args!("{msg}")))
    }

    pub fn warn(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Warn, format_args!("{msg}")))
    }

    pub fn error(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Error, format_args!("{msg}")))
    }

    pub fn fatal(&mut self, msg: &str) -> bool {
        self.log(LogEvent::new(Level::Fatal, format_args!("{msg}")))
    }

    /// Buffered file handles may lose their tail on abrupt exit without an explicit flush.
    ///
    /// # Errors
    /// Returns the first error; remaining targets are still flushed.
    pub fn flush(&mut self) -> Result<(), crate::Error> {
        let mut first = None;
        for target in &mut self.targets {
            if let Err(e) = target.flush() {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn into_shared(self) -> SharedLogger {
        SharedLogger::new(self)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
