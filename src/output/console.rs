//! Console sink: one line per message on stdout, stderr, or split by severity.

use crate::fmt::LogEvent;
use crate::level::Level;

use super::Sink;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
    /// Warn and above go to stderr, the rest to stdout.
    Split,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    stream: Stream,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new(stream: Stream) -> Self {
        Self { stream }
    }

    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(Stream::Stdout)
    }

    #[must_use]
    pub const fn stderr() -> Self {
        Self::new(Stream::Stderr)
    }

    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }

    const fn uses_stderr(&self, level: Level) -> bool {
        match self.stream {
            Stream::Stdout => false,
            Stream::Stderr => true,
            Stream::Split => level as u8 >= Level::Warn as u8,
        }
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, event: &LogEvent<'_>, message: &str) -> Result<(), crate::Error> {
        if self.uses_stderr(event.level) {
            writeln!(io::stderr().lock(), "{message}")?;
        } else {
            writeln!(io::stdout().lock(), "{message}")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }
}
