//! Renderer steps: the closed set of builtins plus one open `Custom` variant.

use super::args::Args;
use super::error::{ParseError, RenderError};
use super::event::LogEvent;
use super::time::TimeRenderer;
use std::fmt::{self, Write};

/// User-defined renderer behavior.
///
/// Any state the renderer needs lives in the implementing type and is released
/// by its `Drop`.
pub trait Render: Send {
    /// Appends this step's fragment for `event` to `out`.
    ///
    /// # Errors
    /// Any error aborts rendering for the current target and message.
    fn append(&mut self, event: &LogEvent<'_>, out: &mut String) -> Result<(), RenderError>;
}

impl<F> Render for F
where
    F: FnMut(&LogEvent<'_>, &mut String) -> Result<(), RenderError> + Send,
{
    fn append(&mut self, event: &LogEvent<'_>, out: &mut String) -> Result<(), RenderError> {
        self(event, out)
    }
}

/// One step of a layout. The variant is fixed at construction; only internal
/// state such as the counter value changes between renders.
pub enum Renderer {
    /// Literal text between placeholders.
    Text(String),
    Level,
    Time(TimeRenderer),
    /// Holds the value the next render appends.
    Counter(u32),
    File,
    Function,
    Line,
    Message,
    /// Archive sequence number; empty outside archive naming.
    Sequence,
    /// Formatted archive date; empty outside archive naming.
    ArchiveDate,
    Custom(Box<dyn Render>),
}

impl Renderer {
    /// Wraps a user-defined behavior.
    #[must_use]
    pub fn custom(render: impl Render + 'static) -> Self {
        Self::Custom(Box::new(render))
    }

    /// Short name of the variant, for diagnostics and tests.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Level => "level",
            Self::Time(_) => "time",
            Self::Counter(_) => "counter",
            Self::File => "file",
            Self::Function => "function",
            Self::Line => "line",
            Self::Message => "message",
            Self::Sequence => "sequence",
            Self::ArchiveDate => "archive_date",
            Self::Custom(_) => "custom",
        }
    }

    pub(crate) fn append(
        &mut self,
        event: &LogEvent<'_>,
        out: &mut String,
    ) -> Result<(), RenderError> {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Level => out.push_str(event.level.label()),
            Self::Time(time) => time.append(event, out)?,
            Self::Counter(next) => {
                write!(out, "{next}")?;
                *next = next.wrapping_add(1);
            }
            Self::File => out.push_str(event.file),
            Self::Function => out.push_str(event.function),
            Self::Line => write!(out, "{}", event.line)?,
            Self::Message => out.write_fmt(event.message)?,
            Self::Sequence => {
                if let Some(archive) = event.archive {
                    out.push_str(&archive.sequence);
                }
            }
            Self::ArchiveDate => {
                if let Some(archive) = event.archive {
                    out.push_str(&archive.date);
                }
            }
            Self::Custom(render) => render.append(event, out)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Time(time) => f.debug_tuple("Time").field(time).finish(),
            Self::Counter(next) => f.debug_tuple("Counter").field(next).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Builtins that take no arguments reject any they are given.
fn no_args(name: &str, args: &Args<'_>, renderer: Renderer) -> Result<Renderer, ParseError> {
    if args.is_empty() {
        Ok(renderer)
    } else {
        Err(ParseError::invalid_argument(
            name,
            format!("takes no arguments, got '{}'", args.remaining()),
        ))
    }
}

pub(crate) fn create_level(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("level", args, Renderer::Level)
}

pub(crate) fn create_counter(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("counter", args, Renderer::Counter(1))
}

pub(crate) fn create_file(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("file", args, Renderer::File)
}

pub(crate) fn create_function(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("function", args, Renderer::Function)
}

pub(crate) fn create_line(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("line", args, Renderer::Line)
}

pub(crate) fn create_message(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("message", args, Renderer::Message)
}

pub(crate) fn create_sequence(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("sequence", args, Renderer::Sequence)
}

pub(crate) fn create_archive_date(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    no_args("archive_date", args, Renderer::ArchiveDate)
}
