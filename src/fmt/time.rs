//! `${time}` renderer: strftime-style formatting of the event timestamp.

use super::args::Args;
use super::error::{ParseError, RenderError};
use super::event::LogEvent;
use super::renderer::Renderer;
use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;

/// Locale-style date and time, e.g. `08/23/01 14:55:02`.
pub const DEFAULT_TIME_FORMAT: &str = "%x %X";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRenderer {
    format: String,
    utc: bool,
}

impl TimeRenderer {
    /// # Errors
    /// Rejects patterns chrono cannot format.
    pub fn new(format: impl Into<String>, utc: bool) -> Result<Self, ParseError> {
        let format = format.into();
        validate_format(&format)?;
        Ok(Self { format, utc })
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.utc
    }

    pub(crate) fn append(&self, event: &LogEvent<'_>, out: &mut String) -> Result<(), RenderError> {
        if self.utc {
            write!(out, "{}", event.timestamp.format(&self.format))?;
        } else {
            let local = event.timestamp.with_timezone(&Local);
            write!(out, "{}", local.format(&self.format))?;
        }
        Ok(())
    }
}

fn validate_format(format: &str) -> Result<(), ParseError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ParseError::invalid_argument(
            "time",
            format!("invalid format pattern '{format}'"),
        ));
    }
    Ok(())
}

/// Accepts `utc` (bare flag or `utc=true|false`) and `format=<pattern>`.
pub(crate) fn create_time(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    let mut utc = false;
    let mut format = String::new();

    while let Some(name) = args.next_name() {
        let value = args.value();
        match name.as_str() {
            "utc" => utc = value.is_none_or(|v| v.is_empty() || v.eq_ignore_ascii_case("true")),
            "format" => {
                if let Some(value) = value {
                    format.push_str(&value);
                }
            }
            other => {
                return Err(ParseError::invalid_argument(
                    "time",
                    format!("unknown argument '{other}'"),
                ));
            }
        }
    }

    if format.is_empty() {
        format.push_str(DEFAULT_TIME_FORMAT);
    }

    Ok(Renderer::Time(TimeRenderer::new(format, utc)?))
}
