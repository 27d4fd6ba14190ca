//! Layout errors: parse failures surface when a template is built, render
//! failures only when a message is being written.

use std::fmt;

/// A template that cannot be turned into a [`Layout`](super::Layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `${` without a matching `}`. `offset` is the byte position of the `$`.
    UnterminatedPlaceholder { offset: usize },
    /// The placeholder name is not in the registry used for parsing.
    UnknownRenderer { name: String, offset: usize },
    /// A renderer rejected one of its arguments.
    InvalidArgument { renderer: String, message: String },
}

impl ParseError {
    /// Shorthand for renderer constructors rejecting their arguments.
    #[must_use]
    pub fn invalid_argument(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            renderer: renderer.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedPlaceholder { offset } => {
                write!(f, "unterminated placeholder starting at byte {offset}")
            }
            Self::UnknownRenderer { name, offset } => {
                write!(f, "unknown renderer '{name}' at byte {offset}")
            }
            Self::InvalidArgument { renderer, message } => {
                write!(f, "invalid argument for '{renderer}': {message}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A step failed while appending its fragment; the message for that target is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError(String);

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.0)
    }
}

impl std::error::Error for RenderError {}

impl From<fmt::Error> for RenderError {
    fn from(_: fmt::Error) -> Self {
        Self("formatter returned an error".to_string())
    }
}
