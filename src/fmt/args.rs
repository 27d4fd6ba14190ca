//! Argument readers for the region after `name:` inside a placeholder.
//!
//! Arguments are `:`-separated entries of the form `name` or `name=value`.
//! A backslash before `\`, `:`, `=` or `}` yields that character literally;
//! any other backslash is copied as-is.

use super::error::ParseError;
use super::layout::Layout;
use super::registry::Registry;

/// A value read either as literal text or as a nested template.
#[derive(Debug)]
pub enum ArgValue {
    Text(String),
    Template(Layout),
}

/// Reads an argument name, stopping at the first unescaped `:` or `=`.
///
/// Returns the unescaped name and the number of bytes consumed. The delimiter
/// itself is not consumed.
#[must_use]
pub fn read_arg_name(text: &str) -> (String, usize) {
    scan_until(text, &[':', '='])
}

/// Reads an argument value starting right after its `=`.
///
/// In literal mode this scans exactly like [`read_arg_name`]. In template mode
/// the whole remaining region is parsed as a nested layout, so a
/// template-valued argument must be the last one in its placeholder.
///
/// # Errors
/// Template mode propagates the nested parse failure.
pub fn read_arg_value(
    text: &str,
    registry: &Registry,
    as_template: bool,
) -> Result<(ArgValue, usize), ParseError> {
    if as_template {
        let layout = Layout::parse_with(text, registry)?;
        return Ok((ArgValue::Template(layout), text.len()));
    }
    let (value, consumed) = read_arg_name(text);
    Ok((ArgValue::Text(value), consumed))
}

/// Unescaping scan shared by names, values, and the renderer name.
pub(crate) fn scan_until(text: &str, stops: &[char]) -> (String, usize) {
    let mut out = String::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            if let Some(&(_, next)) = chars.peek()
                && matches!(next, '\\' | ':' | '=' | '}')
            {
                out.push(next);
                chars.next();
                continue;
            }
            out.push(c);
        } else if stops.contains(&c) {
            return (out, i);
        } else {
            out.push(c);
        }
    }

    (out, text.len())
}

/// Cursor over one placeholder's argument region, handed to renderer constructors.
///
/// ```
/// use mistlog::fmt::{Args, Registry};
///
/// let registry = Registry::with_builtins();
/// let mut args = Args::new("utc:format=%H\\:%M", &registry);
/// assert_eq!(args.next_name().as_deref(), Some("utc"));
/// assert_eq!(args.value(), None);
/// assert_eq!(args.next_name().as_deref(), Some("format"));
/// assert_eq!(args.value().as_deref(), Some("%H:%M"));
/// assert!(args.next_name().is_none());
/// ```
#[derive(Debug)]
pub struct Args<'a> {
    text: &'a str,
    pos: usize,
    registry: &'a Registry,
}

impl<'a> Args<'a> {
    #[must_use]
    pub const fn new(text: &'a str, registry: &'a Registry) -> Self {
        Self {
            text,
            pos: 0,
            registry,
        }
    }

    /// The registry nested templates are parsed against.
    #[must_use]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Unconsumed source text, escapes intact.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Advances to the next argument and reads its name. A value left unread
    /// by the caller is skipped.
    pub fn next_name(&mut self) -> Option<String> {
        if let Some(value) = self.remaining().strip_prefix('=') {
            let (_, consumed) = read_arg_name(value);
            self.pos += 1 + consumed;
        }
        if self.remaining().starts_with(':') {
            self.pos += 1;
        }
        if self.is_empty() {
            return None;
        }
        let (name, consumed) = read_arg_name(self.remaining());
        self.pos += consumed;
        Some(name)
    }

    /// Reads the literal value of the argument just named, if it has one.
    pub fn value(&mut self) -> Option<String> {
        if !self.remaining().starts_with('=') {
            return None;
        }
        self.pos += 1;
        let (value, consumed) = read_arg_name(self.remaining());
        self.pos += consumed;
        Some(value)
    }

    /// Parses the value of the argument just named as a nested template.
    ///
    /// # Errors
    /// Fails when the nested template does not parse.
    pub fn template(&mut self) -> Result<Option<Layout>, ParseError> {
        if !self.remaining().starts_with('=') {
            return Ok(None);
        }
        self.pos += 1;
        match read_arg_value(self.remaining(), self.registry, true)? {
            (ArgValue::Template(layout), consumed) => {
                self.pos += consumed;
                Ok(Some(layout))
            }
            (ArgValue::Text(_), _) => Ok(None),
        }
    }
}
