//! Template parser and executor.
//!
//! A template is literal text interleaved with `${name[:arg[:arg...]]}`
//! placeholders. Parsing happens once; rendering walks the resulting steps in
//! source order for every message.

use super::args::{Args, scan_until};
use super::error::{ParseError, RenderError};
use super::event::LogEvent;
use super::registry::Registry;
use super::renderer::Renderer;
use std::ops::Range;

#[derive(Debug)]
struct Step {
    /// Source bytes this step was built from, `${` and `}` included.
    span: Range<usize>,
    renderer: Renderer,
}

/// A parsed template: an ordered list of renderer steps.
///
/// Rendering takes `&mut self` because steps such as `${counter}` carry state
/// that advances on every render of this instance.
#[derive(Debug)]
pub struct Layout {
    source: String,
    steps: Vec<Step>,
}

impl Layout {
    /// Parses `template` against the process-wide registry.
    ///
    /// # Errors
    /// See [`Layout::parse_with`].
    pub fn parse(template: &str) -> Result<Self, ParseError> {
        let registry = Registry::global();
        Self::parse_with(template, &registry)
    }

    /// Parses `template`, resolving placeholder names in `registry`.
    ///
    /// # Errors
    /// Fails on an unterminated placeholder, an unknown renderer name, or a
    /// renderer rejecting its arguments. Steps built before the failure are
    /// dropped.
    pub fn parse_with(template: &str, registry: &Registry) -> Result<Self, ParseError> {
        let bytes = template.as_bytes();
        let mut steps = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if !is_open(bytes, i) {
                i += 1;
                continue;
            }

            if i > literal_start {
                steps.push(Step {
                    span: literal_start..i,
                    renderer: Renderer::Text(template[literal_start..i].to_string()),
                });
            }

            let close = find_close(bytes, i + 2)
                .ok_or(ParseError::UnterminatedPlaceholder { offset: i })?;
            let renderer = create_renderer(&template[i + 2..close], i, registry)?;
            steps.push(Step {
                span: i..close + 1,
                renderer,
            });

            i = close + 1;
            literal_start = i;
        }

        if literal_start < bytes.len() {
            steps.push(Step {
                span: literal_start..bytes.len(),
                renderer: Renderer::Text(template[literal_start..].to_string()),
            });
        }

        Ok(Self {
            source: template.to_string(),
            steps,
        })
    }

    /// Appends the rendered event to `out`.
    ///
    /// # Errors
    /// If any step fails, `out` is truncated back to its length on entry and
    /// the remaining steps are skipped.
    pub fn render(&mut self, event: &LogEvent<'_>, out: &mut String) -> Result<(), RenderError> {
        let start = out.len();
        for step in &mut self.steps {
            if let Err(e) = step.renderer.append(event, out) {
                out.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    /// # Errors
    /// See [`Layout::render`].
    pub fn render_to_string(&mut self, event: &LogEvent<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render(event, &mut out)?;
        Ok(out)
    }

    /// The template this layout was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Byte range of the source each step covers. The ranges tile the source
    /// without gaps or overlap.
    pub fn spans(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.steps.iter().map(|step| step.span.clone())
    }

    pub fn renderers(&self) -> impl Iterator<Item = &Renderer> {
        self.steps.iter().map(|step| &step.renderer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn is_open(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{')
}

/// Finds the `}` closing a placeholder whose body starts at `start`.
///
/// Nested `${` raise the depth and each `}` lowers it; a backslash hides the
/// byte after it from the count.
fn find_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Splits `name:args`, looks the name up, and runs its constructor.
fn create_renderer(body: &str, offset: usize, registry: &Registry) -> Result<Renderer, ParseError> {
    let (name, name_len) = scan_until(body, &[':']);
    let arg_region = body.get(name_len + 1..).unwrap_or("");
    let mut args = Args::new(arg_region, registry);

    registry
        .create(&name, &mut args)
        .unwrap_or(Err(ParseError::UnknownRenderer { name, offset }))
}
