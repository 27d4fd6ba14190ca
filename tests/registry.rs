//! Renderer registry: builtins, custom renderers, shadowing, argument cursors.

use mistlog::fmt::Args;
use mistlog::{Layout, Level, LogEvent, ParseError, Registry, RenderError, Renderer};

fn event(level: Level) -> LogEvent<'static> {
    LogEvent::new(level, format_args!("msg"))
}

#[test]
fn builtins_are_registered() {
    let registry = Registry::with_builtins();
    for name in [
        "level",
        "time",
        "counter",
        "file",
        "function",
        "line",
        "message",
        "sequence",
        "archive_date",
    ] {
        assert!(registry.contains(name), "missing builtin {name}");
    }
    assert_eq!(registry.len(), 9);
}

#[test]
fn empty_registry_knows_nothing() {
    let registry = Registry::empty();
    assert!(registry.is_empty());
    assert!(matches!(
        Layout::parse_with("${level}", &registry),
        Err(ParseError::UnknownRenderer { .. })
    ));
    assert!(Layout::parse_with("text only", &registry).is_ok());
}

#[test]
fn later_registration_shadows_earlier() {
    let mut registry = Registry::with_builtins();
    registry.register("level", |_| Ok(Renderer::Text("LVL".to_string())));

    let mut layout = Layout::parse_with("${level}", &registry).unwrap();
    assert_eq!(layout.render_to_string(&event(Level::Info)).unwrap(), "LVL");
    assert_eq!(registry.names().filter(|name| *name == "level").count(), 2);
}

fn create_pad(args: &mut Args<'_>) -> Result<Renderer, ParseError> {
    let mut width = 0usize;
    let mut fill = ' ';
    while let Some(name) = args.next_name() {
        let value = args.value().unwrap_or_default();
        match name.as_str() {
            "width" => {
                width = value
                    .parse()
                    .map_err(|_| ParseError::invalid_argument("pad", "width must be a number"))?;
            }
            "fill" => fill = value.chars().next().unwrap_or(' '),
            other => {
                return Err(ParseError::invalid_argument("pad", format!("unknown '{other}'")));
            }
        }
    }
    Ok(Renderer::custom(
        move |event: &LogEvent<'_>, out: &mut String| -> Result<(), RenderError> {
            let label = event.level.label();
            out.push_str(label);
            for _ in label.len()..width {
                out.push(fill);
            }
            Ok(())
        },
    ))
}

#[test]
fn custom_renderer_reads_arguments() {
    let mut registry = Registry::with_builtins();
    registry.register("pad", create_pad);

    let mut layout = Layout::parse_with("[${pad:width=6:fill=.}]", &registry).unwrap();
    assert_eq!(layout.render_to_string(&event(Level::Warn)).unwrap(), "[Warn..]");

    let mut layout = Layout::parse_with("[${pad:fill=\\::width=5}]", &registry).unwrap();
    assert_eq!(layout.render_to_string(&event(Level::Info)).unwrap(), "[Info:]");

    assert!(matches!(
        Layout::parse_with("${pad:width=wide}", &registry),
        Err(ParseError::InvalidArgument { renderer, .. }) if renderer == "pad"
    ));
}

#[test]
fn custom_renderer_with_nested_template() {
    let mut registry = Registry::with_builtins();
    registry.register("wrap", |args: &mut Args<'_>| {
        let mut inner = match args.next_name().as_deref() {
            Some("inner") => args
                .template()?
                .ok_or_else(|| ParseError::invalid_argument("wrap", "inner needs a value"))?,
            _ => return Err(ParseError::invalid_argument("wrap", "expected inner=")),
        };
        Ok(Renderer::custom(
            move |event: &LogEvent<'_>, out: &mut String| -> Result<(), RenderError> {
                out.push('<');
                inner.render(event, out)?;
                out.push('>');
                Ok(())
            },
        ))
    });

    let mut layout = Layout::parse_with("${wrap:inner=${level}-${counter}}", &registry).unwrap();
    assert_eq!(layout.render_to_string(&event(Level::Error)).unwrap(), "<Error-1>");
    assert_eq!(layout.render_to_string(&event(Level::Debug)).unwrap(), "<Debug-2>");

    assert!(matches!(
        Layout::parse_with("${wrap:inner=${bogus}}", &registry),
        Err(ParseError::UnknownRenderer { name, .. }) if name == "bogus"
    ));
}

#[test]
fn captured_context_is_released_with_registry() {
    use std::sync::Arc;

    let context = Arc::new(String::from("tag"));
    let mut registry = Registry::empty();
    let captured = Arc::clone(&context);
    registry.register("tag", move |_| Ok(Renderer::Text(captured.to_string())));
    assert_eq!(Arc::strong_count(&context), 2);

    drop(registry);
    assert_eq!(Arc::strong_count(&context), 1);
}

#[test]
fn global_registry_accepts_custom_renderers() {
    mistlog::register_renderer("pid_for_test", |_| {
        Ok(Renderer::Text(std::process::id().to_string()))
    });

    assert!(Registry::global().contains("pid_for_test"));
    let mut layout = Layout::parse("${pid_for_test}").unwrap();
    assert_eq!(
        layout.render_to_string(&event(Level::Info)).unwrap(),
        std::process::id().to_string()
    );
}

#[test]
fn archive_renderers_are_empty_outside_archiving() {
    let mut layout = Layout::parse_with("a${sequence}b${archive_date}c", &Registry::with_builtins())
        .unwrap();
    assert_eq!(layout.render_to_string(&event(Level::Info)).unwrap(), "abc");

    let context = mistlog::ArchiveContext {
        sequence: "7".to_string(),
        date: "20261016".to_string(),
    };
    let archived = event(Level::Info).with_archive(&context);
    assert_eq!(layout.render_to_string(&archived).unwrap(), "a7b20261016c");
}
