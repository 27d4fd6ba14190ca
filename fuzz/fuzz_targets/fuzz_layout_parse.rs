#![no_main]
use libfuzzer_sys::fuzz_target;
use mistlog::{Layout, Level, LogEvent, Registry};

fuzz_target!(|data: &str| {
    // Must not panic on any template string
    let registry = Registry::with_builtins();
    let Ok(mut layout) = Layout::parse_with(data, &registry) else {
        return;
    };

    // Literal spans and placeholders must tile the source
    let covered: usize = layout.spans().map(|span| span.len()).sum();
    assert_eq!(covered, data.len());

    let mut out = String::from("prefix|");
    let event = LogEvent::new(Level::Warn, format_args!("fuzz"));
    if layout.render(&event, &mut out).is_err() {
        assert_eq!(out, "prefix|");
    }
});
