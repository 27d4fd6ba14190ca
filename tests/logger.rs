//! Tests for logger functionality.

use mistlog::output::{FnSink, Stream};
use mistlog::{Layout, Level, LogEvent, Logger, Registry, RenderError, Renderer, Target};
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

type Lines = Arc<Mutex<Vec<String>>>;

fn capture(template: &str) -> (Target, Lines) {
    let lines: Lines = Arc::default();
    let sink_lines = Arc::clone(&lines);
    let target = Target::new(
        Layout::parse(template).unwrap(),
        FnSink(move |_: &LogEvent<'_>, line: &str| {
            sink_lines.lock().unwrap().push(line.to_string());
        }),
    );
    (target, lines)
}

fn taken(lines: &Lines) -> Vec<String> {
    std::mem::take(&mut *lines.lock().unwrap())
}

#[test]
fn builder_default() {
    let logger = Logger::builder().build().unwrap();
    assert_eq!(logger.target_count(), 0);
}

#[test]
fn builder_with_console() {
    let logger = Logger::builder()
        .console()
        .stream(Stream::Stderr)
        .layout("${level} ${message}")
        .done()
        .build()
        .unwrap();
    assert_eq!(logger.target_count(), 1);
    assert_eq!(logger.targets()[0].layout().source(), "${level} ${message}");
}

#[test]
fn builder_fails_on_first_bad_template() {
    let result = Logger::builder()
        .console()
        .layout("${level}")
        .done()
        .console()
        .layout("${nope}")
        .done()
        .build();
    assert!(matches!(result, Err(mistlog::Error::Parse(_))));
}

#[test]
fn builder_uses_supplied_registry() {
    let mut registry = Registry::with_builtins();
    registry.register("host", |_| Ok(Renderer::Text("db01".to_string())));

    let logger = Logger::builder()
        .registry(registry)
        .console()
        .layout("${host} ${message}")
        .done()
        .build();
    assert!(logger.is_ok());

    let without = Logger::builder().console().layout("${host}").done().build();
    assert!(without.is_err());
}

#[test]
fn level_range_is_inclusive_and_skips_rendering() {
    let (target, lines) = capture("${counter} ${level} ${message}");
    let mut logger = Logger::new();
    logger.add_target(target.levels(Level::Debug, Level::Error));

    assert!(logger.trace("too quiet"));
    assert!(logger.fatal("too loud"));
    assert!(taken(&lines).is_empty());

    logger.warn("just right");
    logger.debug("lower edge");
    logger.error("upper edge");
    assert_eq!(
        taken(&lines),
        ["1 Warn just right", "2 Debug lower edge", "3 Error upper edge"]
    );
}

#[test]
fn render_failure_affects_only_its_target() {
    let mut registry = Registry::with_builtins();
    registry.register("fail", |_| {
        Ok(Renderer::custom(
            |_: &LogEvent<'_>, _: &mut String| -> Result<(), RenderError> {
                Err(RenderError::new("nope"))
            },
        ))
    });

    let broken_lines: Lines = Arc::default();
    let sink_lines = Arc::clone(&broken_lines);
    let broken = Target::new(
        Layout::parse_with("${message}${fail}", &registry).unwrap(),
        FnSink(move |_: &LogEvent<'_>, line: &str| {
            sink_lines.lock().unwrap().push(line.to_string());
        }),
    );
    let (healthy, healthy_lines) = capture("${message}");

    let mut logger = Logger::new();
    logger.add_target(broken);
    logger.add_target(healthy);

    assert!(!logger.info("hello"));
    assert!(taken(&broken_lines).is_empty());
    assert_eq!(taken(&healthy_lines), ["hello"]);
}

#[test]
fn macros_capture_call_site() {
    let (target, lines) = capture("${file}|${function}|${line}|${level}|${message}");
    let mut logger = Logger::new();
    logger.add_target(target);

    let line = line!() + 1;
    mistlog::warn!(logger, "{} of {}", 3, 4);

    let lines = taken(&lines);
    assert_eq!(lines.len(), 1);
    let fields: Vec<&str> = lines[0].split('|').collect();
    assert!(fields[0].ends_with("logger.rs"));
    assert_eq!(fields[1], module_path!());
    assert_eq!(fields[2], line.to_string());
    assert_eq!(&fields[3..], ["Warn", "3 of 4"]);
}

#[test]
fn every_level_macro_logs_at_its_level() {
    let (target, lines) = capture("${level}");
    let mut logger = Logger::new();
    logger.add_target(target);

    mistlog::trace!(logger, "t");
    mistlog::debug!(logger, "d");
    mistlog::info!(logger, "i");
    mistlog::warn!(logger, "w");
    mistlog::error!(logger, "e");
    mistlog::fatal!(logger, "f");
    mistlog::log!(logger, Level::Info, "l");

    assert_eq!(
        taken(&lines),
        ["Trace", "Debug", "Info", "Warn", "Error", "Fatal", "Info"]
    );
}

#[test]
fn shared_logger_serializes_threads() {
    let (target, lines) = capture("${counter}");
    let mut logger = Logger::new();
    logger.add_target(target);
    let shared = logger.into_shared();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    mistlog::info!(shared, "tick");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut numbers: Vec<u32> = taken(&lines).iter().map(|n| n.parse().unwrap()).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=100).collect::<Vec<_>>());
    assert_eq!(shared.with(|logger| logger.target_count()), 1);
}

#[test]
fn file_target_through_builder() {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("app.log");

    let mut logger = Logger::builder()
        .file(path.to_string_lossy())
        .layout("${level}: ${message}")
        .archive_on_size(64)
        .max_archive_files(1)
        .levels(Level::Info, Level::Fatal)
        .done()
        .build()
        .unwrap();

    logger.debug("skipped");
    for i in 0..10 {
        mistlog::info!(logger, "line number {i}");
    }
    logger.flush().unwrap();

    let archives: Vec<_> = fs::read_dir(tmp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("app.") && name != "app.log" && name != "app.li")
        .collect();
    assert_eq!(archives.len(), 1);

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("skipped"));
    assert!(content.lines().all(|line| line.starts_with("Info: line number")));
}

#[test]
fn failing_file_target_does_not_stop_others() {
    let tmp_dir = TempDir::new().unwrap();
    let blocker = tmp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let (target, lines) = capture("${message}");

    let mut logger = Logger::builder()
        .file(blocker.join("app.log").to_string_lossy())
        .done()
        .target(target)
        .build()
        .unwrap();

    assert!(!logger.error("still delivered"));
    assert_eq!(taken(&lines), ["still delivered"]);
}
