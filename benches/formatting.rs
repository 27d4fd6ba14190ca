use chrono::{TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use mistlog::{Layout, Level, LogEvent, Registry};
use std::hint::black_box;

fn bench_render(c: &mut Criterion) {
    let registry = Registry::with_builtins();
    let timestamp = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
    let mut group = c.benchmark_group("Layout::render");

    let mut simple = Layout::parse_with("${level}: ${message}", &registry).unwrap();
    let mut full = Layout::parse_with(
        "${time:utc:format=%F %T} [${level}] #${counter} ${file}:${line} ${message}",
        &registry,
    )
    .unwrap();
    let mut local_time = Layout::parse_with("${time} ${message}", &registry).unwrap();
    let mut buffer = String::with_capacity(256);

    group.bench_function("simple", |b| {
        b.iter(|| {
            let event = LogEvent::new(Level::Info, format_args!("request {} done", 42))
                .at(timestamp);
            buffer.clear();
            simple.render(black_box(&event), &mut buffer).unwrap();
        });
    });

    group.bench_function("full", |b| {
        b.iter(|| {
            let event = LogEvent::new(Level::Warn, format_args!("disk {}% full", 93))
                .location("src/main.rs", "app::run", 42)
                .at(timestamp);
            buffer.clear();
            full.render(black_box(&event), &mut buffer).unwrap();
        });
    });

    group.bench_function("local_time", |b| {
        b.iter(|| {
            let event = LogEvent::new(Level::Info, format_args!("tick")).at(timestamp);
            buffer.clear();
            local_time.render(black_box(&event), &mut buffer).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
