use mistlog::output::ArchiveTiming;
use mistlog::retention::{
    ArchiveOrder, ArchivePattern, RetentionPolicy, SEQUENCE_MARKER, enforce_retention,
    format_size, highest_sequence, list_archives, parse_size,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn sequence_pattern(dir: &Path) -> ArchivePattern {
    ArchivePattern::from_rendered(&dir.join(format!("app.{SEQUENCE_MARKER}.log"))).unwrap()
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name).unwrap();
    path
}

#[test]
fn pattern_matches_only_group_members() {
    let tmp_dir = TempDir::new().unwrap();
    let pattern = sequence_pattern(tmp_dir.path());

    assert_eq!(pattern.matches("app.3.log"), Some(Some(3)));
    assert_eq!(pattern.matches("app.12.log.gz"), Some(Some(12)));
    assert_eq!(pattern.matches("app.log"), None);
    assert_eq!(pattern.matches("app.x.log"), None);
    assert_eq!(pattern.matches("app.3.log.bak"), None);
    assert_eq!(pattern.matches("other.3.log"), None);
    assert_eq!(pattern.dir(), tmp_dir.path());
}

#[test]
fn pattern_escapes_regex_characters() {
    let pattern =
        ArchivePattern::from_rendered(Path::new(&format!("a+b(1).{SEQUENCE_MARKER}"))).unwrap();
    assert_eq!(pattern.matches("a+b(1).9"), Some(Some(9)));
    assert_eq!(pattern.matches("aab(1).9"), None);
    assert_eq!(pattern.dir(), Path::new("."));
}

#[test]
fn pattern_rejects_marker_in_directory() {
    let rendered = PathBuf::from(format!("logs-{SEQUENCE_MARKER}/app.log"));
    assert!(ArchivePattern::from_rendered(&rendered).is_none());
}

#[test]
fn archives_sort_numerically() {
    let tmp_dir = TempDir::new().unwrap();
    for name in ["app.10.log", "app.9.log", "app.2.log", "app.log", "unrelated.txt"] {
        touch(tmp_dir.path(), name);
    }
    let active = tmp_dir.path().join("app.log");
    let pattern = sequence_pattern(tmp_dir.path());

    let names: Vec<_> = list_archives(&pattern, &active, ArchiveOrder::Sequence)
        .unwrap()
        .into_iter()
        .map(|archive| archive.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["app.2.log", "app.9.log", "app.10.log"]);
    assert_eq!(highest_sequence(&pattern, &active).unwrap(), Some(10));
}

#[test]
fn count_limit_removes_oldest() {
    let tmp_dir = TempDir::new().unwrap();
    let paths: Vec<_> = (1..=5)
        .map(|n| touch(tmp_dir.path(), &format!("app.{n}.log")))
        .collect();
    let active = tmp_dir.path().join("app.log");

    let result = enforce_retention(
        &sequence_pattern(tmp_dir.path()),
        &active,
        ArchiveOrder::Sequence,
        RetentionPolicy {
            max_files: Some(2),
            max_days: None,
        },
        SystemTime::now(),
    )
    .unwrap();

    assert_eq!(result.removed, paths[..3].to_vec());
    assert_eq!(result.count(), 3);
    assert!(result.failed.is_empty());
    assert!(paths[3].exists() && paths[4].exists());
}

#[test]
fn age_limit_removes_expired() {
    let tmp_dir = TempDir::new().unwrap();
    let old = touch(tmp_dir.path(), "app.1.log");
    let active = tmp_dir.path().join("app.log");
    let policy = RetentionPolicy {
        max_files: None,
        max_days: Some(5),
    };
    let pattern = sequence_pattern(tmp_dir.path());

    let soon = SystemTime::now() + Duration::from_secs(86_400);
    let result =
        enforce_retention(&pattern, &active, ArchiveOrder::Modified, policy, soon).unwrap();
    assert!(result.removed.is_empty());

    let later = SystemTime::now() + Duration::from_secs(10 * 86_400);
    let result =
        enforce_retention(&pattern, &active, ArchiveOrder::Modified, policy, later).unwrap();
    assert_eq!(result.removed, vec![old]);
    assert_eq!(result.freed, "app.1.log".len() as u64);
}

#[test]
fn no_limits_removes_nothing() {
    let tmp_dir = TempDir::new().unwrap();
    touch(tmp_dir.path(), "app.1.log");
    let result = enforce_retention(
        &sequence_pattern(tmp_dir.path()),
        &tmp_dir.path().join("app.log"),
        ArchiveOrder::Sequence,
        RetentionPolicy::default(),
        SystemTime::now(),
    )
    .unwrap();
    assert_eq!(result.count(), 0);
}

#[test]
fn parse_size_units() {
    assert_eq!(parse_size("100"), Some(100));
    assert_eq!(parse_size("512K"), Some(512 * 1024));
    assert_eq!(parse_size("10mb"), Some(10 * 1024 * 1024));
    assert_eq!(parse_size("1G"), Some(1 << 30));
    assert_eq!(parse_size("1.5K"), Some(1536));
    assert_eq!(parse_size(""), None);
    assert_eq!(parse_size("ten"), None);
    assert_eq!(parse_size("-1K"), None);
}

#[test]
fn format_size_units() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(1536), "1.50 KB");
    assert_eq!(format_size(3 << 20), "3.00 MB");
}

mod timing {
    use super::ArchiveTiming;
    use chrono::{DateTime, Local, TimeZone, Utc, Weekday};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn calendar_boundaries() {
        let created = local(2026, 6, 15, 10, 30);

        assert!(!ArchiveTiming::Minute.crossed(created, local(2026, 6, 15, 10, 30)));
        assert!(ArchiveTiming::Minute.crossed(created, local(2026, 6, 15, 10, 31)));
        assert!(!ArchiveTiming::Hour.crossed(created, local(2026, 6, 15, 10, 59)));
        assert!(ArchiveTiming::Hour.crossed(created, local(2026, 6, 15, 11, 0)));
        assert!(!ArchiveTiming::Day.crossed(created, local(2026, 6, 15, 23, 59)));
        assert!(ArchiveTiming::Day.crossed(created, local(2026, 6, 16, 0, 0)));
        assert!(!ArchiveTiming::Month.crossed(created, local(2026, 6, 30, 23, 0)));
        assert!(ArchiveTiming::Month.crossed(created, local(2026, 7, 1, 0, 0)));
        assert!(!ArchiveTiming::Year.crossed(created, local(2026, 12, 31, 23, 0)));
        assert!(ArchiveTiming::Year.crossed(created, local(2027, 1, 1, 0, 0)));
    }

    #[test]
    fn earlier_timestamps_never_cross() {
        let created = local(2026, 6, 15, 10, 30);
        assert!(!ArchiveTiming::Day.crossed(created, local(2026, 6, 1, 0, 0)));
    }

    #[test]
    fn weekday_boundary_is_most_recent_midnight() {
        // 2026-03-09 is a Monday.
        let created = local(2026, 3, 9, 12, 0);
        let wednesday = ArchiveTiming::Weekday(Weekday::Wed);

        assert!(!wednesday.crossed(created, local(2026, 3, 10, 23, 0)));
        assert!(wednesday.crossed(created, local(2026, 3, 11, 0, 5)));
        assert!(wednesday.crossed(created, local(2026, 3, 20, 9, 0)));

        let monday = ArchiveTiming::Weekday(Weekday::Mon);
        assert!(!monday.crossed(created, local(2026, 3, 15, 23, 0)));
        assert!(monday.crossed(created, local(2026, 3, 16, 0, 1)));
    }

    #[test]
    fn size_and_none_are_not_date_based() {
        assert!(!ArchiveTiming::None.is_date_based());
        assert!(!ArchiveTiming::Size(10).is_date_based());
        assert!(ArchiveTiming::Day.is_date_based());
        assert!(!ArchiveTiming::Size(10).crossed(local(2020, 1, 1, 0, 0), Utc::now()));
    }
}
