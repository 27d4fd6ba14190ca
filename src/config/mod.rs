//! TOML configuration loading and `source = "..."` include resolution.
//!
//! Loading (file I/O, includes, cycle detection) lives here; the serde schema
//! lives in `structs`. Conversions into typed options sit next to the loader
//! so invalid strings surface as one error type.

mod structs;

pub use structs::{ConsoleConfig, FileConfig, GeneralConfig, InternalConfig};

use crate::internal;
use crate::level::Level;
use crate::output::{ArchiveNumbering, ArchiveTiming, BufferMode, Buffering, FileOptions, Stream};
use crate::retention::parse_size;
use chrono::Weekday;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "mistlog";
const CONFIG_FILE: &str = "mistlog.toml";

/// An empty file yields a console-only logger: every field has a default.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub console: ConsoleConfig,
    /// Named file targets, built in name order.
    pub files: BTreeMap<String, FileConfig>,
    pub internal: InternalConfig,
}

/// Splits `source = "..."` lines out of raw TOML before deserialization.
/// Returns the include paths and the remaining content.
#[doc(hidden)]
#[must_use]
pub fn extract_sources(content: &str) -> (Vec<String>, String) {
    let mut sources = Vec::new();
    let mut remaining = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("source")
            && let Some(value) = rest.trim_start().strip_prefix('=')
        {
            let path = value.trim().trim_matches('"').trim_matches('\'');
            if !path.is_empty() {
                sources.push(path.to_string());
            }
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }

    (sources, remaining)
}

impl Config {
    /// Loads `<config_dir>/mistlog/mistlog.toml` with includes resolved.
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// No config directory on this platform, unreadable files, TOML syntax
    /// errors, or include cycles.
    pub fn load() -> Result<Self, crate::Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let config_path = Self::get_config_path()?;
        let config = Self::load_with_sources(&config_path, &mut HashSet::new())?;
        internal::info(
            "CONFIG",
            &format!("Config loaded from {}", config_path.display()),
        );
        Ok(config)
    }

    /// # Errors
    /// Same as [`Config::load`], minus the config directory lookup.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        Self::load_with_sources(path, &mut HashSet::new())
    }

    /// Parses config text directly. `source` lines are resolved relative to
    /// the working directory.
    ///
    /// # Errors
    /// TOML syntax errors and include failures.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        Self::parse_with_sources(content, &mut HashSet::new())
    }

    fn load_with_sources(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !seen.insert(canonical.clone()) {
            internal::warn(
                "CONFIG",
                &format!("Cyclic include detected: {}", canonical.display()),
            );
            return Err(crate::Error::CyclicInclude(canonical));
        }

        let content = fs::read_to_string(path)?;
        Self::parse_with_sources(&content, seen)
    }

    fn parse_with_sources(
        content: &str,
        seen: &mut HashSet<PathBuf>,
    ) -> Result<Self, crate::Error> {
        let (sources, toml_content) = extract_sources(content);
        let mut config: Self = toml::from_str(&toml_content)?;

        for source_path in sources {
            internal::debug("CONFIG", &format!("Processing source: {source_path}"));
            let expanded = shellexpand::tilde(&source_path);
            let source_file = Path::new(expanded.as_ref());
            if source_file.exists() {
                let source_config = Self::load_with_sources(source_file, seen)?;
                config.merge(source_config);
            } else {
                internal::warn("CONFIG", &format!("Source file not found: {source_path}"));
            }
        }

        Ok(config)
    }

    /// Adds file targets from an included config. Names already defined in
    /// `self` win.
    pub fn merge(&mut self, other: Self) {
        for (name, file) in other.files {
            self.files.entry(name).or_insert(file);
        }
    }

    /// # Errors
    /// Fails when the platform has no config directory.
    pub fn get_config_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(CONFIG_DIR).join(CONFIG_FILE))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// # Errors
    /// `general.level` is not a level name.
    pub fn parse_level(&self) -> Result<Level, crate::Error> {
        parse_level(&self.general.level)
    }
}

impl ConsoleConfig {
    /// # Errors
    /// Unknown stream name.
    pub fn parse_stream(&self) -> Result<Stream, crate::Error> {
        match self.stream.to_lowercase().as_str() {
            "stdout" | "out" => Ok(Stream::Stdout),
            "stderr" | "err" => Ok(Stream::Stderr),
            "split" => Ok(Stream::Split),
            other => Err(invalid("console.stream", other)),
        }
    }

    /// Inclusive range, falling back to `general.level` and `fatal`.
    ///
    /// # Errors
    /// Invalid level names.
    pub fn levels(&self, general: &GeneralConfig) -> Result<(Level, Level), crate::Error> {
        level_range(general, self.min_level.as_deref(), self.max_level.as_deref())
    }
}

impl FileConfig {
    /// Converts the string settings into typed rollover options.
    ///
    /// # Errors
    /// Unknown policy names, unparsable sizes, or `archive = "size"` without `max_size`.
    pub fn options(&self) -> Result<FileOptions, crate::Error> {
        let timing = match self.archive.to_lowercase().as_str() {
            "none" | "" => ArchiveTiming::None,
            "size" => {
                let size = self.max_size.as_deref().ok_or_else(|| {
                    crate::Error::InvalidConfig("archive = \"size\" needs max_size".to_string())
                })?;
                ArchiveTiming::Size(parse_size(size).ok_or_else(|| invalid("max_size", size))?)
            }
            "minute" => ArchiveTiming::Minute,
            "hour" => ArchiveTiming::Hour,
            "day" => ArchiveTiming::Day,
            "month" => ArchiveTiming::Month,
            "year" => ArchiveTiming::Year,
            other => ArchiveTiming::Weekday(
                other
                    .parse::<Weekday>()
                    .map_err(|_| invalid("archive", other))?,
            ),
        };

        let numbering = match self.numbering.to_lowercase().as_str() {
            "sequence" | "" => ArchiveNumbering::Sequence,
            "date" => ArchiveNumbering::date(
                self.date_format
                    .as_deref()
                    .unwrap_or(ArchiveNumbering::DEFAULT_DATE_FORMAT),
            ),
            other => return Err(invalid("numbering", other)),
        };

        let mode = match self.buffering.to_lowercase().as_str() {
            "unbuffered" | "none" | "" => BufferMode::Unbuffered,
            "line" => BufferMode::Line,
            "full" => BufferMode::Full,
            other => return Err(invalid("buffering", other)),
        };
        let capacity = match self.buffer_size.as_deref() {
            Some(size) => {
                let bytes = parse_size(size).ok_or_else(|| invalid("buffer_size", size))?;
                usize::try_from(bytes).map_err(|_| invalid("buffer_size", size))?
            }
            None => Buffering::default().capacity,
        };

        Ok(FileOptions {
            timing,
            numbering,
            max_archive_files: self.max_archive_files,
            max_archive_days: self.max_archive_days,
            buffering: Buffering { mode, capacity },
            keep_files_open: self.keep_open,
            compress_archives: self.compress,
        })
    }

    /// Inclusive range, falling back to `general.level` and `fatal`.
    ///
    /// # Errors
    /// Invalid level names.
    pub fn levels(&self, general: &GeneralConfig) -> Result<(Level, Level), crate::Error> {
        level_range(general, self.min_level.as_deref(), self.max_level.as_deref())
    }
}

fn parse_level(name: &str) -> Result<Level, crate::Error> {
    name.parse()
        .map_err(|_| crate::Error::InvalidLevel(name.to_string()))
}

fn level_range(
    general: &GeneralConfig,
    min: Option<&str>,
    max: Option<&str>,
) -> Result<(Level, Level), crate::Error> {
    let min = parse_level(min.unwrap_or(&general.level))?;
    let max = max.map_or(Ok(Level::Fatal), parse_level)?;
    Ok((min, max))
}

fn invalid(key: &str, value: &str) -> crate::Error {
    crate::Error::InvalidConfig(format!("invalid {key}: {value:?}"))
}
