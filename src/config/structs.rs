//! Configuration struct definitions.

use serde::Deserialize;

/// Defaults shared by every target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Lowest level a target accepts unless it sets `min_level`.
    pub level: String,
    /// Layout for targets that do not set their own.
    pub layout: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            layout: crate::logger::DEFAULT_LAYOUT.to_string(),
        }
    }
}

/// Console output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// `stdout`, `stderr`, or `split` (warnings and above to stderr).
    pub stream: String,
    pub layout: Option<String>,
    pub min_level: Option<String>,
    pub max_level: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stream: "stdout".to_string(),
            layout: None,
            min_level: None,
            max_level: None,
        }
    }
}

/// One `[files.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    /// File-name template, e.g. `~/.local/state/app/${level}.log`.
    pub path: String,
    pub layout: Option<String>,
    /// Archive-name template; defaults to `<stem>.<n>.<ext>`.
    pub archive_path: Option<String>,
    /// `none`, `size`, `minute`, `hour`, `day`, `month`, `year`, or a weekday name.
    pub archive: String,
    /// Threshold for `archive = "size"` (`"10M"`, `"512K"`, plain bytes).
    pub max_size: Option<String>,
    /// `sequence` or `date`.
    pub numbering: String,
    /// strftime pattern for date numbering.
    pub date_format: Option<String>,
    pub max_archive_files: Option<usize>,
    pub max_archive_days: Option<u32>,
    /// `unbuffered`, `line`, or `full`.
    pub buffering: String,
    pub buffer_size: Option<String>,
    pub keep_open: bool,
    pub compress: bool,
    pub min_level: Option<String>,
    pub max_level: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        let path = directories::ProjectDirs::from("", "", "mistlog").map_or_else(
            || "mistlog.log".to_string(),
            |dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_dir())
                    .join("mistlog.log")
                    .to_string_lossy()
                    .into_owned()
            },
        );

        Self {
            enabled: true,
            path,
            layout: None,
            archive_path: None,
            archive: "none".to_string(),
            max_size: None,
            numbering: "sequence".to_string(),
            date_format: None,
            max_archive_files: None,
            max_archive_days: None,
            buffering: "unbuffered".to_string(),
            buffer_size: None,
            keep_open: false,
            compress: false,
            min_level: None,
            max_level: None,
        }
    }
}

/// The library's own diagnostics, written to stderr.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InternalConfig {
    pub enabled: bool,
    pub level: String,
    pub layout: String,
}

impl Default for InternalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            layout: "mistlog: ${level}: ${message}".to_string(),
        }
    }
}
