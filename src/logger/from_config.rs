//! Logger construction from a loaded [`Config`].

use super::{Logger, LoggerBuilder};
use crate::config::Config;
use crate::internal;

impl Logger {
    /// Builds the console target and every enabled `[files.<name>]` target.
    ///
    /// # Errors
    /// Invalid level or policy strings, and templates that fail to parse.
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        internal::debug("LOGGER", "Building logger from config");
        let general = &config.general;
        let mut builder = LoggerBuilder::new();
        let mut outputs: Vec<&str> = Vec::new();

        if config.console.enabled {
            let (min, max) = config.console.levels(general)?;
            builder = builder
                .console()
                .stream(config.console.parse_stream()?)
                .layout(config.console.layout.as_deref().unwrap_or(&general.layout))
                .levels(min, max)
                .done();
            outputs.push("console");
        }

        for (name, file) in &config.files {
            if !file.enabled {
                internal::debug("LOGGER", &format!("File target {name} disabled"));
                continue;
            }
            let (min, max) = file.levels(general)?;
            let mut target = builder
                .file(file.path.as_str())
                .layout(file.layout.as_deref().unwrap_or(&general.layout))
                .options(file.options()?)
                .levels(min, max);
            if let Some(archive_path) = &file.archive_path {
                target = target.archive_file_name(archive_path.as_str());
            }
            builder = target.done();
            internal::debug("FILE", &format!("Target {name}: {}", file.path));
            outputs.push(name);
        }

        if outputs.is_empty() {
            internal::warn("LOGGER", "No outputs enabled");
        } else {
            internal::debug(
                "LOGGER",
                &format!("Outputs enabled: [{}]", outputs.join(", ")),
            );
        }

        builder.build()
    }

    /// [`Logger::from_config`] on the default config file.
    ///
    /// # Errors
    /// Loading or building failed.
    pub fn from_default_config() -> Result<Self, crate::Error> {
        Self::from_config(&Config::load()?)
    }
}
