//! mistlog's own diagnostics: rollover, retention, config loading, and
//! dropped messages are reported here instead of to the caller's targets.
//!
//! The logger lives in a `OnceLock`, so only the first `init` takes effect.
//! Calls made before `init` vanish. A diagnostic raised while the internal
//! logger is already busy on the same or another thread is dropped rather
//! than waited for.

use crate::config::{Config, InternalConfig};
use crate::fmt::{LogEvent, Registry};
use crate::level::Level;
use crate::logger::Logger;
use crate::output::Stream;
use std::sync::{Mutex, OnceLock, TryLockError};

static INTERNAL_LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Initializes from the default config file, or defaults when it cannot be loaded.
pub fn init() {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| {
        let config = Config::load().unwrap_or_default();
        Mutex::new(build_internal_logger(&config.internal))
    });
    if !was_init {
        debug("INTERNAL", "Internal logger ready");
    }
}

/// Initializes from an already-loaded config.
pub fn init_with_config(config: &Config) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| Mutex::new(build_internal_logger(&config.internal)));
    if !was_init {
        debug(
            "INTERNAL",
            &format!("Internal log level: {}", config.internal.level),
        );
    }
}

#[must_use]
pub fn is_initialized() -> bool {
    INTERNAL_LOGGER.get().is_some()
}

fn build_internal_logger(config: &InternalConfig) -> Logger {
    if !config.enabled {
        return Logger::new();
    }
    let level = config.level.parse().unwrap_or(Level::Warn);
    Logger::builder()
        .registry(Registry::with_builtins())
        .console()
        .stream(Stream::Stderr)
        .layout(config.layout.as_str())
        .levels(level, Level::Fatal)
        .done()
        .build()
        .unwrap_or_default()
}

fn log(level: Level, scope: &str, msg: &str) {
    let Some(lock) = INTERNAL_LOGGER.get() else {
        return;
    };
    let mut logger = match lock.try_lock() {
        Ok(logger) => logger,
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        Err(TryLockError::WouldBlock) => return,
    };
    logger.log(LogEvent::new(level, format_args!("[{scope}] {msg}")));
}

/// Per-write detail: bytes written, archives found.
pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

/// Rollovers and retention passes.
pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Dropped messages and failed filesystem operations.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
