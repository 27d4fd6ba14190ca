use super::Logger;
use crate::fmt::LogEvent;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle that serializes access to one [`Logger`].
///
/// The lock is held across every target for the whole event, so lines from
/// different threads never interleave and file rollover sees one writer.
#[derive(Debug, Clone)]
pub struct SharedLogger {
    inner: Arc<Mutex<Logger>>,
}

impl SharedLogger {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logger)),
        }
    }

    /// See [`Logger::log`].
    pub fn log(&self, event: LogEvent<'_>) -> bool {
        self.lock().log(event)
    }

    /// # Errors
    /// See [`Logger::flush`].
    pub fn flush(&self) -> Result<(), crate::Error> {
        self.lock().flush()
    }

    /// Runs `f` with exclusive access, e.g. to add a target after startup.
    pub fn with<R>(&self, f: impl FnOnce(&mut Logger) -> R) -> R {
        f(&mut self.lock())
    }

    /// A panic inside a custom renderer poisons the mutex; logging carries on.
    fn lock(&self) -> MutexGuard<'_, Logger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Logger> for SharedLogger {
    fn from(logger: Logger) -> Self {
        Self::new(logger)
    }
}
