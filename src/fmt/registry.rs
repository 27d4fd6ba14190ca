//! Catalog mapping placeholder names to renderer constructors.
//!
//! A [`Registry`] can be built and passed explicitly to
//! [`Layout::parse_with`](super::Layout::parse_with), or the process-wide one
//! can be used through [`Layout::parse`](super::Layout::parse). The global
//! registry is seeded with the builtins on first use, only grows, and lives
//! until the process exits. Register custom renderers before concurrent
//! logging starts: a constructor must not call [`register_renderer`] itself,
//! since parsing holds the registry's read lock.

use super::args::Args;
use super::error::ParseError;
use super::renderer::{self, Renderer};
use super::time;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard};

/// Builds a renderer from its argument region. Whatever the closure captures is
/// the entry's context, released when the registry is dropped.
pub type Constructor = dyn Fn(&mut Args<'_>) -> Result<Renderer, ParseError> + Send + Sync;

#[derive(Clone)]
struct Entry {
    name: String,
    create: Arc<Constructor>,
}

#[derive(Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

impl Registry {
    /// A registry that knows no renderers at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `level`, `time`, `counter`, `file`, `function`, `line`, `message`,
    /// and the archive-naming renderers `sequence` and `archive_date`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("level", renderer::create_level);
        registry.register("time", time::create_time);
        registry.register("counter", renderer::create_counter);
        registry.register("file", renderer::create_file);
        registry.register("function", renderer::create_function);
        registry.register("line", renderer::create_line);
        registry.register("message", renderer::create_message);
        registry.register("sequence", renderer::create_sequence);
        registry.register("archive_date", renderer::create_archive_date);
        registry
    }

    /// Appends a constructor. A name registered twice resolves to the newest entry.
    pub fn register<F>(&mut self, name: impl Into<String>, create: F)
    where
        F: Fn(&mut Args<'_>) -> Result<Renderer, ParseError> + Send + Sync + 'static,
    {
        self.entries.push(Entry {
            name: name.into(),
            create: Arc::new(create),
        });
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Registered names in registration order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().rev().find(|entry| entry.name == name)
    }

    /// `None` when no renderer of that name exists.
    pub(crate) fn create(
        &self,
        name: &str,
        args: &mut Args<'_>,
    ) -> Option<Result<Renderer, ParseError>> {
        self.find(name).map(|entry| (entry.create)(args))
    }

    /// Read access to the process-wide registry, seeding the builtins on first use.
    pub fn global() -> RwLockReadGuard<'static, Self> {
        global_lock()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn global_lock() -> &'static RwLock<Registry> {
    GLOBAL.get_or_init(|| RwLock::new(Registry::with_builtins()))
}

/// Adds a custom renderer to the process-wide registry.
///
/// Templates parsed afterwards with [`Layout::parse`](super::Layout::parse)
/// can reference `${name}`; layouts parsed earlier are unaffected.
pub fn register_renderer<F>(name: impl Into<String>, create: F)
where
    F: Fn(&mut Args<'_>) -> Result<Renderer, ParseError> + Send + Sync + 'static,
{
    global_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, create);
}
