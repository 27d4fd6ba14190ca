#![forbid(unsafe_code)]

//! `mistlog` - structured logging with `${...}` layouts and rotating files.
//!
//! - Layout templates parsed once into renderer pipelines, with a registry
//!   for custom renderers
//! - Console and file targets, each with its own layout and level range
//! - File names rendered per event, size and calendar rollover, sequence or
//!   date archive numbering, retention, optional gzip
//! - TOML configuration with `source = "..."` includes
//!
//! # Example
//!
//! ```
//! use mistlog::{Level, Logger};
//!
//! let mut logger = Logger::builder()
//!     .console()
//!         .layout("${level} ${file}:${line} ${message}")
//!         .levels(Level::Debug, Level::Fatal)
//!         .done()
//!     .build()?;
//!
//! mistlog::info!(logger, "listening on port {}", 8080);
//! mistlog::trace!(logger, "filtered out, never rendered");
//! # Ok::<(), mistlog::Error>(())
//! ```

pub mod config;
mod error;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod logger;
pub mod output;
pub mod retention;

pub use config::Config;
pub use error::Error;
pub use fmt::{
    ArchiveContext, Args, Layout, LogEvent, ParseError, Registry, Render, RenderError, Renderer,
    register_renderer,
};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, SharedLogger};
pub use output::{FileOptions, FileTarget, Sink, Target};
