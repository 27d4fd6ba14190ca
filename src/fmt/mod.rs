//! Layout template engine: the `${...}` mini-language, its renderer registry,
//! and the executor that turns a log event into text.

mod args;
mod error;
mod event;
mod layout;
mod registry;
mod renderer;
mod time;

pub use args::{ArgValue, Args, read_arg_name, read_arg_value};
pub use error::{ParseError, RenderError};
pub use event::{ArchiveContext, LogEvent};
pub use layout::Layout;
pub use registry::{Constructor, Registry, register_renderer};
pub use renderer::{Render, Renderer};
pub use time::{DEFAULT_TIME_FORMAT, TimeRenderer};
