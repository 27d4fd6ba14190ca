//! Call-site macros. They work with anything exposing `log(LogEvent)`:
//! `&mut Logger`, `Logger` places, and `SharedLogger`.

/// Logs at an explicit level, capturing file, module, and line.
///
/// ```
/// use mistlog::{Layout, Level, Logger, Target, output::FnSink};
///
/// let mut logger = Logger::new();
/// logger.add_target(Target::new(
///     Layout::parse("${level}: ${message}").unwrap(),
///     FnSink(|_: &mistlog::LogEvent<'_>, line: &str| assert_eq!(line, "Warn: disk 93% full")),
/// ));
/// mistlog::log!(logger, Level::Warn, "disk {}% full", 93);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(
            $crate::LogEvent::new($level, ::std::format_args!($($arg)+))
                .location(::std::file!(), ::std::module_path!(), ::std::line!()),
        )
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
