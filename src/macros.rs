//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Arguments are
//! only formatted when the level check passes. Call sites are captured at
//! the macro invocation.
//!
//! # Examples
//!
//! ```
//! use sinklog::prelude::*;
//! use sinklog::info;
//!
//! let logger = Logger::new("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at `$level` with automatic formatting.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// use sinklog::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if level >= logger.level() {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// # logger.set_level(Level::Debug);
/// use sinklog::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// use sinklog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// use sinklog::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// use sinklog::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message, flush every queued record, and exit the
/// process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use sinklog::prelude::*;
/// # let logger = Logger::new("app");
/// use sinklog::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}
