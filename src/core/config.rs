//! Logging configuration
//!
//! Two values are shared by every [`Logger`](super::Logger) in the process:
//! a minimum level override and an application id. Both follow "last write
//! wins" and are read fresh on every logging call; nothing caches them.
//!
//! Per-logger settings can also be loaded from JSON through [`LoggerConfig`].

use super::error::{LoggerError, Result};
use super::formatter::DEFAULT_TEMPLATE;
use super::level::Level;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

static GLOBAL_LEVEL: AtomicU8 = AtomicU8::new(Level::Unset as u8);
static GLOBAL_APP_ID: RwLock<String> = RwLock::new(String::new());

/// Set the process-wide level override. [`Level::Unset`] clears it.
///
/// While set, the override is the effective level of every logger,
/// regardless of the logger's own level.
pub fn set_global_level(level: Level) {
    GLOBAL_LEVEL.store(level as u8, Ordering::Release);
}

/// The process-wide level override, or [`Level::Unset`] if none.
#[inline]
pub fn global_level() -> Level {
    Level::from_u8(GLOBAL_LEVEL.load(Ordering::Acquire))
}

/// Set the application id stamped on every record created afterwards.
pub fn set_global_app_id(app_id: impl Into<String>) {
    *GLOBAL_APP_ID.write() = app_id.into();
}

pub fn global_app_id() -> String {
    GLOBAL_APP_ID.read().clone()
}

/// Serializable settings for one stream-backed logger.
///
/// Every field is optional in JSON; missing ones take the defaults below.
///
/// # Example
///
/// ```
/// use sinklog::core::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{"name": "api", "level": "warn"}"#).unwrap();
/// assert_eq!(config.name, "api");
/// assert!(config.report_caller);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub name: String,

    /// Any name accepted by `Level::from_str`; `"unset"` defers to the
    /// process-wide and built-in defaults.
    pub level: String,

    pub template: String,

    /// `None` colours only when the sink is a terminal.
    pub colored: Option<bool>,

    pub async_mode: bool,

    pub report_caller: bool,

    /// Give the logger its own worker registry with this queue capacity
    /// instead of the process-wide one.
    pub queue_capacity: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: Level::Unset.to_string().to_lowercase(),
            template: DEFAULT_TEMPLATE.to_string(),
            colored: None,
            async_mode: false,
            report_caller: true,
            queue_capacity: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parsed form of [`level`](Self::level).
    pub fn parsed_level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|e: String| LoggerError::config("level", e))
    }

    /// Check everything that can be checked without building a logger.
    pub fn validate(&self) -> Result<()> {
        self.parsed_level()?;
        if self.queue_capacity == Some(0) {
            return Err(LoggerError::config(
                "queue_capacity",
                "queue capacity must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use parking_lot::{Mutex, MutexGuard};

    static GLOBALS: Mutex<()> = Mutex::new(());

    /// Serializes unit tests that touch the process-wide knobs.
    pub(crate) fn lock_globals() -> MutexGuard<'static, ()> {
        GLOBALS.lock()
    }
}
