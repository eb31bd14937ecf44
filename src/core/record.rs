//! Log record structure

use super::config;
use super::level::Level;
use chrono::{DateTime, Local};
use std::panic::Location;

/// One logged event. Built once by the logger and never mutated afterwards;
/// handlers only ever see it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    timestamp: DateTime<Local>,
    name: String,
    level: Level,
    message: String,
    file_line: Option<String>,
    rpc_id: String,
    request_id: String,
    app_id: String,
}

impl Record {
    /// Create a record stamped with the current time and the process-wide
    /// application id.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            name: name.into(),
            level,
            message: message.into(),
            file_line: None,
            rpc_id: String::new(),
            request_id: String::new(),
            app_id: config::global_app_id(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_file_line(mut self, file: &str, line: u32) -> Self {
        self.file_line = Some(format!("{}:{}", file, line));
        self
    }

    pub fn with_location(self, location: &Location<'_>) -> Self {
        self.with_file_line(location.file(), location.line())
    }

    pub fn with_rpc_id(mut self, rpc_id: impl Into<String>) -> Self {
        self.rpc_id = rpc_id.into();
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// The raw message, exactly as the caller passed it.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file_line(&self) -> Option<&str> {
        self.file_line.as_deref()
    }

    /// Empty when the record carries no rpc id.
    pub fn rpc_id(&self) -> &str {
        &self.rpc_id
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}
