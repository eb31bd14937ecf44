//! Template compiler and renderer
//!
//! A template is plain text with `{{name}}` placeholders. Whitespace inside
//! the braces is ignored, so `{{ level }}` and `{{level}}` are the same tag.
//! The empty placeholder `{{}}` stands for the raw message.
//!
//! | placeholder      | output                                         |
//! |------------------|------------------------------------------------|
//! | `{{}}`           | the message                                    |
//! | `{{level}}`      | level name, e.g. `INFO`, `WARN`                |
//! | `{{l}}`          | first letter of the level name, e.g. `I`       |
//! | `{{date}}`       | `2006-01-02`                                   |
//! | `{{time}}`       | `15:04:05`                                     |
//! | `{{datetime}}`   | `2006-01-02 15:04:05.999` (trailing zeros cut) |
//! | `{{name}}`       | logger name                                    |
//! | `{{pid}}`        | current process id                             |
//! | `{{file_line}}`  | `main.rs:12`, directory stripped               |
//! | `{{rpc_id}}`     | rpc id, `-` when empty                         |
//! | `{{request_id}}` | request id, `-` when empty                     |
//! | `{{app_id}}`     | application id, `-` when empty                 |
//!
//! Every compile error is reported up front by [`Formatter::new`]; rendering
//! a compiled template cannot fail.

use super::error::{LoggerError, Result};
use super::level::Level;
use super::record::Record;
use chrono::Timelike;
use std::fmt::Write as _;

/// Template used by loggers created with [`Logger::new`](super::Logger::new).
pub const DEFAULT_TEMPLATE: &str = "{{level}} {{date}} {{time}} {{name}} {{}}";

/// Template used by [`SyslogHandler::new`](crate::handlers::SyslogHandler::new).
pub const SYSLOG_TEMPLATE: &str = "[{{app_id}} {{rpc_id}} {{request_id}}] ## {{}}";

/// Printed in place of an empty correlation field.
pub const EMPTY_FIELD: &str = "-";

const COLOR_RESET: &str = "\x1b[0;m";

/// The closed set of placeholders a template may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Message,
    Level,
    LevelLetter,
    Date,
    Time,
    DateTime,
    Name,
    Pid,
    FileLine,
    RpcId,
    RequestId,
    AppId,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name {
            "" => Tag::Message,
            "level" => Tag::Level,
            "l" => Tag::LevelLetter,
            "date" => Tag::Date,
            "time" => Tag::Time,
            "datetime" => Tag::DateTime,
            "name" => Tag::Name,
            "pid" => Tag::Pid,
            "file_line" => Tag::FileLine,
            "rpc_id" => Tag::RpcId,
            "request_id" => Tag::RequestId,
            "app_id" => Tag::AppId,
            _ => return None,
        };
        Some(tag)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tag::Message => "",
            Tag::Level => "level",
            Tag::LevelLetter => "l",
            Tag::Date => "date",
            Tag::Time => "time",
            Tag::DateTime => "datetime",
            Tag::Name => "name",
            Tag::Pid => "pid",
            Tag::FileLine => "file_line",
            Tag::RpcId => "rpc_id",
            Tag::RequestId => "request_id",
            Tag::AppId => "app_id",
        }
    }

    /// Append this tag's value for `record` to `out`, uncoloured.
    fn write_value(&self, record: &Record, out: &mut String) {
        let ts = record.timestamp();
        // fmt::Write into a String never fails
        match self {
            Tag::Message => out.push_str(record.message()),
            Tag::Level => out.push_str(record.level().to_str()),
            Tag::LevelLetter => out.push_str(record.level().letter()),
            Tag::Date => {
                let _ = write!(out, "{}", ts.format("%Y-%m-%d"));
            }
            Tag::Time => {
                let _ = write!(out, "{}", ts.format("%H:%M:%S"));
            }
            Tag::DateTime => {
                let _ = write!(out, "{}", ts.format("%Y-%m-%d %H:%M:%S"));
                let millis = ts.nanosecond() % 1_000_000_000 / 1_000_000;
                if millis != 0 {
                    let frac = format!("{:03}", millis);
                    out.push('.');
                    out.push_str(frac.trim_end_matches('0'));
                }
            }
            Tag::Name => out.push_str(record.name()),
            Tag::Pid => {
                let _ = write!(out, "{}", std::process::id());
            }
            Tag::FileLine => out.push_str(short_file_line(record.file_line())),
            Tag::RpcId => out.push_str(or_placeholder(record.rpc_id())),
            Tag::RequestId => out.push_str(or_placeholder(record.request_id())),
            Tag::AppId => out.push_str(or_placeholder(record.app_id())),
        }
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_FIELD
    } else {
        value
    }
}

fn short_file_line(file_line: Option<&str>) -> &str {
    match file_line {
        Some(s) => s.rsplit(['/', '\\']).next().unwrap_or(s),
        None => "???:0",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Tag(Tag),
}

/// A compiled template.
///
/// # Example
///
/// ```
/// use sinklog::core::{Formatter, Level, Record};
///
/// let formatter = Formatter::new("{{l}}: {{}}", false).unwrap();
/// let record = Record::new("app", Level::Warn, "WarnLog");
/// assert_eq!(formatter.format(&record), "W: WarnLog\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    segments: Vec<Segment>,
    colored: bool,
}

impl Formatter {
    /// Compile `template`. Fails on unknown placeholders and on malformed
    /// `{{ ... }}` syntax.
    pub fn new(template: &str, colored: bool) -> Result<Self> {
        Ok(Self {
            segments: compile(template)?,
            colored,
        })
    }

    pub fn colored(&self) -> bool {
        self.colored
    }

    pub fn set_colored(&mut self, colored: bool) {
        self.colored = colored;
    }

    #[must_use]
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// The placeholders used by this template, in order of appearance.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Tag(tag) => Some(*tag),
            Segment::Literal(_) => None,
        })
    }

    /// Render `record`. Always ends with a newline.
    pub fn format(&self, record: &Record) -> String {
        let mut out = String::with_capacity(64 + record.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Tag(Tag::Message) => Tag::Message.write_value(record, &mut out),
                Segment::Tag(tag) if self.colored => {
                    paint_open(record.level(), &mut out);
                    tag.write_value(record, &mut out);
                    out.push_str(COLOR_RESET);
                }
                Segment::Tag(tag) => tag.write_value(record, &mut out),
            }
        }
        out
    }
}

fn paint_open(level: Level, out: &mut String) {
    out.push_str("\x1b[0;");
    out.push_str(&level.color_code().to_fg_str());
    out.push('m');
}

fn compile(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        literal.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let offset = template.len() - rest.len() + open;
        let close = after_open.find("}}").ok_or_else(|| {
            LoggerError::syntax(template, format!("unclosed placeholder at byte {}", offset))
        })?;

        let name = after_open[..close].trim();
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LoggerError::syntax(
                template,
                format!("illegal placeholder '{{{{{}}}}}'", name),
            ));
        }
        let tag = Tag::from_name(name).ok_or_else(|| LoggerError::unknown_placeholder(name))?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Tag(tag));
        rest = &after_open[close + 2..];
    }

    literal.push_str(rest);
    if !literal.ends_with('\n') {
        literal.push('\n');
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
