use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Severity tag carried by a timestamped header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Any tag the agent emits that is not one of the above
    Other(String),
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Other(tag) => tag,
        }
    }

    /// ERROR or CRITICAL
    pub fn is_failure(&self) -> bool {
        matches!(self, Level::Error | Level::Critical)
    }
}

impl From<&str> for Level {
    fn from(tag: &str) -> Self {
        match tag {
            "DEBUG" => Level::Debug,
            "INFO" => Level::Info,
            "WARNING" => Level::Warning,
            "ERROR" => Level::Error,
            "CRITICAL" => Level::Critical,
            other => Level::Other(other.to_string()),
        }
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::from(s))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One logical entry: a timestamped log line, a section separator or an
/// orphan line, together with any continuation lines it absorbed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// 1-based number of the first raw line of this record
    pub line_number: usize,

    /// Present only for records that matched the header pattern
    pub timestamp: Option<NaiveDateTime>,

    /// Present exactly when `timestamp` is
    pub level: Option<Level>,

    /// Primary text, trimmed
    pub message: String,

    /// Original first line with the line terminator removed
    pub raw: String,

    pub is_separator: bool,
    pub separator_title: Option<String>,

    /// Subsequent non-blank lines that did not start a new record, verbatim
    pub continuation_lines: Vec<String>,
}

impl LogRecord {
    /// A record opened by a `timestamp | LEVEL | message` header.
    pub fn header(
        line_number: usize,
        timestamp: NaiveDateTime,
        level: Level,
        message: &str,
        raw: &str,
    ) -> Self {
        Self {
            line_number,
            timestamp: Some(timestamp),
            level: Some(level),
            message: message.trim().to_string(),
            raw: raw.to_string(),
            is_separator: false,
            separator_title: None,
            continuation_lines: Vec::new(),
        }
    }

    /// A standalone line with no header before it.
    pub fn orphan(line_number: usize, raw: &str) -> Self {
        Self {
            line_number,
            timestamp: None,
            level: None,
            message: raw.trim().to_string(),
            raw: raw.to_string(),
            is_separator: false,
            separator_title: None,
            continuation_lines: Vec::new(),
        }
    }

    /// A section divider; the message mirrors the title.
    pub fn separator(line_number: usize, raw: &str, title: Option<String>) -> Self {
        let mut record = Self {
            line_number,
            timestamp: None,
            level: None,
            message: String::new(),
            raw: raw.to_string(),
            is_separator: true,
            separator_title: None,
            continuation_lines: Vec::new(),
        };
        if let Some(title) = title {
            record.set_title(title);
        }
        record
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.message = title.clone();
        self.separator_title = Some(title);
    }

    /// Message plus continuation lines, newline-joined.
    pub fn full_message(&self) -> String {
        if self.continuation_lines.is_empty() {
            return self.message.clone();
        }
        format!("{}\n{}", self.message, self.continuation_lines.join("\n"))
    }

    pub fn is_failure(&self) -> bool {
        self.level.as_ref().is_some_and(Level::is_failure)
    }
}
