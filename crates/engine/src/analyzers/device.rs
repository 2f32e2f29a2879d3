use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Analyzer, AnalyzerKind};
use crate::parser::{Level, LogRecord};
use crate::session::SessionContext;

const CONNECTION_KEYWORDS: [&str; 3] = ["connection", "device", "adb"];

/// A touch-daemon (MaaTouch) message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceEvent {
    pub message: String,
    pub timestamp: Option<NaiveDateTime>,
}

pub fn is_adb_timeout(message: &str) -> bool {
    message.contains("AdbTimeout") || message.to_lowercase().contains("adb timeout")
}

pub fn is_touch_event(message: &str) -> bool {
    message.contains("MaaTouch")
}

pub fn mentions_connection(message: &str) -> bool {
    let lower = message.to_lowercase();
    CONNECTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[derive(Debug, Default)]
pub struct DeviceAnalyzer {
    adb_timeouts: u64,
    touch_events: Vec<DeviceEvent>,
    connection_errors: Vec<LogRecord>,
}

impl DeviceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adb_timeouts(&self) -> u64 {
        self.adb_timeouts
    }

    pub fn touch_events(&self) -> &[DeviceEvent] {
        &self.touch_events
    }

    pub fn connection_errors(&self) -> &[LogRecord] {
        &self.connection_errors
    }

    pub fn has_issues(&self) -> bool {
        self.adb_timeouts > 0 || !self.connection_errors.is_empty()
    }
}

impl Analyzer for DeviceAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Device
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        let message = record.message.as_str();

        if is_adb_timeout(message) {
            self.adb_timeouts += 1;
        }
        if is_touch_event(message) {
            self.touch_events.push(DeviceEvent {
                message: message.to_string(),
                timestamp: record.timestamp,
            });
        }
        let flagged = matches!(record.level, Some(Level::Error | Level::Warning));
        if flagged && mentions_connection(message) {
            tracing::debug!(line = record.line_number, "device: connection issue");
            self.connection_errors.push(record.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(level: Level, message: &str) -> LogRecord {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 25)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 0)
            .unwrap();
        LogRecord::header(1, ts, level, message, message)
    }

    #[test]
    fn test_adb_timeout_detection() {
        assert!(is_adb_timeout("AdbTimeout: screencap"));
        assert!(is_adb_timeout("ADB Timeout after 10s"));
        assert!(!is_adb_timeout("adb connected"));
    }

    #[test]
    fn test_rules_accumulate_independently() {
        let mut analyzer = DeviceAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&rec(Level::Warning, "MaaTouch adb timeout, retrying"), &mut ctx);
        analyzer.feed(&rec(Level::Info, "MaaTouch initialized"), &mut ctx);
        analyzer.feed(&rec(Level::Error, "Device disconnected"), &mut ctx);
        analyzer.feed(&rec(Level::Info, "Connection established"), &mut ctx);

        assert_eq!(analyzer.adb_timeouts(), 1);
        assert_eq!(analyzer.touch_events().len(), 2);
        assert_eq!(analyzer.touch_events()[1].message, "MaaTouch initialized");
        assert_eq!(analyzer.connection_errors().len(), 2);
        assert!(analyzer.has_issues());
    }

    #[test]
    fn test_quiet_device() {
        let mut analyzer = DeviceAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&rec(Level::Error, "GameStuckError: Wait too long"), &mut ctx);
        assert!(!analyzer.has_issues());
    }
}
