use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use super::{Analyzer, AnalyzerKind};
use crate::parser::LogRecord;
use crate::session::SessionContext;

// [OCR_OIL] 12345
static OCR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[OCR_(\w+)\]\s*(\d+)").unwrap());
static EXERCISE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)exercise.*remain.*?(\d+)").unwrap());

pub const EXERCISE_REMAIN: &str = "EXERCISE_REMAIN";

/// One OCR'd resource value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub resource: String,
    pub value: u64,
    pub timestamp: Option<NaiveDateTime>,
}

/// `(resource, value)` read from a message, if any.
pub fn reading(message: &str) -> Option<(String, u64)> {
    if let Some(caps) = OCR_REGEX.captures(message) {
        let value = caps[2].parse().ok()?;
        return Some((caps[1].to_string(), value));
    }
    let caps = EXERCISE_REGEX.captures(message)?;
    let value = caps[1].parse().ok()?;
    Some((EXERCISE_REMAIN.to_string(), value))
}

#[derive(Debug, Default)]
pub struct ResourceAnalyzer {
    readings: Vec<Reading>,
}

impl ResourceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }
}

impl Analyzer for ResourceAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Resource
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        if let Some((resource, value)) = reading(&record.message) {
            self.readings.push(Reading {
                resource,
                value,
                timestamp: record.timestamp,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_tag() {
        assert_eq!(reading("[OCR_OIL] 12345"), Some(("OIL".into(), 12345)));
        assert_eq!(reading("[OCR_GEMS]980"), Some(("GEMS".into(), 980)));
    }

    #[test]
    fn test_exercise_remaining() {
        assert_eq!(
            reading("Exercise remain: 5"),
            Some((EXERCISE_REMAIN.into(), 5))
        );
        assert_eq!(
            reading("exercise times remaining 3/5"),
            Some((EXERCISE_REMAIN.into(), 3))
        );
    }

    #[test]
    fn test_ocr_takes_precedence() {
        assert_eq!(
            reading("[OCR_COIN] 50 exercise remain 2"),
            Some(("COIN".into(), 50))
        );
    }

    #[test]
    fn test_no_reading() {
        assert_eq!(reading("OCR_OIL 100"), None);
        assert_eq!(reading("exercise finished"), None);
    }

    #[test]
    fn test_feed_appends_reading_with_timestamp() {
        let mut analyzer = ResourceAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&LogRecord::orphan(1, "[OCR_OIL] 7"), &mut ctx);
        assert_eq!(analyzer.readings().len(), 1);
        assert_eq!(analyzer.readings()[0].resource, "OIL");
        assert!(analyzer.readings()[0].timestamp.is_none());
        assert_eq!(ctx, SessionContext::new());
    }
}
