use std::sync::LazyLock;

use regex::Regex;

use super::{Analyzer, AnalyzerKind};
use crate::counter::FrequencyMap;
use crate::parser::LogRecord;
use crate::session::SessionContext;

// Skip task Commission (Reason: No available commission)
static REASON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Skip task .* \((Reason: .+?)\)").unwrap());

pub const UNSPECIFIED: &str = "Unspecified";

/// Reason attached to a skip marker, or `None` when the message is not one.
pub fn skip_reason(message: &str) -> Option<&str> {
    if !message.contains("Skip task") {
        return None;
    }
    let reason = REASON_REGEX
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map_or(UNSPECIFIED, |m| m.as_str());
    Some(reason)
}

#[derive(Debug, Default)]
pub struct SkipAnalyzer {
    reasons: FrequencyMap<String>,
}

impl SkipAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reasons(&self) -> &FrequencyMap<String> {
        &self.reasons
    }
}

impl Analyzer for SkipAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Skip
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        if let Some(reason) = skip_reason(&record.message) {
            self.reasons.increment(reason.to_string());
        }
    }
}
