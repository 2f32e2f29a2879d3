//! Error analyzer — severity lists, exception counts and crash signal.
//!
//! Besides collecting ERROR/WARNING/CRITICAL records this is the producer of
//! `SessionContext::last_crash_error`, which the combat analyzer reads on the
//! same record. INFO records carrying a traceback count as exceptions too: the
//! agent logs some genuine failures at INFO.

use std::sync::LazyLock;

use regex::Regex;

use super::{extract_exception, Analyzer, AnalyzerKind};
use crate::counter::FrequencyMap;
use crate::parser::{Level, LogRecord};
use crate::session::SessionContext;

static SAVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Saving error:\s*(.+)").unwrap());

const TRACEBACK_MARKERS: [&str; 2] = ["Traceback (most recent call last):", "Function calls:"];

pub fn is_traceback(text: &str) -> bool {
    TRACEBACK_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Path from a `Saving error: <path>` line.
pub fn error_save_path(message: &str) -> Option<&str> {
    SAVE_REGEX
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Default)]
pub struct ErrorAnalyzer {
    errors: Vec<LogRecord>,
    warnings: Vec<LogRecord>,
    criticals: Vec<LogRecord>,
    exceptions: FrequencyMap<String>,
    error_saves: Vec<String>,
}

impl ErrorAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[LogRecord] {
        &self.errors
    }

    pub fn warnings(&self) -> &[LogRecord] {
        &self.warnings
    }

    pub fn criticals(&self) -> &[LogRecord] {
        &self.criticals
    }

    pub fn exceptions(&self) -> &FrequencyMap<String> {
        &self.exceptions
    }

    pub fn error_saves(&self) -> &[String] {
        &self.error_saves
    }

    fn record_exception(&mut self, full: &str, ctx: &mut SessionContext) {
        if let Some(name) = extract_exception(full) {
            self.exceptions.increment(name.to_string());
            tracing::debug!(exception = name, "error: crash signal");
            ctx.last_crash_error = Some(name.to_string());
        }
    }
}

impl Analyzer for ErrorAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Error
    }

    fn feed(&mut self, record: &LogRecord, ctx: &mut SessionContext) {
        let full = record.full_message();

        match record.level {
            Some(Level::Error) => {
                self.errors.push(record.clone());
                self.record_exception(&full, ctx);
            }
            Some(Level::Warning) => self.warnings.push(record.clone()),
            Some(Level::Critical) => {
                self.criticals.push(record.clone());
                self.record_exception(&full, ctx);
            }
            Some(Level::Info) if is_traceback(&full) => self.record_exception(&full, ctx),
            _ => {}
        }

        if let Some(path) = error_save_path(&record.message) {
            self.error_saves.push(path.to_string());
        }
    }
}
