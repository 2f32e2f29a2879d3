//! Task analyzer — scheduler task lifecycle.
//!
//! Tracks which scheduled task is running, when it started and stopped, and
//! whether an ERROR/CRITICAL record was raised while it was active.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

use super::{extract_exception, Analyzer, AnalyzerKind};
use crate::counter::FrequencyMap;
use crate::parser::LogRecord;
use crate::session::SessionContext;

// Scheduler: Start task `Commission`
static START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Start task `([^`]+)`").unwrap());

/// Section titles that frame the scheduler itself rather than a task.
const STRUCTURAL_TITLES: [&str; 2] = ["START", "DEVICE"];

/// One execution of a named task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRun {
    pub name: String,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub success: bool,
    pub error_type: Option<String>,
    pub line_start: usize,
    /// Unset when the task was still open at end of stream
    pub line_end: Option<usize>,
}

impl TaskRun {
    fn open(name: &str, record: &LogRecord) -> Self {
        Self {
            name: name.to_string(),
            start_time: record.timestamp,
            end_time: None,
            success: true,
            error_type: None,
            line_start: record.line_number,
            line_end: None,
        }
    }

    fn close(&mut self, record: &LogRecord) {
        self.end_time = record.timestamp;
        self.line_end = Some(record.line_number);
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_time? - self.start_time?)
    }
}

/// Task name named by a start marker.
pub fn start_marker(message: &str) -> Option<&str> {
    START_REGEX
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_stop_marker(message: &str) -> bool {
    message.contains("Delay task") || message.contains("Skip task")
}

#[derive(Debug, Default)]
pub struct TaskAnalyzer {
    tasks: Vec<TaskRun>,
    /// Index into `tasks` of the running task
    active: Option<usize>,
    counts: FrequencyMap<String>,
}

impl TaskAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[TaskRun] {
        &self.tasks
    }

    pub fn counts(&self) -> &FrequencyMap<String> {
        &self.counts
    }

    pub fn active(&self) -> Option<&TaskRun> {
        self.active.map(|i| &self.tasks[i])
    }

    fn active_mut(&mut self) -> Option<&mut TaskRun> {
        self.active.map(|i| &mut self.tasks[i])
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskRun> {
        self.tasks.iter().filter(|t| !t.success)
    }
}

impl Analyzer for TaskAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Task
    }

    fn feed(&mut self, record: &LogRecord, ctx: &mut SessionContext) {
        let message = record.message.as_str();
        if message.is_empty() {
            return;
        }

        if let Some(name) = start_marker(message) {
            if let Some(previous) = self.active_mut() {
                previous.close(record);
            }
            tracing::debug!(task = name, line = record.line_number, "task: start");
            self.tasks.push(TaskRun::open(name, record));
            self.active = Some(self.tasks.len() - 1);
            self.counts.increment(name.to_string());
            ctx.current_task = Some(name.to_string());
        } else if record.is_separator {
            let structural = record
                .separator_title
                .as_deref()
                .map_or(true, |title| STRUCTURAL_TITLES.contains(&title));
            if structural {
                return;
            }
            if let Some(task) = self.active_mut() {
                if task.start_time.is_none() {
                    task.start_time = record.timestamp;
                }
            }
        } else if is_stop_marker(message) {
            if let Some(task) = self.active_mut() {
                task.close(record);
                tracing::debug!(task = %task.name, line = record.line_number, "task: stop");
                self.active = None;
                ctx.current_task = None;
            }
        } else if record.is_failure() {
            if let Some(task) = self.active_mut() {
                task.success = false;
                if let Some(name) = extract_exception(message) {
                    task.error_type = Some(name.to_string());
                }
            }
        }
    }

    fn finalize(&mut self, ctx: &mut SessionContext) {
        let Some(last) = ctx.last_timestamp else {
            return;
        };
        if let Some(task) = self.active_mut() {
            task.end_time = Some(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Level;
    use chrono::NaiveDate;

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 25)
            .unwrap()
            .and_hms_milli_opt(12, 0, sec, 0)
            .unwrap()
    }

    fn rec(line: usize, sec: u32, level: Level, message: &str) -> LogRecord {
        LogRecord::header(line, ts(sec), level, message, message)
    }

    fn run(records: &[LogRecord]) -> (TaskAnalyzer, SessionContext) {
        let mut analyzer = TaskAnalyzer::new();
        let mut ctx = SessionContext::new();
        for record in records {
            if record.timestamp.is_some() {
                ctx.last_timestamp = record.timestamp;
            }
            analyzer.feed(record, &mut ctx);
        }
        analyzer.finalize(&mut ctx);
        (analyzer, ctx)
    }

    // ── Markers ──────────────────────────────────────────────────

    #[test]
    fn test_start_marker() {
        assert_eq!(start_marker("Scheduler: Start task `Commission`"), Some("Commission"));
        assert_eq!(start_marker("Start task `Opsi_Explore`"), Some("Opsi_Explore"));
        assert_eq!(start_marker("Start task Commission"), None);
    }

    #[test]
    fn test_stop_marker() {
        assert!(is_stop_marker("Delay task `Research` to 2026-01-25 13:00:00"));
        assert!(is_stop_marker("Skip task Commission (Reason: none)"));
        assert!(!is_stop_marker("Start task `A`"));
    }

    // ── Lifecycle ────────────────────────────────────────────────

    #[test]
    fn test_start_start_skip() {
        let (analyzer, ctx) = run(&[
            rec(1, 0, Level::Info, "Scheduler: Start task `A`"),
            rec(2, 5, Level::Info, "Scheduler: Start task `B`"),
            rec(3, 9, Level::Info, "Skip task B"),
        ]);
        let tasks = analyzer.tasks();
        assert_eq!(tasks.len(), 2);

        assert_eq!(tasks[0].name, "A");
        assert_eq!(tasks[0].start_time, Some(ts(0)));
        assert_eq!(tasks[0].end_time, Some(ts(5)));
        assert_eq!(tasks[0].line_end, Some(2));
        assert_eq!(tasks[0].duration(), Some(Duration::seconds(5)));

        assert_eq!(tasks[1].name, "B");
        assert_eq!(tasks[1].end_time, Some(ts(9)));
        assert_eq!(tasks[1].line_end, Some(3));

        assert!(analyzer.active().is_none());
        assert!(ctx.current_task.is_none());
    }

    #[test]
    fn test_start_sets_current_task_and_counts() {
        let (analyzer, ctx) = run(&[
            rec(1, 0, Level::Info, "Start task `A`"),
            rec(2, 1, Level::Info, "Start task `A`"),
        ]);
        assert_eq!(ctx.current_task.as_deref(), Some("A"));
        assert_eq!(analyzer.counts().get("A"), 2);
    }

    #[test]
    fn test_finalize_closes_with_last_timestamp() {
        let (analyzer, _) = run(&[
            rec(1, 0, Level::Info, "Start task `A`"),
            rec(2, 30, Level::Info, "unrelated"),
        ]);
        let task = &analyzer.tasks()[0];
        assert_eq!(task.end_time, Some(ts(30)));
        assert_eq!(task.line_end, None);
    }

    #[test]
    fn test_stop_marker_without_active_task_is_ignored() {
        let (analyzer, _) = run(&[rec(1, 0, Level::Info, "Delay task `A`")]);
        assert!(analyzer.tasks().is_empty());
    }

    // ── Failures ─────────────────────────────────────────────────

    #[test]
    fn test_error_marks_failure_last_match_wins() {
        let (analyzer, _) = run(&[
            rec(1, 0, Level::Info, "Start task `A`"),
            rec(2, 1, Level::Error, "GameStuckError: Wait too long"),
            rec(3, 2, Level::Critical, "GameTooManyClickError: Too many click"),
            rec(4, 3, Level::Error, "no exception name here"),
        ]);
        let task = &analyzer.tasks()[0];
        assert!(!task.success);
        assert_eq!(task.error_type.as_deref(), Some("GameTooManyClickError"));
        assert_eq!(analyzer.failures().count(), 1);
    }

    #[test]
    fn test_error_outside_task_is_ignored() {
        let (analyzer, _) = run(&[
            rec(1, 0, Level::Error, "GameStuckError: Wait too long"),
            rec(2, 1, Level::Info, "Start task `A`"),
        ]);
        assert!(analyzer.tasks()[0].success);
    }

    #[test]
    fn test_warning_does_not_fail_task() {
        let (analyzer, _) = run(&[
            rec(1, 0, Level::Info, "Start task `A`"),
            rec(2, 1, Level::Warning, "SomeError: only a warning"),
        ]);
        assert!(analyzer.tasks()[0].success);
    }

    // ── Separator backfill ───────────────────────────────────────

    #[test]
    fn test_titled_separator_backfills_from_its_own_timestamp() {
        let mut analyzer = TaskAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&LogRecord::orphan(1, "Start task `A`"), &mut ctx);

        let mut titled = LogRecord::separator(2, "═══", Some("COMMISSION".into()));
        titled.timestamp = Some(ts(3));
        analyzer.feed(&titled, &mut ctx);
        assert_eq!(analyzer.tasks()[0].start_time, Some(ts(3)));

        // a start time, once known, is never replaced
        let mut later = LogRecord::separator(3, "═══", Some("REWARD".into()));
        later.timestamp = Some(ts(9));
        analyzer.feed(&later, &mut ctx);
        assert_eq!(analyzer.tasks()[0].start_time, Some(ts(3)));
    }

    #[test]
    fn test_untimed_separator_leaves_start_unknown() {
        let mut analyzer = TaskAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&LogRecord::orphan(1, "Start task `A`"), &mut ctx);

        // a later session timestamp is not the task's start
        ctx.last_timestamp = Some(ts(7));
        analyzer.feed(&LogRecord::separator(2, "═══", Some("START".into())), &mut ctx);
        analyzer.feed(&LogRecord::separator(3, "═══", Some("COMMISSION".into())), &mut ctx);
        assert_eq!(analyzer.tasks()[0].start_time, None);
    }

    #[test]
    fn test_untitled_separator_is_skipped() {
        let mut analyzer = TaskAnalyzer::new();
        let mut ctx = SessionContext::new();
        analyzer.feed(&LogRecord::orphan(1, "Start task `A`"), &mut ctx);
        ctx.last_timestamp = Some(ts(7));
        analyzer.feed(&LogRecord::separator(2, "═══", None), &mut ctx);
        assert_eq!(analyzer.tasks()[0].start_time, None);
    }
}
