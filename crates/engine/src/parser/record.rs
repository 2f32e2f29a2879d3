//! Record parser — lazy raw-line → [`LogRecord`] state machine.
//!
//! Holds at most one pending record while continuation lines accumulate:
//! - A timestamped header flushes the pending record and opens a new one
//! - A separator flushes the pending record and is emitted on its own
//! - Any other non-blank line attaches to the pending record, or becomes an
//!   orphan record when nothing is pending
//! - Blank lines are dropped without flushing
//!
//! An untitled separator opens a possible banner: bar, uppercase title, bar.
//! The title is only folded into the first bar once the closing bar arrives;
//! otherwise the title line is released as an ordinary orphan record.

use std::collections::VecDeque;

use super::metrics::{LineOutcome, ParseStats};
use super::model::LogRecord;
use super::pattern::{classify, title_text, LineKind};

enum LineAction {
    /// Close the pending record and open a new one
    FlushAndOpen(LogRecord),
    /// Close the pending record and emit a separator
    FlushAndSeparate(LogRecord),
    AddToCurrent,
    Orphan,
    Drop,
}

/// Untitled separator held back until the banner layout is confirmed.
enum Banner {
    /// Bar seen, waiting for a title line
    Open(LogRecord),
    /// Title seen, waiting for the closing bar
    Titled {
        separator: LogRecord,
        line_number: usize,
        line: String,
        title: String,
    },
}

/// Parse raw lines into records.
///
/// The returned iterator pulls lines on demand; a caller streaming a file
/// never holds more than the current record in memory.
pub fn parse<I>(lines: I) -> RecordParser<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    RecordParser::new(lines.into_iter())
}

pub struct RecordParser<I> {
    lines: I,
    line_number: usize,
    pending: Option<LogRecord>,
    banner: Option<Banner>,
    ready: VecDeque<LogRecord>,
    stats: ParseStats,
    exhausted: bool,
}

impl<I> RecordParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            line_number: 0,
            pending: None,
            banner: None,
            ready: VecDeque::new(),
            stats: ParseStats::new(),
            exhausted: false,
        }
    }

    /// Counters for the lines consumed so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Number of raw lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn process_line(&mut self, raw: &str) {
        self.line_number += 1;
        let line = raw.trim_end_matches(['\n', '\r']);
        let kind = classify(line);

        if let Some(banner) = self.banner.take() {
            match (banner, &kind) {
                (banner, LineKind::Blank) => {
                    self.banner = Some(banner);
                    self.stats.record_line(LineOutcome::Blank);
                    return;
                }
                (Banner::Open(separator), LineKind::Text) => match title_text(line) {
                    Some(title) => {
                        self.banner = Some(Banner::Titled {
                            separator,
                            line_number: self.line_number,
                            line: line.to_string(),
                            title,
                        });
                        return;
                    }
                    None => self.emit(separator),
                },
                (
                    Banner::Titled {
                        mut separator,
                        title,
                        ..
                    },
                    LineKind::Separator { title: closing },
                ) => {
                    tracing::trace!(line = self.line_number, %title, "parser: banner title");
                    separator.set_title(title);
                    self.stats.record_line(LineOutcome::Title);
                    self.emit(separator);
                    // The closing bar never opens another banner
                    self.stats.record_line(LineOutcome::Separator);
                    self.emit(LogRecord::separator(self.line_number, line, closing.clone()));
                    return;
                }
                (banner, _) => self.release_banner(banner),
            }
        }

        let action = match kind {
            LineKind::Separator { title } => {
                LineAction::FlushAndSeparate(LogRecord::separator(self.line_number, line, title))
            }
            LineKind::Header {
                timestamp,
                level,
                message,
            } => LineAction::FlushAndOpen(LogRecord::header(
                self.line_number,
                timestamp,
                level,
                message,
                line,
            )),
            LineKind::Text if self.pending.is_some() => LineAction::AddToCurrent,
            LineKind::Text => LineAction::Orphan,
            LineKind::Blank => LineAction::Drop,
        };

        match action {
            LineAction::FlushAndSeparate(separator) => {
                self.flush_pending();
                self.stats.record_line(LineOutcome::Separator);
                if separator.separator_title.is_some() {
                    self.emit(separator);
                } else {
                    self.banner = Some(Banner::Open(separator));
                }
            }
            LineAction::FlushAndOpen(record) => {
                self.flush_pending();
                self.stats.record_line(LineOutcome::Header);
                self.pending = Some(record);
            }
            LineAction::AddToCurrent => {
                if let Some(ref mut record) = self.pending {
                    record.continuation_lines.push(line.to_string());
                }
                self.stats.record_line(LineOutcome::Continuation);
            }
            LineAction::Orphan => self.emit_orphan(self.line_number, line),
            LineAction::Drop => self.stats.record_line(LineOutcome::Blank),
        }
    }

    fn emit_orphan(&mut self, line_number: usize, line: &str) {
        tracing::trace!(line = line_number, "parser: orphan line");
        self.stats.record_line(LineOutcome::Orphan);
        self.emit(LogRecord::orphan(line_number, line));
    }

    /// Give up on a banner: the bar stays untitled, a held title is an orphan.
    fn release_banner(&mut self, banner: Banner) {
        match banner {
            Banner::Open(separator) => self.emit(separator),
            Banner::Titled {
                separator,
                line_number,
                line,
                ..
            } => {
                self.emit(separator);
                self.emit_orphan(line_number, &line);
            }
        }
    }

    fn flush_pending(&mut self) {
        if let Some(record) = self.pending.take() {
            self.emit(record);
        }
    }

    fn emit(&mut self, record: LogRecord) {
        self.stats.record_emit();
        self.ready.push_back(record);
    }

    fn finish(&mut self) {
        if let Some(banner) = self.banner.take() {
            self.release_banner(banner);
        }
        self.flush_pending();
        tracing::debug!(
            lines = self.stats.lines,
            records = self.stats.records,
            headers = self.stats.headers,
            separators = self.stats.separators,
            continuations = self.stats.continuations,
            orphans = self.stats.orphans,
            "parser: input exhausted"
        );
    }
}

impl<I> Iterator for RecordParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(record);
            }
            if self.exhausted {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.process_line(line.as_ref()),
                None => {
                    self.exhausted = true;
                    self.finish();
                }
            }
        }
    }
}
