use serde::Serialize;

/// Line classification outcome, recorded once per raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Opened a new timestamped record
    Header,
    /// Emitted a separator record
    Separator,
    /// Absorbed as the title of the preceding separator
    Title,
    /// Appended to the pending record
    Continuation,
    /// Emitted as a standalone record
    Orphan,
    /// Dropped
    Blank,
}

/// Counters for one parsing pass.
///
/// The parser is single-threaded, so these are plain integers rather than
/// atomics. Snapshot with [`super::RecordParser::stats`] at any point; the
/// figures are final once the iterator returns `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines: u64,
    pub headers: u64,
    pub separators: u64,
    pub titles: u64,
    pub continuations: u64,
    pub orphans: u64,
    pub blanks: u64,
    /// Records handed to the caller
    pub records: u64,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_line(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Header => self.headers += 1,
            LineOutcome::Separator => self.separators += 1,
            LineOutcome::Title => self.titles += 1,
            LineOutcome::Continuation => self.continuations += 1,
            LineOutcome::Orphan => self.orphans += 1,
            LineOutcome::Blank => self.blanks += 1,
        }
    }

    #[inline]
    pub fn record_emit(&mut self) {
        self.records += 1;
    }

    /// Lines that started a record of their own.
    pub fn primary_lines(&self) -> u64 {
        self.headers + self.separators + self.orphans
    }
}
