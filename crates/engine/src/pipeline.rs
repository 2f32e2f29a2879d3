//! Pipeline — drives records through every analyzer in a fixed order.
//!
//! One pipeline covers one pass. It owns the analyzers and the
//! [`SessionContext`] they share, tracks the session's time bounds, and
//! refuses further input once finalized.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analyzers::{
    Analyzers, CombatAnalyzer, DeviceAnalyzer, ErrorAnalyzer, LootAnalyzer, MerchantAnalyzer,
    NavigationAnalyzer, ResourceAnalyzer, SkipAnalyzer, TaskAnalyzer, FEED_ORDER, FINALIZE_ORDER,
};
use crate::error::{EngineError, Result};
use crate::parser::LogRecord;
use crate::session::SessionContext;

/// Renderer toggles carried alongside the results. Analyzers never read them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Show full messages (with continuation lines) in error views
    pub trace: bool,
    pub loot: bool,
    pub reasons: bool,
}

#[derive(Debug, Default)]
pub struct Pipeline {
    analyzers: Analyzers,
    context: SessionContext,
    options: PipelineOptions,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    total_records: u64,
    finalized: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Observe one record.
    pub fn feed(&mut self, record: &LogRecord) -> Result<()> {
        if self.finalized {
            return Err(EngineError::Finalized("feed a record"));
        }

        self.total_records += 1;
        if let Some(ts) = record.timestamp {
            if self.start_time.is_none() {
                self.start_time = Some(ts);
            }
            self.end_time = Some(ts);
            self.context.last_timestamp = Some(ts);
        }

        for kind in FEED_ORDER {
            self.analyzers.get_mut(kind).feed(record, &mut self.context);
        }
        Ok(())
    }

    /// Feed every record from `records`, in order.
    pub fn feed_all<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = LogRecord>,
    {
        for record in records {
            self.feed(&record)?;
        }
        Ok(())
    }

    /// Close out open tasks and fights. Must be called exactly once.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(EngineError::Finalized("finalize twice"));
        }
        for kind in FINALIZE_ORDER {
            self.analyzers.get_mut(kind).finalize(&mut self.context);
        }
        self.finalized = true;

        tracing::debug!(
            records = self.total_records,
            tasks = self.analyzers.task.tasks().len(),
            fights = self.analyzers.combat.fights().len(),
            errors = self.analyzers.error.errors().len(),
            "pipeline: finalized"
        );
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.end_time? - self.start_time?)
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    // ── Analyzer results ─────────────────────────────────────────

    pub fn tasks(&self) -> &TaskAnalyzer {
        &self.analyzers.task
    }

    pub fn errors(&self) -> &ErrorAnalyzer {
        &self.analyzers.error
    }

    pub fn combat(&self) -> &CombatAnalyzer {
        &self.analyzers.combat
    }

    pub fn resources(&self) -> &ResourceAnalyzer {
        &self.analyzers.resource
    }

    pub fn navigation(&self) -> &NavigationAnalyzer {
        &self.analyzers.navigation
    }

    pub fn device(&self) -> &DeviceAnalyzer {
        &self.analyzers.device
    }

    pub fn merchant(&self) -> &MerchantAnalyzer {
        &self.analyzers.merchant
    }

    pub fn loot(&self) -> &LootAnalyzer {
        &self.analyzers.loot
    }

    pub fn skips(&self) -> &SkipAnalyzer {
        &self.analyzers.skip
    }
}
