/// Record analyzers
///
/// Nine observers fed one [`LogRecord`] at a time. Each owns its own
/// accumulator; the only state they share is the [`SessionContext`].
///
/// # Order
///
/// The pipeline walks [`FEED_ORDER`] for every record. Combat reads the crash
/// signal the error analyzer may have set for the same record, so error must
/// come first. Only task and combat carry state past the last record and are
/// listed in [`FINALIZE_ORDER`].

pub mod combat;
pub mod device;
pub mod error;
pub mod loot;
pub mod merchant;
pub mod navigation;
pub mod resource;
pub mod skip;
pub mod task;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::LogRecord;
use crate::session::SessionContext;

pub use combat::{CombatAnalyzer, CombatStats, Fight, FightOutcome};
pub use device::{DeviceAnalyzer, DeviceEvent};
pub use error::ErrorAnalyzer;
pub use loot::LootAnalyzer;
pub use merchant::MerchantAnalyzer;
pub use navigation::{NavigationAnalyzer, PageSwitch};
pub use resource::{Reading, ResourceAnalyzer};
pub use skip::SkipAnalyzer;
pub use task::{TaskAnalyzer, TaskRun};

pub trait Analyzer: Send {
    fn kind(&self) -> AnalyzerKind;

    /// Observe one record.
    fn feed(&mut self, record: &LogRecord, ctx: &mut SessionContext);

    /// Close out anything still open once the stream ends.
    fn finalize(&mut self, _ctx: &mut SessionContext) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    Error,
    Task,
    Combat,
    Resource,
    Navigation,
    Device,
    Merchant,
    Loot,
    Skip,
}

impl AnalyzerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerKind::Error => "error",
            AnalyzerKind::Task => "task",
            AnalyzerKind::Combat => "combat",
            AnalyzerKind::Resource => "resource",
            AnalyzerKind::Navigation => "navigation",
            AnalyzerKind::Device => "device",
            AnalyzerKind::Merchant => "merchant",
            AnalyzerKind::Loot => "loot",
            AnalyzerKind::Skip => "skip",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FEED_ORDER: [AnalyzerKind; 9] = [
    AnalyzerKind::Error,
    AnalyzerKind::Task,
    AnalyzerKind::Combat,
    AnalyzerKind::Resource,
    AnalyzerKind::Navigation,
    AnalyzerKind::Device,
    AnalyzerKind::Merchant,
    AnalyzerKind::Loot,
    AnalyzerKind::Skip,
];

pub const FINALIZE_ORDER: [AnalyzerKind; 2] = [AnalyzerKind::Task, AnalyzerKind::Combat];

/// One instance of every analyzer, addressable by kind.
#[derive(Debug, Default)]
pub struct Analyzers {
    pub error: ErrorAnalyzer,
    pub task: TaskAnalyzer,
    pub combat: CombatAnalyzer,
    pub resource: ResourceAnalyzer,
    pub navigation: NavigationAnalyzer,
    pub device: DeviceAnalyzer,
    pub merchant: MerchantAnalyzer,
    pub loot: LootAnalyzer,
    pub skip: SkipAnalyzer,
}

impl Analyzers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, kind: AnalyzerKind) -> &mut dyn Analyzer {
        match kind {
            AnalyzerKind::Error => &mut self.error,
            AnalyzerKind::Task => &mut self.task,
            AnalyzerKind::Combat => &mut self.combat,
            AnalyzerKind::Resource => &mut self.resource,
            AnalyzerKind::Navigation => &mut self.navigation,
            AnalyzerKind::Device => &mut self.device,
            AnalyzerKind::Merchant => &mut self.merchant,
            AnalyzerKind::Loot => &mut self.loot,
            AnalyzerKind::Skip => &mut self.skip,
        }
    }
}

// GameStuckError: Wait too long
static EXCEPTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+(?:Error|Exception)):").unwrap());

/// First `<Word>Error:` / `<Word>Exception:` name in `text`.
pub fn extract_exception(text: &str) -> Option<&str> {
    EXCEPTION_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_exception() {
        assert_eq!(
            extract_exception("GameStuckError: Wait too long"),
            Some("GameStuckError")
        );
        assert_eq!(
            extract_exception("raised RequestHumanTakeover: no | ValueException: bad"),
            Some("ValueException")
        );
        assert_eq!(
            extract_exception("first TimeoutError: a then OtherError: b"),
            Some("TimeoutError")
        );
        assert_eq!(extract_exception("Error without a name"), None);
        assert_eq!(extract_exception("GameStuckError without colon"), None);
    }

    #[test]
    fn test_feed_order_lists_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in FEED_ORDER {
            assert!(seen.insert(kind), "{kind} listed twice");
        }
        assert_eq!(seen.len(), 9);
        assert_eq!(FEED_ORDER[0], AnalyzerKind::Error);
        assert_eq!(FEED_ORDER[2], AnalyzerKind::Combat);
    }

    #[test]
    fn test_get_mut_returns_matching_kind() {
        let mut analyzers = Analyzers::new();
        for kind in FEED_ORDER {
            assert_eq!(analyzers.get_mut(kind).kind(), kind);
        }
    }
}
