use super::{Analyzer, AnalyzerKind};
use crate::counter::FrequencyMap;
use crate::parser::LogRecord;
use crate::session::SessionContext;

const ACQUISITION_VERBS: [&str; 3] = ["Get ", "Acquire ", "Obtain "];

/// `Get 3x Gold Plate`, `Acquire Ship: Enterprise`, ...
pub fn is_loot(message: &str) -> bool {
    ACQUISITION_VERBS.iter().any(|verb| message.starts_with(verb))
}

#[derive(Debug, Default)]
pub struct LootAnalyzer {
    items: FrequencyMap<String>,
    recent: Vec<String>,
}

impl LootAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts keyed by the full loot message.
    pub fn items(&self) -> &FrequencyMap<String> {
        &self.items
    }

    /// Every loot message in arrival order.
    pub fn recent(&self) -> &[String] {
        &self.recent
    }
}

impl Analyzer for LootAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Loot
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        if is_loot(&record.message) {
            self.items.increment(record.message.clone());
            self.recent.push(record.message.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_loot() {
        assert!(is_loot("Get 3x Gold Plate"));
        assert!(is_loot("Acquire Ship: Enterprise"));
        assert!(is_loot("Obtain Cube"));
        assert!(!is_loot("Getting ready"));
        assert!(!is_loot("get 3x Gold Plate"));
    }

    #[test]
    fn test_counts_full_message() {
        let mut analyzer = LootAnalyzer::new();
        let mut ctx = SessionContext::new();
        for message in ["Get 3x Gold Plate", "Get 1x Oil", "Get 3x Gold Plate"] {
            analyzer.feed(&LogRecord::orphan(1, message), &mut ctx);
        }
        assert_eq!(analyzer.items().get("Get 3x Gold Plate"), 2);
        assert_eq!(analyzer.items().len(), 2);
        assert_eq!(analyzer.recent().len(), 3);
        assert_eq!(analyzer.recent()[1], "Get 1x Oil");
    }
}
