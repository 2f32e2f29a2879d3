//! Merchant analyzer — Akashi shop events during Operation Siren runs.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{Analyzer, AnalyzerKind};
use crate::counter::FrequencyMap;
use crate::parser::LogRecord;
use crate::session::SessionContext;

static BOUGHT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bought item:\s*(.+)\.").unwrap());
// Channel mismatch fixed in SHOP_ITEM_CUBE. Sim: 0.871
static MISMATCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Channel mismatch fixed in ([\w_]+)\. Sim: (\d+(?:\.\d+)?)").unwrap()
});

pub fn purchased_item(message: &str) -> Option<&str> {
    BOUGHT_REGEX
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `(template, similarity)` from a channel-mismatch notice.
pub fn channel_mismatch(message: &str) -> Option<(&str, f64)> {
    let caps = MISMATCH_REGEX.captures(message)?;
    let template = caps.get(1)?.as_str();
    let sim = caps[2].parse().ok()?;
    Some((template, sim))
}

#[derive(Debug, Default)]
pub struct MerchantAnalyzer {
    discoveries: Vec<LogRecord>,
    purchases: Vec<String>,
    mismatches: FrequencyMap<String>,
    max_similarity: HashMap<String, f64>,
}

impl MerchantAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discoveries(&self) -> &[LogRecord] {
        &self.discoveries
    }

    pub fn purchases(&self) -> &[String] {
        &self.purchases
    }

    /// Mismatch notices per template.
    pub fn mismatches(&self) -> &FrequencyMap<String> {
        &self.mismatches
    }

    pub fn max_similarity(&self, template: &str) -> Option<f64> {
        self.max_similarity.get(template).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.discoveries.is_empty() && self.purchases.is_empty() && self.mismatches.is_empty()
    }
}

impl Analyzer for MerchantAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Merchant
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        let message = record.message.as_str();

        if message.contains("Found Akashi") {
            self.discoveries.push(record.clone());
        } else if message.contains("Bought item:") {
            if let Some(item) = purchased_item(message) {
                self.purchases.push(item.to_string());
            }
        } else if message.contains("Channel mismatch fixed in") {
            if let Some((template, sim)) = channel_mismatch(message) {
                self.mismatches.increment(template.to_string());
                let max = self.max_similarity.entry(template.to_string()).or_insert(sim);
                if sim > *max {
                    *max = sim;
                }
            }
        }
    }
}
