use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use super::{Analyzer, AnalyzerKind};
use crate::parser::LogRecord;
use crate::session::SessionContext;

static PAGE_SWITCH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Page switch:\s*(\S+)\s*->\s*(\S+)").unwrap());
static CLICK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Click\s*\(").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSwitch {
    pub from: String,
    pub to: String,
    pub timestamp: Option<NaiveDateTime>,
}

pub fn page_switch(message: &str) -> Option<(&str, &str)> {
    let caps = PAGE_SWITCH_REGEX.captures(message)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

pub fn is_click(message: &str) -> bool {
    CLICK_REGEX.is_match(message)
}

pub fn is_unknown_page(message: &str) -> bool {
    message.contains("Unknown ui page")
}

#[derive(Debug, Default)]
pub struct NavigationAnalyzer {
    page_switches: Vec<PageSwitch>,
    clicks: u64,
    unknown_pages: u64,
}

impl NavigationAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_switches(&self) -> &[PageSwitch] {
        &self.page_switches
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    pub fn unknown_pages(&self) -> u64 {
        self.unknown_pages
    }
}

impl Analyzer for NavigationAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Navigation
    }

    fn feed(&mut self, record: &LogRecord, _ctx: &mut SessionContext) {
        let message = record.message.as_str();
        if let Some((from, to)) = page_switch(message) {
            self.page_switches.push(PageSwitch {
                from: from.to_string(),
                to: to.to_string(),
                timestamp: record.timestamp,
            });
        } else if is_click(message) {
            self.clicks += 1;
        } else if is_unknown_page(message) {
            self.unknown_pages += 1;
        }
    }
}
