//! Combat analyzer — exercise fights and crash attribution.
//!
//! A fight opens on `OPPONENT: N` and stays open until the next opponent or
//! the end of the stream. Crash attribution is bounded by the session's
//! `in_combat` window: a crash signal only taints the active fight while the
//! window is open, and `<<< COMBAT END >>>` closes it.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use super::{Analyzer, AnalyzerKind};
use crate::parser::LogRecord;
use crate::session::SessionContext;

static OPPONENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"OPPONENT:\s*(\d+)").unwrap());
static TRY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"TRY:\s*(\d+)").unwrap());
// [100% - 37%]
static HP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)%\s*-\s*(\d+)%\]").unwrap());

const COMBAT_END: &str = "<<< COMBAT END >>>";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fight {
    pub opponent: Option<u32>,
    pub try_number: Option<u32>,
    pub hp_start: Option<u32>,
    pub hp_end: Option<u32>,
    pub timestamp: Option<NaiveDateTime>,
    /// `None` until an HP reading or a crash decides it
    pub won: Option<bool>,
    pub crashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FightOutcome {
    Crash,
    Win,
    Loss,
    Unknown,
}

impl Fight {
    pub fn outcome(&self) -> FightOutcome {
        if self.crashed {
            return FightOutcome::Crash;
        }
        match self.won {
            Some(true) => FightOutcome::Win,
            Some(false) => FightOutcome::Loss,
            None => FightOutcome::Unknown,
        }
    }

    fn set_hp(&mut self, start: Option<u32>, end: Option<u32>) {
        self.hp_start = start;
        self.hp_end = end;
        // a falling displayed value means the opponent lost health
        self.won = match (start, end) {
            (Some(start), Some(end)) => Some(end < start),
            _ => None,
        };
    }
}

/// Totals over all closed fights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CombatStats {
    pub total: usize,
    pub wins: usize,
    /// Fights not won, crashes included
    pub losses: usize,
    /// Subset of `losses` ended by a crash
    pub crashes: usize,
    /// Wins over fights with a known outcome, as a percentage
    pub win_rate: Option<f64>,
}

fn capture_number(regex: &Regex, message: &str) -> Option<Option<u32>> {
    regex.captures(message).map(|caps| caps[1].parse().ok())
}

/// `Some(opponent)` when the message opens a fight; the inner value is unset
/// when the number does not fit.
pub fn opponent_marker(message: &str) -> Option<Option<u32>> {
    capture_number(&OPPONENT_REGEX, message)
}

pub fn try_marker(message: &str) -> Option<Option<u32>> {
    capture_number(&TRY_REGEX, message)
}

pub fn hp_marker(message: &str) -> Option<(Option<u32>, Option<u32>)> {
    HP_REGEX
        .captures(message)
        .map(|caps| (caps[1].parse().ok(), caps[2].parse().ok()))
}

#[derive(Debug, Default)]
pub struct CombatAnalyzer {
    fights: Vec<Fight>,
    current: Option<Fight>,
}

impl CombatAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed fights, in opening order.
    pub fn fights(&self) -> &[Fight] {
        &self.fights
    }

    pub fn current(&self) -> Option<&Fight> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> CombatStats {
        let mut stats = CombatStats {
            total: self.fights.len(),
            ..CombatStats::default()
        };
        for fight in &self.fights {
            match fight.outcome() {
                FightOutcome::Crash => {
                    stats.crashes += 1;
                    stats.losses += 1;
                }
                FightOutcome::Win => stats.wins += 1,
                FightOutcome::Loss => stats.losses += 1,
                FightOutcome::Unknown => {}
            }
        }
        let decided = stats.wins + stats.losses;
        if decided > 0 {
            stats.win_rate = Some(stats.wins as f64 / decided as f64 * 100.0);
        }
        stats
    }
}

impl Analyzer for CombatAnalyzer {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Combat
    }

    fn feed(&mut self, record: &LogRecord, ctx: &mut SessionContext) {
        let message = record.message.as_str();

        if let Some(opponent) = opponent_marker(message) {
            if let Some(previous) = self.current.take() {
                self.fights.push(previous);
            }
            tracing::debug!(opponent = ?opponent, line = record.line_number, "combat: fight opened");
            self.current = Some(Fight {
                opponent,
                timestamp: record.timestamp,
                ..Fight::default()
            });
            ctx.in_combat = true;
            ctx.last_crash_error = None;
        } else if let Some(try_number) = try_marker(message) {
            if let Some(fight) = self.current.as_mut() {
                fight.try_number = try_number;
            }
        } else if let Some((start, end)) = hp_marker(message) {
            if let Some(fight) = self.current.as_mut() {
                fight.set_hp(start, end);
            }
        }

        if ctx.crash_in_combat() {
            if let Some(fight) = self.current.as_mut() {
                if !fight.crashed {
                    tracing::debug!(
                        exception = ctx.last_crash_error.as_deref(),
                        line = record.line_number,
                        "combat: crash during fight"
                    );
                }
                fight.crashed = true;
                fight.won = Some(false);
            }
        }

        if message.contains(COMBAT_END) {
            ctx.in_combat = false;
            ctx.last_crash_error = None;
        }
    }

    fn finalize(&mut self, _ctx: &mut SessionContext) {
        if let Some(fight) = self.current.take() {
            self.fights.push(fight);
        }
    }
}
