use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::DisplayConfig;

#[derive(Debug, Parser)]
#[command(name = "alaslog")]
#[command(about = "Parse and summarize AzurLaneAutoScript logs", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:
  alaslog --latest --summary
  alaslog ./log/*_alas.txt --timeline
  alaslog --latest --trace --errors
  cat log.txt | alaslog --loot")]
pub struct Args {
    /// Log files to parse
    #[arg(conflicts_with = "latest")]
    pub files: Vec<PathBuf>,

    /// Specific log file (kept for older scripts)
    #[arg(short, long, conflicts_with = "latest")]
    pub file: Option<PathBuf>,

    /// Parse the most recently modified log in the configured log directory
    #[arg(short, long)]
    pub latest: bool,

    /// Only parse the last N lines (single input only)
    #[arg(short = 'n', long, value_name = "N")]
    pub tail: Option<usize>,

    /// One-screen overview (default)
    #[arg(short, long)]
    pub summary: bool,

    /// Chronological task list
    #[arg(short, long)]
    pub timeline: bool,

    /// Errors and warnings only
    #[arg(short, long)]
    pub errors: bool,

    /// Combat statistics
    #[arg(short, long)]
    pub combat: bool,

    /// Resource tracking
    #[arg(short, long)]
    pub resources: bool,

    /// JSON output
    #[arg(short, long)]
    pub json: bool,

    /// Show full tracebacks in the error view
    #[arg(long)]
    pub trace: bool,

    /// Show acquired items
    #[arg(long)]
    pub loot: bool,

    /// Show why tasks were skipped
    #[arg(long)]
    pub reasons: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file (overrides the default search path)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Report views, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Summary,
    Timeline,
    Errors,
    Combat,
    Resources,
    Json,
}

impl Args {
    /// Positional files plus `--file`, first occurrence wins.
    pub fn input_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for path in self.files.iter().chain(self.file.iter()) {
            if !files.contains(path) {
                files.push(path.clone());
            }
        }
        files
    }

    pub fn modes(&self) -> Vec<Mode> {
        let others = [
            (self.timeline, Mode::Timeline),
            (self.errors, Mode::Errors),
            (self.combat, Mode::Combat),
            (self.resources, Mode::Resources),
            (self.json, Mode::Json),
        ];
        let mut modes = Vec::new();
        if self.summary || !others.iter().any(|(on, _)| *on) {
            modes.push(Mode::Summary);
        }
        modes.extend(others.iter().filter(|(on, _)| *on).map(|(_, mode)| *mode));
        modes
    }

    pub fn validate(&self) -> Result<()> {
        if self.tail == Some(0) {
            bail!("--tail must be at least 1");
        }
        if self.tail.is_some() && self.input_files().len() > 1 {
            bail!("--tail only supports a single input file");
        }
        Ok(())
    }

    /// Command-line switches win over configured defaults.
    pub fn apply(&self, display: &mut DisplayConfig) {
        if self.no_color {
            display.color = false;
        }
        display.trace |= self.trace;
        display.loot |= self.loot;
        display.reasons |= self.reasons;
    }
}
