/// Report renderers
///
/// Pure functions from a finalized [`Pipeline`] to text. Nothing here writes
/// to stdout; `main` prints what these return.
///
/// - `summary.rs`: one-screen overview
/// - `timeline.rs`: one line per task run
/// - `errors.rs`: criticals, errors, warnings and exception counts
/// - `combat.rs`: per-fight outcomes
/// - `resources.rs`: OCR readings grouped by resource
/// - `json.rs`: machine-readable session digest

pub mod combat;
pub mod errors;
pub mod json;
pub mod resources;
pub mod style;
pub mod summary;
pub mod timeline;

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};

use alaslog_engine::Pipeline;

use crate::args::Mode;
use crate::config::DisplayConfig;
pub use style::Palette;

/// Shared inputs of every renderer.
pub struct View<'a> {
    pub pipeline: &'a Pipeline,
    pub display: &'a DisplayConfig,
    pub palette: Palette,
}

impl<'a> View<'a> {
    pub fn new(pipeline: &'a Pipeline, display: &'a DisplayConfig) -> Self {
        Self {
            pipeline,
            display,
            palette: Palette::new(display.color),
        }
    }

    pub fn render(&self, mode: Mode) -> Result<String> {
        let text = match mode {
            Mode::Summary => summary::render(self),
            Mode::Timeline => timeline::render(self),
            Mode::Errors => errors::render(self),
            Mode::Combat => combat::render(self),
            Mode::Resources => resources::render(self),
            Mode::Json => json::render(self.pipeline)?,
        };
        Ok(text)
    }

    /// Section heading followed by a dimmed rule.
    fn heading(&self, out: &mut Vec<String>, title: &str, width: usize) {
        out.push(self.palette.bold(title));
        out.push(self.palette.dim("-".repeat(width)));
    }
}

/// `H:MM:SS`, fractional seconds dropped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{}{}:{:02}:{:02}", sign, total / 3600, (total % 3600) / 60, total % 60)
}

/// Wall-clock time of day, or `???` when unknown.
pub fn clock(timestamp: Option<NaiveDateTime>) -> String {
    timestamp.map_or_else(|| "???".to_string(), |ts| ts.format("%H:%M:%S").to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alaslog_engine::{parse, PipelineOptions};
    use chrono::NaiveDate;

    /// Finalized pipeline over `input`.
    pub(crate) fn fixture(input: &str, options: PipelineOptions) -> Pipeline {
        let mut pipeline = Pipeline::with_options(options);
        pipeline.feed_all(parse(input.lines())).unwrap();
        pipeline.finalize().unwrap();
        pipeline
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration(Duration::milliseconds(65_900)), "0:01:05");
        assert_eq!(format_duration(Duration::seconds(26 * 3600 + 7)), "26:00:07");
        assert_eq!(format_duration(Duration::seconds(-90)), "-0:01:30");
    }

    #[test]
    fn test_clock() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 25)
            .unwrap()
            .and_hms_milli_opt(9, 5, 3, 250)
            .unwrap();
        assert_eq!(clock(Some(ts)), "09:05:03");
        assert_eq!(clock(None), "???");
    }
}
