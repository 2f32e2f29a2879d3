//! Summary view — the default one-screen report.

use chrono::Duration;

use super::{format_duration, View};

const WIDTH: usize = 60;
const TOP_EXCEPTIONS: usize = 5;
const TOP_MISMATCHES: usize = 5;

pub fn render(view: &View<'_>) -> String {
    let p = &view.palette;
    let pipeline = view.pipeline;
    let mut out = Vec::new();

    let bar = "=".repeat(WIDTH);
    out.push(p.bold(&bar));
    out.push(p.bold("ALAS LOG SUMMARY"));
    out.push(p.bold(&bar));
    out.push(String::new());

    // Session
    if let (Some(start), Some(end)) = (pipeline.start_time(), pipeline.end_time()) {
        out.push(format!(
            "Session: {} to {}",
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%H:%M:%S")
        ));
        out.push(format!("Duration: {}", p.green(format_duration(end - start))));
    }
    out.push(format!("Total records: {}", p.cyan(pipeline.total_records())));
    out.push(String::new());

    tasks(view, &mut out);

    let options = pipeline.options();
    let reasons = pipeline.skips().reasons();
    if options.reasons && !reasons.is_empty() {
        view.heading(&mut out, "Skip Reasons", WIDTH);
        for (reason, count) in reasons.most_common(reasons.len()) {
            out.push(format!("  {} x{}", p.yellow(format!("{reason:40}")), count));
        }
        out.push(String::new());
    }

    let items = pipeline.loot().items();
    if options.loot && !items.is_empty() {
        let limit = view.display.loot_limit;
        view.heading(&mut out, "Loot Acquired", WIDTH);
        for (item, count) in items.most_common(limit) {
            out.push(format!("  {item:40} x{count}"));
        }
        if items.len() > limit {
            out.push(p.dim(format!("  ... and {} more", items.len() - limit)));
        }
        out.push(String::new());
    }

    errors(view, &mut out);
    combat(view, &mut out);
    merchant(view, &mut out);
    device(view, &mut out);

    out.join("\n")
}

fn tasks(view: &View<'_>, out: &mut Vec<String>) {
    let p = &view.palette;
    let analyzer = view.pipeline.tasks();
    view.heading(out, "Tasks", WIDTH);

    if analyzer.tasks().is_empty() {
        out.push(p.dim("  No tasks found"));
        out.push(String::new());
        return;
    }

    let counts = analyzer.counts();
    for (name, count) in counts.most_common(counts.len()) {
        let runs: Vec<_> = analyzer.tasks().iter().filter(|t| &t.name == name).collect();
        let durations: Vec<Duration> = runs.iter().filter_map(|t| t.duration()).collect();
        let failed = runs.iter().filter(|t| !t.success).count();

        let status = if failed > 0 {
            p.red(format!("{:15}", format!("({failed} failed)")))
        } else {
            p.green(format!("{:15}", "[OK]"))
        };
        let average = if durations.is_empty() {
            "incomplete".to_string()
        } else {
            let total = durations.iter().fold(Duration::zero(), |acc, d| acc + *d);
            format!("avg {}", format_duration(total / durations.len() as i32))
        };
        out.push(format!("  {} x{:2} {} {}", p.cyan(format!("{name:28}")), count, status, average));
    }
    out.push(String::new());
}

fn errors(view: &View<'_>, out: &mut Vec<String>) {
    let p = &view.palette;
    let analyzer = view.pipeline.errors();
    view.heading(out, "Errors & Warnings", WIDTH);
    out.push(format!("  Critical: {}", p.alarm(analyzer.criticals().len())));
    out.push(format!("  Errors:   {}", p.red(analyzer.errors().len())));
    out.push(format!("  Warnings: {}", p.yellow(analyzer.warnings().len())));

    if !analyzer.exceptions().is_empty() {
        out.push(String::new());
        out.push("  Exception types:".to_string());
        for (name, count) in analyzer.exceptions().most_common(TOP_EXCEPTIONS) {
            out.push(format!("    {} x{}", p.red(format!("{name:30}")), count));
        }
    }
    out.push(String::new());
}

fn combat(view: &View<'_>, out: &mut Vec<String>) {
    let p = &view.palette;
    let analyzer = view.pipeline.combat();
    if analyzer.fights().is_empty() {
        return;
    }
    let stats = analyzer.stats();
    view.heading(out, "Combat (Exercise)", WIDTH);
    out.push(format!("  Fights:  {}", stats.total));
    out.push(format!("  Wins:    {}", p.green(stats.wins)));
    out.push(format!("  Losses:  {}", p.red(stats.losses)));
    if stats.crashes > 0 {
        out.push(format!("  Crashes: {}", p.alarm(stats.crashes)));
    }
    if let Some(rate) = stats.win_rate {
        out.push(format!("  Winrate: {}", p.cyan(format!("{rate:.1}%"))));
    }
    out.push(String::new());
}

fn merchant(view: &View<'_>, out: &mut Vec<String>) {
    let p = &view.palette;
    let analyzer = view.pipeline.merchant();
    if analyzer.is_empty() {
        return;
    }
    view.heading(out, "Akashi (Merchant)", WIDTH);
    out.push(format!("  Discoveries: {}", p.green(analyzer.discoveries().len())));
    out.push(format!("  Purchases:   {}", p.cyan(analyzer.purchases().len())));

    if !analyzer.mismatches().is_empty() {
        out.push(String::new());
        out.push(p.yellow("  Recognition noise (channel mismatches):"));
        for (template, count) in analyzer.mismatches().most_common(TOP_MISMATCHES) {
            let sim = analyzer.max_similarity(template).unwrap_or(0.0);
            out.push(format!("    {template:30} x{count:4} (max sim: {sim:.3})"));
        }
    }
    out.push(String::new());
}

fn device(view: &View<'_>, out: &mut Vec<String>) {
    let p = &view.palette;
    let analyzer = view.pipeline.device();
    if !analyzer.has_issues() {
        return;
    }
    view.heading(out, "Device Issues", WIDTH);
    out.push(format!("  ADB timeouts:      {}", p.yellow(analyzer.adb_timeouts())));
    out.push(format!(
        "  Connection errors: {}",
        p.yellow(analyzer.connection_errors().len())
    ));
    out.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::render::{tests::fixture, Palette};
    use alaslog_engine::PipelineOptions;

    const LOG: &str = concat!(
        "2026-01-25 12:00:00.000 | INFO | Scheduler: Start task `Commission`\n",
        "2026-01-25 12:05:00.000 | INFO | Scheduler: Start task `Exercise`\n",
        "2026-01-25 12:05:10.000 | INFO | <<< OPPONENT: 1 >>>\n",
        "2026-01-25 12:06:00.000 | INFO | [100% - 0%]\n",
        "2026-01-25 12:06:01.000 | INFO | <<< COMBAT END >>>\n",
        "2026-01-25 12:07:00.000 | ERROR | GameStuckError: Wait too long\n",
        "2026-01-25 12:08:00.000 | INFO | Get 3x Gold Plate\n",
        "2026-01-25 12:09:00.000 | INFO | Skip task Exercise (Reason: No tickets)\n",
        "2026-01-25 12:10:00.000 | INFO | Scheduler: Start task `Commission`\n",
    );

    #[test]
    fn test_summary_sections() {
        let pipeline = fixture(LOG, PipelineOptions::default());
        let display = DisplayConfig::default();
        let text = render(&View {
            pipeline: &pipeline,
            display: &display,
            palette: Palette::new(false),
        });

        assert!(text.contains("Session: 2026-01-25 12:00:00 to 12:10:00"));
        assert!(text.contains("Duration: 0:10:00"));
        assert!(text.contains("Total records: 9"));
        assert!(text.contains("Commission"));
        assert!(text.contains("(1 failed)"));
        assert!(text.contains("GameStuckError"));
        assert!(text.contains("Winrate: 100.0%"));
        // toggled sections stay hidden by default
        assert!(!text.contains("Loot Acquired"));
        assert!(!text.contains("Skip Reasons"));
        assert!(!text.contains("Device Issues"));
    }

    #[test]
    fn test_summary_optional_sections() {
        let options = PipelineOptions {
            trace: false,
            loot: true,
            reasons: true,
        };
        let pipeline = fixture(LOG, options);
        let display = DisplayConfig::default();
        let text = render(&View {
            pipeline: &pipeline,
            display: &display,
            palette: Palette::new(false),
        });
        assert!(text.contains("Loot Acquired"));
        assert!(text.contains("Get 3x Gold Plate"));
        assert!(text.contains("Skip Reasons"));
        assert!(text.contains("No tickets"));
    }

    #[test]
    fn test_summary_of_empty_input() {
        let pipeline = fixture("", PipelineOptions::default());
        let display = DisplayConfig::default();
        let text = render(&View::new(&pipeline, &display));
        assert!(text.contains("No tasks found"));
        assert!(!text.contains("Session:"));
    }
}
