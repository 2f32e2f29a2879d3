use alaslog_engine::analyzers::FightOutcome;

use super::{clock, View};

const WIDTH: usize = 80;

pub fn render(view: &View<'_>) -> String {
    let p = &view.palette;
    let analyzer = view.pipeline.combat();
    let mut out = Vec::new();

    view.heading(&mut out, "COMBAT STATISTICS", WIDTH);
    out.push(String::new());

    if analyzer.fights().is_empty() {
        out.push(p.dim("No combat data found"));
        return out.join("\n");
    }

    for fight in analyzer.fights() {
        let opponent = fight
            .opponent
            .map_or_else(|| "Unknown".to_string(), |n| format!("Opponent {n}"));
        let attempt = fight
            .try_number
            .map_or_else(String::new, |n| format!("Try {n}"));
        let result = match fight.outcome() {
            FightOutcome::Crash => p.alarm(format!("{:10}", "CRASH")),
            FightOutcome::Win => p.green(format!("{:10}", "WIN")),
            FightOutcome::Loss => p.red(format!("{:10}", "LOSS")),
            FightOutcome::Unknown => format!("{:10}", ""),
        };
        let hp = match (fight.hp_start, fight.hp_end) {
            (Some(start), Some(end)) => format!("[{start}% -> {end}%]"),
            _ => String::new(),
        };
        let line = format!(
            "{} | {:15} {:10} {} {}",
            p.dim(clock(fight.timestamp)),
            opponent,
            attempt,
            result,
            hp
        );
        out.push(line.trim_end().to_string());
    }

    let stats = analyzer.stats();
    out.push(String::new());
    out.push(format!(
        "Total: {} fights | Wins: {} | Losses: {} | Crashes: {}",
        stats.total,
        p.green(stats.wins),
        p.red(stats.losses),
        p.alarm(stats.crashes)
    ));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::render::{tests::fixture, Palette};
    use alaslog_engine::PipelineOptions;

    fn render_plain(input: &str) -> String {
        let pipeline = fixture(input, PipelineOptions::default());
        let display = DisplayConfig::default();
        render(&View {
            pipeline: &pipeline,
            display: &display,
            palette: Palette::new(false),
        })
    }

    #[test]
    fn test_fight_lines() {
        let text = render_plain(concat!(
            "2026-01-25 12:00:00.000 | INFO | <<< OPPONENT: 2 >>>\n",
            "2026-01-25 12:00:01.000 | INFO | <<< TRY: 1 >>>\n",
            "2026-01-25 12:01:00.000 | INFO | [100% - 0%]\n",
            "2026-01-25 12:01:01.000 | INFO | <<< COMBAT END >>>\n",
            "2026-01-25 12:02:00.000 | INFO | <<< OPPONENT: 3 >>>\n",
            "2026-01-25 12:02:30.000 | ERROR | GameStuckError: Wait too long\n",
        ));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[3],
            "12:00:00 | Opponent 2      Try 1      WIN        [100% -> 0%]"
        );
        assert_eq!(lines[4], "12:02:00 | Opponent 3                 CRASH");
        assert_eq!(lines[6], "Total: 2 fights | Wins: 1 | Losses: 1 | Crashes: 1");
    }

    #[test]
    fn test_no_fights() {
        let text = render_plain("2026-01-25 12:00:00.000 | INFO | idle\n");
        assert!(text.ends_with("No combat data found"));
    }
}
