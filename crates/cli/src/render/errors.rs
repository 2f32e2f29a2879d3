use alaslog_engine::LogRecord;

use super::{clock, View};

const WIDTH: usize = 80;

pub fn render(view: &View<'_>) -> String {
    let p = &view.palette;
    let analyzer = view.pipeline.errors();
    let display = view.display;
    let mut out = Vec::new();

    view.heading(&mut out, "ERRORS & WARNINGS", WIDTH);
    out.push(String::new());

    let groups = [
        (p.alarm("CRITICAL"), analyzer.criticals(), display.critical_limit),
        (p.red("ERRORS"), analyzer.errors(), display.error_limit),
        (p.yellow("WARNINGS"), analyzer.warnings(), display.warning_limit),
    ];
    for (title, records, limit) in groups {
        if records.is_empty() {
            continue;
        }
        out.push(title);
        out.extend(records.iter().take(limit).map(|r| entry(view, r)));
        if records.len() > limit {
            out.push(p.dim(format!("  ... and {} more", records.len() - limit)));
        }
        out.push(String::new());
    }

    let exceptions = analyzer.exceptions();
    if !exceptions.is_empty() {
        out.push(p.bold("Exception Summary"));
        for (name, count) in exceptions.most_common(exceptions.len()) {
            out.push(format!("  {} x{}", p.red(format!("{name:40}")), count));
        }
        out.push(String::new());
    }

    if !analyzer.error_saves().is_empty() {
        out.push(p.bold("Error Saves"));
        out.extend(analyzer.error_saves().iter().map(|path| format!("  {path}")));
        out.push(String::new());
    }

    out.join("\n")
}

fn entry(view: &View<'_>, record: &LogRecord) -> String {
    let message = if view.pipeline.options().trace {
        record.full_message()
    } else {
        record.message.clone()
    };
    format!("  {} | {}", view.palette.dim(clock(record.timestamp)), message)
}
