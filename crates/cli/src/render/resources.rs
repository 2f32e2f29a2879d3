use std::collections::BTreeMap;

use alaslog_engine::analyzers::Reading;

use super::{clock, View};

const WIDTH: usize = 80;

pub fn render(view: &View<'_>) -> String {
    let p = &view.palette;
    let readings = view.pipeline.resources().readings();
    let mut out = Vec::new();

    view.heading(&mut out, "RESOURCE TRACKING", WIDTH);
    out.push(String::new());

    if readings.is_empty() {
        out.push(p.dim("No resource data found"));
        return out.join("\n");
    }

    let mut by_resource: BTreeMap<&str, Vec<&Reading>> = BTreeMap::new();
    for reading in readings {
        by_resource.entry(&reading.resource).or_default().push(reading);
    }

    for (resource, group) in by_resource {
        out.push(p.cyan(resource));
        for reading in group.iter().take(view.display.resource_limit) {
            out.push(format!("  {} | {}", p.dim(clock(reading.timestamp)), reading.value));
        }
        out.push(String::new());
    }

    out.join("\n")
}
