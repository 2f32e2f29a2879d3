use super::{format_duration, View};

const WIDTH: usize = 80;

pub fn render(view: &View<'_>) -> String {
    let p = &view.palette;
    let mut out = Vec::new();
    view.heading(&mut out, "TASK TIMELINE", WIDTH);
    out.push(String::new());

    for task in view.pipeline.tasks().tasks() {
        let start = task
            .start_time
            .map_or_else(|| "??:??:??".to_string(), |t| t.format("%H:%M:%S").to_string());
        let end = task
            .end_time
            .map_or_else(|| "ongoing".to_string(), |t| t.format("%H:%M:%S").to_string());
        let duration = task
            .duration()
            .map_or_else(|| "???".to_string(), format_duration);
        let status = if task.success {
            p.green("[OK]")
        } else {
            p.red("[FAIL]")
        };

        let mut line = format!(
            "{} -> {:8} [{:>8}] {} {}",
            p.dim(start),
            end,
            duration,
            status,
            p.cyan(&task.name)
        );
        if let (false, Some(error)) = (task.success, &task.error_type) {
            line.push_str(&p.red(format!(" ({error})")));
        }
        out.push(line);
    }

    out.join("\n")
}
