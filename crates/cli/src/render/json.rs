//! JSON view — a stable digest of the pass for scripts and dashboards.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use alaslog_engine::{FrequencyMap, Pipeline};

#[derive(Debug, Serialize)]
struct Report<'a> {
    session: Session,
    tasks: Vec<Task<'a>>,
    errors: Errors<'a>,
    combat: Combat,
    device: Device,
}

#[derive(Debug, Serialize)]
struct Session {
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    total_records: u64,
}

#[derive(Debug, Serialize)]
struct Task<'a> {
    name: &'a str,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    duration_seconds: Option<f64>,
    success: bool,
    error_type: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Errors<'a> {
    critical_count: usize,
    error_count: usize,
    warning_count: usize,
    exception_types: &'a FrequencyMap<String>,
}

#[derive(Debug, Serialize)]
struct Combat {
    total_fights: usize,
    wins: usize,
    losses: usize,
    crashes: usize,
}

#[derive(Debug, Serialize)]
struct Device {
    adb_timeouts: u64,
    connection_errors: usize,
}

pub fn render(pipeline: &Pipeline) -> Result<String> {
    let errors = pipeline.errors();
    let stats = pipeline.combat().stats();
    let device = pipeline.device();

    let report = Report {
        session: Session {
            start_time: pipeline.start_time(),
            end_time: pipeline.end_time(),
            total_records: pipeline.total_records(),
        },
        tasks: pipeline
            .tasks()
            .tasks()
            .iter()
            .map(|task| Task {
                name: &task.name,
                start_time: task.start_time,
                end_time: task.end_time,
                duration_seconds: task
                    .duration()
                    .map(|d| d.num_milliseconds() as f64 / 1000.0),
                success: task.success,
                error_type: task.error_type.as_deref(),
            })
            .collect(),
        errors: Errors {
            critical_count: errors.criticals().len(),
            error_count: errors.errors().len(),
            warning_count: errors.warnings().len(),
            exception_types: errors.exceptions(),
        },
        combat: Combat {
            total_fights: stats.total,
            wins: stats.wins,
            losses: stats.losses,
            crashes: stats.crashes,
        },
        device: Device {
            adb_timeouts: device.adb_timeouts(),
            connection_errors: device.connection_errors().len(),
        },
    };

    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::fixture;
    use alaslog_engine::PipelineOptions;

    #[test]
    fn test_json_report_shape() {
        let pipeline = fixture(
            concat!(
                "2026-01-25 12:00:00.000 | INFO | Scheduler: Start task `Commission`\n",
                "2026-01-25 12:00:01.500 | ERROR | GameStuckError: Wait too long\n",
                "2026-01-25 12:00:02.000 | WARNING | adb timeout\n",
            ),
            PipelineOptions::default(),
        );
        let text = render(&pipeline).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["session"]["total_records"], 3);
        assert_eq!(value["session"]["start_time"], "2026-01-25T12:00:00");
        assert_eq!(value["tasks"][0]["name"], "Commission");
        assert_eq!(value["tasks"][0]["success"], false);
        assert_eq!(value["tasks"][0]["error_type"], "GameStuckError");
        assert_eq!(value["tasks"][0]["duration_seconds"], 2.0);
        assert_eq!(value["errors"]["error_count"], 1);
        assert_eq!(value["errors"]["exception_types"]["GameStuckError"], 1);
        assert_eq!(value["combat"]["total_fights"], 0);
        assert_eq!(value["device"]["adb_timeouts"], 1);
        assert_eq!(value["device"]["connection_errors"], 1);
    }

    #[test]
    fn test_json_empty_session() {
        let pipeline = fixture("", PipelineOptions::default());
        let value: serde_json::Value = serde_json::from_str(&render(&pipeline).unwrap()).unwrap();
        assert!(value["session"]["start_time"].is_null());
        assert_eq!(value["tasks"].as_array().map(Vec::len), Some(0));
    }
}
