mod args;
mod config;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use alaslog_engine::Pipeline;

use crate::{
    args::Args,
    config::{AppConfig, LogFormat, LogOutput},
    input::Source,
    render::View,
};

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    // Phase 1: Basic tracing so we can log during config loading
    // Uses set_default (thread-local) so it can be replaced by Phase 2's global subscriber
    let basic_tracing = init_tracing_basic();

    let mut config = AppConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply(&mut config.display);
    config.validate()
        .context("Configuration validation failed")?;

    // Phase 2: Re-initialize tracing with config (format, level)
    drop(basic_tracing);
    init_tracing_from_config(&config)?;

    debug!(config = ?config, "configuration loaded");

    let source = if args.latest {
        let latest = input::find_latest(&config.input.log_dir, &config.input.file_suffix)
            .context("Could not find latest log file")?;
        info!(path = %latest.display(), "using latest log");
        Source::Files(vec![latest])
    } else {
        match args.input_files() {
            files if files.is_empty() => Source::Stdin,
            files => Source::Files(files),
        }
    };

    let mut pipeline = Pipeline::with_options(config.display.pipeline_options());
    input::feed_source(&mut pipeline, &source, args.tail)?;
    pipeline.finalize()?;

    info!(records = pipeline.total_records(), "analysis complete");

    let view = View::new(&pipeline, &config.display);
    let mut reports = Vec::new();
    for mode in args.modes() {
        reports.push(view.render(mode)?);
    }
    println!("{}", reports.join("\n\n\n"));

    Ok(())
}

/// Phase 1: Initialize basic tracing with hardcoded defaults.
/// Returns a guard that must be dropped before Phase 2 init.
fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: Re-initialize tracing with configuration values.
fn init_tracing_from_config(config: &AppConfig) -> Result<()> {
    use std::sync::Arc;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Prefer RUST_LOG env var, fall back to config level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match (&config.logging.format, &config.logging.output) {
        (LogFormat::Json, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Json, LogOutput::File { path }) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        (LogFormat::Pretty, LogOutput::File { path }) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
    Ok(())
}

fn open_log_file(path: &str) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path))
}
