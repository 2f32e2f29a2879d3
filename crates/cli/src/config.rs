use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use alaslog_engine::PipelineOptions;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// stdout carries the report, so logs never go there.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    File { path: String },
}

/// Where `--latest` looks for logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub log_dir: PathBuf,
    /// File name suffix of agent logs (`2026-01-25_alas.txt`)
    pub file_suffix: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("log"),
            file_suffix: "_alas.txt".to_string(),
        }
    }
}

/// Report defaults; command-line switches override these.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub trace: bool,
    pub loot: bool,
    pub reasons: bool,
    pub loot_limit: usize,
    pub error_limit: usize,
    pub warning_limit: usize,
    pub critical_limit: usize,
    pub resource_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            trace: false,
            loot: false,
            reasons: false,
            loot_limit: 20,
            error_limit: 20,
            warning_limit: 20,
            critical_limit: 10,
            resource_limit: 10,
        }
    }
}

impl DisplayConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            trace: self.trace,
            loot: self.loot,
            reasons: self.reasons,
        }
    }
}

impl AppConfig {
    /// Load configuration from alaslog.toml and environment variables
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = config::Config::try_from(&AppConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        // 1. /etc/alaslog/alaslog.toml (system-wide)
        // 2. config/alaslog.toml (current directory)
        // 3. crates/cli/config/alaslog.toml (workspace root)
        // 4. --config PATH, which must exist
        let config_paths = ["/etc/alaslog/alaslog", "config/alaslog", "crates/cli/config/alaslog"];
        for path in config_paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // ALASLOG_LOGGING__LEVEL=debug
        builder = builder.add_source(
            config::Environment::with_prefix("ALASLOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        if let LogOutput::File { path } = &self.logging.output {
            if path.trim().is_empty() {
                bail!("logging.output.file.path must not be empty");
            }
        }
        if self.input.file_suffix.is_empty() {
            bail!("input.file_suffix must not be empty");
        }

        let limits = [
            ("display.loot_limit", self.display.loot_limit),
            ("display.error_limit", self.display.error_limit),
            ("display.warning_limit", self.display.warning_limit),
            ("display.critical_limit", self.display.critical_limit),
            ("display.resource_limit", self.display.resource_limit),
        ];
        for (key, value) in limits {
            if value == 0 {
                bail!("{} must be greater than zero", key);
            }
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: LogFormat::Pretty,
                output: LogOutput::Stderr,
            },
            input: InputConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
