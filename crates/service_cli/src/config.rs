//! Run configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! CLI arguments.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use process_core::ModelSpec;
use process_kernel::SafeMath;
use process_runner::{SimulationConfig, TemplateMode};
use serde::Deserialize;
use thiserror::Error;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "PROCSIM_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json, csv")]
    InvalidFormat(String),

    #[error("Invalid template mode: {0}. Must be one of: shared, per-realization")]
    InvalidTemplateMode(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

fn parse_template_mode(s: &str) -> Result<TemplateMode, ConfigError> {
    match s.to_lowercase().as_str() {
        "shared" => Ok(TemplateMode::Shared),
        "per-realization" | "per_realization" => Ok(TemplateMode::PerRealization),
        _ => Err(ConfigError::InvalidTemplateMode(s.to_string())),
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Run configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Process model
    pub model: ModelSpec,
    /// Number of realizations `N`
    pub realizations: usize,
    /// Worker threads (defaults to the number of logical CPUs)
    pub parallelism: Option<usize>,
    /// Clamp negative conditional variances to zero
    pub safe_math: bool,
    /// Template sharing mode
    pub template_mode: TemplateMode,
    /// Base seed (random when absent)
    pub seed: Option<u64>,
    /// Generation budget in milliseconds
    pub timeout_ms: Option<u64>,
    /// Realizations included in the output
    pub display_count: usize,
    /// Log level
    pub log_level: LogLevel,
    /// Output format
    pub format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: ModelSpec::default(),
            realizations: 100_000,
            parallelism: None,
            safe_math: true,
            template_mode: TemplateMode::Shared,
            seed: None,
            timeout_ms: None,
            display_count: process_runner::config::DEFAULT_DISPLAY_COUNT,
            log_level: LogLevel::Info,
            format: OutputFormat::Table,
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `PROCSIM_*` overrides, reading variables through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("REALIZATIONS") {
            self.realizations = parse_value("PROCSIM_REALIZATIONS", &v)?;
        }
        if let Some(v) = var("PARALLELISM") {
            self.parallelism = Some(parse_value("PROCSIM_PARALLELISM", &v)?);
        }
        if let Some(v) = var("SAFE_MATH") {
            self.safe_math = parse_value("PROCSIM_SAFE_MATH", &v.to_lowercase())?;
        }
        if let Some(v) = var("TEMPLATE_MODE") {
            self.template_mode = parse_template_mode(&v)?;
        }
        if let Some(v) = var("SEED") {
            self.seed = Some(parse_value("PROCSIM_SEED", &v)?);
        }
        if let Some(v) = var("TIMEOUT_MS") {
            self.timeout_ms = Some(parse_value("PROCSIM_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = var("DISPLAY_COUNT") {
            self.display_count = parse_value("PROCSIM_DISPLAY_COUNT", &v)?;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&v)?;
        }
        if let Some(v) = var("FORMAT") {
            self.format = OutputFormat::from_str(&v)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(realizations) = cli.realizations {
            self.realizations = realizations;
        }
        if let Some(parallelism) = cli.parallelism {
            self.parallelism = Some(parallelism);
        }
        if cli.unsafe_math {
            self.safe_math = false;
        }
        if cli.per_realization {
            self.template_mode = TemplateMode::PerRealization;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = Some(timeout_ms);
        }
        if let Some(count) = cli.display_count {
            self.display_count = count;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(format) = &cli.format {
            self.format = OutputFormat::from_str(format)?;
        }
        Ok(())
    }

    /// Numerical policy selected by `safe_math`
    pub fn safe_math_policy(&self) -> SafeMath {
        SafeMath::from(self.safe_math)
    }

    /// Convert into the runner's validated configuration
    pub fn simulation_config(&self) -> Result<SimulationConfig, process_runner::ConfigError> {
        let mut builder = SimulationConfig::builder()
            .n_realizations(self.realizations)
            .safe_math(self.safe_math_policy())
            .template_mode(self.template_mode)
            .timeout(self.timeout_ms.map(Duration::from_millis))
            .display_count(self.display_count);

        if let Some(parallelism) = self.parallelism {
            builder = builder.parallelism(parallelism);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Realization count override
    pub realizations: Option<usize>,
    /// Worker count override
    pub parallelism: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Disable variance clamping
    pub unsafe_math: bool,
    /// Build one template per realization
    pub per_realization: bool,
    /// Timeout override in milliseconds
    pub timeout_ms: Option<u64>,
    /// Display count override
    pub display_count: Option<usize>,
    /// Log level override
    pub log_level: Option<String>,
    /// Output format override
    pub format: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<RunConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<RunConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if let Some(config_path) = &cli.config_file {
        RunConfig::from_file(config_path)?
    } else {
        RunConfig::default()
    };

    config.apply_env_from(lookup)?;
    config.merge_with_cli(cli)?;

    Ok(config)
}
