use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::processor::{DateRange, parse_date};

pub const DEFAULT_CONFIG_PATH: &str = "match_stats.toml";
pub const DEFAULT_INPUT_PATH: &str = "matches.json";
pub const CONFIG_PATH_VAR: &str = "MATCH_STATS_CONFIG";
pub const INPUT_PATH_VAR: &str = "MATCH_STATS_INPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfigFile {
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub filter: FilterSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Calendar days as `YYYY-MM-DD`, both inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSection {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Resolved settings for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub format: OutputFormat,
    pub log_level: String,
    pub date_range: DateRange,
    /// The config file these settings came from, if any.
    pub config_file: Option<PathBuf>,
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config_file: ReportConfigFile = toml::from_str(content)?;
        Self::from_sections(config_file)
    }

    fn from_sections(file: ReportConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let from = file.filter.from.as_deref().map(parse_date).transpose()?;
        let to = file.filter.to.as_deref().map(parse_date).transpose()?;

        Ok(Self {
            input_path: file.input.path.map(PathBuf::from).unwrap_or(defaults.input_path),
            format: file.output.format.unwrap_or(defaults.format),
            log_level: file.logging.level.unwrap_or(defaults.log_level),
            date_range: DateRange::new(from, to),
            config_file: None,
        })
    }

    /// Loads the config file named by `MATCH_STATS_CONFIG` (or the default
    /// location) and applies environment overrides. A missing file means
    /// defaults; a file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        let config_path = env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var(INPUT_PATH_VAR) {
            if !path.trim().is_empty() {
                self.input_path = PathBuf::from(path);
            }
        }
    }

    /// Applies command-line overrides: `[PATH] [--json] [--from DATE] [--to DATE]`.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" | "-j" => self.format = OutputFormat::Json,
                "--from" | "--to" => {
                    let value = args
                        .next()
                        .with_context(|| format!("{} needs a date (YYYY-MM-DD)", arg))?;
                    self.set_bound(arg, value)?;
                }
                flag if flag.starts_with("--from=") || flag.starts_with("--to=") => {
                    if let Some((name, value)) = flag.split_once('=') {
                        self.set_bound(name, value)?;
                    }
                }
                flag if flag.starts_with('-') => {
                    anyhow::bail!("Unknown option: {}", flag);
                }
                path => self.input_path = PathBuf::from(path),
            }
        }
        Ok(())
    }

    fn set_bound(&mut self, flag: &str, value: &str) -> Result<()> {
        let date = parse_date(value)?;
        if flag == "--from" {
            self.date_range.from = Some(date);
        } else {
            self.date_range.to = Some(date);
        }
        Ok(())
    }

    /// Logs where the settings came from. Call once logging is up.
    pub fn log_source(&self) {
        match &self.config_file {
            Some(path) => info!("Using config file {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
            date_range: DateRange::default(),
            config_file: None,
        }
    }
}
