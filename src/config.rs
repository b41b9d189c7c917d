//! Configuration for tracesan.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TRACESAN_PREVIEW_LIMIT, TRACESAN_FORMAT)
//! 2. Config file (.tracesan/config.yaml)
//! 3. Defaults (120-character previews, text output)
//!
//! Config file discovery:
//! - Searches current directory and parents for .tracesan/config.yaml
//! - Falls back to ~/.tracesan/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::evidence::{MIN_PREVIEW_LIMIT, PREVIEW_LIMIT};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_PREVIEW_LIMIT: &str = "TRACESAN_PREVIEW_LIMIT";
pub const ENV_FORMAT: &str = "TRACESAN_FORMAT";

const CONFIG_DIR: &str = ".tracesan";
const CONFIG_FILE: &str = "config.yaml";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub sanitize: Option<SanitizeConfig>,
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanitizeConfig {
    /// Maximum preview length in characters
    pub preview_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: Option<ReportFormat>,
}

/// How the CLI prints sanitizer results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable report
    #[default]
    Text,
    /// `{"sanitizedTrace": ..., "sanitizeReport": ...}`
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => anyhow::bail!("Unknown report format: {}", s),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Preview cap applied to turn text, snippet and value previews
    pub preview_limit: usize,
    /// Default CLI output format
    pub format: ReportFormat,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            preview_limit: PREVIEW_LIMIT,
            format: ReportFormat::Text,
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve settings from an optional config file and an env lookup
fn resolve(
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let defaults = ResolvedConfig::default();

    let file = config_file.as_deref().map(load_config_file).transpose()?;

    let preview_limit = match env(ENV_PREVIEW_LIMIT) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid {}: {}", ENV_PREVIEW_LIMIT, raw))?,
        None => file
            .as_ref()
            .and_then(|f| f.sanitize.as_ref())
            .and_then(|s| s.preview_limit)
            .unwrap_or(defaults.preview_limit),
    };
    check_preview_limit(preview_limit)?;

    let format = match env(ENV_FORMAT) {
        Some(raw) => raw
            .parse::<ReportFormat>()
            .with_context(|| format!("Invalid {}", ENV_FORMAT))?,
        None => file
            .as_ref()
            .and_then(|f| f.output.as_ref())
            .and_then(|o| o.format)
            .unwrap_or(defaults.format),
    };

    Ok(ResolvedConfig {
        preview_limit,
        format,
        config_file,
    })
}

/// Reject caps too small to hold the `...` truncation marker
pub fn check_preview_limit(limit: usize) -> Result<()> {
    if limit < MIN_PREVIEW_LIMIT {
        anyhow::bail!(
            "Preview limit must be at least {} characters, got {}",
            MIN_PREVIEW_LIMIT,
            limit
        );
    }
    Ok(())
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve(find_config_file(), |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
