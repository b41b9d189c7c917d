//! Command-line interface for tracesan.
//!
//! Provides commands for sanitizing extraction traces, running the
//! built-in demo trace, counting missing fields in a persisted report,
//! and showing the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::config::{self, ReportFormat};
use crate::evidence::{
    format_sanitize_report, missing_field_count, read_json_file, unwrap_envelope, SanitizeOutput,
    SanitizeReport, Sanitizer,
};

pub mod demo;

/// tracesan - Evidence sanitizer for extraction traces
#[derive(Parser, Debug)]
#[command(name = "tracesan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitize an extraction trace and print the report
    Sanitize {
        /// Trace JSON file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Maximum preview length in characters (at least 3)
        #[arg(long, value_parser = parse_preview_limit)]
        preview_limit: Option<usize>,
    },

    /// Sanitize a built-in demo trace covering every reason code
    Demo {
        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Count fields with missing evidence in a persisted sanitize report
    Missing {
        /// Sanitize report JSON (44_sanitize_reasons.json)
        #[arg(short, long)]
        report: PathBuf,

        /// Final trace JSON (43_trace_final.json)
        #[arg(short = 't', long)]
        final_trace: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Output format for CLI (maps to ReportFormat)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Human-readable report
    Text,

    /// Sanitized trace and report as JSON
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sanitize {
                input,
                format,
                preview_limit,
            } => sanitize_trace(input, format, preview_limit).await,
            Commands::Demo { format } => run_demo(format),
            Commands::Missing {
                report,
                final_trace,
            } => count_missing(&report, final_trace.as_deref()).await,
            Commands::Config => show_config(),
        }
    }
}

/// Parse `--preview-limit`, rejecting caps that cannot hold `...`
fn parse_preview_limit(raw: &str) -> Result<usize, String> {
    let limit: usize = raw
        .parse()
        .map_err(|e| format!("not a character count: {}", e))?;
    config::check_preview_limit(limit).map_err(|e| e.to_string())?;
    Ok(limit)
}

/// Sanitize a trace read from a file or stdin
async fn sanitize_trace(
    input_file: Option<PathBuf>,
    format: Option<FormatArg>,
    preview_limit: Option<usize>,
) -> Result<()> {
    let cfg = config::config()?;

    let input = if let Some(path) = input_file {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read from stdin")?;
        buffer
    };

    if input.trim().is_empty() {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    }

    let raw: Value = serde_json::from_str(&input).context("Input is not valid JSON")?;

    let sanitizer = Sanitizer::new(preview_limit.unwrap_or(cfg.preview_limit));
    let format = format.map(ReportFormat::from).unwrap_or(cfg.format);

    emit(&sanitizer, unwrap_envelope(&raw), format)
}

/// Sanitize the built-in demo trace
fn run_demo(format: Option<FormatArg>) -> Result<()> {
    let cfg = config::config()?;
    let format = format.map(ReportFormat::from).unwrap_or(cfg.format);

    if format == ReportFormat::Text {
        println!("Sanitize report (demo):");
        println!("-----------------------");
    }

    emit(&Sanitizer::new(cfg.preview_limit), &demo::demo_trace(), format)
}

/// Run the sanitizer and print its output in the requested format
fn emit(sanitizer: &Sanitizer, trace: &Value, format: ReportFormat) -> Result<()> {
    let (sanitized_trace, sanitize_report) = sanitizer.sanitize(trace);

    info!(
        fields = sanitize_report.per_field.len(),
        invalid = sanitize_report.invalid_evidence_count,
        fixed = sanitize_report.fixed_offset_count,
        "Trace sanitized"
    );

    match format {
        ReportFormat::Text => println!("{}", format_sanitize_report(&sanitize_report)),
        ReportFormat::Json => {
            let output = SanitizeOutput {
                sanitized_trace,
                sanitize_report,
            };
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Print the missing-field count for a persisted report
async fn count_missing(report_path: &Path, final_trace: Option<&Path>) -> Result<()> {
    let report_json = read_json_file(report_path).await?;
    let report: SanitizeReport = serde_json::from_value(report_json)
        .with_context(|| format!("Not a sanitize report: {}", report_path.display()))?;

    let final_claims = match final_trace {
        Some(path) => {
            let trace = read_json_file(path).await?;
            unwrap_envelope(&trace)
                .get("perField")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        }
        None => Vec::new(),
    };

    let missing = missing_field_count(&report, &final_claims);
    info!(
        report = %report_path.display(),
        fields = report.per_field.len(),
        missing,
        "Counted missing fields"
    );
    println!("{}", missing);

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("tracesan configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Sanitize:");
    println!("  Preview limit: {} chars", cfg.preview_limit);
    println!();
    println!("Output:");
    println!("  Format: {}", cfg.format);
    println!();
    println!("Environment overrides:");
    println!("  {}, {}", config::ENV_PREVIEW_LIMIT, config::ENV_FORMAT);

    Ok(())
}
