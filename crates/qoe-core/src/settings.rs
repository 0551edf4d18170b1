use clap::Parser;
use std::path::PathBuf;

use crate::config::{PipelineConfig, DEFAULT_RESULTS_DIR};
use crate::error::{QoeError, Result};

/// Transitions longer than this are reported as long pauses.
pub const DEFAULT_LONG_PAUSE_MS: u64 = 10_000;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Statistical analysis of QoE session logs
///
/// Every flag has a default; running without arguments analyses
/// `results/participantes/*.json` and writes charts and CSVs under `results/`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "qoe-report",
    about = "Statistical analysis of QoE session logs",
    version
)]
pub struct Settings {
    /// Results directory holding `participantes/` and receiving the outputs
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Print the detailed report of a single participant and exit
    #[arg(long)]
    pub participant: Option<String>,

    /// Long-pause threshold for the single-participant report (milliseconds)
    #[arg(long, default_value_t = DEFAULT_LONG_PAUSE_MS)]
    pub long_pause_ms: u64,

    /// TrueType font used for chart text (system fonts are searched otherwise)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Logging level (written to stderr)
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Paths used by every pipeline stage.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::rooted_at(&self.results_dir)
    }

    /// Reject values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.participant {
            if id.trim().is_empty() {
                return Err(QoeError::Config(
                    "participant id must not be empty".to_string(),
                ));
            }
            if id.contains(['/', '\\']) || id == "." || id == ".." {
                return Err(QoeError::Config(format!(
                    "participant id must be a plain file stem, got {id:?}"
                )));
            }
        }
        Ok(())
    }

    /// Map the user-facing level name onto a `tracing` filter directive.
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.to_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut full = vec!["qoe-report"];
        full.extend_from_slice(args);
        Settings::try_parse_from(full).expect("valid arguments")
    }

    #[test]
    fn test_no_arguments_uses_defaults() {
        let settings = parse(&[]);
        assert_eq!(settings.results_dir, PathBuf::from("results"));
        assert!(settings.participant.is_none());
        assert_eq!(settings.long_pause_ms, DEFAULT_LONG_PAUSE_MS);
        assert!(settings.font.is_none());
        assert!(!settings.no_charts);
        assert_eq!(settings.log_level, "WARNING");
        assert_eq!(settings.pipeline_config(), PipelineConfig::default());
    }

    #[test]
    fn test_results_dir_relocates_pipeline_config() {
        let settings = parse(&["--results-dir", "/data/study"]);
        let config = settings.pipeline_config();
        assert_eq!(config.input_dir, PathBuf::from("/data/study/participantes"));
        assert_eq!(config.plots_dir, PathBuf::from("/data/study/plots"));
    }

    #[test]
    fn test_participant_and_threshold_flags() {
        let settings = parse(&["--participant", "P03", "--long-pause-ms", "2500"]);
        assert_eq!(settings.participant.as_deref(), Some("P03"));
        assert_eq!(settings.long_pause_ms, 2500);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let result = Settings::try_parse_from(["qoe-report", "--log-level", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_path_like_participant() {
        let settings = parse(&["--participant", "../P01"]);
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, QoeError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_blank_participant() {
        let settings = parse(&["--participant", "  "]);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_tracing_directive_mapping() {
        assert_eq!(parse(&["--log-level", "DEBUG"]).tracing_directive(), "debug");
        assert_eq!(parse(&["--log-level", "INFO"]).tracing_directive(), "info");
        assert_eq!(parse(&["--log-level", "WARNING"]).tracing_directive(), "warn");
        assert_eq!(parse(&["--log-level", "ERROR"]).tracing_directive(), "error");
    }
}
