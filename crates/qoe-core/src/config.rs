//! Input and output locations for one pipeline run.

use std::path::{Path, PathBuf};

/// Root directory holding collector input and analysis output.
pub const DEFAULT_RESULTS_DIR: &str = "results";
/// Sub-directory of the results root with one JSON file per participant.
pub const SESSIONS_SUBDIR: &str = "participantes";
/// Sub-directory of the results root receiving the chart images.
pub const PLOTS_SUBDIR: &str = "plots";
/// Extension of session files inside [`SESSIONS_SUBDIR`].
pub const SESSION_FILE_EXTENSION: &str = "json";

pub const GENERAL_METRICS_FILE: &str = "general_metrics.csv";
pub const FLOW_METRICS_FILE: &str = "flow_metrics.csv";

/// File names of the four charts, relative to the plots directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFiles {
    pub dead_clicks: String,
    pub session_duration: String,
    pub flow_boxplot: String,
    pub transition_heatmap: String,
}

impl Default for ChartFiles {
    fn default() -> Self {
        Self {
            dead_clicks: "dead_clicks_distribution.png".to_string(),
            session_duration: "session_duration.png".to_string(),
            flow_boxplot: "flow_duration_boxplot.png".to_string(),
            transition_heatmap: "transition_heatmap.png".to_string(),
        }
    }
}

/// Every path a pipeline stage reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub plots_dir: PathBuf,
    pub general_metrics_csv: PathBuf,
    pub flow_metrics_csv: PathBuf,
    pub charts: ChartFiles,
}

impl PipelineConfig {
    /// Lay out all inputs and outputs under `results_dir`.
    pub fn rooted_at(results_dir: impl AsRef<Path>) -> Self {
        let root = results_dir.as_ref();
        Self {
            input_dir: root.join(SESSIONS_SUBDIR),
            plots_dir: root.join(PLOTS_SUBDIR),
            general_metrics_csv: root.join(GENERAL_METRICS_FILE),
            flow_metrics_csv: root.join(FLOW_METRICS_FILE),
            charts: ChartFiles::default(),
        }
    }

    /// Full path of a chart file inside the plots directory.
    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.plots_dir.join(file_name)
    }

    /// Session file expected for `participant_id`.
    pub fn participant_file(&self, participant_id: &str) -> PathBuf {
        self.input_dir
            .join(format!("{participant_id}.{SESSION_FILE_EXTENSION}"))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::rooted_at(DEFAULT_RESULTS_DIR)
    }
}
