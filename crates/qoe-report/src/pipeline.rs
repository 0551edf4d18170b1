use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use qoe_charts::ChartRenderer;
use qoe_core::config::PipelineConfig;
use qoe_core::formatting::rule;
use qoe_data::analysis::analyze_sessions;
use qoe_data::exporter::{export_flow_metrics, export_general_metrics};
use qoe_data::reader::{load_participant, load_sessions};
use qoe_data::report::{render_session, render_summary};
use tracing::info;

/// What a batch run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub sessions: usize,
    pub charts: Vec<PathBuf>,
    pub csv_files: Vec<PathBuf>,
}

// ── Batch pipeline ─────────────────────────────────────────────────────────────

/// Load every session, print the statistics report, render the charts (when
/// `renderer` is given) and export both CSV views.
///
/// Finding no sessions is not an error: a message is printed and nothing is
/// written.
pub fn run_pipeline(
    config: &PipelineConfig,
    renderer: Option<&ChartRenderer>,
    out: &mut impl Write,
) -> Result<RunOutcome> {
    writeln!(out, "\n🔬 Starting statistical analysis...")?;

    let sessions = load_sessions(&config.input_dir)
        .with_context(|| format!("loading sessions from {}", config.input_dir.display()))?;

    if sessions.is_empty() {
        writeln!(out, "\n❌ No sessions found in {}", config.input_dir.display())?;
        writeln!(out, "Collect at least one session before running the analysis.")?;
        return Ok(RunOutcome::default());
    }
    info!("Loaded {} sessions", sessions.len());

    let analysis = analyze_sessions(&sessions);
    write!(out, "{}", render_summary(&analysis))?;

    let mut outcome = RunOutcome {
        sessions: sessions.len(),
        ..RunOutcome::default()
    };

    if let Some(renderer) = renderer {
        writeln!(out, "\n📈 Generating charts...")?;
        outcome.charts = renderer
            .render_all(&analysis)
            .context("rendering charts")?;
        for path in &outcome.charts {
            writeln!(out, "✅ Chart saved: {}", path.display())?;
        }
    }

    writeln!(out, "\n💾 Exporting CSVs...")?;
    export_general_metrics(&config.general_metrics_csv, &analysis.tables.summary)
        .context("exporting general metrics")?;
    writeln!(out, "✅ CSV exported: {}", config.general_metrics_csv.display())?;
    outcome.csv_files.push(config.general_metrics_csv.clone());

    if analysis.has_transitions() {
        export_flow_metrics(&config.flow_metrics_csv, &analysis.tables.transitions)
            .context("exporting flow metrics")?;
        writeln!(out, "✅ CSV exported: {}", config.flow_metrics_csv.display())?;
        outcome.csv_files.push(config.flow_metrics_csv.clone());
    }

    writeln!(out, "\n{}", rule())?;
    writeln!(out, "✅ Analysis complete!")?;
    writeln!(out, "{}", rule())?;

    info!(
        "Run finished: {} charts, {} CSV files",
        outcome.charts.len(),
        outcome.csv_files.len()
    );
    Ok(outcome)
}

// ── Single participant ─────────────────────────────────────────────────────────

/// Print the detailed report of one participant's session.
pub fn run_participant(
    config: &PipelineConfig,
    participant_id: &str,
    long_pause_ms: u64,
    out: &mut impl Write,
) -> Result<()> {
    let session = load_participant(&config.participant_file(participant_id))
        .with_context(|| format!("loading participant {participant_id}"))?;
    write!(out, "{}", render_session(&session, long_pause_ms))?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
