//! CSV export of the tabular views.

use std::path::Path;

use qoe_core::error::{QoeError, Result};
use qoe_core::models::{ParticipantSummaryRow, TransitionRow};
use serde::Serialize;
use tracing::debug;

/// Write the per-participant summary to `path`, replacing any existing file.
pub fn export_general_metrics(path: &Path, rows: &[ParticipantSummaryRow]) -> Result<()> {
    write_csv(path, rows)
}

/// Write the flattened transition view to `path`, replacing any existing file.
pub fn export_flow_metrics(path: &Path, rows: &[TransitionRow]) -> Result<()> {
    write_csv(path, rows)
}

/// Header row plus one line per record; the header comes from the field
/// names of `T`, so it is only emitted when `rows` is non-empty.
fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let csv_err = |source: csv::Error| QoeError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| csv_err(csv::Error::from(e)))?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary_rows() -> Vec<ParticipantSummaryRow> {
        vec![
            ParticipantSummaryRow {
                participant_id: "P01".into(),
                total_duration_s: 65.432,
                dead_clicks: 0,
                num_events: 12,
                num_flows: 2,
            },
            ParticipantSummaryRow {
                participant_id: "P02".into(),
                total_duration_s: 30.0,
                dead_clicks: 5,
                num_events: 7,
                num_flows: 1,
            },
        ]
    }

    fn transition_rows() -> Vec<TransitionRow> {
        vec![
            TransitionRow {
                participant_id: "P01".into(),
                flow: "onboarding".into(),
                from_step: "A".into(),
                to_step: "B".into(),
                duration_ms: 100.0,
            },
            TransitionRow {
                participant_id: "P01".into(),
                flow: "onboarding".into(),
                from_step: "B".into(),
                to_step: "C, final".into(),
                duration_ms: 200.5,
            },
        ]
    }

    #[test]
    fn test_general_metrics_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("general_metrics.csv");
        export_general_metrics(&path, &summary_rows()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "participant_id,total_duration_s,dead_clicks,num_events,num_flows\n\
             P01,65.432,0,12,2\n\
             P02,30.0,5,7,1\n"
        );
    }

    #[test]
    fn test_flow_metrics_layout_and_quoting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flow_metrics.csv");
        export_flow_metrics(&path, &transition_rows()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "participant_id,flow,from_step,to_step,duration_ms");
        assert_eq!(lines[1], "P01,onboarding,A,B,100");
        assert_eq!(lines[2], "P01,onboarding,B,\"C, final\",200.5");
    }

    #[test]
    fn test_export_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("results").join("general_metrics.csv");
        export_general_metrics(&path, &summary_rows()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_export_overwrites_and_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flow_metrics.csv");
        std::fs::write(&path, "stale content that is much longer than the export itself\n".repeat(20))
            .unwrap();

        export_flow_metrics(&path, &transition_rows()).unwrap();
        let first = std::fs::read(&path).unwrap();
        export_flow_metrics(&path, &transition_rows()).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(!String::from_utf8(first).unwrap().contains("stale"));
    }
}
