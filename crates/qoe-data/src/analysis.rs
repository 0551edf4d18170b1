//! Aggregation stage of the pipeline.
//!
//! Turns the loaded [`SessionRecord`]s into a [`SessionAnalysis`] holding
//! both tabular views and every statistic the report, charts and CSV export
//! consume.

use qoe_core::models::{ParticipantSummaryRow, SessionRecord, TransitionRow};
use tracing::info;

use crate::aggregator::{
    dead_click_statistics, describe_summary, flatten_transitions, flow_statistics,
    summarize_sessions, transition_matrix, DeadClickStats, FlowStats, SummaryDescription,
    TransitionMatrix,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// The two tabular views derived from the sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTables {
    /// One row per session.
    pub summary: Vec<ParticipantSummaryRow>,
    /// One row per (session, flow, transition).
    pub transitions: Vec<TransitionRow>,
}

/// The complete output of [`analyze_sessions`].
#[derive(Debug, Clone)]
pub struct SessionAnalysis {
    pub tables: SessionTables,
    pub description: SummaryDescription,
    /// Empty when there are no transition rows.
    pub flows: Vec<FlowStats>,
    pub dead_clicks: DeadClickStats,
    pub matrix: TransitionMatrix,
}

impl SessionAnalysis {
    pub fn session_count(&self) -> usize {
        self.tables.summary.len()
    }

    pub fn has_transitions(&self) -> bool {
        !self.tables.transitions.is_empty()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Flatten `sessions` into both views and compute all statistics.
pub fn analyze_sessions(sessions: &[SessionRecord]) -> SessionAnalysis {
    let summary = summarize_sessions(sessions);
    let transitions = flatten_transitions(sessions);

    let description = describe_summary(&summary);
    let flows = flow_statistics(&transitions);
    let dead_clicks = dead_click_statistics(&summary);
    let matrix = transition_matrix(&transitions);

    info!(
        "Analyzed {} sessions: {} transitions across {} flows",
        summary.len(),
        transitions.len(),
        flows.len()
    );

    SessionAnalysis {
        tables: SessionTables {
            summary,
            transitions,
        },
        description,
        flows,
        dead_clicks,
        matrix,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
