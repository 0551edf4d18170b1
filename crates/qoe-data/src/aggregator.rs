//! Flattening of session records into tabular views and grouped reductions
//! over those views.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use qoe_core::models::{ParticipantSummaryRow, SessionRecord, TransitionRow};
use qoe_core::stats::{self, Describe};

// ── Tabular views ─────────────────────────────────────────────────────────────

/// One summary row per session, in input order.
pub fn summarize_sessions(sessions: &[SessionRecord]) -> Vec<ParticipantSummaryRow> {
    sessions.iter().map(ParticipantSummaryRow::from).collect()
}

/// One row per (session, flow, transition), in input order.
pub fn flatten_transitions(sessions: &[SessionRecord]) -> Vec<TransitionRow> {
    sessions
        .iter()
        .flat_map(|session| {
            session.flows.iter().flat_map(move |flow| {
                flow.transitions.iter().map(move |t| TransitionRow {
                    participant_id: session.participant_id.clone(),
                    flow: flow.name.clone(),
                    from_step: t.from.clone(),
                    to_step: t.to.clone(),
                    duration_ms: t.duration,
                })
            })
        })
        .collect()
}

// ── SummaryDescription ────────────────────────────────────────────────────────

/// Column names of the numeric summary columns, in table order.
pub const SUMMARY_COLUMNS: [&str; 4] = ["total_duration_s", "dead_clicks", "num_events", "num_flows"];

/// Descriptive statistics of every numeric column of the summary view.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryDescription {
    pub total_duration_s: Describe,
    pub dead_clicks: Describe,
    pub num_events: Describe,
    pub num_flows: Describe,
}

impl SummaryDescription {
    /// Columns paired with their names, in [`SUMMARY_COLUMNS`] order.
    pub fn columns(&self) -> [(&'static str, &Describe); 4] {
        [
            (SUMMARY_COLUMNS[0], &self.total_duration_s),
            (SUMMARY_COLUMNS[1], &self.dead_clicks),
            (SUMMARY_COLUMNS[2], &self.num_events),
            (SUMMARY_COLUMNS[3], &self.num_flows),
        ]
    }
}

/// Describe each numeric column of the summary view.
pub fn describe_summary(rows: &[ParticipantSummaryRow]) -> SummaryDescription {
    let column = |f: fn(&ParticipantSummaryRow) -> f64| -> Describe {
        let values: Vec<f64> = rows.iter().map(f).collect();
        Describe::of(&values)
    };
    SummaryDescription {
        total_duration_s: column(|r| r.total_duration_s),
        dead_clicks: column(|r| r.dead_clicks as f64),
        num_events: column(|r| r.num_events as f64),
        num_flows: column(|r| r.num_flows as f64),
    }
}

// ── FlowStats ─────────────────────────────────────────────────────────────────

/// Transition-duration statistics of one flow across all sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowStats {
    pub name: String,
    pub transitions: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub std_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Group transition durations by flow name, preserving first-appearance
/// order of the names.
pub fn group_durations_by_flow(rows: &[TransitionRow]) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.flow.as_str()).or_insert_with(|| {
            groups.push((row.flow.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row.duration_ms);
    }
    groups
}

/// Per-flow statistics in order of first appearance.
pub fn flow_statistics(rows: &[TransitionRow]) -> Vec<FlowStats> {
    group_durations_by_flow(rows)
        .into_iter()
        .map(|(name, durations)| {
            let d = Describe::of(&durations);
            FlowStats {
                name,
                transitions: d.count,
                mean_ms: d.mean,
                median_ms: d.median,
                std_ms: d.std,
                min_ms: d.min,
                max_ms: d.max,
            }
        })
        .collect()
}

// ── DeadClickStats ────────────────────────────────────────────────────────────

/// Dead-click totals across participants.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadClickStats {
    pub total: u64,
    pub mean_per_participant: f64,
    pub participants_affected: usize,
}

/// Sum, mean and number of participants with at least one dead click.
pub fn dead_click_statistics(rows: &[ParticipantSummaryRow]) -> DeadClickStats {
    let counts: Vec<f64> = rows.iter().map(|r| r.dead_clicks as f64).collect();
    DeadClickStats {
        total: rows.iter().map(|r| r.dead_clicks).sum(),
        mean_per_participant: stats::mean(&counts),
        participants_affected: rows.iter().filter(|r| r.dead_clicks > 0).count(),
    }
}

// ── TransitionMatrix ──────────────────────────────────────────────────────────

/// Mean transition duration pivoted by source step (rows) and destination
/// step (columns).
///
/// Pairs never observed are stored as `0.0`, which makes them
/// indistinguishable from an observed mean of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    /// Distinct source steps, sorted.
    pub from_steps: Vec<String>,
    /// Distinct destination steps, sorted.
    pub to_steps: Vec<String>,
    /// `values[row][col]` = mean duration of `from_steps[row] → to_steps[col]`.
    pub values: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    pub fn is_empty(&self) -> bool {
        self.from_steps.is_empty() || self.to_steps.is_empty()
    }

    /// Largest cell value (0 for an empty matrix).
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Mean duration of `from → to`, `None` if either step is unknown.
    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        let row = self.from_steps.iter().position(|s| s == from)?;
        let col = self.to_steps.iter().position(|s| s == to)?;
        Some(self.values[row][col])
    }
}

/// Pivot the mean duration of every (from, to) pair into a matrix.
pub fn transition_matrix(rows: &[TransitionRow]) -> TransitionMatrix {
    let mut sums: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for row in rows {
        let acc = sums
            .entry((row.from_step.as_str(), row.to_step.as_str()))
            .or_insert((0.0, 0));
        acc.0 += row.duration_ms;
        acc.1 += 1;
    }

    let from_steps: Vec<String> = sums
        .keys()
        .map(|(from, _)| *from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let to_steps: Vec<String> = sums
        .keys()
        .map(|(_, to)| *to)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let values = from_steps
        .iter()
        .map(|from| {
            to_steps
                .iter()
                .map(|to| {
                    sums.get(&(from.as_str(), to.as_str()))
                        .map(|(sum, n)| sum / *n as f64)
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    TransitionMatrix {
        from_steps,
        to_steps,
        values,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
