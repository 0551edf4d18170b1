use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize, Serializer};

// ── Input records ─────────────────────────────────────────────────────────────

/// One participant's recorded session, as written by the collector.
///
/// Every field without `#[serde(default)]` is required; a file missing one of
/// them fails to load instead of surfacing later as a lookup failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Participant identifier, e.g. `"P01"`.
    pub participant_id: String,
    /// Wall-clock start of the session (epoch milliseconds).
    #[serde(default)]
    pub session_start: Option<i64>,
    /// Wall-clock end of the session (epoch milliseconds).
    #[serde(default)]
    pub session_end: Option<i64>,
    /// Total session duration in milliseconds.
    pub total_duration: u64,
    /// Number of clicks that produced no visible effect.
    pub dead_clicks: u64,
    /// Raw step events; only the count is consumed.
    pub raw_events: Vec<serde_json::Value>,
    /// Per-task step transitions.
    pub flows: Vec<Flow>,
}

impl SessionRecord {
    /// Number of raw events captured during the session.
    pub fn event_count(&self) -> usize {
        self.raw_events.len()
    }

    /// Number of flows recorded for the session.
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    /// Sum of the transition counts of every flow.
    pub fn transition_count(&self) -> usize {
        self.flows.iter().map(|f| f.transitions.len()).sum()
    }

    /// Session start converted to local time, when recorded.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.session_start.and_then(epoch_millis_to_local)
    }

    /// Session end converted to local time, when recorded.
    pub fn ended_at(&self) -> Option<DateTime<Local>> {
        self.session_end.and_then(epoch_millis_to_local)
    }
}

/// A named sequence of step transitions representing one user task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub name: String,
    pub transitions: Vec<Transition>,
    /// Span between the first and last step of the flow (milliseconds).
    #[serde(default)]
    pub total_duration: Option<f64>,
}

/// A single step-to-step movement inside a flow.
#[derive(Debug, Clone, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Milliseconds between the two steps. The collector derives this from a
    /// high-resolution timer, so fractional values are accepted.
    pub duration: f64,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

// ── Derived rows ──────────────────────────────────────────────────────────────

/// One row of the per-participant summary view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummaryRow {
    pub participant_id: String,
    pub total_duration_s: f64,
    pub dead_clicks: u64,
    pub num_events: usize,
    pub num_flows: usize,
}

impl From<&SessionRecord> for ParticipantSummaryRow {
    fn from(session: &SessionRecord) -> Self {
        Self {
            participant_id: session.participant_id.clone(),
            total_duration_s: session.total_duration as f64 / 1000.0,
            dead_clicks: session.dead_clicks,
            num_events: session.event_count(),
            num_flows: session.flow_count(),
        }
    }
}

/// One row of the flattened (session, flow, transition) view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRow {
    pub participant_id: String,
    pub flow: String,
    pub from_step: String,
    pub to_step: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration_ms: f64,
}

/// Integral durations are written as integers (`100`), fractional ones as
/// the shortest float representation (`100.25`).
fn serialize_millis<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn epoch_millis_to_local(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
