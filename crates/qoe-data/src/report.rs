//! Human-readable stdout reports.
//!
//! Both renderers return the full text so callers decide where it goes.

use std::fmt::Write as _;

use qoe_core::formatting::{
    format_local_time, format_millis, format_seconds, format_stat, render_table, rule,
};
use qoe_core::models::SessionRecord;
use qoe_core::stats;

use crate::aggregator::SUMMARY_COLUMNS;
use crate::analysis::SessionAnalysis;

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", rule());
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", rule());
}

// ── Batch report ──────────────────────────────────────────────────────────────

/// Overall summary, descriptive-statistics table, per-flow section (only when
/// transitions exist) and dead-click section.
pub fn render_summary(analysis: &SessionAnalysis) -> String {
    let mut out = String::new();

    section(&mut out, "📊 STATISTICAL ANALYSIS - OVERALL SUMMARY");
    let _ = writeln!(out, "\nTotal participants: {}", analysis.session_count());
    let _ = writeln!(out, "\nGeneral statistics:");

    let columns = analysis.description.columns();
    let labels = columns[0].1.labelled().map(|(label, _)| label);
    let rows: Vec<(String, Vec<String>)> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let cells = columns
                .iter()
                .map(|(_, d)| format_stat(d.labelled()[i].1))
                .collect();
            (label.to_string(), cells)
        })
        .collect();
    out.push_str(&render_table(&SUMMARY_COLUMNS, &rows));

    if analysis.has_transitions() {
        section(&mut out, "📊 ANALYSIS BY FLOW");
        for flow in &analysis.flows {
            let _ = writeln!(out, "\n🔄 {}", flow.name.to_uppercase());
            let _ = writeln!(out, "   Transitions: {}", flow.transitions);
            let _ = writeln!(out, "   Mean duration: {}", format_millis(flow.mean_ms));
            let _ = writeln!(out, "   Median duration: {}", format_millis(flow.median_ms));
            let _ = writeln!(out, "   Standard deviation: {}", format_millis(flow.std_ms));
            let _ = writeln!(out, "   Min: {}", format_millis(flow.min_ms));
            let _ = writeln!(out, "   Max: {}", format_millis(flow.max_ms));
        }
    }

    section(&mut out, "⚠️  DEAD CLICK ANALYSIS");
    let dead = &analysis.dead_clicks;
    let _ = writeln!(out, "\nTotal dead clicks: {}", dead.total);
    let _ = writeln!(out, "Mean per participant: {:.2}", dead.mean_per_participant);
    let _ = writeln!(out, "Participants with dead clicks: {}", dead.participants_affected);

    out
}

// ── Single-session report ─────────────────────────────────────────────────────

/// Detailed report of one session: general info, every transition per flow,
/// per-flow timing and usability alerts for dead clicks and transitions
/// longer than `long_pause_ms`.
pub fn render_session(session: &SessionRecord, long_pause_ms: u64) -> String {
    let mut out = String::new();

    section(
        &mut out,
        &format!("📊 Session Analysis - Participant {}", session.participant_id),
    );

    let _ = writeln!(out, "\n📋 General information:");
    if let Some(start) = session.started_at() {
        let _ = writeln!(out, "   Start: {}", format_local_time(&start));
    }
    if let Some(end) = session.ended_at() {
        let _ = writeln!(out, "   End: {}", format_local_time(&end));
    }
    let _ = writeln!(
        out,
        "   Total duration: {}",
        format_seconds(session.total_duration as f64, 2)
    );
    let _ = writeln!(out, "   Dead clicks: {}", session.dead_clicks);
    let _ = writeln!(out, "   Captured events: {}", session.event_count());

    let _ = writeln!(out, "\n🔄 Analysis by flow:");
    for flow in &session.flows {
        let _ = writeln!(out, "\n   📌 {}", flow.name.to_uppercase());
        if let Some(total) = flow.total_duration {
            let _ = writeln!(out, "      Duration: {}", format_seconds(total, 2));
        }
        let _ = writeln!(out, "      Transitions: {}", flow.transitions.len());

        if !flow.transitions.is_empty() {
            let _ = writeln!(out, "\n      Detailed transitions:");
            for t in &flow.transitions {
                let _ = writeln!(out, "      ├─ {} → {}", t.from, t.to);
                let _ = writeln!(out, "      │  Duration: {}", format_millis(t.duration));
            }
        }
    }

    let _ = writeln!(out, "\n⏱️  Time between steps:");
    for flow in session.flows.iter().filter(|f| !f.transitions.is_empty()) {
        let durations: Vec<f64> = flow.transitions.iter().map(|t| t.duration).collect();
        let sorted = stats::sorted(&durations);
        let _ = writeln!(out, "\n   {}:", flow.name);
        let _ = writeln!(out, "      Mean: {}", format_millis(stats::mean(&durations)));
        let _ = writeln!(out, "      Min: {}", format_millis(sorted[0]));
        let _ = writeln!(out, "      Max: {}", format_millis(sorted[sorted.len() - 1]));
    }

    let _ = writeln!(out, "\n⚠️  Usability alerts:");
    let alerts = usability_alerts(session, long_pause_ms);
    if alerts.is_empty() {
        let _ = writeln!(out, "   ✅ No issues detected");
    }
    for alert in &alerts {
        let _ = writeln!(out, "   ⚠️  {alert}");
    }

    let _ = writeln!(out, "\n{}", rule());
    out
}

/// One message per usability problem found in `session`.
pub fn usability_alerts(session: &SessionRecord, long_pause_ms: u64) -> Vec<String> {
    let mut alerts = Vec::new();
    if session.dead_clicks > 0 {
        alerts.push(format!("{} dead click(s) detected", session.dead_clicks));
    }
    for flow in &session.flows {
        for t in flow.transitions.iter().filter(|t| t.duration > long_pause_ms as f64) {
            alerts.push(format!(
                "Long pause ({}) in {}: {} → {}",
                format_seconds(t.duration, 1),
                flow.name,
                t.from,
                t.to
            ));
        }
    }
    alerts
}

// ── Tests ─────────────────────────────────────────────────────────────────────
