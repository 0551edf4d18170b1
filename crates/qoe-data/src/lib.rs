//! Data layer for QoE session analytics.
//!
//! Responsible for discovering and parsing the per-participant session files,
//! flattening them into tabular views, computing the aggregate statistics,
//! rendering the text reports and exporting the views as CSV.

pub mod aggregator;
pub mod analysis;
pub mod exporter;
pub mod reader;
pub mod report;

pub use qoe_core as core;
