//! Core types for QoE session analytics.
//!
//! Holds the session data model, the shared error type, path configuration,
//! command-line settings and the numeric helpers used by every stage of the
//! analysis pipeline.

pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{QoeError, Result};
