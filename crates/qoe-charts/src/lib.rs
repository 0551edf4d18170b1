//! Chart layer for the QoE session report.
//!
//! Draws the dead-click histogram, session-duration bars, per-flow box plot
//! and transition heatmap with [`plotters`] into an in-memory raster, then
//! encodes each one as PNG with the [`image`] crate.

pub mod canvas;
pub mod charts;
pub mod fonts;
pub mod renderer;
pub mod theme;

pub use renderer::ChartRenderer;
