//! Font registration for the chart backend.
//!
//! The bitmap backend carries no built-in glyphs, so captions and labels can
//! only be drawn after a TrueType/OpenType file has been registered here.

use std::path::Path;

use plotters::style::{register_font, FontStyle};
use qoe_core::error::{QoeError, Result};
use tracing::debug;

/// Family name every chart asks for.
pub const FONT_FAMILY: &str = "sans-serif";

/// Register the font file at `path` as [`FONT_FAMILY`].
pub fn register_font_file(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|source| QoeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    register_font_bytes(path, bytes)
}

fn register_font_bytes(path: &Path, bytes: Vec<u8>) -> Result<()> {
    // the backend keeps a 'static reference for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| QoeError::Font {
        path: path.to_path_buf(),
        message: "not a valid TrueType/OpenType font".to_string(),
    })?;
    debug!("Registered chart font {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
