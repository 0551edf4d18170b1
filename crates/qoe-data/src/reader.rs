//! Session file discovery and loading.
//!
//! Reads the per-participant JSON files written by the collector and turns
//! them into typed [`SessionRecord`]s. Any unreadable or malformed file
//! aborts the load; no partial result is returned.

use std::path::{Path, PathBuf};

use qoe_core::config::SESSION_FILE_EXTENSION;
use qoe_core::error::{QoeError, Result};
use qoe_core::models::SessionRecord;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find every `*.json` file directly inside `dir`, sorted by path.
///
/// Sub-directories and hidden files (such as `._P01.json` resource-fork
/// sidecars) are not matched. A missing directory yields an empty list.
pub fn find_session_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Session directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && !entry.file_name().to_string_lossy().starts_with('.')
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == SESSION_FILE_EXTENSION)
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read and parse a single session file.
pub fn load_session(path: &Path) -> Result<SessionRecord> {
    let content = std::fs::read_to_string(path).map_err(|source| QoeError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| QoeError::SessionParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every session file in `dir`, in path order.
///
/// The first file that fails to read or parse aborts the whole load.
pub fn load_sessions(dir: &Path) -> Result<Vec<SessionRecord>> {
    let files = find_session_files(dir);
    let mut sessions = Vec::with_capacity(files.len());

    for path in &files {
        let session = load_session(path)?;
        debug!(
            "Loaded {} from {}: {} flows, {} events",
            session.participant_id,
            path.display(),
            session.flow_count(),
            session.event_count(),
        );
        sessions.push(session);
    }

    debug!("Loaded {} sessions from {}", sessions.len(), dir.display());
    Ok(sessions)
}

/// Load one participant's session file, as laid out by
/// [`PipelineConfig::participant_file`](qoe_core::config::PipelineConfig::participant_file).
pub fn load_participant(path: &Path) -> Result<SessionRecord> {
    if !path.is_file() {
        return Err(QoeError::ParticipantNotFound(path.to_path_buf()));
    }
    load_session(path)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
