use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the QoE analysis pipeline.
#[derive(Error, Debug)]
pub enum QoeError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A session file is not valid JSON or does not match the session schema.
    #[error("Failed to parse session file {path}: {source}")]
    SessionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The session file requested for a single participant does not exist.
    #[error("Participant file not found: {0}")]
    ParticipantNotFound(PathBuf),

    /// A CSV export could not be written.
    #[error("Failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A chart could not be drawn or encoded.
    #[error("Failed to render chart {path}: {message}")]
    Chart { path: PathBuf, message: String },

    /// A font file could not be loaded or registered with the chart backend.
    #[error("Failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the QoE crates.
pub type Result<T> = std::result::Result<T, QoeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = QoeError::FileRead {
            path: PathBuf::from("/some/P01.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/P01.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_session_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err = QoeError::SessionParse {
            path: PathBuf::from("results/participantes/P02.json"),
            source: json_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse session file results/participantes/P02.json"));
    }

    #[test]
    fn test_error_display_participant_not_found() {
        let err = QoeError::ParticipantNotFound(PathBuf::from("/data/P09.json"));
        assert_eq!(err.to_string(), "Participant file not found: /data/P09.json");
    }

    #[test]
    fn test_error_display_chart() {
        let err = QoeError::Chart {
            path: PathBuf::from("plots/x.png"),
            message: "backend failure".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to render chart plots/x.png: backend failure"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = QoeError::Config("participant id must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: participant id must not be empty"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: QoeError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_source_is_preserved() {
        use std::error::Error as _;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = QoeError::FileRead {
            path: PathBuf::from("a.json"),
            source: io_err,
        };
        assert!(err.source().is_some());
    }
}
