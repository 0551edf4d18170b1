use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use qoe_charts::fonts::register_font_file;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Font files tried in order of preference when `--font` is not given.
const PREFERRED_FONTS: [&str; 8] = [
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "NotoSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
    "Roboto-Regular.ttf",
    "FreeSans.ttf",
    "Verdana.ttf",
];

/// How deep below each font root the search descends.
const FONT_SEARCH_DEPTH: usize = 5;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber with `directive` as filter.
///
/// Output goes to stderr so stdout carries only the report.
pub fn setup_logging(directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Font bootstrap ─────────────────────────────────────────────────────────────

/// Register a font with the chart backend and report whether chart text can
/// be drawn.
///
/// An explicit path must load. Otherwise the system font directories are
/// searched and a missing or unusable font only disables chart text.
pub fn register_fonts(explicit: Option<&Path>) -> anyhow::Result<bool> {
    if let Some(path) = explicit {
        register_font_file(path).context("registering the --font file")?;
        return Ok(true);
    }

    let Some(path) = find_system_font(&font_search_roots()) else {
        warn!("No usable system font found; charts will be drawn without text");
        return Ok(false);
    };

    match register_font_file(&path) {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!("{e}; charts will be drawn without text");
            Ok(false)
        }
    }
}

/// Well-known system font directories plus the user font directory.
pub fn font_search_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    if let Some(user) = dirs::font_dir() {
        roots.push(user);
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".fonts"));
    }
    roots.retain(|root| root.is_dir());
    roots
}

/// First of [`PREFERRED_FONTS`] found below any of `roots`.
pub fn find_system_font(roots: &[PathBuf]) -> Option<PathBuf> {
    let mut found: HashMap<String, PathBuf> = HashMap::new();

    for root in roots {
        let entries = walkdir::WalkDir::new(root)
            .max_depth(FONT_SEARCH_DEPTH)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if PREFERRED_FONTS.contains(&name.as_str()) && !found.contains_key(&name) {
                found.insert(name, entry.into_path());
            }
        }
    }

    let font = PREFERRED_FONTS
        .iter()
        .find_map(|name| found.remove(*name));
    if let Some(path) = &font {
        debug!("Using system font {}", path.display());
    }
    font
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    // ── find_system_font ──────────────────────────────────────────────────────

    #[test]
    fn test_find_system_font_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        touch(&tmp.path().join("misc").join("SomethingElse.ttf"));

        assert_eq!(find_system_font(&[tmp.path().to_path_buf()]), None);
    }

    #[test]
    fn test_find_system_font_searches_nested_dirs() {
        let tmp = TempDir::new().expect("tempdir");
        let font = tmp.path().join("truetype").join("liberation").join("LiberationSans-Regular.ttf");
        touch(&font);

        assert_eq!(find_system_font(&[tmp.path().to_path_buf()]), Some(font));
    }

    #[test]
    fn test_find_system_font_honours_preference_order() {
        let first_root = TempDir::new().expect("tempdir");
        let second_root = TempDir::new().expect("tempdir");
        touch(&first_root.path().join("Arial.ttf"));
        let dejavu = second_root.path().join("dejavu").join("DejaVuSans.ttf");
        touch(&dejavu);

        let roots = [first_root.path().to_path_buf(), second_root.path().to_path_buf()];
        assert_eq!(find_system_font(&roots), Some(dejavu));
    }

    // ── register_fonts ────────────────────────────────────────────────────────

    #[test]
    fn test_register_fonts_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().expect("tempdir");
        let result = register_fonts(Some(&tmp.path().join("missing.ttf")));
        assert!(result.is_err());
    }

    #[test]
    fn test_register_fonts_explicit_invalid_file_is_an_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("fake.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = register_fonts(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("fake.ttf"));
    }
}
