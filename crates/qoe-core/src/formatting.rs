use chrono::{DateTime, Local};

/// Horizontal rule used to frame report sections.
pub const RULE_WIDTH: usize = 70;

/// A line of `=` characters, [`RULE_WIDTH`] wide.
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Format a millisecond value with two decimals and an `ms` suffix.
///
/// # Examples
///
/// ```
/// use qoe_core::formatting::format_millis;
///
/// assert_eq!(format_millis(150.0), "150.00ms");
/// assert_eq!(format_millis(0.126), "0.13ms");
/// assert_eq!(format_millis(f64::NAN), "NaNms");
/// ```
pub fn format_millis(ms: f64) -> String {
    if ms.is_nan() {
        return "NaNms".to_string();
    }
    format!("{ms:.2}ms")
}

/// Format a millisecond duration as seconds with `decimals` places.
///
/// # Examples
///
/// ```
/// use qoe_core::formatting::format_seconds;
///
/// assert_eq!(format_seconds(65_432.0, 2), "65.43s");
/// assert_eq!(format_seconds(12_500.0, 1), "12.5s");
/// ```
pub fn format_seconds(ms: f64, decimals: usize) -> String {
    format!("{:.prec$}s", ms / 1000.0, prec = decimals)
}

/// Format one cell of a descriptive-statistics table: six decimals, or
/// `NaN` for undefined values.
///
/// # Examples
///
/// ```
/// use qoe_core::formatting::format_stat;
///
/// assert_eq!(format_stat(2.0 / 3.0), "0.666667");
/// assert_eq!(format_stat(f64::NAN), "NaN");
/// ```
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Render a local timestamp as `dd/mm/yyyy HH:MM:SS`.
pub fn format_local_time(ts: &DateTime<Local>) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Lay out a right-aligned text table. `header` names the value columns; each
/// row is a label followed by one cell per column.
///
/// Every column is as wide as its widest cell plus two spaces of padding.
pub fn render_table(header: &[&str], rows: &[(String, Vec<String>)]) -> String {
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells = rows
                .iter()
                .filter_map(|(_, cells)| cells.get(i))
                .map(|c| c.chars().count());
            cells.chain(std::iter::once(name.chars().count())).max().unwrap_or(0) + 2
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for (name, width) in header.iter().zip(&widths) {
        out.push_str(&format!("{name:>width$}"));
    }
    out.push('\n');

    for (label, cells) in rows {
        out.push_str(&format!("{label:<label_width$}"));
        for (cell, width) in cells.iter().zip(&widths) {
            out.push_str(&format!("{cell:>width$}"));
        }
        out.push('\n');
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_width() {
        assert_eq!(rule().len(), RULE_WIDTH);
        assert!(rule().chars().all(|c| c == '='));
    }

    #[test]
    fn test_format_millis_rounds_to_two_places() {
        assert_eq!(format_millis(1234.5678), "1234.57ms");
        assert_eq!(format_millis(0.0), "0.00ms");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0, 2), "0.00s");
        assert_eq!(format_seconds(10_000.0, 1), "10.0s");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(3.0), "3.000000");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_local_time() {
        use chrono::TimeZone;
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_local_time(&ts), "09/03/2024 14:05:07");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            ("count".to_string(), vec!["3.000000".to_string(), "1.0".to_string()]),
            ("mean".to_string(), vec!["12.500000".to_string(), "NaN".to_string()]),
        ];
        let table = render_table(&["a", "long_name"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        // label width 5, first column 9 + 2, second column 9 + 2
        assert_eq!(lines[0], "               a  long_name");
        assert_eq!(lines[1], "count   3.000000        1.0");
        assert_eq!(lines[2], "mean   12.500000        NaN");
    }
}
