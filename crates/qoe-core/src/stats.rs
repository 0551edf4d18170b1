//! Descriptive statistics over numeric columns.

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator); `NaN` below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() as f64 - 1.0)).sqrt()
}

/// Copy of `values` sorted ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

// ── Describe ──────────────────────────────────────────────────────────────────

/// Count, mean, spread and five-number summary of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    /// Summarise `values`. Every statistic except `count` is `NaN` for an
    /// empty column; `std` is also `NaN` for a single value.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q1: f64::NAN,
                median: f64::NAN,
                q3: f64::NAN,
                max: f64::NAN,
            };
        }
        let data = sorted(values);
        Self {
            count: data.len(),
            mean: mean(&data),
            std: sample_std(&data),
            min: data[0],
            q1: percentile(&data, 25.0),
            median: percentile(&data, 50.0),
            q3: percentile(&data, 75.0),
            max: data[data.len() - 1],
        }
    }

    /// Statistics in display order, paired with their row labels.
    pub fn labelled(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q1),
            ("50%", self.median),
            ("75%", self.q3),
            ("max", self.max),
        ]
    }
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// Equal-width bins over the data range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Number of values falling in each bin.
    pub counts: Vec<u32>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Bins are half-open except the last, which also includes `max`. A
    /// degenerate range (all values equal) is widened to `value ± 0.5`.
    pub fn of(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        if values.is_empty() {
            return Self {
                edges: (0..=bins).map(|i| i as f64 / bins as f64).collect(),
                counts: vec![0; bins],
            };
        }
        let data = sorted(values);
        let (mut lo, mut hi) = (data[0], data[data.len() - 1]);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0u32; bins];
        for v in &data {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self { edges, counts }
    }

    /// Width of every bin.
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// Largest bin count.
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

// ── Box plot ──────────────────────────────────────────────────────────────────

/// How far past the quartiles, in IQRs, a whisker may reach.
pub const WHISKER_REACH: f64 = 1.5;

/// Tukey box-plot geometry of one group.
///
/// Whiskers end at the most extreme observed values inside
/// `[q1 - 1.5·IQR, q3 + 1.5·IQR]`; everything beyond is an outlier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty group.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let data = sorted(values);
        let q1 = percentile(&data, 25.0);
        let median = percentile(&data, 50.0);
        let q3 = percentile(&data, 75.0);
        let reach = (q3 - q1) * WHISKER_REACH;
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside = |v: &&f64| **v >= low_fence && **v <= high_fence;
        // A whisker never ends inside the box.
        let lower_whisker = data.iter().find(inside).copied().unwrap_or(q1).min(q1);
        let upper_whisker = data.iter().rev().find(inside).copied().unwrap_or(q3).max(q3);
        let outliers = data
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest value drawn, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        self.outliers.iter().fold(
            (self.lower_whisker, self.upper_whisker),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        )
    }
}

// ── Kernel density ────────────────────────────────────────────────────────────

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` evenly spaced positions across `[min, max]` of the data.
///
/// Returns `None` when the data has fewer than two values or no spread.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    let std = sample_std(values);
    if n < 2 || !std.is_finite() || std == 0.0 || points < 2 {
        return None;
    }
    let bandwidth = std * (n as f64).powf(-0.2);
    let data = sorted(values);
    let (lo, hi) = (data[0], data[n - 1]);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = data
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect();
    Some(curve)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── percentile ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty_returns_zero() {
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[42.0], 25.0), 42.0);
        assert_eq!(percentile(&[42.0], 75.0), 42.0);
    }

    #[test]
    fn test_percentile_p50_even() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        // rank = 0.5 * 3 = 1.5 → interpolate between data[1]=2 and data[2]=3
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_quartiles_interpolate() {
        let data = vec![0.0, 2.0, 5.0];
        // rank = 0.25 * 2 = 0.5 → 0 + 0.5 * 2 = 1
        assert!((percentile(&data, 25.0) - 1.0).abs() < 1e-9);
        // rank = 0.75 * 2 = 1.5 → 2 + 0.5 * 3 = 3.5
        assert!((percentile(&data, 75.0) - 3.5).abs() < 1e-9);
    }

    // ── mean / sample_std ────────────────────────────────────────────────────

    #[test]
    fn test_mean_and_std() {
        let data = [100.0, 200.0];
        assert_eq!(mean(&data), 150.0);
        // sqrt(((-50)^2 + 50^2) / 1) = 70.71...
        assert!((sample_std(&data) - 70.710_678).abs() < 1e-5);
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_std_single_value_is_nan() {
        assert!(sample_std(&[3.0]).is_nan());
    }

    // ── Describe ─────────────────────────────────────────────────────────────

    #[test]
    fn test_describe_dead_clicks_scenario() {
        let d = Describe::of(&[5.0, 0.0, 2.0]);
        assert_eq!(d.count, 3);
        assert!((d.mean - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(d.min, 0.0);
        assert_eq!(d.median, 2.0);
        assert_eq!(d.max, 5.0);
        assert!((d.q1 - 1.0).abs() < 1e-9);
        assert!((d.q3 - 3.5).abs() < 1e-9);
        assert!((d.std - 2.516_611).abs() < 1e-5);
    }

    #[test]
    fn test_describe_empty_column() {
        let d = Describe::of(&[]);
        assert_eq!(d.count, 0);
        assert!(d.mean.is_nan());
        assert!(d.max.is_nan());
    }

    #[test]
    fn test_describe_labels_in_display_order() {
        let labels: Vec<&str> = Describe::of(&[1.0]).labelled().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
    }

    // ── Histogram ────────────────────────────────────────────────────────────

    #[test]
    fn test_histogram_ten_bins_includes_max_in_last_bin() {
        let h = Histogram::of(&[0.0, 2.0, 5.0, 10.0], 10);
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[10], 10.0);
        assert_eq!(h.counts.iter().sum::<u32>(), 4);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[2], 1);
        assert_eq!(h.counts[5], 1);
        assert_eq!(h.counts[9], 1);
        assert!((h.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_degenerate_range_is_widened() {
        let h = Histogram::of(&[3.0, 3.0, 3.0], 10);
        assert!((h.edges[0] - 2.5).abs() < 1e-12);
        assert!((h.edges[10] - 3.5).abs() < 1e-12);
        assert_eq!(h.counts.iter().sum::<u32>(), 3);
        assert_eq!(h.max_count(), 3);
    }

    #[test]
    fn test_histogram_empty_input() {
        let h = Histogram::of(&[], 4);
        assert_eq!(h.counts, vec![0; 4]);
        assert_eq!(h.max_count(), 0);
    }

    // ── BoxStats ─────────────────────────────────────────────────────────────

    #[test]
    fn test_box_whiskers_stop_at_observed_values() {
        // q1 = 150, q3 = 200, fences at 75 and 275
        let b = BoxStats::of(&[100.0, 200.0, 200.0]).unwrap();
        assert_eq!(b.q1, 150.0);
        assert_eq!(b.median, 200.0);
        assert_eq!(b.q3, 200.0);
        assert_eq!(b.lower_whisker, 100.0);
        assert_eq!(b.upper_whisker, 200.0);
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn test_box_zero_iqr_marks_everything_else_as_outlier() {
        let b = BoxStats::of(&[100.0, 200.0, 200.0, 200.0, 1000.0]).unwrap();
        assert_eq!((b.lower_whisker, b.upper_whisker), (200.0, 200.0));
        assert_eq!(b.outliers, vec![100.0, 1000.0]);
        assert_eq!(b.extent(), (100.0, 1000.0));
    }

    #[test]
    fn test_box_whiskers_never_leave_data_range() {
        let durations = [1200.0, 1500.0, 1700.0, 1800.0, 4000.0];
        let b = BoxStats::of(&durations).unwrap();
        let (lo, hi) = b.extent();
        assert_eq!(lo, 1200.0);
        assert_eq!(hi, 4000.0);
        assert!(b.lower_whisker >= 1200.0);
        assert!(b.upper_whisker <= 1800.0);
        assert_eq!(b.outliers, vec![4000.0]);
    }

    #[test]
    fn test_box_single_value_collapses() {
        let b = BoxStats::of(&[1500.0]).unwrap();
        assert_eq!(
            (b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            (1500.0, 1500.0, 1500.0, 1500.0, 1500.0)
        );
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn test_box_of_empty_group() {
        assert!(BoxStats::of(&[]).is_none());
    }

    // ── gaussian_kde ─────────────────────────────────────────────────────────

    #[test]
    fn test_kde_spans_data_range() {
        let curve = gaussian_kde(&[0.0, 2.0, 5.0], 50).unwrap();
        assert_eq!(curve.len(), 50);
        assert_eq!(curve[0].0, 0.0);
        assert!((curve[49].0 - 5.0).abs() < 1e-9);
        assert!(curve.iter().all(|(_, d)| *d > 0.0));
    }

    #[test]
    fn test_kde_requires_spread() {
        assert!(gaussian_kde(&[1.0], 10).is_none());
        assert!(gaussian_kde(&[4.0, 4.0, 4.0], 10).is_none());
    }
}
