//! The four chart drawers.
//!
//! Each function draws onto an already-filled [`Area`]; writing the file is
//! left to [`crate::canvas::render_png`].

use std::error::Error;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use qoe_core::models::{ParticipantSummaryRow, TransitionRow};
use qoe_core::stats::{self, BoxStats};
use qoe_data::aggregator::{group_durations_by_flow, TransitionMatrix};

use crate::canvas::{Area, ChartResult, Figure};
use crate::theme::ChartTheme;

pub const DEAD_CLICKS_FIGURE: Figure = Figure::new(10.0, 6.0);
pub const SESSION_DURATION_FIGURE: Figure = Figure::new(12.0, 6.0);
pub const FLOW_BOXPLOT_FIGURE: Figure = Figure::new(12.0, 6.0);
pub const HEATMAP_FIGURE: Figure = Figure::new(12.0, 10.0);

const DEAD_CLICK_BINS: usize = 10;
const KDE_POINTS: usize = 200;
/// Headroom above the tallest series value.
const Y_HEADROOM: f64 = 1.1;
/// Half the width of a bar or box, in category units.
const BAR_HALF_WIDTH: f64 = 0.4;
const BOX_HALF_WIDTH: f64 = 0.25;
const CAP_HALF_WIDTH: f64 = 0.125;
const OUTLIER_RADIUS: i32 = 12;
/// Pixels between an axis and the start of its tick labels.
pub(crate) const TICK_LABEL_GAP: i32 = 20;

fn chart_builder<'a, 'c>(
    area: &'a Area<'c>,
    theme: &ChartTheme,
    title: &str,
    (x_label_area, y_label_area): (i32, i32),
) -> ChartBuilder<'a, 'static, BitMapBackend<'c>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(theme.margin);
    if theme.text {
        builder
            .caption(title, theme.font(theme.title_size))
            .x_label_area_size(x_label_area)
            .y_label_area_size(y_label_area);
    }
    builder
}

/// Category axis with one unit-wide slot per item, centred on `0..n`.
fn category_range(n: usize) -> std::ops::Range<f64> {
    -0.5..n.max(1) as f64 - 0.5
}

// ── Tick labels ───────────────────────────────────────────────────────────────

/// Label area deep enough for the longest of `labels` plus the axis
/// description, never smaller than `min`.
pub(crate) fn tick_label_area(
    area: &Area<'_>,
    theme: &ChartTheme,
    labels: &[String],
    min: i32,
) -> Result<i32, Box<dyn Error>> {
    if !theme.text {
        return Ok(min);
    }
    let style = TextStyle::from(theme.font(theme.label_size));
    let mut widest = 0;
    for label in labels {
        widest = widest.max(area.estimate_text_size(label, &style)?.0);
    }
    let needed = widest as i32 + TICK_LABEL_GAP * 3 + theme.axis_desc_size as i32 * 2;
    Ok(needed.max(min))
}

/// Category labels turned 90° and hung below the axis, each starting at its
/// `(x, axis_y)` anchor.
///
/// The mesh cannot do this itself: it anchors rotated labels at their
/// centre, so long labels poke above the label area and get cut.
pub(crate) fn draw_rotated_labels<'l>(
    area: &Area<'_>,
    theme: &ChartTheme,
    labels: impl IntoIterator<Item = (&'l String, (i32, i32))>,
) -> ChartResult {
    let style = theme
        .font(theme.label_size)
        .transform(FontTransform::Rotate90)
        .color(&theme.text_color)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (label, (x, axis_y)) in labels {
        area.draw_text(label, &style, (x, axis_y + TICK_LABEL_GAP))?;
    }
    Ok(())
}

// ── Dead clicks ───────────────────────────────────────────────────────────────

/// Histogram of dead clicks per participant with a density curve scaled to
/// bin counts.
pub fn dead_clicks_distribution(
    area: &Area<'_>,
    theme: &ChartTheme,
    rows: &[ParticipantSummaryRow],
) -> ChartResult {
    let values: Vec<f64> = rows.iter().map(|r| r.dead_clicks as f64).collect();
    let histogram = stats::Histogram::of(&values, DEAD_CLICK_BINS);
    let scale = values.len() as f64 * histogram.bin_width();
    let density: Option<Vec<(f64, f64)>> = stats::gaussian_kde(&values, KDE_POINTS)
        .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect());

    let peak = density
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(f64::from(histogram.max_count()), f64::max);
    let y_max = (peak * Y_HEADROOM).max(1.0);
    let x_min = histogram.edges.first().copied().unwrap_or(0.0);
    let x_max = histogram.edges.last().copied().unwrap_or(1.0);

    let mut chart = chart_builder(
        area,
        theme,
        "Dead Click Distribution per Participant",
        (theme.x_label_area, theme.y_label_area),
    )
    .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    if theme.text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(&theme.grid)
            .light_line_style(&theme.background)
            .x_desc("Number of dead clicks")
            .y_desc("Frequency")
            .label_style(theme.font(theme.label_size))
            .axis_desc_style(theme.font(theme.axis_desc_size))
            .draw()?;
    }

    let fill = theme.bar.mix(theme.bar_opacity).filled();
    chart.draw_series(
        histogram
            .counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, count)| {
                Rectangle::new(
                    [
                        (histogram.edges[i], 0.0),
                        (histogram.edges[i + 1], f64::from(*count)),
                    ],
                    fill,
                )
            }),
    )?;

    if let Some(curve) = density {
        chart.draw_series(LineSeries::new(
            curve,
            theme.density_line.stroke_width(theme.line_width),
        ))?;
    }
    Ok(())
}

// ── Session duration ──────────────────────────────────────────────────────────

/// One bar per participant, in row order, with the total session length in
/// seconds.
pub fn session_duration(
    area: &Area<'_>,
    theme: &ChartTheme,
    rows: &[ParticipantSummaryRow],
) -> ChartResult {
    let names: Vec<String> = rows.iter().map(|r| r.participant_id.clone()).collect();
    let tallest = rows
        .iter()
        .map(|r| r.total_duration_s)
        .fold(0.0, f64::max);
    let y_max = (tallest * Y_HEADROOM).max(1.0);
    let x_label_area = tick_label_area(area, theme, &names, theme.x_label_area)?;

    let mut chart = chart_builder(
        area,
        theme,
        "Total Session Duration per Participant",
        (x_label_area, theme.y_label_area),
    )
    .build_cartesian_2d(category_range(rows.len()), 0f64..y_max)?;

    if theme.text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(&theme.grid)
            .light_line_style(&theme.background)
            .x_labels(0)
            .y_label_style(theme.font(theme.label_size))
            .x_desc("Participant")
            .y_desc("Duration (seconds)")
            .axis_desc_style(theme.font(theme.axis_desc_size))
            .draw()?;
    }

    chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
        let x = i as f64;
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, r.total_duration_s)],
            theme.bar.filled(),
        )
    }))?;

    if theme.text {
        let anchors = (0..names.len()).map(|i| chart.backend_coord(&(i as f64, 0.0)));
        draw_rotated_labels(area, theme, names.iter().zip(anchors))?;
    }
    Ok(())
}

// ── Flow box plot ─────────────────────────────────────────────────────────────

/// Box plot of transition durations per flow, flows in first-appearance
/// order. Whiskers end at the last observation within 1.5·IQR of the box and
/// anything further out is drawn as a circle. Expects at least one
/// transition row.
pub fn flow_duration_boxplot(
    area: &Area<'_>,
    theme: &ChartTheme,
    rows: &[TransitionRow],
) -> ChartResult {
    let groups = group_durations_by_flow(rows);
    let names: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    let boxes: Vec<(f64, BoxStats)> = groups
        .iter()
        .enumerate()
        .filter_map(|(i, (_, durations))| BoxStats::of(durations).map(|b| (i as f64, b)))
        .collect();

    let (lo, hi) = boxes
        .iter()
        .map(|(_, b)| b.extent())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (l, h)| {
            (lo.min(l), hi.max(h))
        });
    let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 0.0) };
    let pad = ((hi - lo) * 0.05).max(1.0);
    let y_bottom = lo - pad;
    let x_label_area = tick_label_area(area, theme, &names, theme.x_label_area)?;

    let mut chart = chart_builder(
        area,
        theme,
        "Transition Duration Distribution by Flow",
        (x_label_area, theme.y_label_area),
    )
    .build_cartesian_2d(category_range(names.len()), y_bottom..hi + pad)?;

    if theme.text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(&theme.grid)
            .light_line_style(&theme.background)
            .x_labels(0)
            .y_label_style(theme.font(theme.label_size))
            .x_desc("Flow")
            .y_desc("Duration (ms)")
            .axis_desc_style(theme.font(theme.axis_desc_size))
            .draw()?;
    }

    let line = theme.box_line.stroke_width(theme.line_width / 2);
    let fill = theme.bar.mix(theme.bar_opacity).filled();

    chart.draw_series(boxes.iter().map(|(x, b)| {
        Rectangle::new([(x - BOX_HALF_WIDTH, b.q1), (x + BOX_HALF_WIDTH, b.q3)], fill)
    }))?;
    chart.draw_series(boxes.iter().map(|(x, b)| {
        Rectangle::new([(x - BOX_HALF_WIDTH, b.q1), (x + BOX_HALF_WIDTH, b.q3)], line)
    }))?;
    chart.draw_series(boxes.iter().flat_map(|(x, b)| {
        let x = *x;
        [
            vec![(x - BOX_HALF_WIDTH, b.median), (x + BOX_HALF_WIDTH, b.median)],
            vec![(x, b.q3), (x, b.upper_whisker)],
            vec![(x, b.q1), (x, b.lower_whisker)],
            vec![(x - CAP_HALF_WIDTH, b.upper_whisker), (x + CAP_HALF_WIDTH, b.upper_whisker)],
            vec![(x - CAP_HALF_WIDTH, b.lower_whisker), (x + CAP_HALF_WIDTH, b.lower_whisker)],
        ]
        .into_iter()
        .map(move |points| PathElement::new(points, line))
    }))?;
    chart.draw_series(boxes.iter().flat_map(|(x, b)| {
        b.outliers
            .iter()
            .map(move |v| Circle::new((*x, *v), OUTLIER_RADIUS, line))
    }))?;

    if theme.text {
        let anchors = (0..names.len()).map(|i| chart.backend_coord(&(i as f64, y_bottom)));
        draw_rotated_labels(area, theme, names.iter().zip(anchors))?;
    }
    Ok(())
}

// ── Transition heatmap ────────────────────────────────────────────────────────

/// Mean transition duration per (from, to) pair, one annotated cell each.
/// Expects a non-empty matrix.
pub fn transition_heatmap(
    area: &Area<'_>,
    theme: &ChartTheme,
    matrix: &TransitionMatrix,
) -> ChartResult {
    let rows = matrix.from_steps.len() as i32;
    let cols = matrix.to_steps.len() as i32;
    let cells: Vec<(i32, i32, f64)> = matrix
        .from_steps
        .iter()
        .enumerate()
        .flat_map(|(r, from)| {
            matrix.to_steps.iter().enumerate().filter_map(move |(c, to)| {
                matrix.get(from, to).map(|v| (c as i32, r as i32, v))
            })
        })
        .collect();
    let max = matrix.max_value();
    let min = cells.iter().map(|&(_, _, v)| v).fold(max, f64::min);

    let x_label_area = tick_label_area(area, theme, &matrix.to_steps, theme.x_label_area)?;
    let y_label_area = tick_label_area(area, theme, &matrix.from_steps, theme.y_label_area)?;

    let mut chart = chart_builder(
        area,
        theme,
        "Mean Transition Duration (ms)",
        (x_label_area, y_label_area),
    )
    .build_cartesian_2d(0i32..cols, rows..0i32)?;

    let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
    let cell_w = plot_w as i32 / cols.max(1);
    let cell_h = plot_h as i32 / rows.max(1);

    if theme.text {
        let y_formatter = |v: &i32| {
            usize::try_from(*v)
                .ok()
                .and_then(|i| matrix.from_steps.get(i))
                .cloned()
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(rows as usize + 1)
            .y_label_offset(cell_h / 2)
            .y_label_formatter(&y_formatter)
            .y_label_style(theme.font(theme.label_size))
            .x_desc("To step")
            .y_desc("From step")
            .axis_desc_style(theme.font(theme.axis_desc_size))
            .draw()?;
    }

    chart.draw_series(cells.iter().map(|&(c, r, v)| {
        Rectangle::new(
            [(c, r), (c + 1, r + 1)],
            theme.heat_color(v, min, max).filled(),
        )
    }))?;

    if theme.text {
        let center = Pos::new(HPos::Center, VPos::Center);
        chart.draw_series(cells.iter().map(|&(c, r, v)| {
            let color = theme.contrast_text(theme.heat_color(v, min, max));
            let style = theme
                .font(theme.annotation_size)
                .color(&color)
                .pos(center);
            EmptyElement::at((c, r)) + Text::new(format!("{v:.0}"), (cell_w / 2, cell_h / 2), style)
        }))?;

        let anchors = (0..cols).map(|c| {
            let (left, bottom) = chart.backend_coord(&(c, rows));
            let (right, _) = chart.backend_coord(&(c + 1, rows));
            ((left + right) / 2, bottom)
        });
        draw_rotated_labels(area, theme, matrix.to_steps.iter().zip(anchors))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
