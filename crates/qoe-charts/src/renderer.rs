//! Writes the chart set for one analysis into the plots directory.

use std::path::PathBuf;

use qoe_core::config::PipelineConfig;
use qoe_core::error::Result;
use qoe_data::analysis::SessionAnalysis;
use tracing::{debug, info};

use crate::canvas::{render_png, Area, ChartResult, Figure};
use crate::charts;
use crate::theme::ChartTheme;

/// Renders every chart of a [`SessionAnalysis`] to PNG.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: PipelineConfig,
    theme: ChartTheme,
}

impl ChartRenderer {
    /// `text_enabled` must only be true once a font has been registered.
    pub fn new(config: &PipelineConfig, text_enabled: bool) -> Self {
        Self {
            config: config.clone(),
            theme: ChartTheme::default().with_text(text_enabled),
        }
    }

    /// Write all applicable charts into the plots directory, returning
    /// the written paths in order. The flow box plot and transition heatmap
    /// are skipped when there are no transitions.
    pub fn render_all(&self, analysis: &SessionAnalysis) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(4);

        written.push(self.render_dead_clicks(analysis)?);
        written.push(self.render_session_duration(analysis)?);

        if analysis.has_transitions() {
            written.push(self.render_flow_boxplot(analysis)?);
            if analysis.matrix.is_empty() {
                debug!("Transition matrix is empty, skipping heatmap");
            } else {
                written.push(self.render_transition_heatmap(analysis)?);
            }
        } else {
            debug!("No transitions, skipping flow box plot and heatmap");
        }

        info!("Rendered {} charts into {}", written.len(), self.config.plots_dir.display());
        Ok(written)
    }

    pub fn render_dead_clicks(&self, analysis: &SessionAnalysis) -> Result<PathBuf> {
        self.render(
            &self.config.charts.dead_clicks,
            charts::DEAD_CLICKS_FIGURE,
            |area, theme| charts::dead_clicks_distribution(area, theme, &analysis.tables.summary),
        )
    }

    pub fn render_session_duration(&self, analysis: &SessionAnalysis) -> Result<PathBuf> {
        self.render(
            &self.config.charts.session_duration,
            charts::SESSION_DURATION_FIGURE,
            |area, theme| charts::session_duration(area, theme, &analysis.tables.summary),
        )
    }

    pub fn render_flow_boxplot(&self, analysis: &SessionAnalysis) -> Result<PathBuf> {
        self.render(
            &self.config.charts.flow_boxplot,
            charts::FLOW_BOXPLOT_FIGURE,
            |area, theme| charts::flow_duration_boxplot(area, theme, &analysis.tables.transitions),
        )
    }

    pub fn render_transition_heatmap(&self, analysis: &SessionAnalysis) -> Result<PathBuf> {
        self.render(
            &self.config.charts.transition_heatmap,
            charts::HEATMAP_FIGURE,
            |area, theme| charts::transition_heatmap(area, theme, &analysis.matrix),
        )
    }

    fn render<F>(&self, file_name: &str, figure: Figure, draw: F) -> Result<PathBuf>
    where
        F: FnOnce(&Area<'_>, &ChartTheme) -> ChartResult,
    {
        std::fs::create_dir_all(&self.config.plots_dir)?;
        let path = self.config.chart_path(file_name);
        render_png(&path, figure, &self.theme.background, |area| draw(area, &self.theme))?;
        debug!("Saved chart {}", path.display());
        Ok(path)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
