mod bootstrap;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use qoe_charts::ChartRenderer;
use qoe_core::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::parse();
    settings.validate()?;

    bootstrap::setup_logging(settings.tracing_directive())?;

    tracing::info!("QoE report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Results directory: {}", settings.results_dir.display());

    let config = settings.pipeline_config();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(participant) = &settings.participant {
        return pipeline::run_participant(&config, participant, settings.long_pause_ms, &mut out);
    }

    let renderer = if settings.no_charts {
        None
    } else {
        let text_enabled = bootstrap::register_fonts(settings.font.as_deref())?;
        Some(ChartRenderer::new(&config, text_enabled))
    };

    pipeline::run_pipeline(&config, renderer.as_ref(), &mut out)?;
    Ok(())
}
