use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use velograph::{
    cli::{Cli, OutputFormat},
    config::AnalysisConfig,
    filter::FilterParams,
    json_output, measurement,
    measurement::Measurement,
    report::AnalysisReport,
    text_output,
};

/// Initialize tracing subscriber for debug output
fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load and parse the history file
fn load_history(path: &std::path::Path) -> Result<Vec<Measurement>> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    let mut data: Vec<Measurement> = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse history file {}", path.display()))?;
    measurement::sort_newest_first(&mut data);
    tracing::debug!(records = data.len(), "loaded history");
    Ok(data)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.verbose);

    let config = AnalysisConfig {
        default_window: args.window_size,
        ..AnalysisConfig::default()
    };
    config.validate().map_err(anyhow::Error::msg)?;

    let data = load_history(&args.input)?;
    if data.is_empty() {
        anyhow::bail!("history file {} contains no tests", args.input.display());
    }

    let params = FilterParams {
        period_days: args.days,
        server_id: args.server,
        min_download: args.min_download,
        min_upload: args.min_upload,
    };
    let now = chrono::Local::now().fixed_offset();
    let working_set = params.apply(&data, now);
    if working_set.is_empty() {
        anyhow::bail!("no tests match the given filters");
    }

    let report = AnalysisReport::build(&working_set, &config)
        .context("failed to build analysis report")?;

    let rendered = match args.format {
        OutputFormat::Text => text_output::render_text(&report),
        OutputFormat::Json => json_output::render_json(&report)?,
    };
    print!("{rendered}");

    Ok(())
}
