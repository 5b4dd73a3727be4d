use ccm::{ReportConfig, build_report, init_logging, load_input, render_json, render_text};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ccm-report")]
#[command(about = "Summarize Monte Carlo cost-effectiveness results")]
struct Args {
    /// JSON file holding one sample record, a map of named records, or a
    /// project assessment with costs
    input: PathBuf,

    /// YAML report configuration (default: built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let config = ReportConfig::load(args.config.as_deref())?;
    let samples = load_input(&args.input)?;
    let report = build_report(&samples, &config);

    let output = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => render_json(&report)?,
    };
    println!("{}", output.trim_end());

    tracing::info!(samples = report.samples.len(), "report written");
    Ok(())
}
