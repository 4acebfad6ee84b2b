use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use kotagen::{generate, CleanupReport, GenError, TeraRenderer};

#[derive(Parser)]
#[command(
    name = "kotagen",
    version,
    about = "Generate a typed Kotlin client library from an API description"
)]
struct Cli {
    /// API description JSON file
    input: PathBuf,

    /// Output directory; recreated on every run
    #[arg(short, long, default_value = "generated")]
    output: PathBuf,

    /// Renderer options as key=value pairs (e.g. model_package=com.acme.model)
    #[arg(value_name = "KEY=VALUE")]
    renderer_args: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            if !report.failed.is_empty() {
                warn!(
                    failed = report.failed.len(),
                    "some envelope models could not be removed"
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<CleanupReport, GenError> {
    let json = fs::read_to_string(&cli.input).map_err(|e| GenError::io(&cli.input, e))?;
    let renderer = TeraRenderer::with_args(&cli.renderer_args)?;
    generate(&json, &cli.output, &renderer)
}

fn init_tracing() {
    // KOTAGEN_LOG controls log level: "trace", "debug", "info", "warn",
    // "error" or a full tracing filter spec like "kotagen=debug,tera=warn"
    let filter = match std::env::var("KOTAGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("kotagen={level}"),
        Ok(spec) => spec,
        Err(_) => "kotagen=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
