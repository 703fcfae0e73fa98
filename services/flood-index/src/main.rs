//! Flood severity index CLI.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use flood_index::{Args, Pipeline, RunSummary};

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match run(&args) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            // Failures were already logged by the pipeline as they happened
            if !summary.skipped.is_empty() {
                error!(years = ?summary.skipped, "Years not processed");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    let config = args.pipeline_config()?;
    netcdf_io::silence_hdf5_errors();

    info!(
        data_dir = %args.data_dir.display(),
        thresholds = %args.thresholds.display(),
        bbox = %args.bbox,
        years = ?args.years.0,
        output_dir = %config.output.dir.display(),
        policy = ?config.error_policy,
        "Starting flood index run"
    );

    let mut pipeline = Pipeline::new(&args.data_dir, &args.thresholds, args.bbox, config);
    Ok(pipeline.run(&args.years.0))
}
