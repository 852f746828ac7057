use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process;
use wod_processor::cli::{Args, setup_logging};
use wod_processor::processor::WodProcessor;
use wod_processor::{ProcessingStats, WodError};

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                let reason = match signal {
                    Ok(()) => "Processing interrupted by user".to_string(),
                    Err(e) => format!("Signal handler failed: {}", e),
                };
                Err(WodError::Interrupted { reason }.into())
            }
        }
    });

    match result {
        Ok(stats) => {
            if stats.files_failed > 0 || !stats.decode.is_successful() {
                eprintln!(
                    "{}",
                    "Completed with failures, see the summary above".bright_yellow()
                );
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ProcessingStats> {
    let config = args.build_config().context("Invalid command-line options")?;

    let processor = WodProcessor::new(args.input_path.clone(), args.output_path.clone())?
        .with_config(config);

    let stats = processor
        .process()
        .await
        .with_context(|| format!("Failed to process {}", args.input_path.display()))?;

    Ok(stats)
}
