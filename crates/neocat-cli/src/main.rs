mod cli;
mod error;
mod http;
mod logging;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use neocat_core::Pipeline;

use crate::cli::{Cli, SummaryFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init_logging();

    let source = http::NeoWsClient::new(
        &cli.base_url,
        &cli.api_key,
        Duration::from_millis(cli.timeout_ms),
    );
    let pipeline = Pipeline::new(source, cli.pipeline_config());
    let mut sink = output::CsvSink::create(&cli.output)?;

    tracing::info!(
        dataset = %cli.output.display(),
        report = %cli.report.display(),
        "starting catalog retrieval"
    );

    let outcome = pipeline.run(&mut sink).await;
    let rows = sink.finish()?;

    // Partial results stay on disk even when the run aborts; the report
    // then covers everything processed before the failure.
    let (stats, failure) = match outcome {
        Ok(stats) => (stats, None),
        Err(err) => (*err.partial(), Some(err)),
    };

    let report = output::render_text(&stats);
    std::fs::write(&cli.report, &report)?;

    match cli.format {
        SummaryFormat::Text => println!("{report}"),
        SummaryFormat::Json => println!("{}", output::render_json(&stats)?),
    }

    if let Some(err) = failure {
        tracing::error!(rows, error = %err, "retrieval aborted, partial dataset kept");
        return Err(CliError::Pipeline(err));
    }

    tracing::info!(rows, "dataset written");
    Ok(ExitCode::SUCCESS)
}
