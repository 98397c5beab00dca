use log::{error, info};
use noaa_climate::{
    ClimateConnector, ClimateError, ConnectorConfig, FileStateStore, HttpClient, ParquetSink,
};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ClimateError> {
    let config = ConnectorConfig::from_env()?;
    config.validate()?;

    let client = HttpClient::builder()
        .timeout(config.request_timeout)
        .maybe_cache_dir(config.http_cache_dir())
        .build()?;
    let state = FileStateStore::new(config.state_dir());
    let sink = ParquetSink::new(config.output_dir(), config.run_id.clone());

    let connector = ClimateConnector::builder()
        .config(config)
        .client(client)
        .state(state)
        .sink(sink)
        .build();

    let summary = connector.run().await?;
    for outcome in &summary.datasets {
        info!(
            "{}: {} rows{}",
            outcome.destination,
            outcome.rows,
            if outcome.uploaded { "" } else { " (not uploaded)" }
        );
    }
    Ok(())
}
