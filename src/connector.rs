//! Runs the three datasets in order and hands each non-empty table to the sink.

use crate::config::ConnectorConfig;
use crate::datasets::global_anomalies::GlobalAnomalies;
use crate::datasets::precipitation::UsPrecipitation;
use crate::datasets::regional_trends::RegionalTrends;
use crate::error::ClimateError;
use crate::pipeline::{Dataset, Pipeline};
use crate::remote::client::RemoteClient;
use crate::sink::writer::Sink;
use crate::state::store::StateStore;
use bon::bon;
use chrono::{Local, NaiveDateTime};
use log::info;

/// What happened to one dataset during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOutcome {
    pub destination: &'static str,
    pub rows: usize,
    /// False when the table was empty and nothing was sent to the sink.
    pub uploaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub connector_name: String,
    pub run_id: String,
    pub datasets: Vec<DatasetOutcome>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.datasets.iter().map(|d| d.rows).sum()
    }

    pub fn uploads(&self) -> usize {
        self.datasets.iter().filter(|d| d.uploaded).count()
    }
}

pub struct ClimateConnector<C, S, K> {
    config: ConnectorConfig,
    client: C,
    state: S,
    sink: K,
    now: Option<NaiveDateTime>,
}

#[bon]
impl<C: RemoteClient, S: StateStore, K: Sink> ClimateConnector<C, S, K> {
    /// `now` pins the processing time; the local wall clock is used otherwise.
    #[builder]
    pub fn new(
        config: ConnectorConfig,
        client: C,
        state: S,
        sink: K,
        now: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            config,
            client,
            state,
            sink,
            now,
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Validates the configuration, then processes global anomalies,
    /// regional trends and U.S. precipitation in that order. The first
    /// failure aborts the run.
    pub async fn run(&self) -> Result<RunSummary, ClimateError> {
        self.config.validate()?;
        info!(
            "Starting {} run '{}'",
            self.config.connector_name, self.config.run_id
        );

        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        let endpoints = self.config.endpoints();
        let pipeline = Pipeline::new(&self.client, &self.state, &endpoints);

        let datasets = vec![
            self.process(&pipeline, &GlobalAnomalies::default(), now).await?,
            self.process(&pipeline, &RegionalTrends::default(), now).await?,
            self.process(&pipeline, &UsPrecipitation::default(), now).await?,
        ];

        let summary = RunSummary {
            connector_name: self.config.connector_name.clone(),
            run_id: self.config.run_id.clone(),
            datasets,
        };
        info!(
            "Run '{}' finished: {} rows, {} tables uploaded",
            summary.run_id,
            summary.total_rows(),
            summary.uploads()
        );
        Ok(summary)
    }

    async fn process<D: Dataset>(
        &self,
        pipeline: &Pipeline<'_, C, S>,
        dataset: &D,
        now: NaiveDateTime,
    ) -> Result<DatasetOutcome, ClimateError> {
        let df = pipeline.run(dataset, now).await?;
        let destination = dataset.destination();
        let rows = df.height();
        if rows == 0 {
            info!("No new rows for {}, skipping upload", destination);
            return Ok(DatasetOutcome {
                destination,
                rows,
                uploaded: false,
            });
        }

        self.sink.upload(df, destination).await?;
        info!("Uploaded {} rows to {}", rows, destination);
        Ok(DatasetOutcome {
            destination,
            rows,
            uploaded: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::global_anomalies::HISTORY_START_YEAR;
    use crate::datasets::precipitation::NATIONAL_START_YEAR;
    use crate::remote::endpoint::Endpoints;
    use crate::remote::error::FetchError;
    use crate::sink::writer::MemorySink;
    use crate::state::store::{MemoryStateStore, RunState};
    use crate::testing::{at, series_body, CannedClient};
    use crate::types::region::{NationalVariable, Region, SurfaceType};
    use reqwest::StatusCode;

    fn served_client() -> CannedClient {
        let endpoints = Endpoints::default();
        CannedClient::new()
            .with_body(
                &endpoints.global_url(
                    Region::Globe,
                    SurfaceType::LandOcean,
                    HISTORY_START_YEAR,
                    2024,
                ),
                series_body("Global", "1901-2000", &[(2023, None, Some(1.18))]),
            )
            .with_body(
                &endpoints.national_url(NationalVariable::Precipitation, NATIONAL_START_YEAR, 2024),
                series_body("Precipitation", "1901-2000", &[(2023, Some(30.2), Some(0.3))]),
            )
    }

    fn connector(
        config: ConnectorConfig,
        client: CannedClient,
        now: NaiveDateTime,
    ) -> ClimateConnector<CannedClient, MemoryStateStore, MemorySink> {
        ClimateConnector::builder()
            .config(config)
            .client(client)
            .state(MemoryStateStore::new())
            .sink(MemorySink::new())
            .now(now)
            .build()
    }

    #[tokio::test]
    async fn test_uploads_only_non_empty_tables() -> Result<(), ClimateError> {
        let connector = connector(ConnectorConfig::default(), served_client(), at(2024, 7, 9));

        let summary = connector.run().await?;
        assert_eq!(summary.run_id, "local-run");
        assert_eq!(
            summary.datasets,
            vec![
                DatasetOutcome {
                    destination: "noaa_global_temperature_anomalies",
                    rows: 1,
                    uploaded: true
                },
                DatasetOutcome {
                    destination: "noaa_regional_climate_summaries",
                    rows: 0,
                    uploaded: false
                },
                // One annual row plus its decade.
                DatasetOutcome {
                    destination: "noaa_us_precipitation",
                    rows: 2,
                    uploaded: true
                },
            ]
        );
        assert_eq!(summary.total_rows(), 3);

        let uploads = connector.sink().uploads();
        let names: Vec<&str> = uploads.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["noaa_global_temperature_anomalies", "noaa_us_precipitation"]
        );
        assert_eq!(
            connector.state().get("regional_climate_data"),
            Some(RunState::new("2024-07", 0))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_in_same_day_uploads_nothing() -> Result<(), ClimateError> {
        let connector = connector(ConnectorConfig::default(), served_client(), at(2024, 7, 9));
        connector.run().await?;
        let requests = connector.client().requests().len();

        let again = connector.run().await?;
        assert_eq!(again.total_rows(), 0);
        assert_eq!(again.uploads(), 0);
        assert_eq!(connector.client().requests().len(), requests);
        assert_eq!(connector.sink().uploads().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let url = Endpoints::default().global_url(
            Region::NorthernHemisphere,
            SurfaceType::Land,
            HISTORY_START_YEAR,
            2024,
        );
        let client = served_client().with_status(&url, StatusCode::SERVICE_UNAVAILABLE);
        let connector = connector(ConnectorConfig::default(), client, at(2024, 7, 9));

        let result = connector.run().await;
        assert!(matches!(
            result,
            Err(ClimateError::Fetch(FetchError::HttpStatus { status, .. }))
                if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(connector.sink().uploads().is_empty());
        assert_eq!(connector.state().get("global_temperature_anomalies"), None);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_fetching() {
        let config = ConnectorConfig::builder().run_id("").build();
        let connector = connector(config, served_client(), at(2024, 7, 9));

        let result = connector.run().await;
        assert!(matches!(result, Err(ClimateError::Config(_))));
        assert!(connector.client().requests().is_empty());
    }
}
