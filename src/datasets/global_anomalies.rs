//! Full-history temperature anomalies for every published region and surface.

use crate::enumerate::series_keys;
use crate::pipeline::{Dataset, RunContext};
use crate::remote::client::RemoteClient;
use crate::remote::error::FetchError;
use crate::remote::fetcher::SeriesFetcher;
use crate::state::cadence::RefreshCadence;
use crate::types::region::{Region, SurfaceType};
use crate::types::schema::{timestamp_column, DatasetSchema, GLOBAL_ANOMALY_SCHEMA};
use chrono::NaiveDateTime;
use log::info;
use polars::prelude::*;

pub const DATA_SOURCE: &str = "NOAA Climate at a Glance";
pub const HISTORY_START_YEAR: i32 = 1850;

/// One year of one region/surface anomaly series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRecord {
    pub year: i32,
    pub region: String,
    pub surface_type: String,
    pub temperature_anomaly_celsius: f64,
    pub base_period: Option<String>,
    pub description: Option<String>,
    pub data_source: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct GlobalAnomalies {
    pub regions: Vec<Region>,
    pub surfaces: Vec<SurfaceType>,
    pub start_year: i32,
}

impl Default for GlobalAnomalies {
    fn default() -> Self {
        Self {
            regions: Region::ALL.to_vec(),
            surfaces: SurfaceType::ALL.to_vec(),
            start_year: HISTORY_START_YEAR,
        }
    }
}

impl Dataset for GlobalAnomalies {
    type Record = AnomalyRecord;

    const STATE_KEY: &'static str = "global_temperature_anomalies";
    const CADENCE: RefreshCadence = RefreshCadence::Daily;

    fn schema(&self) -> &'static DatasetSchema {
        &GLOBAL_ANOMALY_SCHEMA
    }

    async fn collect<C: RemoteClient>(
        &self,
        fetcher: &SeriesFetcher<'_, C>,
        ctx: &RunContext,
    ) -> Result<Vec<AnomalyRecord>, FetchError> {
        let mut records = Vec::new();

        for key in series_keys(&self.regions, &self.surfaces) {
            let Some(response) = fetcher.global(key.region, key.surface, self.start_year).await? else {
                continue;
            };

            // Years without an anomaly are dropped, not nulled.
            records.extend(response.series.iter().filter_map(|(year, values)| {
                values.anomaly.map(|anomaly| AnomalyRecord {
                    year,
                    region: key.region.label().to_string(),
                    surface_type: key.surface.label().to_string(),
                    temperature_anomaly_celsius: anomaly,
                    base_period: Some(response.base_period().to_string()),
                    description: Some(response.title().to_string()),
                    data_source: DATA_SOURCE.to_string(),
                    updated_at: ctx.now,
                })
            }));

            info!(
                "Processed {} years for {} - {}",
                response.series.len(),
                key.region.label(),
                key.surface.label()
            );
        }

        Ok(records)
    }

    fn to_frame(&self, records: &[AnomalyRecord]) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new("year".into(), records.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new(
                "region".into(),
                records.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "surface_type".into(),
                records.iter().map(|r| r.surface_type.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "temperature_anomaly_celsius".into(),
                records
                    .iter()
                    .map(|r| r.temperature_anomaly_celsius)
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                "base_period".into(),
                records.iter().map(|r| r.base_period.as_deref()).collect::<Vec<_>>(),
            ),
            Column::new(
                "description".into(),
                records.iter().map(|r| r.description.as_deref()).collect::<Vec<_>>(),
            ),
            Column::new(
                "data_source".into(),
                records.iter().map(|r| r.data_source.as_str()).collect::<Vec<_>>(),
            ),
            timestamp_column("updated_at", records.iter().map(|r| r.updated_at))?,
        ])
    }
}
