//! Recent-window trend summaries per region, surface and lookback period.

use crate::enumerate::{trend_keys, LOOKBACK_PERIODS};
use crate::pipeline::{Dataset, RunContext};
use crate::remote::client::RemoteClient;
use crate::remote::error::FetchError;
use crate::remote::fetcher::SeriesFetcher;
use crate::state::cadence::RefreshCadence;
use crate::trend::{trend_statistics, TrendDirection};
use crate::types::region::{Region, SurfaceType};
use crate::types::schema::{timestamp_column, DatasetSchema, REGIONAL_SUMMARY_SCHEMA};
use chrono::NaiveDateTime;
use log::info;
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummaryRecord {
    pub region: String,
    pub surface_type: String,
    pub period_start: i32,
    pub period_end: i32,
    pub avg_temperature_anomaly: f64,
    pub min_temperature_anomaly: f64,
    pub max_temperature_anomaly: f64,
    pub latest_year: Option<i32>,
    pub latest_anomaly: Option<f64>,
    pub trend_direction: TrendDirection,
    pub trend_magnitude_celsius: f64,
    pub base_period: Option<String>,
    pub data_points: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct RegionalTrends {
    pub regions: Vec<Region>,
    pub surfaces: Vec<SurfaceType>,
    /// Lookback windows in years.
    pub periods: Vec<i32>,
}

impl Default for RegionalTrends {
    fn default() -> Self {
        Self {
            regions: Region::ALL.to_vec(),
            surfaces: SurfaceType::ALL.to_vec(),
            periods: LOOKBACK_PERIODS.to_vec(),
        }
    }
}

impl Dataset for RegionalTrends {
    type Record = TrendSummaryRecord;

    const STATE_KEY: &'static str = "regional_climate_data";
    const CADENCE: RefreshCadence = RefreshCadence::Monthly;

    fn schema(&self) -> &'static DatasetSchema {
        &REGIONAL_SUMMARY_SCHEMA
    }

    async fn collect<C: RemoteClient>(
        &self,
        fetcher: &SeriesFetcher<'_, C>,
        ctx: &RunContext,
    ) -> Result<Vec<TrendSummaryRecord>, FetchError> {
        let current_year = ctx.current_year();
        let mut records = Vec::new();

        for key in trend_keys(&self.regions, &self.surfaces, &self.periods) {
            let (region, surface) = (key.series.region, key.series.surface);
            let period_start = current_year - key.period;
            let Some(response) = fetcher.global(region, surface, period_start).await? else {
                continue;
            };
            let Some(stats) = trend_statistics(&response.series) else {
                continue;
            };

            records.push(TrendSummaryRecord {
                region: region.label().to_string(),
                surface_type: surface.label().to_string(),
                period_start,
                period_end: current_year,
                avg_temperature_anomaly: stats.avg_anomaly,
                min_temperature_anomaly: stats.min_anomaly,
                max_temperature_anomaly: stats.max_anomaly,
                latest_year: Some(stats.latest_year),
                latest_anomaly: Some(stats.latest_anomaly),
                trend_direction: stats.direction,
                trend_magnitude_celsius: stats.magnitude,
                base_period: Some(response.base_period().to_string()),
                data_points: i32::try_from(response.series.len()).unwrap_or(i32::MAX),
                updated_at: ctx.now,
            });
            info!(
                "Summarized {} - {} over {} years: {}",
                region.label(),
                surface.label(),
                key.period,
                stats.direction
            );
        }

        Ok(records)
    }

    fn to_frame(&self, records: &[TrendSummaryRecord]) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Column::new(
                "region".into(),
                records.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "surface_type".into(),
                records.iter().map(|r| r.surface_type.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "period_start".into(),
                records.iter().map(|r| r.period_start).collect::<Vec<_>>(),
            ),
            Column::new(
                "period_end".into(),
                records.iter().map(|r| r.period_end).collect::<Vec<_>>(),
            ),
            Column::new(
                "avg_temperature_anomaly".into(),
                records.iter().map(|r| r.avg_temperature_anomaly).collect::<Vec<_>>(),
            ),
            Column::new(
                "min_temperature_anomaly".into(),
                records.iter().map(|r| r.min_temperature_anomaly).collect::<Vec<_>>(),
            ),
            Column::new(
                "max_temperature_anomaly".into(),
                records.iter().map(|r| r.max_temperature_anomaly).collect::<Vec<_>>(),
            ),
            Column::new(
                "latest_year".into(),
                records.iter().map(|r| r.latest_year).collect::<Vec<_>>(),
            ),
            Column::new(
                "latest_anomaly".into(),
                records.iter().map(|r| r.latest_anomaly).collect::<Vec<_>>(),
            ),
            Column::new(
                "trend_direction".into(),
                records
                    .iter()
                    .map(|r| r.trend_direction.as_str())
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                "trend_magnitude_celsius".into(),
                records.iter().map(|r| r.trend_magnitude_celsius).collect::<Vec<_>>(),
            ),
            Column::new(
                "base_period".into(),
                records.iter().map(|r| r.base_period.as_deref()).collect::<Vec<_>>(),
            ),
            Column::new(
                "data_points".into(),
                records.iter().map(|r| r.data_points).collect::<Vec<_>>(),
            ),
            timestamp_column("updated_at", records.iter().map(|r| r.updated_at))?,
        ])
    }
}
