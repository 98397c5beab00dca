//! U.S. national precipitation paired with average temperature, plus
//! decade averages derived from the annual rows.

use crate::pipeline::{Dataset, RunContext};
use crate::remote::client::RemoteClient;
use crate::remote::error::FetchError;
use crate::remote::fetcher::SeriesFetcher;
use crate::remote::series::SeriesResponse;
use crate::state::cadence::RefreshCadence;
use crate::trend::round_to;
use crate::types::region::NationalVariable;
use crate::types::schema::{timestamp_column, DatasetSchema, PRECIPITATION_SCHEMA};
use chrono::NaiveDateTime;
use log::info;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

pub const NATIONAL_START_YEAR: i32 = 1895;
pub const NATIONAL_REGION_LABEL: &str = "United States";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    AnnualAverage,
    DecadeAverage,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::AnnualAverage => "Annual Average",
            RecordKind::DecadeAverage => "Decade Average",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationRecord {
    /// Calendar year, or the first year of the decade for decade rows.
    pub year: i32,
    pub region: String,
    pub precipitation_inches: Option<f64>,
    pub precipitation_anomaly_inches: Option<f64>,
    pub temperature_fahrenheit: Option<f64>,
    pub temperature_anomaly_fahrenheit: Option<f64>,
    pub data_type: RecordKind,
    pub base_period: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct UsPrecipitation {
    pub start_year: i32,
}

impl Default for UsPrecipitation {
    fn default() -> Self {
        Self {
            start_year: NATIONAL_START_YEAR,
        }
    }
}

impl Dataset for UsPrecipitation {
    type Record = PrecipitationRecord;

    const STATE_KEY: &'static str = "precipitation_data";
    const CADENCE: RefreshCadence = RefreshCadence::Monthly;

    fn schema(&self) -> &'static DatasetSchema {
        &PRECIPITATION_SCHEMA
    }

    async fn collect<C: RemoteClient>(
        &self,
        fetcher: &SeriesFetcher<'_, C>,
        ctx: &RunContext,
    ) -> Result<Vec<PrecipitationRecord>, FetchError> {
        let precipitation = fetcher
            .national(NationalVariable::Precipitation, self.start_year)
            .await?;
        let temperature = fetcher
            .national(NationalVariable::AverageTemperature, self.start_year)
            .await?;

        let Some(precipitation) = precipitation else {
            return Ok(Vec::new());
        };

        let mut records = annual_records(&precipitation, temperature.as_ref(), ctx.now);
        info!(
            "Processed {} years of US precipitation data",
            precipitation.series.len()
        );

        let decades = decade_averages(&records, ctx.now);
        info!("Added {} decade average records", decades.len());
        records.extend(decades);
        Ok(records)
    }

    fn to_frame(&self, records: &[PrecipitationRecord]) -> PolarsResult<DataFrame> {
        let floats = |name: &str, get: fn(&PrecipitationRecord) -> Option<f64>| {
            Column::new(name.into(), records.iter().map(get).collect::<Vec<_>>())
        };
        DataFrame::new(vec![
            Column::new("year".into(), records.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new(
                "region".into(),
                records.iter().map(|r| r.region.as_str()).collect::<Vec<_>>(),
            ),
            floats("precipitation_inches", |r| r.precipitation_inches),
            floats("precipitation_anomaly_inches", |r| r.precipitation_anomaly_inches),
            floats("temperature_fahrenheit", |r| r.temperature_fahrenheit),
            floats("temperature_anomaly_fahrenheit", |r| r.temperature_anomaly_fahrenheit),
            Column::new(
                "data_type".into(),
                records.iter().map(|r| r.data_type.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                "base_period".into(),
                records.iter().map(|r| r.base_period.as_deref()).collect::<Vec<_>>(),
            ),
            timestamp_column("updated_at", records.iter().map(|r| r.updated_at))?,
        ])
    }
}

/// One row per precipitation year, left-joined with temperature by year.
pub fn annual_records(
    precipitation: &SeriesResponse,
    temperature: Option<&SeriesResponse>,
    updated_at: NaiveDateTime,
) -> Vec<PrecipitationRecord> {
    let base_period = precipitation.base_period().to_string();
    precipitation
        .series
        .iter()
        .map(|(year, precip)| {
            let temp = temperature.and_then(|t| t.series.get(year));
            PrecipitationRecord {
                year,
                region: NATIONAL_REGION_LABEL.to_string(),
                precipitation_inches: precip.value,
                precipitation_anomaly_inches: precip.anomaly,
                temperature_fahrenheit: temp.and_then(|t| t.value),
                temperature_anomaly_fahrenheit: temp.and_then(|t| t.anomaly),
                data_type: RecordKind::AnnualAverage,
                base_period: Some(base_period.clone()),
                updated_at,
            }
        })
        .collect()
}

/// Averages annual rows per decade, in ascending decade order. Decades with
/// no precipitation value produce no row.
pub fn decade_averages(
    annual: &[PrecipitationRecord],
    updated_at: NaiveDateTime,
) -> Vec<PrecipitationRecord> {
    let mut buckets: BTreeMap<i32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in annual
        .iter()
        .filter(|r| r.data_type == RecordKind::AnnualAverage)
    {
        let (precip, temp) = buckets.entry(record.year.div_euclid(10) * 10).or_default();
        precip.extend(record.precipitation_inches);
        temp.extend(record.temperature_fahrenheit);
    }

    buckets
        .into_iter()
        .filter(|(_, (precip, _))| !precip.is_empty())
        .map(|(decade, (precip, temp))| PrecipitationRecord {
            year: decade,
            region: NATIONAL_REGION_LABEL.to_string(),
            precipitation_inches: Some(round_to(mean(&precip), 2)),
            precipitation_anomaly_inches: None,
            temperature_fahrenheit: (!temp.is_empty()).then(|| round_to(mean(&temp), 2)),
            temperature_anomaly_fahrenheit: None,
            data_type: RecordKind::DecadeAverage,
            base_period: None,
            updated_at,
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
