//! The fixed output schemas of every dataset and the checks that hold each
//! emitted table to them.

use chrono::NaiveDateTime;
use polars::prelude::*;
use thiserror::Error;

/// Semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int32,
    Float64,
    Utf8,
    /// Wall-clock processing time with whole-second precision.
    Timestamp,
}

impl FieldKind {
    pub fn dtype(&self) -> DataType {
        match self {
            FieldKind::Int32 => DataType::Int32,
            FieldKind::Float64 => DataType::Float64,
            FieldKind::Utf8 => DataType::String,
            FieldKind::Timestamp => DataType::Datetime(TimeUnit::Milliseconds, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

const fn field(name: &'static str, kind: FieldKind, nullable: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        nullable,
    }
}

/// An ordered, named, typed field list. Immutable per dataset.
#[derive(Debug, PartialEq, Eq)]
pub struct DatasetSchema {
    pub dataset: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Table for '{dataset}' has {found} columns, schema declares {expected}")]
    ColumnCount {
        dataset: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Column {index} of '{dataset}' is named '{found}', expected '{expected}'")]
    ColumnName {
        dataset: &'static str,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Column '{column}' of '{dataset}' has type {found}, expected {expected}")]
    ColumnType {
        dataset: &'static str,
        column: &'static str,
        expected: DataType,
        found: DataType,
    },

    #[error("Non-nullable column '{column}' of '{dataset}' contains {nulls} null values")]
    UnexpectedNulls {
        dataset: &'static str,
        column: &'static str,
        nulls: usize,
    },
}

impl DatasetSchema {
    pub fn polars_schema(&self) -> Schema {
        Schema::from_iter(
            self.fields
                .iter()
                .map(|f| Field::new(f.name.into(), f.kind.dtype())),
        )
    }

    /// A zero-row table that still carries every column with its declared type.
    pub fn empty_frame(&self) -> DataFrame {
        DataFrame::empty_with_schema(&self.polars_schema())
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Checks field presence, order, type and nullability of `df`.
    pub fn validate(&self, df: &DataFrame) -> Result<(), SchemaError> {
        let columns = df.get_columns();
        if columns.len() != self.fields.len() {
            return Err(SchemaError::ColumnCount {
                dataset: self.dataset,
                expected: self.fields.len(),
                found: columns.len(),
            });
        }

        for (index, (spec, column)) in self.fields.iter().zip(columns).enumerate() {
            if column.name().as_str() != spec.name {
                return Err(SchemaError::ColumnName {
                    dataset: self.dataset,
                    index,
                    expected: spec.name,
                    found: column.name().to_string(),
                });
            }
            let expected = spec.kind.dtype();
            if column.dtype() != &expected {
                return Err(SchemaError::ColumnType {
                    dataset: self.dataset,
                    column: spec.name,
                    expected,
                    found: column.dtype().clone(),
                });
            }
            let nulls = column.null_count();
            if !spec.nullable && nulls > 0 {
                return Err(SchemaError::UnexpectedNulls {
                    dataset: self.dataset,
                    column: spec.name,
                    nulls,
                });
            }
        }
        Ok(())
    }
}

pub static GLOBAL_ANOMALY_SCHEMA: DatasetSchema = DatasetSchema {
    dataset: "noaa_global_temperature_anomalies",
    fields: &[
        field("year", FieldKind::Int32, false),
        field("region", FieldKind::Utf8, false),
        field("surface_type", FieldKind::Utf8, false),
        field("temperature_anomaly_celsius", FieldKind::Float64, false),
        field("base_period", FieldKind::Utf8, true),
        field("description", FieldKind::Utf8, true),
        field("data_source", FieldKind::Utf8, false),
        field("updated_at", FieldKind::Timestamp, false),
    ],
};

pub static REGIONAL_SUMMARY_SCHEMA: DatasetSchema = DatasetSchema {
    dataset: "noaa_regional_climate_summaries",
    fields: &[
        field("region", FieldKind::Utf8, false),
        field("surface_type", FieldKind::Utf8, false),
        field("period_start", FieldKind::Int32, false),
        field("period_end", FieldKind::Int32, false),
        field("avg_temperature_anomaly", FieldKind::Float64, false),
        field("min_temperature_anomaly", FieldKind::Float64, false),
        field("max_temperature_anomaly", FieldKind::Float64, false),
        field("latest_year", FieldKind::Int32, true),
        field("latest_anomaly", FieldKind::Float64, true),
        field("trend_direction", FieldKind::Utf8, false),
        field("trend_magnitude_celsius", FieldKind::Float64, false),
        field("base_period", FieldKind::Utf8, true),
        field("data_points", FieldKind::Int32, false),
        field("updated_at", FieldKind::Timestamp, false),
    ],
};

pub static PRECIPITATION_SCHEMA: DatasetSchema = DatasetSchema {
    dataset: "noaa_us_precipitation",
    fields: &[
        field("year", FieldKind::Int32, false),
        field("region", FieldKind::Utf8, false),
        field("precipitation_inches", FieldKind::Float64, true),
        field("precipitation_anomaly_inches", FieldKind::Float64, true),
        field("temperature_fahrenheit", FieldKind::Float64, true),
        field("temperature_anomaly_fahrenheit", FieldKind::Float64, true),
        field("data_type", FieldKind::Utf8, false),
        field("base_period", FieldKind::Utf8, true),
        field("updated_at", FieldKind::Timestamp, false),
    ],
};

/// Builds a `updated_at`-style column from wall-clock times.
pub(crate) fn timestamp_column(
    name: &str,
    values: impl IntoIterator<Item = NaiveDateTime>,
) -> PolarsResult<Column> {
    let millis: Vec<i64> = values
        .into_iter()
        .map(|t| t.and_utc().timestamp_millis())
        .collect();
    Column::new(name.into(), millis).cast(&FieldKind::Timestamp.dtype())
}
