mod config;
mod connector;
mod datasets;
mod enumerate;
mod error;
mod pipeline;
mod remote;
mod sink;
mod state;
mod trend;
mod types;
mod utils;

#[cfg(test)]
mod testing;

pub use config::*;
pub use connector::*;
pub use error::ClimateError;
pub use pipeline::*;

pub use datasets::global_anomalies::*;
pub use datasets::precipitation::*;
pub use datasets::regional_trends::*;

pub use enumerate::*;
pub use trend::*;

pub use remote::client::*;
pub use remote::endpoint::*;
pub use remote::fetcher::SeriesFetcher;
pub use remote::series::*;

pub use sink::writer::*;
pub use state::cadence::RefreshCadence;
pub use state::store::*;

pub use types::region::*;
pub use types::schema::{
    DatasetSchema, FieldKind, FieldSpec, SchemaError, GLOBAL_ANOMALY_SCHEMA, PRECIPITATION_SCHEMA,
    REGIONAL_SUMMARY_SCHEMA,
};

pub use remote::error::FetchError;
pub use sink::error::SinkError;
pub use state::error::StateError;
