use crate::config::ConfigError;
use crate::remote::error::FetchError;
use crate::sink::error::SinkError;
use crate::state::error::StateError;
use crate::types::schema::SchemaError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Failed building table for dataset '{dataset}'")]
    TableBuild {
        dataset: &'static str,
        #[source]
        source: PolarsError,
    },
}
