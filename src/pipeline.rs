//! The fetch → shape → validate → gate template shared by every dataset.
//!
//! A [`Dataset`] supplies only its policy: which state key and refresh
//! cadence gate it, which schema its table follows, how it walks its
//! parameter space and how its records become columns. [`Pipeline::run`]
//! owns the control flow around that.

use crate::error::ClimateError;
use crate::remote::client::RemoteClient;
use crate::remote::endpoint::Endpoints;
use crate::remote::error::FetchError;
use crate::remote::fetcher::SeriesFetcher;
use crate::state::cadence::RefreshCadence;
use crate::state::store::StateStore;
use crate::types::schema::DatasetSchema;
use chrono::{Datelike, NaiveDateTime, SubsecRound};
use log::info;
use polars::prelude::{DataFrame, PolarsResult};

/// Facts about the invocation that every record of a run shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    /// Processing time stamped into `updated_at`, whole seconds.
    pub now: NaiveDateTime,
}

impl RunContext {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: now.trunc_subsecs(0),
        }
    }

    pub fn current_year(&self) -> i32 {
        self.now.year()
    }
}

#[allow(async_fn_in_trait)]
pub trait Dataset {
    type Record;

    /// Key of this dataset's [`crate::RunState`].
    const STATE_KEY: &'static str;
    const CADENCE: RefreshCadence;

    fn schema(&self) -> &'static DatasetSchema;

    /// Destination name the finished table is uploaded under.
    fn destination(&self) -> &'static str {
        self.schema().dataset
    }

    /// Queries every combination of the dataset's parameter space and shapes
    /// the responses into records.
    async fn collect<C: RemoteClient>(
        &self,
        fetcher: &SeriesFetcher<'_, C>,
        ctx: &RunContext,
    ) -> Result<Vec<Self::Record>, FetchError>;

    /// Columns in schema order.
    fn to_frame(&self, records: &[Self::Record]) -> PolarsResult<DataFrame>;
}

pub struct Pipeline<'a, C, S> {
    client: &'a C,
    state: &'a S,
    endpoints: &'a Endpoints,
}

impl<'a, C: RemoteClient, S: StateStore> Pipeline<'a, C, S> {
    pub fn new(client: &'a C, state: &'a S, endpoints: &'a Endpoints) -> Self {
        Self {
            client,
            state,
            endpoints,
        }
    }

    /// Runs one dataset. Returns an empty, schema-typed table when a run
    /// already completed in the current period; nothing is fetched or saved
    /// in that case.
    pub async fn run<D: Dataset>(
        &self,
        dataset: &D,
        now: NaiveDateTime,
    ) -> Result<DataFrame, ClimateError> {
        let schema = dataset.schema();
        info!("Processing {}", schema.dataset);

        let state = self.state.load(D::STATE_KEY).await?;
        if D::CADENCE.already_ran(&state, now) {
            info!(
                "{} already updated this period ({} cadence), returning empty table",
                schema.dataset,
                D::CADENCE
            );
            return Ok(schema.empty_frame());
        }

        let ctx = RunContext::new(now);
        let fetcher = SeriesFetcher::new(self.client, self.endpoints, ctx.current_year());
        let records = dataset.collect(&fetcher, &ctx).await?;

        let frame = if records.is_empty() {
            schema.empty_frame()
        } else {
            dataset
                .to_frame(&records)
                .map_err(|source| ClimateError::TableBuild {
                    dataset: schema.dataset,
                    source,
                })?
        };
        schema.validate(&frame)?;

        let next = state.advanced(D::CADENCE.period_key(now), records.len() as u64);
        self.state.save(D::STATE_KEY, &next).await?;

        info!("Processed {} {} records", frame.height(), schema.dataset);
        Ok(frame)
    }
}
