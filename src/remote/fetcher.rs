use crate::remote::client::RemoteClient;
use crate::remote::endpoint::Endpoints;
use crate::remote::error::FetchError;
use crate::remote::series::SeriesResponse;
use crate::types::region::{NationalVariable, Region, SurfaceType};
use log::{info, warn};
use reqwest::StatusCode;

/// Fetches one series per call and turns the response into a
/// [`SeriesResponse`]. A 404 means the combination has no data and yields
/// `Ok(None)`; every other non-success status is an error.
pub struct SeriesFetcher<'a, C> {
    client: &'a C,
    endpoints: &'a Endpoints,
    current_year: i32,
}

impl<'a, C: RemoteClient> SeriesFetcher<'a, C> {
    pub fn new(client: &'a C, endpoints: &'a Endpoints, current_year: i32) -> Self {
        Self {
            client,
            endpoints,
            current_year,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Global series from `start_year` through the current year.
    pub async fn global(
        &self,
        region: Region,
        surface: SurfaceType,
        start_year: i32,
    ) -> Result<Option<SeriesResponse>, FetchError> {
        let url = self
            .endpoints
            .global_url(region, surface, start_year, self.current_year);
        info!(
            "Fetching {} {} series ({}-{})",
            region, surface, start_year, self.current_year
        );
        self.fetch(&url).await
    }

    /// U.S. national series from `start_year` through the current year.
    pub async fn national(
        &self,
        variable: NationalVariable,
        start_year: i32,
    ) -> Result<Option<SeriesResponse>, FetchError> {
        let url = self
            .endpoints
            .national_url(variable, start_year, self.current_year);
        info!(
            "Fetching US {} series ({}-{})",
            variable, start_year, self.current_year
        );
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<Option<SeriesResponse>, FetchError> {
        let response = self.client.get(url).await?;
        if response.status == StatusCode::NOT_FOUND {
            warn!("No data available at {}", url);
            return Ok(None);
        }
        if !response.status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        let body: serde_json::Value =
            serde_json::from_slice(&response.body).map_err(|source| FetchError::JsonParse {
                url: url.to_string(),
                source,
            })?;
        Ok(Some(SeriesResponse::from_json(&body)))
    }
}
