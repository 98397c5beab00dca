//! Canned collaborators shared by the unit tests.

use crate::remote::client::{RemoteClient, RemoteResponse};
use crate::remote::error::FetchError;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves fixed responses by URL; any other URL is a 404.
#[derive(Default)]
pub struct CannedClient {
    responses: HashMap<String, RemoteResponse>,
    requests: Mutex<Vec<String>>,
}

impl CannedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .insert(url.to_string(), RemoteResponse::new(StatusCode::OK, body));
        self
    }

    pub fn with_status(mut self, url: &str, status: StatusCode) -> Self {
        self.responses
            .insert(url.to_string(), RemoteResponse::new(status, Vec::new()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl RemoteClient for CannedClient {
    async fn get(&self, url: &str) -> Result<RemoteResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| RemoteResponse::new(StatusCode::NOT_FOUND, Vec::new())))
    }
}

/// A `data.json` body; `None` leaves the key out of the year object.
pub fn series_body(
    title: &str,
    base_period: &str,
    points: &[(i32, Option<f64>, Option<f64>)],
) -> String {
    let mut data = Map::new();
    for (year, value, anomaly) in points {
        let mut entry = Map::new();
        if let Some(v) = value {
            entry.insert("value".to_string(), json!(v));
        }
        if let Some(a) = anomaly {
            entry.insert("anomaly".to_string(), json!(a));
        }
        data.insert(year.to_string(), Value::Object(entry));
    }
    json!({
        "description": {"title": title, "base_period": base_period},
        "data": data,
    })
    .to_string()
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(6, 30, 0))
        .unwrap()
}
