//! The year-keyed JSON payload served by Climate at a Glance, parsed
//! permissively: absent metadata and odd values degrade to defaults instead of
//! failing the run.

use log::warn;
use serde_json::Value;
use std::collections::BTreeMap;

/// Base period reported when a payload omits one.
pub const DEFAULT_BASE_PERIOD: &str = "1901-2000";

/// The measured value and its deviation from the base period for one year.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YearValue {
    pub value: Option<f64>,
    pub anomaly: Option<f64>,
}

impl YearValue {
    pub fn new(value: Option<f64>, anomaly: Option<f64>) -> Self {
        Self { value, anomaly }
    }

    fn from_json(raw: &Value) -> Self {
        Self {
            value: raw.get("value").and_then(lenient_number),
            anomaly: raw.get("anomaly").and_then(lenient_number),
        }
    }
}

/// Values for one series ordered chronologically by year.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearlySeries(BTreeMap<i32, YearValue>);

impl YearlySeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, year: i32) -> Option<&YearValue> {
        self.0.get(&year)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &YearValue)> {
        self.0.iter().map(|(year, v)| (*year, v))
    }

    /// The highest year present.
    pub fn latest(&self) -> Option<(i32, &YearValue)> {
        self.0.iter().next_back().map(|(year, v)| (*year, v))
    }
}

impl FromIterator<(i32, YearValue)> for YearlySeries {
    fn from_iter<I: IntoIterator<Item = (i32, YearValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A parsed `data.json` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesResponse {
    pub title: Option<String>,
    pub base_period: Option<String>,
    pub series: YearlySeries,
}

impl SeriesResponse {
    pub fn from_json(body: &Value) -> Self {
        let description = body.get("description");
        let text = |key: &str| {
            description
                .and_then(|d| d.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let series = match body.get("data").and_then(Value::as_object) {
            Some(entries) => entries
                .iter()
                .filter_map(|(key, raw)| match parse_year_key(key) {
                    Some(year) => Some((year, YearValue::from_json(raw))),
                    None => {
                        warn!("Skipping unparseable year key '{}'", key);
                        None
                    }
                })
                .collect(),
            None => YearlySeries::default(),
        };

        Self {
            title: text("title"),
            base_period: text("base_period"),
            series,
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn base_period(&self) -> &str {
        self.base_period.as_deref().unwrap_or(DEFAULT_BASE_PERIOD)
    }
}

/// Accepts `YYYY` and NOAA's `YYYYMM` period-ending keys.
pub fn parse_year_key(key: &str) -> Option<i32> {
    let key = key.trim();
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match key.len() {
        4 => key.parse().ok(),
        6 => key[..4].parse().ok(),
        _ => None,
    }
}

fn lenient_number(raw: &Value) -> Option<f64> {
    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
