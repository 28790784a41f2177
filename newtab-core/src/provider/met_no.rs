//! MET Norway locationforecast 2.0 (compact) provider.
//!
//! Free, no API key, but the service requires an identifying User-Agent.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{GeoPosition, WeatherSnapshot};
use crate::provider::truncate_body;

use super::ForecastProvider;

const DEFAULT_BASE_URL: &str = "https://api.met.no";
const USER_AGENT: &str = concat!("newtab/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct MetNoProvider {
    http: Client,
    base_url: String,
}

impl MetNoProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    timeseries: Vec<TimeseriesEntry>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesEntry {
    data: TimeseriesData,
}

#[derive(Debug, Deserialize)]
struct TimeseriesData {
    instant: InstantBlock,
    /// Absent on the far tail of the timeseries, where only six-hour
    /// summaries remain.
    next_1_hours: Option<NextHourBlock>,
}

#[derive(Debug, Deserialize)]
struct InstantBlock {
    details: InstantDetails,
}

#[derive(Debug, Deserialize)]
struct InstantDetails {
    air_temperature: f64,
    wind_speed: Option<f64>,
    relative_humidity: Option<f64>,
    wind_from_direction: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NextHourBlock {
    summary: NextHourSummary,
    details: Option<NextHourDetails>,
}

#[derive(Debug, Deserialize)]
struct NextHourSummary {
    symbol_code: String,
}

#[derive(Debug, Deserialize)]
struct NextHourDetails {
    precipitation_amount: Option<f64>,
}

#[async_trait]
impl ForecastProvider for MetNoProvider {
    async fn forecast(
        &self,
        position: &GeoPosition,
        hours: usize,
    ) -> Result<Vec<WeatherSnapshot>> {
        let url = format!("{}/weatherapi/locationforecast/2.0/compact", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("lat", position.latitude), ("lon", position.longitude)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::Http {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)?;

        let snapshots: Vec<WeatherSnapshot> = parsed
            .properties
            .timeseries
            .into_iter()
            .filter_map(|entry| {
                let next_hour = entry.data.next_1_hours?;
                let details = entry.data.instant.details;
                Some(WeatherSnapshot {
                    temperature: details.air_temperature,
                    symbol_code: next_hour.summary.symbol_code,
                    wind_speed: details.wind_speed,
                    humidity: details.relative_humidity,
                    wind_direction_degrees: details.wind_from_direction,
                    precipitation_amount: next_hour
                        .details
                        .and_then(|details| details.precipitation_amount),
                })
            })
            .take(hours.max(1))
            .collect();

        if snapshots.is_empty() {
            return Err(Error::Shape(
                "forecast response contained no usable timeseries entries".to_string(),
            ));
        }

        Ok(snapshots)
    }
}
