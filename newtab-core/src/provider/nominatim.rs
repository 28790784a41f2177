//! Reverse geocoding via Nominatim (OpenStreetMap).
//!
//! Free and keyless, but aggressively rate limited; callers are expected to
//! cache the resolved name (the orchestrator keeps it for an hour).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::GeoPosition;
use crate::provider::truncate_body;

use super::ReverseGeocoder;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = concat!("newtab/", env!("CARGO_PKG_VERSION"));

/// Fallback when the response names no usable place.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
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
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
}

impl Address {
    /// First populated field wins, from most to least specific.
    fn display_name(self) -> String {
        self.city
            .or(self.town)
            .or(self.village)
            .or(self.hamlet)
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, position: &GeoPosition) -> Result<String> {
        let url = format!("{}/reverse", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("format", "json")])
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

        let parsed: ReverseResponse = serde_json::from_str(&body)?;
        Ok(parsed.address.unwrap_or_default().display_name())
    }
}
