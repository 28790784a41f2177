use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{GeoPosition, WeatherSnapshot};

pub mod met_no;
pub mod nominatim;

pub use met_no::MetNoProvider;
pub use nominatim::NominatimGeocoder;

/// Source of current conditions and short-range forecasts.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Snapshots for the next `hours` hours, earliest first. An `hours` of 1
    /// is the plain current-conditions mode.
    async fn forecast(
        &self,
        position: &GeoPosition,
        hours: usize,
    ) -> Result<Vec<WeatherSnapshot>>;
}

/// Turns a position into a human-readable place name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn place_name(&self, position: &GeoPosition) -> Result<String>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    // Cut on a char boundary; error bodies are not guaranteed to be ASCII.
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
