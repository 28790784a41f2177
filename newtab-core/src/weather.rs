//! Weather orchestration.
//!
//! Given a position, resolve the current conditions and the place name,
//! caching both to keep network traffic bounded, and reveal the weather
//! panel only once both branches have settled. The two branches are
//! independent and run concurrently; `tokio::join!` is the single
//! synchronization point, so the reveal fires exactly once regardless of
//! which branch finishes first.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::ExpiringCache;
use crate::error::{Error, Result};
use crate::model::{GeoPosition, TemperatureUnit, WeatherSnapshot, capitalize_first};
use crate::provider::{ForecastProvider, ReverseGeocoder};
use crate::storage::KeyValueStore;

/// Weather readings go stale quickly.
const WEATHER_TTL_MINUTES: f64 = 5.0;

/// Cache key for conditions at a bucketed position.
pub fn weather_cache_key(position: &GeoPosition) -> String {
    format!("weatherData_{}", position.cache_bucket())
}

/// Cache key for the resolved place name at a bucketed position.
pub fn location_cache_key(position: &GeoPosition) -> String {
    format!("weatherLocation_{}", position.cache_bucket())
}

/// Rendering layer seam. Either branch may call its render method first;
/// `reveal` arrives at most once, only after both have rendered.
pub trait WeatherView: Send + Sync {
    fn render_current(&self, current: &CurrentConditions);
    fn render_outlook(&self, hours: &[OutlookHour]);
    fn render_location(&self, name: &str);
    fn reveal(&self);
}

/// Localized string lookup. `None` makes the orchestrator fall back to the
/// raw condition code.
pub trait Localizer: Send + Sync {
    fn translate(&self, key: &str) -> Option<String>;
}

/// What the view gets for the headline reading.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature_label: String,
    pub symbol_code: String,
    pub condition_label: String,
}

/// One hour of the extended outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlookHour {
    pub temperature_label: String,
    /// Australian Apparent Temperature in °C, when computable.
    pub apparent_temperature: Option<f64>,
    pub symbol_code: String,
    pub precipitation_amount: Option<f64>,
}

/// How a run ended. `revealed` is true only when both branches rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeatherOutcome {
    pub weather_rendered: bool,
    pub location_rendered: bool,
    pub revealed: bool,
}

pub struct WeatherOrchestrator<S> {
    cache: ExpiringCache<S>,
    forecast: Arc<dyn ForecastProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    unit: TemperatureUnit,
    hours: usize,
}

impl<S: KeyValueStore> WeatherOrchestrator<S> {
    pub fn new(
        cache: ExpiringCache<S>,
        forecast: Arc<dyn ForecastProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        Self {
            cache,
            forecast,
            geocoder,
            unit: TemperatureUnit::default(),
            hours: 1,
        }
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Hours of outlook to resolve; 1 renders current conditions only.
    pub fn with_hours(mut self, hours: usize) -> Self {
        self.hours = hours.max(1);
        self
    }

    /// Resolve weather and place name for `position`, rendering each as it
    /// settles and revealing the panel once both have.
    ///
    /// Network failures are logged and leave the affected branch unrendered
    /// (the panel then stays hidden, which is the only failure signal);
    /// storage and data-shape failures propagate.
    pub async fn run(
        &self,
        position: &GeoPosition,
        view: &dyn WeatherView,
        i18n: &dyn Localizer,
    ) -> Result<WeatherOutcome> {
        let (weather, location) = tokio::join!(
            self.resolve_weather(position, view, i18n),
            self.resolve_location(position, view),
        );

        let weather_rendered = settle("weather", weather)?;
        let location_rendered = settle("location", location)?;

        let revealed = weather_rendered && location_rendered;
        if revealed {
            view.reveal();
        }

        Ok(WeatherOutcome {
            weather_rendered,
            location_rendered,
            revealed,
        })
    }

    async fn resolve_weather(
        &self,
        position: &GeoPosition,
        view: &dyn WeatherView,
        i18n: &dyn Localizer,
    ) -> Result<()> {
        let key = weather_cache_key(position);

        let snapshots: Vec<WeatherSnapshot> = match self.cache.get(&key).await? {
            Some(cached) => {
                tracing::debug!(%key, "weather cache hit");
                serde_json::from_value(cached)?
            }
            None => {
                let snapshots = self.forecast.forecast(position, self.hours).await?;
                // Only successful fetches reach this point; failures are
                // never cached.
                self.cache
                    .set(
                        &key,
                        serde_json::to_value(&snapshots)?,
                        Some(WEATHER_TTL_MINUTES),
                    )
                    .await?;
                snapshots
            }
        };

        let current = snapshots
            .first()
            .ok_or_else(|| Error::Shape("no weather snapshots to render".to_string()))?;

        view.render_current(&CurrentConditions {
            temperature_label: self.unit.format_celsius(current.temperature),
            symbol_code: current.symbol_code.clone(),
            condition_label: condition_label(current, i18n),
        });

        if snapshots.len() > 1 {
            let outlook: Vec<OutlookHour> = snapshots
                .iter()
                .map(|snapshot| OutlookHour {
                    temperature_label: self.unit.format_celsius(snapshot.temperature),
                    apparent_temperature: snapshot.apparent_temperature(),
                    symbol_code: snapshot.symbol_code.clone(),
                    precipitation_amount: snapshot.precipitation_amount,
                })
                .collect();
            view.render_outlook(&outlook);
        }

        Ok(())
    }

    async fn resolve_location(&self, position: &GeoPosition, view: &dyn WeatherView) -> Result<()> {
        let key = location_cache_key(position);

        if let Some(cached) = self.cache.get(&key).await? {
            let name: String = serde_json::from_value(cached)?;
            tracing::debug!(%key, "location cache hit");
            view.render_location(&name);
            return Ok(());
        }

        let name = self.geocoder.place_name(position).await?;
        view.render_location(&name);
        self.cache.set(&key, Value::String(name), None).await?;

        Ok(())
    }
}

fn condition_label(snapshot: &WeatherSnapshot, i18n: &dyn Localizer) -> String {
    let code = snapshot.condition_code();
    let label = i18n
        .translate(&format!("weather.{code}"))
        .unwrap_or_else(|| code.replace('_', " "));
    capitalize_first(&label)
}

/// Map a branch result onto "did it render": network failures are swallowed
/// with a warning, everything else propagates.
fn settle(branch: &str, result: Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_network() => {
            tracing::warn!(branch, error = %err, "branch failed, leaving the panel hidden");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
