//! Core library for the `newtab` start page.
//!
//! This crate defines:
//! - A keyed durable-store abstraction and a TTL-based expiring cache
//! - Weather and reverse-geocoding providers
//! - The orchestration that resolves both and reveals the weather panel
//!
//! It is used by `newtab-cli`, but can also be reused by other frontends.

pub mod cache;
pub mod error;
pub mod model;
pub mod provider;
pub mod settings;
pub mod storage;
pub mod weather;

pub use cache::{CacheEntry, DEFAULT_TTL_MINUTES, ExpiringCache};
pub use error::{Error, Result};
pub use model::{GeoPosition, TemperatureUnit, WeatherSnapshot, celsius_to_fahrenheit};
pub use provider::{ForecastProvider, MetNoProvider, NominatimGeocoder, ReverseGeocoder};
pub use settings::Settings;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use weather::{Localizer, WeatherOrchestrator, WeatherOutcome, WeatherView};
