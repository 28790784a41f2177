use serde::{Deserialize, Serialize};

/// Temperature unit preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Render a Celsius reading in this unit, rounded to the nearest degree.
    pub fn format_celsius(&self, celsius: f64) -> String {
        match self {
            TemperatureUnit::Celsius => format!("{} °C", celsius.round() as i64),
            TemperatureUnit::Fahrenheit => format!("{} °F", celsius_to_fahrenheit(celsius)),
        }
    }
}

/// Celsius to Fahrenheit, rounded to the nearest whole degree.
pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    (celsius * 9.0 / 5.0 + 32.0).round() as i64
}

/// Geographic position, device-supplied or manually configured. Immutable
/// for the duration of one weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Position rounded to two decimal places, formatted `"{lat},{lon}"`.
    /// Nearby positions land in the same bucket so they share cache entries
    /// instead of fragmenting the cache with near-identical lookups.
    pub fn cache_bucket(&self) -> String {
        format!("{:.2},{:.2}", self.latitude, self.longitude)
    }
}

/// One point-in-time weather reading. Built from a cache hit or a provider
/// response, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Condition plus time-of-day variant, e.g. `clearsky_day`.
    pub symbol_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_degrees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_amount: Option<f64>,
}

const VARIANT_SUFFIXES: [&str; 3] = ["_day", "_night", "_polar_night"];

impl WeatherSnapshot {
    /// Symbol code with its time-of-day variant suffix stripped, suitable as
    /// a localization key. Suffixes are tried in a fixed order and only the
    /// first match is removed; the variants are mutually exclusive in the
    /// provider's vocabulary.
    pub fn condition_code(&self) -> &str {
        for suffix in VARIANT_SUFFIXES {
            if let Some(stripped) = self.symbol_code.strip_suffix(suffix) {
                return stripped;
            }
        }
        &self.symbol_code
    }

    /// Australian Apparent Temperature, rounded to one decimal place.
    ///
    /// `e = (h/100) * 6.105 * exp(17.27*T / (237.7+T))`
    /// `AT = T + 0.33*e - 0.70*v - 4.00`
    ///
    /// Returns `None` when humidity or wind speed is missing.
    pub fn apparent_temperature(&self) -> Option<f64> {
        let humidity = self.humidity?;
        let wind_speed = self.wind_speed?;
        let t = self.temperature;

        let vapor_pressure = (humidity / 100.0) * 6.105 * (17.27 * t / (237.7 + t)).exp();
        let apparent = t + 0.33 * vapor_pressure - 0.70 * wind_speed - 4.00;

        Some((apparent * 10.0).round() / 10.0)
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(symbol_code: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 10.0,
            symbol_code: symbol_code.to_string(),
            wind_speed: None,
            humidity: None,
            wind_direction_degrees: None,
            precipitation_amount: None,
        }
    }

    #[test]
    fn fahrenheit_conversion_rounds_to_nearest_degree() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32);
        assert_eq!(celsius_to_fahrenheit(100.0), 212);
        assert_eq!(celsius_to_fahrenheit(21.6), 71);
        assert_eq!(celsius_to_fahrenheit(-3.2), 26);
    }

    #[test]
    fn temperature_labels_follow_the_unit() {
        assert_eq!(TemperatureUnit::Celsius.format_celsius(21.6), "22 °C");
        assert_eq!(TemperatureUnit::Fahrenheit.format_celsius(21.6), "71 °F");
    }

    #[test]
    fn nearby_positions_share_a_cache_bucket() {
        let a = GeoPosition::new(12.3449, 45.6789);
        let b = GeoPosition::new(12.3412, 45.6791);

        assert_eq!(a.cache_bucket(), "12.34,45.68");
        assert_eq!(a.cache_bucket(), b.cache_bucket());
    }

    #[test]
    fn distant_positions_do_not() {
        let a = GeoPosition::new(12.34, 45.68);
        let b = GeoPosition::new(12.36, 45.68);
        assert_ne!(a.cache_bucket(), b.cache_bucket());
    }

    #[test]
    fn condition_code_strips_variant_suffixes() {
        assert_eq!(snapshot("clearsky_day").condition_code(), "clearsky");
        assert_eq!(snapshot("fair_night").condition_code(), "fair");
        assert_eq!(snapshot("cloudy").condition_code(), "cloudy");
    }

    #[test]
    fn apparent_temperature_matches_the_pinned_formula() {
        let snapshot = WeatherSnapshot {
            temperature: 20.0,
            symbol_code: "clearsky_day".to_string(),
            wind_speed: Some(5.0),
            humidity: Some(50.0),
            wind_direction_degrees: None,
            precipitation_amount: None,
        };

        // Golden value computed once from the formula.
        assert_eq!(snapshot.apparent_temperature(), Some(16.3));
    }

    #[test]
    fn apparent_temperature_needs_humidity_and_wind() {
        let mut s = snapshot("cloudy");
        assert_eq!(s.apparent_temperature(), None);

        s.humidity = Some(50.0);
        assert_eq!(s.apparent_temperature(), None);

        s.wind_speed = Some(2.0);
        assert!(s.apparent_temperature().is_some());
    }

    #[test]
    fn capitalize_first_handles_unicode_and_empty() {
        assert_eq!(capitalize_first("clear sky"), "Clear sky");
        assert_eq!(capitalize_first("överskyet"), "Överskyet");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn snapshot_serde_roundtrip_skips_absent_fields() {
        let s = snapshot("fair_day");
        let value = serde_json::to_value(&s).unwrap();

        assert!(value.get("wind_speed").is_none());
        let back: WeatherSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, s);
    }
}
