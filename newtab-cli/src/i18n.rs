use newtab_core::weather::Localizer;

/// Localizer backed by a static lookup table.
#[derive(Debug)]
pub struct StaticTable(&'static [(&'static str, &'static str)]);

impl Localizer for StaticTable {
    fn translate(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

/// Pick the table for a configured language code, falling back to English
/// for codes without a built-in table.
pub fn localizer_for(language: &str) -> &'static dyn Localizer {
    match language {
        "nb" | "nn" | "no" => &NORWEGIAN,
        _ => &ENGLISH,
    }
}

/// English strings for the met.no symbol vocabulary.
pub static ENGLISH: StaticTable = StaticTable(&[
    ("weather.clearsky", "clear sky"),
    ("weather.fair", "fair"),
    ("weather.partlycloudy", "partly cloudy"),
    ("weather.cloudy", "cloudy"),
    ("weather.fog", "fog"),
    ("weather.lightrain", "light rain"),
    ("weather.rain", "rain"),
    ("weather.heavyrain", "heavy rain"),
    ("weather.lightrainshowers", "light rain showers"),
    ("weather.rainshowers", "rain showers"),
    ("weather.heavyrainshowers", "heavy rain showers"),
    ("weather.sleet", "sleet"),
    ("weather.lightsleet", "light sleet"),
    ("weather.heavysleet", "heavy sleet"),
    ("weather.sleetshowers", "sleet showers"),
    ("weather.snow", "snow"),
    ("weather.lightsnow", "light snow"),
    ("weather.heavysnow", "heavy snow"),
    ("weather.snowshowers", "snow showers"),
    ("weather.rainandthunder", "rain and thunder"),
    ("weather.rainshowersandthunder", "rain showers and thunder"),
    ("weather.sleetandthunder", "sleet and thunder"),
    ("weather.snowandthunder", "snow and thunder"),
]);

/// Norwegian (bokmål) strings for the same vocabulary.
pub static NORWEGIAN: StaticTable = StaticTable(&[
    ("weather.clearsky", "klarvær"),
    ("weather.fair", "lettskyet"),
    ("weather.partlycloudy", "delvis skyet"),
    ("weather.cloudy", "skyet"),
    ("weather.fog", "tåke"),
    ("weather.lightrain", "lett regn"),
    ("weather.rain", "regn"),
    ("weather.heavyrain", "kraftig regn"),
    ("weather.lightrainshowers", "lette regnbyger"),
    ("weather.rainshowers", "regnbyger"),
    ("weather.heavyrainshowers", "kraftige regnbyger"),
    ("weather.sleet", "sludd"),
    ("weather.lightsleet", "lett sludd"),
    ("weather.heavysleet", "kraftig sludd"),
    ("weather.sleetshowers", "sluddbyger"),
    ("weather.snow", "snø"),
    ("weather.lightsnow", "lett snø"),
    ("weather.heavysnow", "kraftig snø"),
    ("weather.snowshowers", "snøbyger"),
    ("weather.rainandthunder", "regn og torden"),
    ("weather.rainshowersandthunder", "regnbyger og torden"),
    ("weather.sleetandthunder", "sludd og torden"),
    ("weather.snowandthunder", "snø og torden"),
]);
