use std::sync::Mutex;

use chrono::Local;
use newtab_core::weather::{CurrentConditions, OutlookHour, WeatherView};

/// Terminal stand-in for the start page's weather container: sections are
/// buffered as each branch renders and printed only on `reveal`, so nothing
/// appears unless both the weather and the location resolved.
#[derive(Debug, Default)]
pub struct TerminalView {
    current: Mutex<Option<CurrentConditions>>,
    outlook: Mutex<Vec<OutlookHour>>,
    location: Mutex<Option<String>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WeatherView for TerminalView {
    fn render_current(&self, current: &CurrentConditions) {
        *self.current.lock().expect("view mutex poisoned") = Some(current.clone());
    }

    fn render_outlook(&self, hours: &[OutlookHour]) {
        *self.outlook.lock().expect("view mutex poisoned") = hours.to_vec();
    }

    fn render_location(&self, name: &str) {
        *self.location.lock().expect("view mutex poisoned") = Some(name.to_string());
    }

    fn reveal(&self) {
        let current = self.current.lock().expect("view mutex poisoned").take();
        let location = self.location.lock().expect("view mutex poisoned").take();
        let outlook = std::mem::take(&mut *self.outlook.lock().expect("view mutex poisoned"));

        if let Some(location) = location {
            println!("{location}");
        }
        if let Some(current) = current {
            println!(
                "{}  {}  [{}]",
                current.temperature_label, current.condition_label, current.symbol_code
            );
        }
        for (offset, hour) in outlook.iter().enumerate() {
            match hour.apparent_temperature {
                Some(feels_like) => println!(
                    "  +{}h  {}  feels like {feels_like} °C  [{}]",
                    offset + 1,
                    hour.temperature_label,
                    hour.symbol_code
                ),
                None => println!(
                    "  +{}h  {}  [{}]",
                    offset + 1,
                    hour.temperature_label,
                    hour.symbol_code
                ),
            }
        }
        println!("as of {}", Local::now().format("%H:%M"));
    }
}
