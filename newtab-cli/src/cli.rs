use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};

use newtab_core::{
    ExpiringCache, GeoPosition, JsonFileStore, MetNoProvider, NominatimGeocoder, Settings,
    TemperatureUnit, WeatherOrchestrator,
};

use crate::i18n::localizer_for;
use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "newtab", version, about = "Start page weather panel")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather panel for the configured or given position.
    Show {
        /// Latitude override, decimal degrees.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude override, decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Hours of outlook to render (1 = current conditions only).
        #[arg(long)]
        hours: Option<usize>,
    },

    /// Interactively set unit, language, position and outlook length.
    Configure,

    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Drop every cached weather and location entry.
    Flush,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { lat, lon, hours } => show(lat, lon, hours).await,
            Command::Configure => configure(),
            Command::Cache {
                command: CacheCommand::Flush,
            } => flush_cache().await,
        }
    }
}

async fn show(lat: Option<f64>, lon: Option<f64>, hours: Option<usize>) -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let position = match (lat, lon) {
        (Some(lat), Some(lon)) => GeoPosition::new(lat, lon),
        _ => settings.position.ok_or_else(|| {
            anyhow!(
                "No position configured.\n\
                 Hint: run `newtab configure` or pass --lat/--lon."
            )
        })?,
    };

    let store = JsonFileStore::new(JsonFileStore::default_path()?);
    let cache = ExpiringCache::new(store);
    let forecast = Arc::new(MetNoProvider::new()?);
    let geocoder = Arc::new(NominatimGeocoder::new()?);

    let orchestrator = WeatherOrchestrator::new(cache, forecast, geocoder)
        .with_unit(settings.temperature_unit)
        .with_hours(hours.unwrap_or(settings.forecast_hours));

    let view = TerminalView::new();
    let localizer = localizer_for(&settings.language);
    let outcome = orchestrator.run(&position, &view, localizer).await?;

    if !outcome.revealed {
        // Same behavior as the start page: a failed branch leaves the
        // panel hidden.
        println!("Weather is unavailable right now.");
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut settings = Settings::load()?;

    let unit = Select::new("Temperature unit:", vec!["celsius", "fahrenheit"]).prompt()?;
    settings.temperature_unit = match unit {
        "fahrenheit" => TemperatureUnit::Fahrenheit,
        _ => TemperatureUnit::Celsius,
    };

    settings.language = Text::new("Language code:")
        .with_default(&settings.language)
        .prompt()?;

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_help_message("Decimal degrees, e.g. 59.91")
        .prompt()?;
    let longitude = CustomType::<f64>::new("Longitude:")
        .with_help_message("Decimal degrees, e.g. 10.75")
        .prompt()?;
    settings.position = Some(GeoPosition::new(latitude, longitude));

    let hours = CustomType::<usize>::new("Outlook hours (1 = current conditions only):")
        .with_default(settings.forecast_hours)
        .prompt()?;
    settings.forecast_hours = hours.max(1);

    settings.save()?;
    println!(
        "Saved settings to {}",
        Settings::settings_file_path()?.display()
    );

    Ok(())
}

async fn flush_cache() -> anyhow::Result<()> {
    let store = JsonFileStore::new(JsonFileStore::default_path()?);
    let cache = ExpiringCache::new(store);

    cache.flush().await?;
    println!("Cache flushed.");

    Ok(())
}
