//! `location` command handlers.

use clap::Subcommand;
use localeats_core::{AppConfig, Coordinates, LocationObject};
use localeats_search::display::NO_LOCATION_MESSAGE;
use localeats_search::{HttpReverseGeocoder, LocationResolver, StateFile};

#[derive(Debug, Subcommand)]
pub enum LocationCommands {
    /// Show the location searches are anchored to
    Show,
    /// Save a location by hand
    Set {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
        /// Place name shown in search headers, e.g. "Toronto, ON"
        #[arg(long)]
        name: String,
    },
    /// Reverse-geocode device coordinates and save the result.
    /// Without coordinates (geolocation denied) the saved location is kept.
    Detect {
        #[arg(long, allow_hyphen_values = true, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "latitude")]
        longitude: Option<f64>,
    },
    /// Forget the saved location
    Clear,
}

fn print_location(location: Option<&LocationObject>) {
    match location {
        Some(location) => println!(
            "{} ({}, {})",
            location.location_string, location.latitude, location.longitude
        ),
        None => println!("{NO_LOCATION_MESSAGE}"),
    }
}

pub(crate) async fn run_location(
    config: &AppConfig,
    state: StateFile,
    command: LocationCommands,
) -> anyhow::Result<()> {
    let resolver = LocationResolver::new(state);
    match command {
        LocationCommands::Show => print_location(resolver.resolve().as_ref()),
        LocationCommands::Set {
            latitude,
            longitude,
            name,
        } => {
            let location = LocationObject::new(
                Coordinates {
                    latitude,
                    longitude,
                },
                name,
            );
            resolver.submit(location.clone());
            print_location(Some(&location));
        }
        LocationCommands::Detect {
            latitude,
            longitude,
        } => {
            let geocoder = HttpReverseGeocoder::new(
                &config.geocoder_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?;
            let coordinates = latitude.zip(longitude).map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            });
            print_location(resolver.detect(&geocoder, coordinates).await.as_ref());
        }
        LocationCommands::Clear => {
            resolver.clear();
            println!("location cleared");
        }
    }
    Ok(())
}
