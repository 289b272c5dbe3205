mod app_config;
mod config;
pub mod filters;
pub mod location;
pub mod results;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{FilterState, HoursFilter, MinRating, PriceLevel, SortBy, MAX_PAGE, PAGE_SIZE};
pub use location::{Coordinates, LocationObject};
pub use results::{HoursLabel, ResultRecord, SearchOutcome};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid {field} filter: \"{value}\"")]
    InvalidFilter { field: &'static str, value: String },
}
