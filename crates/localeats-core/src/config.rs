use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw.trim_end_matches('/').to_string())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{raw}\" is not an http(s) URL"),
            })
        }
    };

    let env = parse_environment(&or_default("LOCALEATS_ENV", "development"))?;

    let bind_addr = or_default("LOCALEATS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "LOCALEATS_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("LOCALEATS_LOG_LEVEL", "info");
    let yelp_api_key = lookup("YELP_API_KEY").ok().filter(|k| !k.trim().is_empty());

    let search_endpoint = parse_url(
        "LOCALEATS_SEARCH_ENDPOINT",
        "https://api.yelp.com/v3/businesses/search",
    )?;
    let proxy_url = parse_url(
        "LOCALEATS_PROXY_URL",
        "http://127.0.0.1:3000/api/search/restaurants",
    )?;
    let geocoder_url = parse_url(
        "LOCALEATS_GEOCODER_URL",
        "https://api.bigdatacloud.net/data/reverse-geocode-client",
    )?;
    let state_path = PathBuf::from(or_default("LOCALEATS_STATE_PATH", "./.localeats/state.json"));

    let request_timeout_secs = parse_u64("LOCALEATS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOCALEATS_USER_AGENT", "localeats/0.1 (restaurant-search)");
    let max_retries = parse_u32("LOCALEATS_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("LOCALEATS_RETRY_BACKOFF_BASE_MS", "500")?;
    let rate_limit_per_minute = parse_usize("LOCALEATS_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        yelp_api_key,
        search_endpoint,
        proxy_url,
        geocoder_url,
        state_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOCALEATS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
