use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LOCALEATS_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.yelp_api_key.is_none());
    assert_eq!(
        cfg.search_endpoint,
        "https://api.yelp.com/v3/businesses/search"
    );
    assert_eq!(
        cfg.proxy_url,
        "http://127.0.0.1:3000/api/search/restaurants"
    );
    assert_eq!(cfg.state_path.to_string_lossy(), "./.localeats/state.json");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "localeats/0.1 (restaurant-search)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.rate_limit_per_minute, 120);
}

#[test]
fn build_app_config_reads_api_key() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.yelp_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.yelp_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("secret-key"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCALEATS_BIND_ADDR"),
        "expected InvalidEnvVar(LOCALEATS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_strips_trailing_slash_from_urls() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_SEARCH_ENDPOINT", "http://localhost:9000/search/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_endpoint, "http://localhost:9000/search");
}

#[test]
fn build_app_config_rejects_non_http_proxy_url() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_PROXY_URL", "ftp://example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCALEATS_PROXY_URL"),
        "expected InvalidEnvVar(LOCALEATS_PROXY_URL), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCALEATS_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LOCALEATS_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCALEATS_MAX_RETRIES"),
        "expected InvalidEnvVar(LOCALEATS_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn rate_limit_override() {
    let mut map = HashMap::new();
    map.insert("LOCALEATS_RATE_LIMIT_PER_MINUTE", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.rate_limit_per_minute, 30);
}

#[test]
fn require_yelp_api_key_reports_missing_var() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.require_yelp_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref var) if var == "YELP_API_KEY"));

    let map: HashMap<&str, &str> = [("YELP_API_KEY", "secret")].into_iter().collect();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_yelp_api_key().unwrap(), "secret");
}
