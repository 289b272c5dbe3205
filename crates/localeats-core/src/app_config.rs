use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Business-search API key. Only the proxy server needs it.
    pub yelp_api_key: Option<String>,
    pub search_endpoint: String,
    pub proxy_url: String,
    pub geocoder_url: String,
    /// JSON file holding the saved location, filters and bookmarks.
    pub state_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// The business-search API key, for the processes that call upstream
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `YELP_API_KEY` is unset or blank.
    pub fn require_yelp_api_key(&self) -> Result<&str, ConfigError> {
        self.yelp_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("YELP_API_KEY".to_owned()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "yelp_api_key",
                &self.yelp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_endpoint", &self.search_endpoint)
            .field("proxy_url", &self.proxy_url)
            .field("geocoder_url", &self.geocoder_url)
            .field("state_path", &self.state_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
