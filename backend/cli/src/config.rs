use serde::Deserialize;

use mockmate_generation::service::DEFAULT_MODEL;

/// mockmate runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Groq API key. Without it, generation runs on built-in templates.
    pub groq_api_key: Option<String>,
    /// Model requested from the provider.
    pub model: String,
    /// Log level when RUST_LOG is unset.
    pub log_level: String,
    /// Chat session time-to-live, in seconds.
    pub chat_ttl_secs: u64,
    /// Renew the chat deadline on every successful exchange.
    pub chat_sliding_expiry: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            log_level: "info".to_string(),
            chat_ttl_secs: 1800,
            chat_sliding_expiry: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            groq_api_key: std::env::var("GROQ_API_KEY").ok(),
            model: std::env::var("MOCKMATE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            chat_ttl_secs: std::env::var("MOCKMATE_CHAT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            chat_sliding_expiry: std::env::var("MOCKMATE_CHAT_SLIDING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
