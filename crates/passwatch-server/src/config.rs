//! Server configuration from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub osrm_base_url: String,
    /// WSDOT access code; `None` disables the WSDOT condition/camera source.
    pub wsdot_api_key: Option<String>,
    /// OpenWeatherMap key; `None` disables weather forecasts and with them
    /// the derived-condition fallback.
    pub openweather_api_key: Option<String>,
    pub summary_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PASSWATCH_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5170),
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| passwatch_upstream::DEFAULT_OSRM_BASE_URL.to_string()),
            wsdot_api_key: env::var("WSDOT_API_KEY").ok().filter(|k| !k.is_empty()),
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            summary_cache_ttl: Duration::from_secs(
                env::var("PASSWATCH_CACHE_TTL_S")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}
