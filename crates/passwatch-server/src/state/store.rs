//! Application state: the composition root owning the aggregation cache and
//! the route orchestrator.

use crate::aggregator::PassAggregator;
use crate::config::Config;
use crate::orchestrator::RouteOrchestrator;
use crate::sources::{
    DisabledForecastSource, ForecastSource, IdahoSource, MontanaSource, OpenWeatherSource,
    PassDataSource, WsdotSource,
};
use passwatch_upstream::{
    IdahoClient, OpenWeatherClient, OsrmClient, WsdotClient, DEFAULT_IDAHO_BASE_URL,
    DEFAULT_OPENWEATHER_BASE_URL, DEFAULT_WSDOT_BASE_URL,
};
use std::sync::Arc;

pub struct AppState {
    config: Config,
    aggregator: PassAggregator,
    orchestrator: RouteOrchestrator,
}

impl AppState {
    /// Wires up upstream clients, the source registry, and both engines. A
    /// missing provider key disables that provider; the affected data simply
    /// comes back absent.
    pub fn from_config(config: Config) -> Self {
        let mut sources: Vec<Arc<dyn PassDataSource>> = Vec::new();
        match &config.wsdot_api_key {
            Some(key) => {
                sources.push(Arc::new(WsdotSource::new(WsdotClient::new(
                    DEFAULT_WSDOT_BASE_URL,
                    key.clone(),
                ))));
            }
            None => {
                tracing::warn!("WSDOT_API_KEY not set; Washington pass conditions disabled");
            }
        }
        sources.push(Arc::new(IdahoSource::new(IdahoClient::new(
            DEFAULT_IDAHO_BASE_URL,
        ))));
        sources.push(Arc::new(MontanaSource::new()));

        let weather: Arc<dyn ForecastSource> = match &config.openweather_api_key {
            Some(key) => Arc::new(OpenWeatherSource::new(OpenWeatherClient::new(
                DEFAULT_OPENWEATHER_BASE_URL,
                key.clone(),
            ))),
            None => {
                tracing::warn!("OPENWEATHER_API_KEY not set; forecasts and derived conditions disabled");
                Arc::new(DisabledForecastSource)
            }
        };

        let aggregator = PassAggregator::new(sources, weather, config.summary_cache_ttl);
        let orchestrator =
            RouteOrchestrator::new(Arc::new(OsrmClient::new(config.osrm_base_url.clone())));

        Self {
            config,
            aggregator,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn aggregator(&self) -> &PassAggregator {
        &self.aggregator
    }

    pub fn orchestrator(&self) -> &RouteOrchestrator {
        &self.orchestrator
    }
}
