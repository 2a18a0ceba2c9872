//! Pass data source registry.
//!
//! Each authoritative provider is wrapped as a `PassDataSource` declaring
//! the pass ids it can serve. The aggregator walks the registry in order and
//! picks the first source that supports a pass; a pass is supported by at
//! most one source. Adding a state means adding one implementation here.

use async_trait::async_trait;
use passwatch_core::models::{CameraImage, PassCondition, PassWeatherForecast};
use passwatch_upstream::{IdahoClient, OpenWeatherClient, UpstreamError, WsdotClient};
use std::collections::HashSet;

/// Internal result of one provider fetch. Keeps "the provider had nothing"
/// distinguishable from "the call failed" for logging, even though both
/// collapse to absence at the API boundary.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed,
}

impl<T> FetchOutcome<T> {
    pub fn from_optional(
        provider: &'static str,
        what: &'static str,
        result: Result<Option<T>, UpstreamError>,
    ) -> Self {
        match result {
            Ok(Some(value)) => Self::Data(value),
            Ok(None) => Self::Empty,
            Err(err) => {
                tracing::warn!("{} {} fetch failed: {}", provider, what, err);
                Self::Failed
            }
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Empty | Self::Failed => None,
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    pub fn from_list(
        provider: &'static str,
        what: &'static str,
        result: Result<Vec<T>, UpstreamError>,
    ) -> Self {
        match result {
            Ok(list) if list.is_empty() => Self::Empty,
            Ok(list) => Self::Data(list),
            Err(err) => {
                tracing::warn!("{} {} fetch failed: {}", provider, what, err);
                Self::Failed
            }
        }
    }

    pub fn into_list(self) -> Vec<T> {
        match self {
            Self::Data(list) => list,
            Self::Empty | Self::Failed => Vec::new(),
        }
    }
}

/// An authoritative condition/camera source for a declared set of passes.
#[async_trait]
pub trait PassDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, pass_id: &str) -> bool;

    /// Current road conditions, or `Ok(None)` when this source does not
    /// publish official condition data (e.g. the Idaho feed).
    async fn condition(&self, pass_id: &str) -> Result<Option<PassCondition>, UpstreamError>;

    /// Live camera images for the pass.
    async fn cameras(&self, pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError>;
}

/// Weather forecast provider used for every pass.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast(
        &self,
        pass_id: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Option<PassWeatherForecast>, UpstreamError>;
}

fn id_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_ascii_lowercase()).collect()
}

/// WSDOT source for the Washington State passes.
pub struct WsdotSource {
    client: WsdotClient,
    supported: HashSet<String>,
}

impl WsdotSource {
    pub fn new(client: WsdotClient) -> Self {
        Self {
            client,
            supported: id_set(&["snoqualmie", "stevens-pass"]),
        }
    }
}

#[async_trait]
impl PassDataSource for WsdotSource {
    fn name(&self) -> &'static str {
        "wsdot"
    }

    fn supports(&self, pass_id: &str) -> bool {
        self.supported.contains(&pass_id.to_ascii_lowercase())
    }

    async fn condition(&self, pass_id: &str) -> Result<Option<PassCondition>, UpstreamError> {
        self.client.pass_condition(pass_id).await
    }

    async fn cameras(&self, pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
        self.client.pass_cameras(pass_id).await
    }
}

/// Idaho 511 source for the Idaho I-90 passes. Idaho publishes cameras but
/// no official condition data.
pub struct IdahoSource {
    client: IdahoClient,
    supported: HashSet<String>,
}

impl IdahoSource {
    pub fn new(client: IdahoClient) -> Self {
        Self {
            client,
            supported: id_set(&["fourth-of-july", "lookout"]),
        }
    }
}

#[async_trait]
impl PassDataSource for IdahoSource {
    fn name(&self) -> &'static str {
        "idaho511"
    }

    fn supports(&self, pass_id: &str) -> bool {
        self.supported.contains(&pass_id.to_ascii_lowercase())
    }

    async fn condition(&self, _pass_id: &str) -> Result<Option<PassCondition>, UpstreamError> {
        Ok(None)
    }

    async fn cameras(&self, pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
        self.client.pass_cameras(pass_id).await
    }
}

/// Scaffold source for Montana passes. MDT 511 publishes an XML condition
/// feed that is not integrated yet, so this source declares its ids and
/// returns nothing; affected passes fall back to weather-derived conditions.
pub struct MontanaSource {
    supported: HashSet<String>,
}

impl MontanaSource {
    pub fn new() -> Self {
        Self {
            supported: id_set(&[
                "marias",
                "logan-pass",
                "chief-joseph-mt",
                "macdonald",
                "rogers-pass-mt",
                "homestake",
            ]),
        }
    }
}

impl Default for MontanaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassDataSource for MontanaSource {
    fn name(&self) -> &'static str {
        "mdt511"
    }

    fn supports(&self, pass_id: &str) -> bool {
        self.supported.contains(&pass_id.to_ascii_lowercase())
    }

    async fn condition(&self, _pass_id: &str) -> Result<Option<PassCondition>, UpstreamError> {
        Ok(None)
    }

    async fn cameras(&self, _pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
        Ok(Vec::new())
    }
}

/// OpenWeatherMap as the forecast source.
pub struct OpenWeatherSource {
    client: OpenWeatherClient,
}

impl OpenWeatherSource {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherSource {
    async fn forecast(
        &self,
        _pass_id: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Option<PassWeatherForecast>, UpstreamError> {
        self.client.forecast(lat, lon).await
    }
}

/// Forecast source used when no weather API key is configured: every lookup
/// is empty, so summaries simply carry no weather and no derived condition.
pub struct DisabledForecastSource;

#[async_trait]
impl ForecastSource for DisabledForecastSource {
    async fn forecast(
        &self,
        _pass_id: &str,
        _lat: f64,
        _lon: f64,
    ) -> Result<Option<PassWeatherForecast>, UpstreamError> {
        Ok(None)
    }
}
