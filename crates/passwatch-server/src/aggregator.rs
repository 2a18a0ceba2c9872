//! Pass data aggregation with single-flight TTL caching.
//!
//! For each pass the aggregator fans out to the pass's authoritative data
//! source (if any) and the weather provider, derives a fallback condition
//! when no authoritative report exists, and memoizes the assembled summary.
//! Population is serialized per pass id so concurrent requests for the same
//! pass issue one set of upstream calls, while requests for different
//! passes never block each other.

use crate::cache::{self, TtlEntry};
use crate::sources::{FetchOutcome, ForecastSource, PassDataSource};
use dashmap::DashMap;
use futures::future::join_all;
use passwatch_core::models::{CameraImage, PassCondition, PassInfo, PassSummary, PassWeatherForecast};
use passwatch_core::{catalog, condition};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CachedSummary {
    summary: PassSummary,
    fetched_at: Instant,
}

impl TtlEntry for CachedSummary {
    fn fetched_at(&self) -> Instant {
        self.fetched_at
    }
}

pub struct PassAggregator {
    sources: Vec<Arc<dyn PassDataSource>>,
    weather: Arc<dyn ForecastSource>,
    cache: DashMap<String, CachedSummary>,
    // One mutex per pass id, created lazily and never removed. The key space
    // is bounded by the static catalog.
    population_locks: DashMap<String, Arc<Mutex<()>>>,
    ttl: Duration,
}

impl PassAggregator {
    pub fn new(
        sources: Vec<Arc<dyn PassDataSource>>,
        weather: Arc<dyn ForecastSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            sources,
            weather,
            cache: DashMap::new(),
            population_locks: DashMap::new(),
            ttl,
        }
    }

    /// Returns the summary for one pass, populating the cache on miss.
    /// Unknown pass ids return `None` without any provider call.
    pub async fn pass_summary(&self, pass_id: &str) -> Option<PassSummary> {
        let key = pass_id.to_ascii_lowercase();

        if let Some(summary) = self.cached(&key) {
            return Some(summary);
        }

        let lock = self
            .population_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another caller may have populated the entry while we waited.
        if let Some(summary) = self.cached(&key) {
            return Some(summary);
        }

        let info = catalog::pass_by_id(&key)?;
        let summary = self.fetch_summary(info).await;
        self.cache.insert(
            key,
            CachedSummary {
                summary: summary.clone(),
                fetched_at: Instant::now(),
            },
        );
        Some(summary)
    }

    /// Fetches summaries for many passes concurrently, dropping unknown ids.
    pub async fn pass_summaries(&self, pass_ids: &[String]) -> Vec<PassSummary> {
        join_all(pass_ids.iter().map(|id| self.pass_summary(id)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Evicts expired cache entries. Called from the background prune loop.
    pub fn prune_expired(&self) {
        cache::prune_expired(&self.cache, self.ttl);
    }

    pub fn cached_summary_count(&self) -> usize {
        self.cache.len()
    }

    fn cached(&self, key: &str) -> Option<PassSummary> {
        let entry = self.cache.get(key)?;
        (entry.fetched_at.elapsed() <= self.ttl).then(|| entry.summary.clone())
    }

    async fn fetch_summary(&self, info: &PassInfo) -> PassSummary {
        let source = self.sources.iter().find(|s| s.supports(&info.id));

        let (condition_outcome, cameras_outcome, weather_outcome) = tokio::join!(
            self.fetch_condition(source, &info.id),
            self.fetch_cameras(source, &info.id),
            self.fetch_forecast(info),
        );

        let weather = weather_outcome.into_option();

        // No authoritative report (unsupported pass, or the provider had
        // nothing): synthesize a condition from the current forecast.
        let condition = condition_outcome.into_option().or_else(|| {
            weather
                .as_ref()
                .map(|w| condition::derive_condition(&info.id, w))
        });

        PassSummary {
            info: info.clone(),
            condition,
            cameras: cameras_outcome.into_list(),
            weather,
        }
    }

    async fn fetch_condition(
        &self,
        source: Option<&Arc<dyn PassDataSource>>,
        pass_id: &str,
    ) -> FetchOutcome<PassCondition> {
        match source {
            Some(source) => FetchOutcome::from_optional(
                source.name(),
                "condition",
                source.condition(pass_id).await,
            ),
            None => FetchOutcome::Empty,
        }
    }

    async fn fetch_cameras(
        &self,
        source: Option<&Arc<dyn PassDataSource>>,
        pass_id: &str,
    ) -> FetchOutcome<Vec<CameraImage>> {
        match source {
            Some(source) => {
                FetchOutcome::from_list(source.name(), "cameras", source.cameras(pass_id).await)
            }
            None => FetchOutcome::Empty,
        }
    }

    async fn fetch_forecast(&self, info: &PassInfo) -> FetchOutcome<PassWeatherForecast> {
        FetchOutcome::from_optional(
            "weather",
            "forecast",
            self.weather
                .forecast(&info.id, info.latitude, info.longitude)
                .await,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use passwatch_core::models::TravelRestriction;
    use passwatch_upstream::UpstreamError;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    fn sample_condition(pass_id: &str) -> PassCondition {
        PassCondition {
            pass_id: pass_id.to_string(),
            road_condition: "Bare and dry".to_string(),
            weather_condition: "Clear".to_string(),
            eastbound_restriction: TravelRestriction::None,
            eastbound_restriction_text: None,
            westbound_restriction: TravelRestriction::None,
            westbound_restriction_text: None,
            temperature_f: 30.0,
            last_updated: Utc::now(),
        }
    }

    fn sample_forecast(description: &str, temp_f: f64) -> PassWeatherForecast {
        PassWeatherForecast {
            current_temp_f: temp_f,
            current_description: description.to_string(),
            current_icon_code: "01d".to_string(),
            daily_forecasts: Vec::new(),
            source_url: None,
        }
    }

    struct MockSource {
        supported: HashSet<String>,
        condition: Option<PassCondition>,
        fail: bool,
        condition_calls: AtomicUsize,
        camera_calls: AtomicUsize,
        requested_ids: StdMutex<Vec<String>>,
    }

    impl MockSource {
        fn new(ids: &[&str], condition: Option<PassCondition>) -> Arc<Self> {
            Arc::new(Self {
                supported: ids.iter().map(|s| s.to_string()).collect(),
                condition,
                fail: false,
                condition_calls: AtomicUsize::new(0),
                camera_calls: AtomicUsize::new(0),
                requested_ids: StdMutex::new(Vec::new()),
            })
        }

        fn failing(ids: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                supported: ids.iter().map(|s| s.to_string()).collect(),
                condition: None,
                fail: true,
                condition_calls: AtomicUsize::new(0),
                camera_calls: AtomicUsize::new(0),
                requested_ids: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PassDataSource for MockSource {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn supports(&self, pass_id: &str) -> bool {
            self.supported.contains(pass_id)
        }

        async fn condition(&self, pass_id: &str) -> Result<Option<PassCondition>, UpstreamError> {
            self.condition_calls.fetch_add(1, Ordering::SeqCst);
            self.requested_ids.lock().unwrap().push(pass_id.to_string());
            if self.fail {
                return Err(UpstreamError::Status {
                    service: "mock",
                    status: 503,
                });
            }
            Ok(self.condition.clone())
        }

        async fn cameras(&self, _pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
            self.camera_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpstreamError::Status {
                    service: "mock",
                    status: 503,
                });
            }
            Ok(Vec::new())
        }
    }

    struct MockForecast {
        forecast: Option<PassWeatherForecast>,
        calls: AtomicUsize,
    }

    impl MockForecast {
        fn new(forecast: Option<PassWeatherForecast>) -> Arc<Self> {
            Arc::new(Self {
                forecast,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ForecastSource for MockForecast {
        async fn forecast(
            &self,
            _pass_id: &str,
            _lat: f64,
            _lon: f64,
        ) -> Result<Option<PassWeatherForecast>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.forecast.clone())
        }
    }

    fn aggregator(
        sources: Vec<Arc<dyn PassDataSource>>,
        weather: Arc<dyn ForecastSource>,
        ttl: Duration,
    ) -> PassAggregator {
        PassAggregator::new(sources, weather, ttl)
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let source = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let weather = MockForecast::new(Some(sample_forecast("clear sky", 40.0)));
        let agg = aggregator(
            vec![source.clone()],
            weather.clone(),
            Duration::from_secs(300),
        );

        assert!(agg.pass_summary("snoqualmie").await.is_some());
        assert!(agg.pass_summary("snoqualmie").await.is_some());

        assert_eq!(source.condition_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.camera_calls.load(Ordering::SeqCst), 1);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_pass_returns_none_without_provider_calls() {
        let source = MockSource::new(&["snoqualmie"], None);
        let weather = MockForecast::new(None);
        let agg = aggregator(
            vec![source.clone()],
            weather.clone(),
            Duration::from_secs(300),
        );

        assert!(agg.pass_summary("not-a-pass").await.is_none());
        assert_eq!(source.condition_calls.load(Ordering::SeqCst), 0);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_callers_trigger_a_single_population() {
        let source = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let weather = MockForecast::new(Some(sample_forecast("clear sky", 40.0)));
        let agg = Arc::new(aggregator(
            vec![source.clone()],
            weather.clone(),
            Duration::from_secs(300),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let agg = agg.clone();
                tokio::spawn(async move { agg.pass_summary("snoqualmie").await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_some());
        }

        assert_eq!(source.condition_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.camera_calls.load(Ordering::SeqCst), 1);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_is_isolated_per_pass() {
        let wa = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let idaho = MockSource::new(&["fourth-of-july"], None);
        let weather = MockForecast::new(Some(sample_forecast("clear sky", 40.0)));
        let agg = aggregator(
            vec![wa.clone(), idaho.clone()],
            weather.clone(),
            Duration::from_secs(300),
        );

        agg.pass_summary("snoqualmie").await.unwrap();
        agg.pass_summary("fourth-of-july").await.unwrap();
        agg.pass_summary("snoqualmie").await.unwrap();

        assert_eq!(wa.condition_calls.load(Ordering::SeqCst), 1);
        assert_eq!(idaho.condition_calls.load(Ordering::SeqCst), 1);
        // The WA source was never asked about the Idaho pass.
        assert_eq!(
            *wa.requested_ids.lock().unwrap(),
            vec!["snoqualmie".to_string()]
        );
    }

    #[tokio::test]
    async fn expired_entry_is_repopulated() {
        let source = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let weather = MockForecast::new(None);
        let agg = aggregator(
            vec![source.clone()],
            weather.clone(),
            Duration::from_millis(50),
        );

        agg.pass_summary("snoqualmie").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        agg.pass_summary("snoqualmie").await.unwrap();

        assert_eq!(source.condition_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_authoritative_condition_is_derived_from_weather() {
        // fourth-of-july's source has cameras but no official conditions
        let idaho = MockSource::new(&["fourth-of-july"], None);
        let weather = MockForecast::new(Some(sample_forecast("blizzard", 25.0)));
        let agg = aggregator(vec![idaho], weather, Duration::from_secs(300));

        let summary = agg.pass_summary("fourth-of-july").await.unwrap();
        let condition = summary.condition.expect("derived condition");
        assert_eq!(condition.road_condition, "Icy / Snow packed");
        assert_eq!(condition.eastbound_restriction, TravelRestriction::None);
        assert!(summary.weather.is_some());
    }

    #[tokio::test]
    async fn authoritative_condition_wins_over_derivation() {
        let source = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let weather = MockForecast::new(Some(sample_forecast("blizzard", 10.0)));
        let agg = aggregator(vec![source], weather, Duration::from_secs(300));

        let summary = agg.pass_summary("snoqualmie").await.unwrap();
        assert_eq!(summary.condition.unwrap().road_condition, "Bare and dry");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_absence() {
        let source = MockSource::failing(&["snoqualmie"]);
        let weather = MockForecast::new(Some(sample_forecast("light rain", 35.0)));
        let agg = aggregator(vec![source], weather, Duration::from_secs(300));

        let summary = agg.pass_summary("snoqualmie").await.unwrap();
        assert!(summary.cameras.is_empty());
        // The failed condition fetch falls back to the weather derivation.
        assert_eq!(summary.condition.unwrap().road_condition, "Bare and wet");
    }

    #[tokio::test]
    async fn no_sources_and_no_weather_still_returns_the_catalog_entry() {
        let weather = MockForecast::new(None);
        let agg = aggregator(Vec::new(), weather, Duration::from_secs(300));

        let summary = agg.pass_summary("rainy-pass").await.unwrap();
        assert_eq!(summary.info.id, "rainy-pass");
        assert!(summary.condition.is_none());
        assert!(summary.cameras.is_empty());
        assert!(summary.weather.is_none());
    }

    #[tokio::test]
    async fn batch_lookup_drops_unknown_ids() {
        let source = MockSource::new(&["snoqualmie"], Some(sample_condition("snoqualmie")));
        let weather = MockForecast::new(None);
        let agg = aggregator(vec![source], weather, Duration::from_secs(300));

        let summaries = agg
            .pass_summaries(&[
                "snoqualmie".to_string(),
                "not-a-pass".to_string(),
                "rainy-pass".to_string(),
            ])
            .await;

        let ids: Vec<&str> = summaries.iter().map(|s| s.info.id.as_str()).collect();
        assert_eq!(ids, vec!["snoqualmie", "rainy-pass"]);
    }
}
