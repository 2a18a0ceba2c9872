//! OpenWeatherMap forecast client.
//!
//! Fetches current conditions plus the 5-day/3-hour forecast for a pass
//! location and folds the 3-hour slots into daily summaries.
//! Documentation: https://openweathermap.org/forecast5

use crate::error::UpstreamError;
use chrono::DateTime;
use passwatch_core::models::{PassWeatherForecast, WeatherForecastDay};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const MAX_FORECAST_DAYS: usize = 5;

/// HTTP client for the OpenWeatherMap API.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetches current weather and the 5-day forecast concurrently and
    /// combines them. Returns `Ok(None)` when either payload is unusable.
    pub async fn forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<PassWeatherForecast>, UpstreamError> {
        let current_url = format!(
            "{}/weather?lat={}&lon={}&units=imperial&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let forecast_url = format!(
            "{}/forecast?lat={}&lon={}&units=imperial&cnt=40&appid={}",
            self.base_url, lat, lon, self.api_key
        );

        let (current, forecast) = tokio::join!(
            self.fetch_json(&current_url),
            self.fetch_json(&forecast_url)
        );

        Ok(parse_forecast(&current?, &forecast?))
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, UpstreamError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "openweather",
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Combines a current-weather payload and a 5-day/3-hour forecast payload
/// into a pass forecast. 3-hour slots are grouped by UTC day; each day
/// reports the max of the slot highs, the min of the slot lows, the mean
/// wind, the summed 3-hour rain, and the mid-slot description/icon.
pub fn parse_forecast(current: &Value, forecast: &Value) -> Option<PassWeatherForecast> {
    let current_temp_f = current.get("main")?.get("temp")?.as_f64()?;
    let current_weather = current.get("weather")?.as_array()?.first()?;
    let current_description = current_weather
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let current_icon_code = current_weather
        .get("icon")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let slots = forecast.get("list")?.as_array()?;
    let mut by_day: BTreeMap<chrono::NaiveDate, Vec<&Value>> = BTreeMap::new();
    for slot in slots {
        let Some(dt) = slot.get("dt").and_then(Value::as_i64) else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(dt, 0).map(|t| t.date_naive()) else {
            continue;
        };
        by_day.entry(date).or_default().push(slot);
    }

    let daily_forecasts: Vec<WeatherForecastDay> = by_day
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(|(date, slots)| summarize_day(date, &slots))
        .collect();

    Some(PassWeatherForecast {
        current_temp_f,
        current_description,
        current_icon_code,
        daily_forecasts,
        source_url: None,
    })
}

fn summarize_day(date: chrono::NaiveDate, slots: &[&Value]) -> Option<WeatherForecastDay> {
    let highs: Vec<f64> = slots
        .iter()
        .filter_map(|s| s.get("main")?.get("temp_max")?.as_f64())
        .collect();
    let lows: Vec<f64> = slots
        .iter()
        .filter_map(|s| s.get("main")?.get("temp_min")?.as_f64())
        .collect();
    if highs.is_empty() || lows.is_empty() {
        return None;
    }

    let winds: Vec<f64> = slots
        .iter()
        .filter_map(|s| s.get("wind")?.get("speed")?.as_f64())
        .collect();
    let precipitation_mm: f64 = slots
        .iter()
        .filter_map(|s| s.get("rain")?.get("3h")?.as_f64())
        .sum();

    let mid = slots[slots.len() / 2];
    let mid_weather = mid
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|w| w.first());

    Some(WeatherForecastDay {
        date,
        high_f: highs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        low_f: lows.iter().cloned().fold(f64::INFINITY, f64::min),
        description: mid_weather
            .and_then(|w| w.get("description"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        icon_code: mid_weather
            .and_then(|w| w.get("icon"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        wind_speed_mph: if winds.is_empty() {
            0.0
        } else {
            winds.iter().sum::<f64>() / winds.len() as f64
        },
        precipitation_mm,
    })
}
