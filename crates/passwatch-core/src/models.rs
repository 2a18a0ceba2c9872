//! Core data models for the pass tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A WGS-84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// GeoJSON LineString geometry as returned by the routing oracle.
///
/// Coordinates are `[longitude, latitude]` pairs, GeoJSON order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(rename = "type", default = "linestring")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

fn linestring() -> String {
    "LineString".to_string()
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            kind: linestring(),
            coordinates,
        }
    }

    /// Vertex at `index` as a lat/lon point.
    pub fn point(&self, index: usize) -> GeoPoint {
        let [lon, lat] = self.coordinates[index];
        GeoPoint { lat, lon }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// A tracked mountain pass from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassInfo {
    pub id: String,
    pub name: String,
    pub highway: String,
    pub elevation_feet: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    /// True when a state DOT API provides real road condition data for this
    /// pass. False means conditions are derived from weather data only.
    pub has_official_conditions: bool,
}

/// Directional travel restriction reported by an authoritative source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelRestriction {
    #[default]
    None,
    TiresOrTraction,
    ChainsRequired,
    Closed,
}

/// Current road conditions for a pass, either reported by an authoritative
/// source or derived from a weather forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassCondition {
    pub pass_id: String,
    pub road_condition: String,
    pub weather_condition: String,
    pub eastbound_restriction: TravelRestriction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eastbound_restriction_text: Option<String>,
    pub westbound_restriction: TravelRestriction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub westbound_restriction_text: Option<String>,
    pub temperature_f: f64,
    pub last_updated: DateTime<Utc>,
}

/// A live highway camera snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraImage {
    pub camera_id: String,
    pub description: String,
    pub image_url: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecastDay {
    pub date: NaiveDate,
    pub high_f: f64,
    pub low_f: f64,
    pub description: String,
    pub icon_code: String,
    pub wind_speed_mph: f64,
    pub precipitation_mm: f64,
}

/// Weather forecast for a pass location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassWeatherForecast {
    pub current_temp_f: f64,
    pub current_description: String,
    pub current_icon_code: String,
    pub daily_forecasts: Vec<WeatherForecastDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// The cached aggregate served for one pass: catalog entry plus whatever the
/// upstream providers could supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub info: PassInfo,
    pub condition: Option<PassCondition>,
    pub cameras: Vec<CameraImage>,
    pub weather: Option<PassWeatherForecast>,
}

/// A named city or town that can serve as a trip start or end point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEndpoint {
    pub id: String,
    pub name: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Intermediate endpoints routed through in addition to the direct
    /// origin-destination query, to surface corridors the shortest-path
    /// oracle would otherwise omit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_hubs: Vec<String>,
}

/// A named highway corridor (static registry entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighwayInfo {
    pub id: String,
    pub name: String,
    pub highway: String,
}

/// One path step of an oracle route: a distance and an optional highway
/// designation. Concurrent designations arrive semicolon-delimited
/// (e.g. "I-90;US-2" where the two highways share pavement).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleStep {
    pub distance_m: f64,
    #[serde(default)]
    pub highway_ref: Option<String>,
}

/// One candidate route returned by the routing oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: Option<RouteGeometry>,
    pub steps: Vec<OracleStep>,
}

/// A city-to-city route computed by the routing oracle, with mountain passes
/// matched geometrically along the route polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedRoute {
    /// Request-scoped identifier reflecting final rank order ("route-0",
    /// "route-1", ...). Not stable across requests.
    pub id: String,
    /// Display name derived from the primary highways used.
    pub name: String,
    pub highways_used: Vec<String>,
    pub distance_miles: f64,
    pub estimated_minutes: f64,
    pub pass_ids: Vec<String>,
    pub pass_names: Vec<String>,
    /// Miles added relative to the fastest option; `None` on the fastest
    /// route itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_distance_miles: Option<f64>,
    pub geometry: Option<RouteGeometry>,
}
