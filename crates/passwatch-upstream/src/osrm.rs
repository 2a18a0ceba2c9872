//! OSRM routing oracle client.
//!
//! Queries the OSRM HTTP API (OpenStreetMap data) for driving routes. No API
//! key required; the public demo server allows ~10 req/s fair use, so
//! self-host for anything beyond hobby traffic.

use crate::error::UpstreamError;
use passwatch_core::models::{GeoPoint, OracleRoute, OracleStep, RouteGeometry};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// HTTP client for the OSRM `route` service.
pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Fetches candidate routes through the given ordered waypoints,
    /// alternates included. A non-Ok OSRM code yields an empty list.
    pub async fn fetch_routes(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<OracleRoute>, UpstreamError> {
        let coordinates = waypoints
            .iter()
            .map(|w| format!("{},{}", w.lon, w.lat))
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/driving/{}?alternatives=true&steps=true&geometries=geojson&overview=full&annotations=false",
            self.base_url, coordinates
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "osrm",
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        Ok(parse_routes(&payload))
    }
}

/// Parses an OSRM route response into oracle routes. Tolerant of missing
/// fields; a non-Ok `code` or absent `routes` array parses to empty.
pub fn parse_routes(payload: &Value) -> Vec<OracleRoute> {
    if let Some(code) = payload.get("code").and_then(Value::as_str) {
        if code != "Ok" {
            tracing::warn!("OSRM returned non-Ok code '{}'", code);
            return Vec::new();
        }
    }

    let Some(routes) = payload.get("routes").and_then(Value::as_array) else {
        return Vec::new();
    };

    routes
        .iter()
        .map(|route| OracleRoute {
            distance_m: route.get("distance").and_then(Value::as_f64).unwrap_or(0.0),
            duration_s: route.get("duration").and_then(Value::as_f64).unwrap_or(0.0),
            geometry: parse_geometry(route),
            steps: parse_steps(route),
        })
        .collect()
}

fn parse_geometry(route: &Value) -> Option<RouteGeometry> {
    let coordinates = route
        .get("geometry")?
        .get("coordinates")?
        .as_array()?
        .iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
        })
        .collect::<Vec<_>>();

    (coordinates.len() >= 2).then(|| RouteGeometry::new(coordinates))
}

fn parse_steps(route: &Value) -> Vec<OracleStep> {
    let Some(legs) = route.get("legs").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut steps = Vec::new();
    for leg in legs {
        let Some(leg_steps) = leg.get("steps").and_then(Value::as_array) else {
            continue;
        };
        for step in leg_steps {
            steps.push(OracleStep {
                distance_m: step.get("distance").and_then(Value::as_f64).unwrap_or(0.0),
                highway_ref: step
                    .get("ref")
                    .and_then(Value::as_str)
                    .filter(|r| !r.trim().is_empty())
                    .map(str::to_string),
            });
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_routes_with_geometry_and_steps() {
        let payload = json!({
            "code": "Ok",
            "routes": [{
                "distance": 160934.4,
                "duration": 5400.0,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-122.3, 47.6], [-121.4, 47.42], [-120.5, 47.4]]
                },
                "legs": [{
                    "steps": [
                        {"distance": 100000.0, "ref": "I-90"},
                        {"distance": 200.0, "ref": "I-90;US-2"},
                        {"distance": 60734.4}
                    ]
                }]
            }]
        });

        let routes = parse_routes(&payload);
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.distance_m, 160934.4);
        assert_eq!(route.duration_s, 5400.0);
        assert_eq!(route.geometry.as_ref().unwrap().coordinates.len(), 3);
        assert_eq!(route.steps.len(), 3);
        assert_eq!(route.steps[1].highway_ref.as_deref(), Some("I-90;US-2"));
        assert!(route.steps[2].highway_ref.is_none());
    }

    #[test]
    fn non_ok_code_parses_to_empty() {
        let payload = json!({"code": "NoRoute", "routes": [{"distance": 1.0}]});
        assert!(parse_routes(&payload).is_empty());
    }

    #[test]
    fn missing_routes_array_parses_to_empty() {
        assert!(parse_routes(&json!({"code": "Ok"})).is_empty());
    }

    #[test]
    fn single_point_geometry_is_dropped() {
        let payload = json!({
            "code": "Ok",
            "routes": [{
                "distance": 10.0,
                "duration": 1.0,
                "geometry": {"coordinates": [[-122.3, 47.6]]},
                "legs": []
            }]
        });
        let routes = parse_routes(&payload);
        assert_eq!(routes.len(), 1);
        assert!(routes[0].geometry.is_none());
    }
}
