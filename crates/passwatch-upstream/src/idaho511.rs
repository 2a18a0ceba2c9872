//! Idaho 511 camera client.
//!
//! Fetches highway camera images for the Idaho I-90 passes from the public
//! 511 map feed. No API key required; camera snapshots are served directly
//! by item id.

use crate::error::UpstreamError;
use chrono::Utc;
use passwatch_core::models::CameraImage;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_IDAHO_BASE_URL: &str = "https://511.idaho.gov";

const MAP_ICONS_PATH: &str = "/map/mapIcons/Cameras";
const CAMERA_IMAGE_PATH: &str = "/map/Cctv/";

/// Pass center coordinates and search radius in degrees (≈ miles / 69).
struct PassArea {
    lat: f64,
    lon: f64,
    radius_deg: f64,
    label: &'static str,
}

fn pass_area(pass_id: &str) -> Option<PassArea> {
    match pass_id.to_ascii_lowercase().as_str() {
        "fourth-of-july" => Some(PassArea {
            lat: 47.5333,
            lon: -116.3667,
            radius_deg: 0.12,
            label: "4th of July Pass",
        }),
        "lookout" => Some(PassArea {
            lat: 47.4576,
            lon: -115.699,
            radius_deg: 0.10,
            label: "Lookout Pass",
        }),
        _ => None,
    }
}

/// HTTP client for the Idaho 511 camera feed.
pub struct IdahoClient {
    client: Client,
    base_url: String,
}

impl IdahoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Fetches cameras within the pass's search box. Passes outside the
    /// Idaho feed resolve to empty without a request.
    pub async fn pass_cameras(&self, pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
        let Some(area) = pass_area(pass_id) else {
            return Ok(Vec::new());
        };

        let url = format!("{}{}", self.base_url, MAP_ICONS_PATH);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "idaho511",
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        Ok(parse_cameras(&payload, &area, &self.base_url))
    }
}

/// Parses the map-icons feed: `{ item1: {...icon meta}, item2: [{itemId,
/// location: [lat, lon], ...}] }`, keeping cameras inside the pass box.
fn parse_cameras(payload: &Value, area: &PassArea, base_url: &str) -> Vec<CameraImage> {
    let Some(items) = payload.get("item2").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut cameras = Vec::new();
    let mut seq = 1;
    for item in items {
        let Some(location) = item.get("location").and_then(Value::as_array) else {
            continue;
        };
        let (Some(lat), Some(lon)) = (
            location.first().and_then(Value::as_f64),
            location.get(1).and_then(Value::as_f64),
        ) else {
            continue;
        };
        if (lat - area.lat).abs() > area.radius_deg || (lon - area.lon).abs() > area.radius_deg {
            continue;
        }

        let Some(item_id) = item.get("itemId") else {
            continue;
        };
        let camera_id = match item_id.as_str() {
            Some(s) => s.to_string(),
            None => item_id.to_string(),
        };

        cameras.push(CameraImage {
            description: format!("{} - Camera {}", area.label, seq),
            image_url: format!("{}{}{}", base_url, CAMERA_IMAGE_PATH, camera_id),
            camera_id,
            captured_at: Utc::now(),
        });
        seq += 1;
    }
    cameras
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cameras_outside_the_pass_box_are_dropped() {
        let payload = json!({
            "item1": {"icon": "camera"},
            "item2": [
                {"itemId": "CCTV-101", "location": [47.54, -116.37]},
                {"itemId": "CCTV-202", "location": [43.61, -116.20]},
                {"itemId": "CCTV-303", "location": [47.53]},
            ]
        });
        let area = pass_area("fourth-of-july").unwrap();

        let cameras = parse_cameras(&payload, &area, DEFAULT_IDAHO_BASE_URL);
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].camera_id, "CCTV-101");
        assert_eq!(cameras[0].description, "4th of July Pass - Camera 1");
        assert_eq!(
            cameras[0].image_url,
            "https://511.idaho.gov/map/Cctv/CCTV-101"
        );
    }

    #[test]
    fn only_idaho_passes_have_areas() {
        assert!(pass_area("fourth-of-july").is_some());
        assert!(pass_area("lookout").is_some());
        assert!(pass_area("snoqualmie").is_none());
    }
}
