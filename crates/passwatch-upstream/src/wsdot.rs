//! WSDOT Traveler Information API client.
//!
//! Supplies official mountain pass conditions and highway cameras for
//! Washington State passes. Requires an access code; see
//! https://wsdot.wa.gov/traffic/api/

use crate::error::UpstreamError;
use chrono::{DateTime, Utc};
use passwatch_core::models::{CameraImage, PassCondition, TravelRestriction};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_WSDOT_BASE_URL: &str = "https://wsdot.wa.gov/Traffic/api";

/// WSDOT mountain pass condition ids, keyed by catalog pass id.
fn wsdot_condition_id(pass_id: &str) -> Option<u32> {
    // Snoqualmie Pass I-90 is PassConditionID=1 in the WSDOT data.
    match pass_id.to_ascii_lowercase().as_str() {
        "snoqualmie" => Some(1),
        _ => None,
    }
}

/// Camera title substrings used to filter the statewide camera inventory
/// down to one pass.
fn camera_title_filters(pass_id: &str) -> Option<&'static [&'static str]> {
    match pass_id.to_ascii_lowercase().as_str() {
        "snoqualmie" => Some(&["Snoqualmie", "I-90 @ MP 52", "Summit"]),
        _ => None,
    }
}

/// HTTP client for the WSDOT traveler APIs.
pub struct WsdotClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WsdotClient {
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

    /// Fetches the official condition report for a pass. Passes without a
    /// WSDOT condition id resolve to `Ok(None)` without a request.
    pub async fn pass_condition(
        &self,
        pass_id: &str,
    ) -> Result<Option<PassCondition>, UpstreamError> {
        let Some(condition_id) = wsdot_condition_id(pass_id) else {
            return Ok(None);
        };

        let url = format!(
            "{}/MountainPassConditions/GetMountainPassConditionAsJson?AccessCode={}&PassConditionID={}",
            self.base_url, self.api_key, condition_id
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "wsdot",
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        Ok(Some(parse_condition(pass_id, &payload)))
    }

    /// Fetches camera snapshots near a pass by filtering the statewide
    /// camera inventory. Passes without a title filter resolve to empty.
    pub async fn pass_cameras(&self, pass_id: &str) -> Result<Vec<CameraImage>, UpstreamError> {
        let Some(filters) = camera_title_filters(pass_id) else {
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/HighwayCameras/GetCameraInventoryAsJson?AccessCode={}",
            self.base_url, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                service: "wsdot",
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;
        Ok(parse_cameras(&payload, filters))
    }
}

/// Parses a WSDOT mountain pass condition payload.
pub fn parse_condition(pass_id: &str, payload: &Value) -> PassCondition {
    let advisory_active = payload
        .get("TravelAdvisoryActive")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let (eastbound, eastbound_text) =
        parse_restriction(advisory_active, payload.get("RestrictionOne"));
    let (westbound, westbound_text) =
        parse_restriction(advisory_active, payload.get("RestrictionTwo"));

    PassCondition {
        pass_id: pass_id.to_string(),
        road_condition: string_or_unknown(payload.get("RoadCondition")),
        weather_condition: string_or_unknown(payload.get("WeatherCondition")),
        eastbound_restriction: eastbound,
        eastbound_restriction_text: eastbound_text,
        westbound_restriction: westbound,
        westbound_restriction_text: westbound_text,
        temperature_f: payload
            .get("TemperatureInFahrenheit")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        last_updated: payload
            .get("DateUpdated")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
    }
}

fn string_or_unknown(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn parse_restriction(
    advisory_active: bool,
    restriction: Option<&Value>,
) -> (TravelRestriction, Option<String>) {
    if !advisory_active {
        return (TravelRestriction::None, None);
    }
    let Some(text) = restriction
        .and_then(|r| r.get("RestrictionText"))
        .and_then(Value::as_str)
    else {
        return (TravelRestriction::None, None);
    };

    let lower = text.to_lowercase();
    let code = if lower.contains("chain") {
        TravelRestriction::ChainsRequired
    } else if lower.contains("traction") || lower.contains("tires") {
        TravelRestriction::TiresOrTraction
    } else if lower.contains("closed") {
        TravelRestriction::Closed
    } else {
        TravelRestriction::None
    };

    (code, Some(text.to_string()))
}

/// Parses the statewide camera inventory, keeping cameras whose title
/// contains one of the filter substrings (case-insensitive) and that carry
/// an image URL.
pub fn parse_cameras(payload: &Value, filters: &[&str]) -> Vec<CameraImage> {
    let Some(entries) = payload.as_array() else {
        return Vec::new();
    };

    let mut cameras = Vec::new();
    for entry in entries {
        let title = entry
            .get("Title")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let title_lower = title.to_lowercase();
        if !filters
            .iter()
            .any(|f| title_lower.contains(&f.to_lowercase()))
        {
            continue;
        }

        let Some(image_url) = entry
            .get("ImageURL")
            .and_then(Value::as_str)
            .filter(|u| !u.trim().is_empty())
        else {
            continue;
        };

        let camera_id = entry
            .get("CameraID")
            .map(|id| match id.as_str() {
                Some(s) => s.to_string(),
                None => id.to_string(),
            })
            .unwrap_or_default();

        cameras.push(CameraImage {
            camera_id,
            description: title.to_string(),
            image_url: image_url.to_string(),
            captured_at: Utc::now(),
        });
    }
    cameras
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_condition_with_active_advisory() {
        let payload = json!({
            "RoadCondition": "Compact snow and ice",
            "WeatherCondition": "Snowing",
            "TemperatureInFahrenheit": 27,
            "TravelAdvisoryActive": true,
            "RestrictionOne": {"RestrictionText": "Chains required on all vehicles except AWD"},
            "RestrictionTwo": {"RestrictionText": "Traction tires advised"},
            "DateUpdated": "2024-01-15T06:30:00Z"
        });

        let condition = parse_condition("snoqualmie", &payload);
        assert_eq!(condition.road_condition, "Compact snow and ice");
        assert_eq!(condition.temperature_f, 27.0);
        assert_eq!(
            condition.eastbound_restriction,
            TravelRestriction::ChainsRequired
        );
        assert_eq!(
            condition.westbound_restriction,
            TravelRestriction::TiresOrTraction
        );
        assert!(condition
            .eastbound_restriction_text
            .as_deref()
            .unwrap()
            .contains("Chains"));
    }

    #[test]
    fn inactive_advisory_clears_restrictions() {
        let payload = json!({
            "RoadCondition": "Bare and dry",
            "WeatherCondition": "Clear",
            "TemperatureInFahrenheit": 45,
            "TravelAdvisoryActive": false,
            "RestrictionOne": {"RestrictionText": "Chains required"}
        });

        let condition = parse_condition("snoqualmie", &payload);
        assert_eq!(condition.eastbound_restriction, TravelRestriction::None);
        assert!(condition.eastbound_restriction_text.is_none());
    }

    #[test]
    fn closed_restriction_is_detected() {
        let payload = json!({
            "TravelAdvisoryActive": true,
            "RestrictionOne": {"RestrictionText": "Pass closed for avalanche control"},
        });
        let condition = parse_condition("snoqualmie", &payload);
        assert_eq!(condition.eastbound_restriction, TravelRestriction::Closed);
    }

    #[test]
    fn cameras_are_filtered_by_title() {
        let payload = json!([
            {"CameraID": 9024, "Title": "I-90 @ MP 52: Snoqualmie Summit", "ImageURL": "https://images.wsdot.wa.gov/9024.jpg"},
            {"CameraID": 8123, "Title": "SR 520 Bridge", "ImageURL": "https://images.wsdot.wa.gov/8123.jpg"},
            {"CameraID": 9030, "Title": "Snoqualmie East", "ImageURL": ""}
        ]);

        let cameras = parse_cameras(&payload, &["Snoqualmie", "Summit"]);
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].camera_id, "9024");
        assert!(cameras[0].description.contains("Summit"));
    }

    #[test]
    fn unmapped_pass_has_no_condition_id() {
        assert_eq!(wsdot_condition_id("snoqualmie"), Some(1));
        assert_eq!(wsdot_condition_id("stevens-pass"), None);
    }
}
