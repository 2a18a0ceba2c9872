//! Weather-derived road conditions.
//!
//! Passes without an authoritative condition source get a condition
//! synthesized from the current weather forecast. The keyword rules are
//! ordered: more specific phrases ("blizzard", "heavy snow") are checked
//! before the generic ones they contain ("snow"), and "freezing rain" hits
//! the freezing branch before the rain branch.

use crate::models::{PassCondition, PassWeatherForecast, TravelRestriction};
use chrono::Utc;

/// Classifies a forecast description and temperature (°F) into a road
/// condition label.
pub fn infer_road_condition(description: &str, temp_f: f64) -> &'static str {
    let desc = description.to_lowercase();

    if desc.contains("blizzard") || desc.contains("heavy snow") {
        if temp_f < 28.0 {
            "Icy / Snow packed"
        } else {
            "Heavy snow"
        }
    } else if desc.contains("snow") || desc.contains("sleet") {
        if temp_f < 30.0 {
            "Snow packed / Icy"
        } else {
            "Snow covered"
        }
    } else if desc.contains("freezing") || desc.contains("ice") {
        "Icy / Freezing"
    } else if desc.contains("rain") || desc.contains("drizzle") || desc.contains("shower") {
        if temp_f >= 32.0 {
            "Bare and wet"
        } else {
            "Freezing rain"
        }
    } else if desc.contains("fog") || desc.contains("mist") {
        "Bare and wet"
    } else {
        "Bare and dry"
    }
}

/// Builds a fallback condition from a weather forecast. Travel restrictions
/// are only ever reported by an authoritative source, so a derived condition
/// never carries one.
pub fn derive_condition(pass_id: &str, forecast: &PassWeatherForecast) -> PassCondition {
    PassCondition {
        pass_id: pass_id.to_string(),
        road_condition: infer_road_condition(&forecast.current_description, forecast.current_temp_f)
            .to_string(),
        weather_condition: forecast.current_description.clone(),
        eastbound_restriction: TravelRestriction::None,
        eastbound_restriction_text: None,
        westbound_restriction: TravelRestriction::None,
        westbound_restriction_text: None,
        temperature_f: forecast.current_temp_f,
        last_updated: Utc::now(),
    }
}
