//! Highway designation extraction for computed routes.
//!
//! Each oracle path step carries a distance and an optional, possibly
//! multi-valued highway reference. Distance is accumulated per designation
//! and a designation only makes the label when it covers a minimum share of
//! the route, which suppresses brief interchange concurrencies while keeping
//! connector highways that define a genuine alternate path.

use crate::models::OracleStep;
use std::collections::HashMap;

/// Fraction of total route distance a designation must cover to be included
/// in the label. 2% eliminates junction noise (a concurrent segment of
/// <0.1% of route length) while retaining connectors like US-12 over White
/// Pass at ~6% of a Yakima-Portland trip. Pass detection is unaffected:
/// passes are located geometrically, not by highway ref.
pub const MIN_LABEL_FRACTION: f64 = 0.02;

/// Returns the major highway designations (e.g. "I-90", "US-2") that account
/// for at least `min_fraction` of the route's total distance, interstates
/// first, alphabetically within each class.
pub fn extract_highways(steps: &[OracleStep], min_fraction: f64) -> Vec<String> {
    let mut distance_by_highway: HashMap<String, f64> = HashMap::new();
    let mut total_m = 0.0;

    for step in steps {
        total_m += step.distance_m;

        let Some(refs) = step.highway_ref.as_deref() else {
            continue;
        };

        // Semicolon-delimited refs mark concurrent designations ("I-90;US-2"
        // near Spokane). Split the step distance equally among them; 100 m of
        // shared credit is negligible next to hundreds of miles of sole I-90.
        let designations: Vec<String> = refs
            .split(';')
            .map(str::trim)
            .filter(|r| !r.is_empty() && is_major_highway(r))
            .map(normalize_highway)
            .collect();

        if designations.is_empty() {
            continue;
        }
        let share = step.distance_m / designations.len() as f64;
        for designation in designations {
            *distance_by_highway.entry(designation).or_insert(0.0) += share;
        }
    }

    if total_m <= 0.0 {
        return Vec::new();
    }

    let threshold = total_m * min_fraction;
    let mut highways: Vec<String> = distance_by_highway
        .into_iter()
        .filter(|(_, meters)| *meters >= threshold)
        .map(|(designation, _)| designation)
        .collect();

    highways.sort_by(|a, b| {
        let class_a = if a.starts_with("I-") { 0 } else { 1 };
        let class_b = if b.starts_with("I-") { 0 } else { 1 };
        class_a.cmp(&class_b).then_with(|| a.cmp(b))
    });
    highways
}

/// Only interstate- and US-route-style designations count as "major"; state
/// routes and local refs are ignored for labeling.
fn is_major_highway(designation: &str) -> bool {
    let upper = designation.to_ascii_uppercase();
    upper.starts_with("I-")
        || upper.starts_with("I ")
        || upper.starts_with("US-")
        || upper.starts_with("US ")
}

/// Normalizes OSM ref variants to a canonical hyphenated uppercase form so
/// "I 90", "i-90", and "I-90" accumulate into the same bucket.
fn normalize_highway(designation: &str) -> String {
    let upper = designation.trim().to_ascii_uppercase();
    if let Some(rest) = upper.strip_prefix("I ") {
        format!("I-{rest}")
    } else if let Some(rest) = upper.strip_prefix("US ") {
        format!("US-{rest}")
    } else {
        upper
    }
}

/// Display name for a computed route: up to three highways joined for
/// readability, or a positional fallback when no major highway qualified.
pub fn build_route_name(highways: &[String], index: usize) -> String {
    if highways.is_empty() {
        return if index == 0 {
            "Fastest Route".to_string()
        } else {
            format!("Alternate Route {index}")
        };
    }
    highways
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(" / ")
}
