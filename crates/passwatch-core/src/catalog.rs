//! Static registries of tracked passes, trip endpoints, and highway
//! corridors. Read-only after first access; lookups are case-insensitive.

use crate::models::{HighwayInfo, PassInfo, RouteEndpoint};
use std::sync::OnceLock;

#[allow(clippy::too_many_arguments)]
fn pass(
    id: &str,
    name: &str,
    highway: &str,
    elevation_feet: u32,
    latitude: f64,
    longitude: f64,
    state: &str,
    official_url: Option<&str>,
    has_official_conditions: bool,
) -> PassInfo {
    PassInfo {
        id: id.to_string(),
        name: name.to_string(),
        highway: highway.to_string(),
        elevation_feet,
        latitude,
        longitude,
        state: state.to_string(),
        official_url: official_url.map(str::to_string),
        has_official_conditions,
    }
}

/// All tracked mountain passes.
pub fn passes() -> &'static [PassInfo] {
    static PASSES: OnceLock<Vec<PassInfo>> = OnceLock::new();
    PASSES.get_or_init(|| {
        vec![
            pass(
                "snoqualmie",
                "Snoqualmie Pass",
                "I-90",
                3022,
                47.4245,
                -121.4116,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/snoqualmie"),
                true,
            ),
            pass(
                "stevens-pass",
                "Stevens Pass",
                "US-2",
                4061,
                47.7447,
                -121.0891,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/stevens"),
                true,
            ),
            pass(
                "cayuse",
                "Cayuse Pass",
                "WA-123",
                4694,
                46.8706,
                -121.5445,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/cayuse"),
                true,
            ),
            pass(
                "white",
                "White Pass",
                "US-12",
                4500,
                46.6388,
                -121.3988,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/white"),
                true,
            ),
            pass(
                "washington-pass",
                "Washington Pass",
                "WA-20",
                5477,
                48.5195,
                -120.6653,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/washington"),
                true,
            ),
            pass(
                "rainy-pass",
                "Rainy Pass",
                "WA-20",
                4855,
                48.5195,
                -120.7364,
                "WA",
                None,
                false,
            ),
            pass(
                "sherman",
                "Sherman Pass",
                "WA-20",
                5575,
                48.6030,
                -118.4630,
                "WA",
                Some("https://wsdot.com/travel/real-time/mountainpasses/sherman"),
                true,
            ),
            pass(
                "fourth-of-july",
                "Fourth of July Pass",
                "I-90",
                3081,
                47.5333,
                -116.3667,
                "ID",
                Some("https://511.idaho.gov/List/Cameras?search=july"),
                false,
            ),
            pass(
                "lookout",
                "Lookout Pass",
                "I-90",
                4738,
                47.4576,
                -115.6990,
                "MT/ID",
                Some("https://511.idaho.gov/List/Cameras?search=lookout"),
                false,
            ),
        ]
    })
}

pub fn pass_by_id(id: &str) -> Option<&'static PassInfo> {
    passes().iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

fn endpoint(
    id: &str,
    name: &str,
    state: &str,
    latitude: f64,
    longitude: f64,
    routing_hubs: &[&str],
) -> RouteEndpoint {
    RouteEndpoint {
        id: id.to_string(),
        name: name.to_string(),
        state: state.to_string(),
        latitude,
        longitude,
        routing_hubs: routing_hubs.iter().map(|h| h.to_string()).collect(),
    }
}

/// Known cities/towns along the corridor, ordered west to east by longitude
/// so longitude-window filtering is unambiguous.
pub fn endpoints() -> &'static [RouteEndpoint] {
    static ENDPOINTS: OnceLock<Vec<RouteEndpoint>> = OnceLock::new();
    ENDPOINTS.get_or_init(|| {
        vec![
            endpoint("stanwood", "Stanwood", "WA", 48.239, -122.370, &[]),
            endpoint("seattle", "Seattle", "WA", 47.608, -122.335, &[]),
            endpoint("spokane", "Spokane", "WA", 47.658, -117.426, &[]),
            endpoint("coeur-d-alene", "Coeur d'Alene", "ID", 47.677, -116.780, &[]),
            endpoint("st-regis", "St. Regis", "MT", 47.302, -115.089, &[]),
            // Kalispell and Missoula declare St. Regis as a routing hub: the
            // shortest path from the west runs US-2 via Sandpoint, but the
            // commonly driven corridor is I-90 to St. Regis and US-93 north,
            // which crosses Fourth of July and Lookout passes.
            endpoint("kalispell", "Kalispell", "MT", 48.196, -114.313, &["st-regis"]),
            endpoint("missoula", "Missoula", "MT", 46.872, -113.994, &["st-regis"]),
        ]
    })
}

pub fn endpoint_by_id(id: &str) -> Option<&'static RouteEndpoint> {
    endpoints().iter().find(|e| e.id.eq_ignore_ascii_case(id))
}

/// Named highway corridors served by the API.
pub fn highways() -> &'static [HighwayInfo] {
    static HIGHWAYS: OnceLock<Vec<HighwayInfo>> = OnceLock::new();
    HIGHWAYS.get_or_init(|| {
        vec![
            HighwayInfo {
                id: "i90".to_string(),
                name: "Interstate 90".to_string(),
                highway: "I-90".to_string(),
            },
            HighwayInfo {
                id: "us2".to_string(),
                name: "US Highway 2".to_string(),
                highway: "US-2".to_string(),
            },
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_lookup_is_case_insensitive() {
        assert!(pass_by_id("snoqualmie").is_some());
        assert!(pass_by_id("SNOQUALMIE").is_some());
        assert!(pass_by_id("not-a-pass").is_none());
    }

    #[test]
    fn endpoints_are_ordered_west_to_east() {
        let endpoints = endpoints();
        for pair in endpoints.windows(2) {
            assert!(
                pair[0].longitude <= pair[1].longitude,
                "{} is east of {}",
                pair[0].id,
                pair[1].id
            );
        }
    }

    #[test]
    fn routing_hubs_reference_known_endpoints() {
        for ep in endpoints() {
            for hub in &ep.routing_hubs {
                assert!(endpoint_by_id(hub).is_some(), "unknown hub {hub}");
            }
        }
    }

    #[test]
    fn wsdot_backed_passes_flag_official_conditions() {
        assert!(pass_by_id("snoqualmie").unwrap().has_official_conditions);
        assert!(!pass_by_id("rainy-pass").unwrap().has_official_conditions);
        assert!(!pass_by_id("fourth-of-july").unwrap().has_official_conditions);
    }
}
