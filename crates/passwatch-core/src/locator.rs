//! Geometric pass-on-route matching.
//!
//! A pass is considered "on" a route when the shortest distance from the
//! pass coordinates to any segment of the route polyline is within the
//! threshold. Matches are returned in travel order.

use crate::catalog;
use crate::geo::{cumulative_distances_km, distance_to_segment_km, haversine_km};
use crate::models::{GeoPoint, RouteGeometry};

/// Default match radius. Pass summits sit a few km off the interchange the
/// polyline actually threads, so this is deliberately generous.
pub const DEFAULT_THRESHOLD_KM: f64 = 15.0;

// Bounding-box pre-filter margins in degrees; longitude degrees are wider.
const BBOX_LAT_MARGIN_DEG: f64 = 0.5;
const BBOX_LON_MARGIN_DEG: f64 = 1.0;

/// A catalog pass matched against a route, with its approximate distance
/// from the start of the trip (used only for ordering).
#[derive(Debug, Clone)]
pub struct MatchedPass {
    pub pass_id: String,
    pub position_km: f64,
}

/// Returns the ids of catalog passes lying within `threshold_km` of the
/// route polyline, ordered by approximate position along the route.
///
/// A polyline with fewer than two points yields no matches.
pub fn find_passes_on_route(geometry: &RouteGeometry, threshold_km: f64) -> Vec<String> {
    let points: Vec<GeoPoint> = (0..geometry.len()).map(|i| geometry.point(i)).collect();
    if points.len() < 2 {
        return Vec::new();
    }

    // Approximate "route distance from start" at each vertex so matched
    // passes can be sorted in travel order.
    let cumulative_km = cumulative_distances_km(&points);

    let (min_lat, max_lat, min_lon, max_lon) = bounding_box(&points);

    let mut matched: Vec<MatchedPass> = Vec::new();
    for pass in catalog::passes() {
        if pass.latitude < min_lat
            || pass.latitude > max_lat
            || pass.longitude < min_lon
            || pass.longitude > max_lon
        {
            continue;
        }

        let location = GeoPoint::new(pass.latitude, pass.longitude);
        let (dist_km, seg_idx) = min_distance_to_polyline(location, &points);
        if dist_km <= threshold_km {
            // Position along the route: cumulative distance at the closest
            // segment's start vertex plus the offset from that vertex to the
            // pass. An approximation, stable enough for trip-order sorting.
            let position_km = cumulative_km[seg_idx] + haversine_km(points[seg_idx], location);
            matched.push(MatchedPass {
                pass_id: pass.id.clone(),
                position_km,
            });
        }
    }

    matched.sort_by(|a, b| a.position_km.total_cmp(&b.position_km));
    matched.into_iter().map(|m| m.pass_id).collect()
}

fn bounding_box(points: &[GeoPoint]) -> (f64, f64, f64, f64) {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for p in points {
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
        min_lon = min_lon.min(p.lon);
        max_lon = max_lon.max(p.lon);
    }
    (
        min_lat - BBOX_LAT_MARGIN_DEG,
        max_lat + BBOX_LAT_MARGIN_DEG,
        min_lon - BBOX_LON_MARGIN_DEG,
        max_lon + BBOX_LON_MARGIN_DEG,
    )
}

/// Minimum distance from a point to the polyline, and the start index of the
/// segment that produced the minimum.
fn min_distance_to_polyline(p: GeoPoint, points: &[GeoPoint]) -> (f64, usize) {
    let mut min_dist = f64::MAX;
    let mut min_idx = 0;
    for i in 0..points.len() - 1 {
        let d = distance_to_segment_km(p, points[i], points[i + 1]);
        if d < min_dist {
            min_dist = d;
            min_idx = i;
        }
    }
    (min_dist, min_idx)
}
