//! Distance geometry for pass-on-route matching.

use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers using the
/// Haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Minimum distance in kilometers from a point to a line segment.
///
/// Projects in an equirectangular plane (longitude scaled by the cosine of
/// the segment-start latitude), clamps onto the segment, then measures the
/// great-circle distance to the closest point. Accurate to within ~1% for
/// segments shorter than ~200 km, which covers individual route polyline
/// segments by a wide margin.
pub fn distance_to_segment_km(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let cos_lat = a.lat.to_radians().cos();

    let ab_lat = b.lat - a.lat;
    let ab_lon = (b.lon - a.lon) * cos_lat;
    let ab_len_sq = ab_lat * ab_lat + ab_lon * ab_lon;

    // Degenerate segment: fall back to point-to-point distance.
    if ab_len_sq < 1e-12 {
        return haversine_km(p, a);
    }

    let ap_lat = p.lat - a.lat;
    let ap_lon = (p.lon - a.lon) * cos_lat;

    let t = ((ap_lat * ab_lat + ap_lon * ab_lon) / ab_len_sq).clamp(0.0, 1.0);

    let closest = GeoPoint {
        lat: a.lat + t * (b.lat - a.lat),
        lon: a.lon + t * (b.lon - a.lon),
    };
    haversine_km(p, closest)
}

/// Cumulative along-route distance in kilometers at each polyline vertex.
/// Entry 0 is always 0.0.
pub fn cumulative_distances_km(points: &[GeoPoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += haversine_km(points[i - 1], *point);
        }
        cumulative.push(total);
    }
    cumulative
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_one_degree_latitude() {
        // ~111.2 km between points one degree of latitude apart
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let p = GeoPoint::new(47.4245, -121.4116);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn point_on_segment_has_zero_distance() {
        let a = GeoPoint::new(47.0, -121.0);
        let b = GeoPoint::new(47.0, -120.0);
        let p = GeoPoint::new(47.0, -120.5);
        assert!(distance_to_segment_km(p, a, b) < 0.01);
    }

    #[test]
    fn point_beyond_endpoint_clamps_to_endpoint() {
        let a = GeoPoint::new(47.0, -121.0);
        let b = GeoPoint::new(47.0, -120.0);
        // Due west of a, so the closest point is a itself
        let p = GeoPoint::new(47.0, -122.0);
        let expected = haversine_km(p, a);
        let actual = distance_to_segment_km(p, a, b);
        assert!((actual - expected).abs() < 0.01);
    }

    #[test]
    fn degenerate_segment_falls_back_to_haversine() {
        let a = GeoPoint::new(47.0, -121.0);
        let p = GeoPoint::new(47.1, -121.0);
        let expected = haversine_km(p, a);
        assert!((distance_to_segment_km(p, a, a) - expected).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_distance_matches_haversine_offset() {
        // Point 0.1 degrees of latitude north of an east-west segment
        let a = GeoPoint::new(47.0, -121.0);
        let b = GeoPoint::new(47.0, -120.0);
        let p = GeoPoint::new(47.1, -120.5);
        let expected = haversine_km(p, GeoPoint::new(47.0, -120.5));
        let actual = distance_to_segment_km(p, a, b);
        assert!((actual - expected).abs() < 0.05, "got {actual}, want {expected}");
    }

    #[test]
    fn cumulative_distances_are_monotonic() {
        let points = vec![
            GeoPoint::new(47.0, -122.0),
            GeoPoint::new(47.0, -121.0),
            GeoPoint::new(47.5, -120.0),
        ];
        let cumulative = cumulative_distances_km(&points);
        assert_eq!(cumulative.len(), 3);
        assert_eq!(cumulative[0], 0.0);
        assert!(cumulative[1] > 0.0);
        assert!(cumulative[2] > cumulative[1]);
        let leg = haversine_km(points[0], points[1]);
        assert!((cumulative[1] - leg).abs() < 1e-9);
    }
}
