//! City-to-city route computation.
//!
//! Queries the routing oracle once per waypoint variant (direct, plus one
//! per declared routing hub), matches catalog passes against each candidate
//! polyline, collapses near-duplicate alternates, and ranks what is left by
//! distance. Oracle failures degrade to fewer (possibly zero) routes; this
//! never errors.

use async_trait::async_trait;
use futures::future::join_all;
use passwatch_core::models::{ComputedRoute, GeoPoint, OracleRoute, RouteEndpoint};
use passwatch_core::{
    build_route_name, catalog, extract_highways, find_passes_on_route, DEFAULT_THRESHOLD_KM,
    MIN_LABEL_FRACTION,
};
use passwatch_upstream::{OsrmClient, UpstreamError};
use std::collections::HashSet;
use std::sync::Arc;

const METERS_PER_MILE: f64 = 1609.344;

/// The routing oracle as the orchestrator sees it.
#[async_trait]
pub trait RoutingApi: Send + Sync {
    async fn fetch_routes(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<OracleRoute>, UpstreamError>;
}

#[async_trait]
impl RoutingApi for OsrmClient {
    async fn fetch_routes(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<OracleRoute>, UpstreamError> {
        OsrmClient::fetch_routes(self, waypoints).await
    }
}

pub struct RouteOrchestrator {
    routing: Arc<dyn RoutingApi>,
}

impl RouteOrchestrator {
    pub fn new(routing: Arc<dyn RoutingApi>) -> Self {
        Self { routing }
    }

    /// Computes ranked route options between two endpoints. An oracle outage
    /// for every waypoint set yields an empty list, which callers present as
    /// "no route found".
    pub async fn routes_between(
        &self,
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
    ) -> Vec<ComputedRoute> {
        let waypoint_sets = build_waypoint_sets(origin, destination);

        let fetches = waypoint_sets
            .iter()
            .map(|set| self.fetch_route_set(set, origin, destination));
        let mut all_routes: Vec<ComputedRoute> =
            join_all(fetches).await.into_iter().flatten().collect();

        if all_routes.is_empty() {
            return Vec::new();
        }

        // Two routes are the same corridor when they cover the same major
        // highways AND the same passes; this collapses near-identical oracle
        // geometries while keeping genuinely distinct options.
        let mut seen = HashSet::new();
        all_routes.retain(|route| seen.insert(dedup_key(route)));

        all_routes.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));

        let primary_miles = all_routes[0].distance_miles;
        for (rank, route) in all_routes.iter_mut().enumerate() {
            route.id = format!("route-{rank}");
            route.extra_distance_miles = (rank > 0)
                .then(|| ((route.distance_miles - primary_miles) * 10.0).round() / 10.0);
        }

        tracing::info!(
            "{} route(s) found {} -> {}; passes total: {}",
            all_routes.len(),
            origin.name,
            destination.name,
            all_routes.iter().map(|r| r.pass_ids.len()).sum::<usize>()
        );

        all_routes
    }

    /// Issues one oracle query and parses the result. Routes get temporary
    /// ids; the caller re-indexes after merging all waypoint sets. A failed
    /// query yields an empty list for this set only.
    async fn fetch_route_set(
        &self,
        waypoints: &[GeoPoint],
        origin: &RouteEndpoint,
        destination: &RouteEndpoint,
    ) -> Vec<ComputedRoute> {
        let oracle_routes = match self.routing.fetch_routes(waypoints).await {
            Ok(routes) => routes,
            Err(err) => {
                tracing::error!(
                    "routing oracle error for {} -> {}: {}",
                    origin.name,
                    destination.name,
                    err
                );
                return Vec::new();
            }
        };

        oracle_routes
            .iter()
            .enumerate()
            .map(|(idx, route)| build_computed_route(idx, route))
            .collect()
    }
}

fn build_computed_route(idx: usize, route: &OracleRoute) -> ComputedRoute {
    let highways = extract_highways(&route.steps, MIN_LABEL_FRACTION);
    let pass_ids = route
        .geometry
        .as_ref()
        .map(|g| find_passes_on_route(g, DEFAULT_THRESHOLD_KM))
        .unwrap_or_default();
    let pass_names = pass_ids
        .iter()
        .map(|id| {
            catalog::pass_by_id(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.clone())
        })
        .collect();

    ComputedRoute {
        id: format!("route-tmp-{idx}"), // re-assigned after merge
        name: build_route_name(&highways, idx),
        highways_used: highways,
        distance_miles: route.distance_m / METERS_PER_MILE,
        estimated_minutes: route.duration_s / 60.0,
        pass_ids,
        pass_names,
        extra_distance_miles: None,
        geometry: route.geometry.clone(),
    }
}

/// The direct origin-destination pair always; additionally one
/// origin-hub-destination triple per routing hub declared by either end, so
/// corridors the shortest-path oracle hides behind a shorter route still
/// surface. Hubs equal to either endpoint are skipped.
fn build_waypoint_sets(origin: &RouteEndpoint, destination: &RouteEndpoint) -> Vec<Vec<GeoPoint>> {
    let origin_point = GeoPoint::new(origin.latitude, origin.longitude);
    let destination_point = GeoPoint::new(destination.latitude, destination.longitude);

    let mut sets = vec![vec![origin_point, destination_point]];

    let mut seen_hubs = HashSet::new();
    for hub_id in destination.routing_hubs.iter().chain(&origin.routing_hubs) {
        let Some(hub) = catalog::endpoint_by_id(hub_id) else {
            continue;
        };
        if hub.id == origin.id || hub.id == destination.id {
            continue;
        }
        if !seen_hubs.insert(hub.id.clone()) {
            continue;
        }
        sets.push(vec![
            origin_point,
            GeoPoint::new(hub.latitude, hub.longitude),
            destination_point,
        ]);
    }

    sets
}

fn dedup_key(route: &ComputedRoute) -> String {
    let mut highways = route.highways_used.clone();
    highways.sort();
    let mut passes = route.pass_ids.clone();
    passes.sort();
    let key = format!("{}|{}", highways.join(","), passes.join(","));
    if key == "|" {
        // Unnamed, pass-less routes keep their display name as identity so
        // distinct fallback routes are never silently merged.
        route.name.clone()
    } else {
        key
    }
}
