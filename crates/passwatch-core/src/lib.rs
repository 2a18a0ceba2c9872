pub mod catalog;
pub mod condition;
pub mod geo;
pub mod highway;
pub mod locator;
pub mod models;

pub use condition::{derive_condition, infer_road_condition};
pub use geo::haversine_km;
pub use highway::{build_route_name, extract_highways, MIN_LABEL_FRACTION};
pub use locator::{find_passes_on_route, DEFAULT_THRESHOLD_KM};
pub use models::{
    CameraImage, ComputedRoute, GeoPoint, HighwayInfo, OracleRoute, OracleStep, PassCondition,
    PassInfo, PassSummary, PassWeatherForecast, RouteEndpoint, RouteGeometry, TravelRestriction,
    WeatherForecastDay,
};
