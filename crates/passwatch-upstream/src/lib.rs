//! REST clients for the external collaborators: the OSRM routing oracle,
//! the WSDOT traveler API, the Idaho 511 camera feed, and OpenWeatherMap.
//!
//! Clients do no aggregation and no caching; they translate wire payloads
//! into core models and report failures as typed errors for the server
//! layer to contain.

pub mod error;
pub mod idaho511;
pub mod openweather;
pub mod osrm;
pub mod wsdot;

pub use error::UpstreamError;
pub use idaho511::{IdahoClient, DEFAULT_IDAHO_BASE_URL};
pub use openweather::{OpenWeatherClient, DEFAULT_OPENWEATHER_BASE_URL};
pub use osrm::{OsrmClient, DEFAULT_OSRM_BASE_URL};
pub use wsdot::{WsdotClient, DEFAULT_WSDOT_BASE_URL};
