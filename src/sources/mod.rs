//! Widget data sources
//!
//! Thin typed clients over the fetch client for the dashboard's third-party
//! APIs. Rendering lives elsewhere; these modules only build requests, pick
//! cache TTLs appropriate to how fast the upstream data moves, and parse the
//! responses into typed models.

pub mod departures;
pub mod weather;

pub use departures::{Departure, DeparturesSource};
pub use weather::{CurrentWeather, WeatherSource};
