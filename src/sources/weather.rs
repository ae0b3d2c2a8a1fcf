//! Open-Meteo current conditions source
//!
//! Weather moves slowly, so responses are cached for ten minutes. The API
//! needs no key and is CORS-friendly; no proxy involved.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::CachePolicy;
use crate::fetch::{FetchClient, FetchError, JsonRequest, Transport};

const API_NAME: &str = "open-meteo";
const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CACHE_TTL: Duration = Duration::from_secs(600);

/// Current conditions at the dashboard location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Air temperature in degrees Celsius
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    /// Relative humidity in percent
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: f64,
    /// Wind speed in km/h
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
    /// WMO weather code
    pub weather_code: u8,
}

/// Fetches current conditions from Open-Meteo
#[derive(Debug, Clone)]
pub struct WeatherSource {
    base_url: String,
}

impl Default for WeatherSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherSource {
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the endpoint, mainly for tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches current conditions for the given coordinates
    pub async fn fetch_current<T: Transport>(
        &self,
        client: &FetchClient<T>,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather, FetchError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code",
            self.base_url, latitude, longitude
        );
        let request = JsonRequest::new(API_NAME, url)
            .with_cache(CachePolicy::MaxAge(CACHE_TTL));
        let body = client.fetch_json(&request).await?;
        parse_current(&body)
    }
}

/// Pulls the `current` block out of an Open-Meteo forecast response
fn parse_current(body: &serde_json::Value) -> Result<CurrentWeather, FetchError> {
    let current = body
        .get("current")
        .cloned()
        .ok_or_else(|| FetchError::Unknown("missing 'current' block in response".to_string()))?;
    Ok(serde_json::from_value(current)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "latitude": 51.22,
            "longitude": 6.77,
            "current_units": {
                "temperature_2m": "°C",
                "relative_humidity_2m": "%",
                "wind_speed_10m": "km/h",
                "weather_code": "wmo code"
            },
            "current": {
                "time": "2025-03-02T14:15",
                "temperature_2m": 8.4,
                "relative_humidity_2m": 71.0,
                "wind_speed_10m": 18.7,
                "weather_code": 61
            }
        })
    }

    #[test]
    fn test_parse_current_conditions() {
        let weather = parse_current(&sample_body()).expect("parse should succeed");

        assert!((weather.temperature - 8.4).abs() < 0.01);
        assert!((weather.humidity - 71.0).abs() < 0.01);
        assert!((weather.wind_speed - 18.7).abs() < 0.01);
        assert_eq!(weather.weather_code, 61);
    }

    #[test]
    fn test_parse_missing_current_block() {
        let result = parse_current(&json!({"latitude": 51.22}));
        assert!(matches!(result, Err(FetchError::Unknown(_))));
    }

    #[test]
    fn test_parse_malformed_current_block() {
        let result = parse_current(&json!({"current": {"temperature_2m": "warm"}}));
        assert!(matches!(result, Err(FetchError::InvalidBody(_))));
    }

    #[test]
    fn test_request_url_contains_coordinates() {
        let source = WeatherSource::new().with_base_url("http://weather.test/v1");
        let url = format!(
            "{}?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code",
            source.base_url, 51.2277, 6.7735
        );
        assert!(url.starts_with("http://weather.test/v1?latitude=51.2277&longitude=6.7735"));
    }
}
