use anyhow::Result;
use assistant_core::config::WeatherConfig;
use assistant_core::{Conditions, Place, ToolError, WeatherService};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::http;

pub struct OpenMeteoClient {
    http: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    #[serde(default)]
    weathercode: u32,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            http: http::client(config.timeout_seconds)?,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn resolve(&self, location: &str) -> Result<Vec<Place>, ToolError> {
        debug!(location, "Geocoding");
        let body: GeocodingResponse = self
            .http
            .get(&self.geocoding_url)
            .query(&[
                ("name", location),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| http::unavailable("Geocoding", e))?
            .json()
            .await
            .map_err(|e| http::unavailable("Geocoding", e))?;

        Ok(places(body))
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Conditions, ToolError> {
        let body: ForecastResponse = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| http::unavailable("Forecast", e))?
            .json()
            .await
            .map_err(|e| http::unavailable("Forecast", e))?;

        conditions(body)
    }
}

fn places(body: GeocodingResponse) -> Vec<Place> {
    body.results
        .into_iter()
        .map(|r| Place {
            name: r.name,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect()
}

fn conditions(body: ForecastResponse) -> Result<Conditions, ToolError> {
    let current = body
        .current_weather
        .ok_or_else(|| ToolError::service_unavailable("Weather data unavailable."))?;

    Ok(Conditions {
        temperature: current.temperature,
        wind_speed: current.windspeed,
        description: describe(current.weathercode),
    })
}

/// WMO weather interpretation codes as used by Open-Meteo.
pub fn describe(code: u32) -> String {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        other => return format!("Code {other}"),
    };
    text.to_string()
}
