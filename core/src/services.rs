use crate::error::ToolError;
use async_trait::async_trait;

/// A geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// "Lisbon, Portugal", or just the name when the country is unknown
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Current conditions at a point
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    /// Degrees Celsius
    pub temperature: f64,
    /// km/h
    pub wind_speed: f64,
    pub description: String,
}

/// A conversion rate from the rate service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub rate: f64,
    /// True when served from the offline table instead of the live service
    pub approximate: bool,
}

impl Quote {
    pub fn live(rate: f64) -> Self {
        Self {
            rate,
            approximate: false,
        }
    }
}

/// Geocoding + forecast service
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Resolve free text to candidate places, best match first. Zero matches
    /// is `Ok(vec![])`, not an error.
    async fn resolve(&self, location: &str) -> Result<Vec<Place>, ToolError>;

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Conditions, ToolError>;
}

/// Conversion-rate service
#[async_trait]
pub trait RateService: Send + Sync {
    /// Rate for `source` → `target`; unknown codes fail with
    /// `UnknownCurrency`.
    async fn rate(&self, source: &str, target: &str) -> Result<Quote, ToolError>;
}

/// LLM completion service
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ToolError>;
}
