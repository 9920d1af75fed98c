use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Process-wide settings, built once at start-up and handed to every
/// client. Missing fields in `config.json` keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    pub currency: CurrencyConfig,
    pub ui: UiConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_base: String,
    pub timeout_seconds: u64,
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "compound-beta-mini".to_string(),
            temperature: 0.0,
            max_tokens: 512,
            api_base: "https://api.groq.com/openai/v1".to_string(),
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub rates_url: String,
    pub timeout_seconds: u64,
    /// Use the built-in approximate table when the rate service is down
    pub offline_fallback: bool,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            rates_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            timeout_seconds: 10,
            offline_fallback: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub math_message: String,
    pub weather_message: String,
    pub currency_message: String,
    pub llm_message: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            math_message: "Math expression detected, using calculator...".to_string(),
            weather_message: "Fetching weather via API...".to_string(),
            currency_message: "Fetching exchange rate via API...".to_string(),
            llm_message: "Fetching information via LLM...".to_string(),
        }
    }
}

/// What the router does when a specialized handler fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Format and return the failure as-is
    #[default]
    Surface,
    /// Re-ask the question to the LLM, surfacing the original failure if
    /// the LLM fails too
    FallbackToLlm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub on_failure: FailurePolicy,
    pub decimal_places: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            on_failure: FailurePolicy::Surface,
            decimal_places: 2,
        }
    }
}

impl AppConfig {
    /// Read `config.json` (if present) over the defaults, then apply the
    /// process environment.
    pub async fn load(path: &Path) -> Result<Self> {
        let mut config = if fs::try_exists(path).await.unwrap_or(false) {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config at '{}'", path.display()))?;
            let config = Self::from_json(&content)
                .with_context(|| format!("Invalid config at '{}'", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        } else {
            info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Environment overrides: `GROQ_API_KEY`, `GROQ_API_BASE`, `GROQ_MODEL`,
    /// `LLM_TEMPERATURE`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(base) = lookup("GROQ_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            self.llm.model = model;
        }
        if let Some(raw) = lookup("LLM_TEMPERATURE") {
            match raw.parse::<f32>() {
                Ok(t) => self.llm.temperature = t,
                Err(_) => warn!("Ignoring LLM_TEMPERATURE='{}': not a number", raw),
            }
        }
    }
}
