use anyhow::Result;
use assistant_core::config::CurrencyConfig;
use assistant_core::{ErrorKind, Quote, RateService, ToolError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::http;

/// Approximate units per USD, used only when the live service is down.
const USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 110.0),
    ("BRL", 5.0),
    ("CAD", 1.25),
    ("AUD", 1.35),
    ("CHF", 0.92),
    ("CNY", 6.4),
    ("INR", 74.0),
];

pub struct ExchangeRateClient {
    http: reqwest::Client,
    rates_url: String,
    offline_fallback: bool,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl ExchangeRateClient {
    pub fn new(config: &CurrencyConfig) -> Result<Self> {
        Ok(Self {
            http: http::client(config.timeout_seconds)?,
            rates_url: config.rates_url.trim_end_matches('/').to_string(),
            offline_fallback: config.offline_fallback,
        })
    }

    async fn live_rate(&self, source: &str, target: &str) -> Result<f64, ToolError> {
        let url = format!("{}/{}", self.rates_url, source);
        debug!(%url, "Fetching rates");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| http::unavailable("Rate service", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(unknown(source));
        }

        let body: LatestRates = response
            .error_for_status()
            .map_err(|e| http::unavailable("Rate service", e))?
            .json()
            .await
            .map_err(|e| http::unavailable("Rate service", e))?;

        pick(&body, target)
    }
}

#[async_trait]
impl RateService for ExchangeRateClient {
    async fn rate(&self, source: &str, target: &str) -> Result<Quote, ToolError> {
        match self.live_rate(source, target).await {
            Ok(rate) => Ok(Quote::live(rate)),
            Err(e) if e.kind == ErrorKind::ServiceUnavailable && self.offline_fallback => {
                warn!(error = %e, "Rate service unavailable, using offline rates");
                offline_rate(source, target)
                    .map(|rate| Quote {
                        rate,
                        approximate: true,
                    })
                    .ok_or(e)
            }
            Err(e) => Err(e),
        }
    }
}

fn unknown(code: &str) -> ToolError {
    ToolError::unknown_currency(format!("Unknown currency code '{code}'."))
}

fn pick(body: &LatestRates, target: &str) -> Result<f64, ToolError> {
    body.rates.get(target).copied().ok_or_else(|| unknown(target))
}

/// Cross rate through USD from the built-in table.
pub fn offline_rate(source: &str, target: &str) -> Option<f64> {
    let per_usd = |code: &str| {
        USD_RATES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, rate)| *rate)
    };
    Some(per_usd(target)? / per_usd(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_rate() {
        let body: LatestRates = serde_json::from_str(
            r#"{
                "provider": "https://www.exchangerate-api.com",
                "base": "USD",
                "date": "2026-10-16",
                "rates": { "USD": 1, "BRL": 5.43, "EUR": 0.92 }
            }"#,
        )
        .unwrap();

        assert_eq!(pick(&body, "BRL").unwrap(), 5.43);
        assert_eq!(pick(&body, "USD").unwrap(), 1.0);
        assert_eq!(pick(&body, "ZZZ").unwrap_err().kind, ErrorKind::UnknownCurrency);
    }

    #[test]
    fn test_offline_cross_rates() {
        assert_eq!(offline_rate("USD", "BRL"), Some(5.0));
        let eur_to_gbp = offline_rate("EUR", "GBP").unwrap();
        assert!((eur_to_gbp - 0.73 / 0.85).abs() < 1e-12);
        assert_eq!(offline_rate("USD", "ZZZ"), None);
        assert_eq!(offline_rate("ZZZ", "USD"), None);
    }

    #[tokio::test]
    async fn test_unreachable_service_uses_offline_table() {
        let client = ExchangeRateClient::new(&CurrencyConfig {
            rates_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            offline_fallback: true,
        })
        .unwrap();

        let quote = client.rate("USD", "BRL").await.unwrap();
        assert!(quote.approximate);
        assert_eq!(quote.rate, 5.0);

        let err = client.rate("USD", "ZZZ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }

    #[tokio::test]
    async fn test_unreachable_service_without_fallback() {
        let client = ExchangeRateClient::new(&CurrencyConfig {
            rates_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            offline_fallback: false,
        })
        .unwrap();

        let err = client.rate("USD", "BRL").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }
}
