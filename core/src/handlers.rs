use crate::calculator::{self, format_number};
use crate::error::ToolError;
use crate::intent::{CurrencyRequest, MathRequest, WeatherRequest};
use crate::services::{LlmService, RateService, WeatherService};
use tracing::debug;

pub fn math(request: &MathRequest, decimal_places: usize) -> Result<String, ToolError> {
    let value = calculator::evaluate(&request.expression)?;
    Ok(format!(
        "{} = {}",
        request.expression,
        format_number(value, decimal_places)
    ))
}

pub async fn weather(
    request: &WeatherRequest,
    service: &dyn WeatherService,
) -> Result<String, ToolError> {
    // 1. Geocode (best match first)
    let places = service.resolve(&request.location).await?;
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::location_not_found(&request.location))?;
    debug!(
        place = %place.name,
        lat = place.latitude,
        lon = place.longitude,
        "Resolved location"
    );

    // 2. Current conditions
    let now = service.forecast(place.latitude, place.longitude).await?;
    Ok(format!(
        "Weather in {}: {}, {}°C, wind {} km/h.",
        place.display_name(),
        now.description,
        now.temperature,
        now.wind_speed
    ))
}

/// `amount × rate`, rounded to 2 decimals.
pub async fn currency(
    request: &CurrencyRequest,
    service: &dyn RateService,
) -> Result<String, ToolError> {
    if request.amount < 0.0 {
        return Err(ToolError::invalid_amount("Amount must not be negative."));
    }

    let amount = format_number(request.amount, 2);
    if request.source == request.target {
        return Ok(format!(
            "{amount} {src} = {amount} {src} (same currency)",
            src = request.source
        ));
    }

    let quote = service.rate(&request.source, &request.target).await?;
    let converted = round2(request.amount * quote.rate);
    if !converted.is_finite() {
        return Err(ToolError::overflow());
    }

    let mut text = format!(
        "{amount} {} = {converted:.2} {} (rate: {:.6})",
        request.source, request.target, quote.rate
    );
    if quote.approximate {
        text.push_str(" [offline estimate]");
    }
    Ok(text)
}

pub async fn general(prompt: &str, llm: &dyn LlmService) -> Result<String, ToolError> {
    llm.complete(prompt).await
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
