use crate::detect;
use crate::error::ToolError;
use crate::registry::Source;

/// Normalized arithmetic expression: numerals, `.`, whitespace and
/// `+ - * / ( )` only.
#[derive(Debug, Clone, PartialEq)]
pub struct MathRequest {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub location: String,
}

/// Currency codes are uppercase 3-letter tokens; `amount` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRequest {
    pub amount: f64,
    pub source: String,
    pub target: String,
}

/// The classified purpose of a single user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Math(MathRequest),
    Weather(WeatherRequest),
    Currency(CurrencyRequest),
    /// LLM fallback with the raw prompt
    General(String),
}

/// Input recognized by a detector but invalid before any handler runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub source: Source,
    pub error: ToolError,
}

impl Intent {
    /// Try the detectors in fixed priority: math, currency, weather, then
    /// fall back to the LLM.
    pub fn classify(input: &str) -> Result<Intent, Rejection> {
        if let Some(math) = detect::math::extract(input) {
            return Ok(Intent::Math(math));
        }

        match detect::currency::detect(input) {
            Some(Ok(currency)) => return Ok(Intent::Currency(currency)),
            Some(Err(error)) => {
                return Err(Rejection {
                    source: Source::Currency,
                    error,
                })
            }
            None => {}
        }

        if let Some(weather) = detect::weather::detect(input) {
            return Ok(Intent::Weather(weather));
        }

        Ok(Intent::General(input.trim().to_string()))
    }

    pub fn source(&self) -> Source {
        match self {
            Intent::Math(_) => Source::Calculator,
            Intent::Weather(_) => Source::Weather,
            Intent::Currency(_) => Source::Currency,
            Intent::General(_) => Source::Llm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_priority_order() {
        assert_eq!(Intent::classify("What is 128 * 46?").unwrap().source(), Source::Calculator);
        assert_eq!(
            Intent::classify("Convert 100 USD to BRL").unwrap().source(),
            Source::Currency
        );
        assert_eq!(Intent::classify("Weather in New York").unwrap().source(), Source::Weather);
        assert_eq!(
            Intent::classify("Who was Albert Einstein?").unwrap(),
            Intent::General("Who was Albert Einstein?".to_string())
        );
    }

    #[test]
    fn test_math_beats_currency_and_weather() {
        let intent = Intent::classify("weather in 2 + 2 USD to BRL").unwrap();
        assert_eq!(
            intent,
            Intent::Math(MathRequest {
                expression: "2 + 2".to_string()
            })
        );
    }

    #[test]
    fn test_currency_beats_weather() {
        let intent = Intent::classify("temperature of 100 EUR in USD").unwrap();
        assert_eq!(intent.source(), Source::Currency);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let rejection = Intent::classify("Convert -5 USD to BRL").unwrap_err();
        assert_eq!(rejection.source, Source::Currency);
        assert_eq!(rejection.error.kind, ErrorKind::InvalidAmount);
    }
}
