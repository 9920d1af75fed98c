//! Currency conversion detection.
//!
//! Grammar: `<amount> <source> (to|in|into|para|em) <target>`, anywhere in
//! the input, so leading phrasing like "convert", "converter", "how much
//! is" or "quanto vale" is tolerated.

use crate::error::ToolError;
use crate::intent::CurrencyRequest;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONVERSION: Regex = Regex::new(
        r"(?:^|[\s(])(-?[0-9][0-9.,]*)\s*([A-Za-z]{3})\s+(?i:to|in|into|para|em)\s+([A-Za-z]{3})\b"
    )
    .unwrap();
}

/// Detect a conversion request.
///
/// `None` means the input is not a currency query (including amounts that
/// do not parse). `Some(Err(_))` is a recognized query that must be
/// rejected without calling the rate service.
pub fn detect(text: &str) -> Option<Result<CurrencyRequest, ToolError>> {
    CONVERSION.captures_iter(text).find_map(|caps| {
        let amount = parse_amount(&caps[1])?;
        let source = caps[2].to_uppercase();
        let target = caps[3].to_uppercase();

        if amount < 0.0 {
            return Some(Err(ToolError::invalid_amount(format!(
                "Amount must not be negative (got {}).",
                &caps[1]
            ))));
        }

        Some(Ok(CurrencyRequest {
            amount,
            source,
            target,
        }))
    })
}

/// Parse an amount token, accepting `1,000.50` and `1.000,50` (the later
/// separator is the decimal one) and `10,5` (decimal comma).
fn parse_amount(token: &str) -> Option<f64> {
    let token = token.trim_end_matches(['.', ',']);
    let commas = token.matches(',').count();

    let normalized = match (token.rfind('.'), token.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => token.replace('.', "").replace(',', "."),
        (Some(_), _) => token.replace(',', ""),
        (None, Some(_)) if commas == 1 && token.split(',').nth(1).map_or(0, str::len) != 3 => {
            token.replace(',', ".")
        }
        _ => token.replace(',', ""),
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
