use crate::calculator::{tokenize, Token};
use crate::intent::MathRequest;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Maximal runs of characters an expression may be built from. A comma
    /// between digits stays inside the run so "1,000" is never split.
    static ref MATH_RUN: Regex = Regex::new(r"(?:[0-9],[0-9]|[0-9.()+\-*/\s])+").unwrap();

    static ref THOUSANDS: Regex = Regex::new(r"\b[0-9]{1,3}(?:,[0-9]{3})+\b").unwrap();
}

/// Extract the first calculable expression from `text`, if any.
pub fn extract(text: &str) -> Option<MathRequest> {
    MATH_RUN
        .find_iter(text)
        .filter_map(|m| normalize(m.as_str()))
        .find(|candidate| is_calculable(candidate))
        .map(|expression| MathRequest { expression })
}

/// Trim surrounding whitespace, sentence punctuation and unmatched
/// parentheses from a candidate run. Thousands separators are dropped; any
/// other comma is left for the evaluator to reject.
fn normalize(run: &str) -> Option<String> {
    let run = THOUSANDS.replace_all(run, |caps: &Captures| caps[0].replace(',', ""));
    let mut expr = run.trim().trim_end_matches('.').trim_end().to_string();

    loop {
        let opens = expr.matches('(').count();
        let closes = expr.matches(')').count();
        if closes > opens && expr.ends_with(')') {
            expr.pop();
        } else if opens > closes && expr.starts_with('(') {
            expr.remove(0);
        } else {
            break;
        }
        expr = expr.trim().to_string();
    }

    let expr = collapse_whitespace(&expr);
    if expr.is_empty() {
        None
    } else {
        Some(expr)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Two operands and one binary operator at minimum. A bare or negated
/// number does not qualify.
fn is_calculable(candidate: &str) -> bool {
    // Malformed literals still count as a math query; the evaluator
    // reports them.
    let Ok(tokens) = tokenize(candidate) else {
        return candidate.chars().any(|c| c.is_ascii_digit())
            && candidate.chars().any(|c| matches!(c, '+' | '*' | '/'));
    };

    let operands = tokens
        .iter()
        .filter(|t| matches!(t, Token::Number(_)))
        .count();
    let binary_ops = tokens
        .windows(2)
        .filter(|pair| {
            matches!(pair[0], Token::Number(_) | Token::RParen) && pair[1].is_operator()
        })
        .count();

    operands >= 2 && binary_ops >= 1
}
