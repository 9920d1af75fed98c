use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A classified tool failure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_expression(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidExpression, message)
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division by zero.")
    }

    pub fn overflow() -> Self {
        Self::new(ErrorKind::Overflow, "Result is out of range.")
    }

    pub fn location_not_found(location: &str) -> Self {
        Self::new(
            ErrorKind::LocationNotFound,
            format!("No results for location '{location}'."),
        )
    }

    pub fn unknown_currency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCurrency, message)
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAmount, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnclassifiedError, message)
    }
}

/// Error classification, carried into `ToolResult::Failure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed or disallowed math syntax
    InvalidExpression,
    DivisionByZero,
    /// Result is not a finite number
    Overflow,
    /// Geocoding returned zero matches
    LocationNotFound,
    UnknownCurrency,
    /// Rejected at detection time, no collaborator is called
    InvalidAmount,
    /// Network or API-level failure from any collaborator
    ServiceUnavailable,
    UnclassifiedError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidExpression => "InvalidExpression",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::LocationNotFound => "LocationNotFound",
            ErrorKind::UnknownCurrency => "UnknownCurrency",
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::ServiceUnavailable => "ServiceUnavailable",
            ErrorKind::UnclassifiedError => "UnclassifiedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
