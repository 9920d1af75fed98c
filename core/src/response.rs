use crate::error::{ErrorKind, ToolError};
use crate::registry::Source;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success {
        text: String,
        elapsed_ms: u64,
    },
    Failure {
        kind: ErrorKind,
        message: String,
        elapsed_ms: u64,
    },
}

impl ToolResult {
    pub fn from_outcome(outcome: Result<String, ToolError>, elapsed: Duration) -> Self {
        match outcome {
            Ok(text) => Self::success(text, elapsed),
            Err(e) => Self::failure(e, elapsed),
        }
    }

    pub fn success(text: impl Into<String>, elapsed: Duration) -> Self {
        Self::Success {
            text: text.into(),
            elapsed_ms: millis(elapsed),
        }
    }

    pub fn failure(error: ToolError, elapsed: Duration) -> Self {
        Self::Failure {
            kind: error.kind,
            message: error.message,
            elapsed_ms: millis(elapsed),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self {
            Self::Success { elapsed_ms, .. } | Self::Failure { elapsed_ms, .. } => *elapsed_ms,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// A tool result tagged with the tool it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub source: Source,
    pub result: ToolResult,
}

impl Reply {
    /// The answer, or the source-prefixed error line.
    pub fn content(&self) -> String {
        content(self.source, &self.result)
    }

    pub fn render(&self) -> String {
        format_response(self.source, &self.result)
    }
}

const RULE: &str = "------------------------------------";

/// Render the fixed reply block.
pub fn format_response(source: Source, result: &ToolResult) -> String {
    format!(
        "\n{RULE}\n\nAssistant Response\n\nSource: {source}\n\n{content}\n\n(response time: {ms} ms)\n\n{RULE}\n",
        content = content(source, result),
        ms = result.elapsed_ms(),
    )
}

fn content(source: Source, result: &ToolResult) -> String {
    match result {
        ToolResult::Success { text, .. } => text.clone(),
        ToolResult::Failure { message, .. } => format!("{}: {}", source.error_prefix(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_block() {
        let result = ToolResult::success("128 * 46 = 5888", Duration::from_millis(3));
        let text = format_response(Source::Calculator, &result);

        assert!(text.contains("Assistant Response"));
        assert!(text.contains("Source: 🧮 Calculator"));
        assert!(text.contains("\n128 * 46 = 5888\n"));
        assert!(text.contains("(response time: 3 ms)"));
        assert!(text.starts_with('\n'));
        assert!(text.trim_end().ends_with(RULE));
    }

    #[test]
    fn test_failure_block() {
        let result = ToolResult::failure(
            ToolError::location_not_found("Atlantis"),
            Duration::from_millis(120),
        );
        let text = format_response(Source::Weather, &result);

        assert!(text.contains("Source: ☁️ Weather API"));
        assert!(text.contains("Weather error: No results for location 'Atlantis'."));
        assert!(text.contains("(response time: 120 ms)"));
    }

    #[test]
    fn test_result_accessors() {
        let ok = ToolResult::success("fine", Duration::from_micros(1500));
        assert!(ok.is_success());
        assert_eq!(ok.elapsed_ms(), 1);
        assert_eq!(ok.error_kind(), None);

        let failed = ToolResult::failure(ToolError::division_by_zero(), Duration::ZERO);
        assert_eq!(failed.error_kind(), Some(ErrorKind::DivisionByZero));
    }

    #[test]
    fn test_failure_serializes_kind_name() {
        let failed = ToolResult::failure(ToolError::overflow(), Duration::ZERO);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "Overflow");
    }
}
