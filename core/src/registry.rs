use crate::config::UiConfig;
use serde::Serialize;
use std::fmt;

/// The four tool identities a reply can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Calculator,
    Weather,
    Currency,
    Llm,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Calculator,
        Source::Weather,
        Source::Currency,
        Source::Llm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Source::Calculator => "Calculator",
            Source::Weather => "Weather API",
            Source::Currency => "Currency API",
            Source::Llm => "LLM",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Source::Calculator => "🧮",
            Source::Weather => "☁️",
            Source::Currency => "💱",
            Source::Llm => "💡",
        }
    }

    /// Prefix for failure lines, e.g. "Math error: Division by zero."
    pub fn error_prefix(self) -> &'static str {
        match self {
            Source::Calculator => "Math error",
            Source::Weather => "Weather error",
            Source::Currency => "Currency error",
            Source::Llm => "LLM error",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.name())
    }
}

/// One entry of the tool menu shown to the user
#[derive(Debug, Clone)]
pub struct ToolRecord {
    pub source: Source,
    /// Printed by the console before the tool runs
    pub announcement: String,
}

/// Tool menu, built once from the UI settings
#[derive(Debug, Clone)]
pub struct Registry {
    records: Vec<ToolRecord>,
}

impl Registry {
    pub fn new(ui: &UiConfig) -> Self {
        let records = Source::ALL
            .iter()
            .map(|&source| {
                let announcement = match source {
                    Source::Calculator => &ui.math_message,
                    Source::Weather => &ui.weather_message,
                    Source::Currency => &ui.currency_message,
                    Source::Llm => &ui.llm_message,
                };
                ToolRecord {
                    source,
                    announcement: announcement.clone(),
                }
            })
            .collect();

        Self { records }
    }

    pub fn get(&self, source: Source) -> Option<&ToolRecord> {
        self.records.iter().find(|r| r.source == source)
    }

    pub fn announcement(&self, source: Source) -> &str {
        self.get(source).map_or("", |r| r.announcement.as_str())
    }

    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }
}
