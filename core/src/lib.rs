pub mod calculator;
pub mod config;
pub mod detect;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod llm;
pub mod registry;
pub mod response;
pub mod router;
pub mod services;

pub use config::{AppConfig, FailurePolicy};
pub use error::{ErrorKind, ToolError};
pub use intent::{CurrencyRequest, Intent, MathRequest, Rejection, WeatherRequest};
pub use llm::Brain;
pub use registry::{Registry, Source};
pub use response::{format_response, Reply, ToolResult};
pub use router::Router;
pub use services::{Conditions, LlmService, Place, Quote, RateService, WeatherService};
