use crate::config::{FailurePolicy, RoutingConfig};
use crate::error::ToolError;
use crate::handlers;
use crate::intent::{Intent, Rejection};
use crate::registry::Source;
use crate::response::{Reply, ToolResult};
use crate::services::{LlmService, RateService, WeatherService};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub struct Router {
    weather: Arc<dyn WeatherService>,
    rates: Arc<dyn RateService>,
    brain: Arc<dyn LlmService>,
    routing: RoutingConfig,
}

impl Router {
    pub fn new(
        weather: Arc<dyn WeatherService>,
        rates: Arc<dyn RateService>,
        brain: Arc<dyn LlmService>,
        routing: RoutingConfig,
    ) -> Self {
        Self {
            weather,
            rates,
            brain,
            routing,
        }
    }

    /// The core entry point: raw input in, formatted reply block out.
    pub async fn route(&self, input: &str) -> String {
        self.respond(input).await.render()
    }

    /// Classify and handle `input`, returning the unformatted reply.
    pub async fn respond(&self, input: &str) -> Reply {
        self.handle(input, Intent::classify(input)).await
    }

    /// Handle an already classified input. Callers that announce the tool
    /// before it runs classify first, then hand the outcome here.
    pub async fn handle(&self, input: &str, classified: Result<Intent, Rejection>) -> Reply {
        let start = Instant::now();

        let intent = match classified {
            Ok(intent) => intent,
            Err(Rejection { source, error }) => {
                info!(source = %source.name(), kind = %error.kind, "Input rejected before dispatch");
                return Reply {
                    source,
                    result: ToolResult::failure(error, start.elapsed()),
                };
            }
        };

        // 1. Act
        let source = intent.source();
        let outcome = guarded(self.run(&intent)).await;

        // 2. Optional LLM fallback
        let (source, outcome) = match outcome {
            Err(error)
                if self.routing.on_failure == FailurePolicy::FallbackToLlm
                    && source != Source::Llm =>
            {
                warn!(source = %source.name(), kind = %error.kind, "Handler failed, asking the LLM instead");
                match guarded(handlers::general(input.trim(), self.brain.as_ref())).await {
                    Ok(text) => (Source::Llm, Ok(text)),
                    Err(llm_error) => {
                        warn!(kind = %llm_error.kind, "LLM fallback failed too");
                        (source, Err(error))
                    }
                }
            }
            other => (source, other),
        };

        // 3. Log & reply
        let result = ToolResult::from_outcome(outcome, start.elapsed());
        match &result {
            ToolResult::Success { elapsed_ms, .. } => {
                info!(source = %source.name(), elapsed_ms, "Tool call completed");
            }
            ToolResult::Failure {
                kind,
                message,
                elapsed_ms,
            } => {
                warn!(source = %source.name(), %kind, elapsed_ms, error = %message, "Tool call failed");
            }
        }

        Reply { source, result }
    }

    async fn run(&self, intent: &Intent) -> Result<String, ToolError> {
        match intent {
            Intent::Math(request) => handlers::math(request, self.routing.decimal_places),
            Intent::Weather(request) => handlers::weather(request, self.weather.as_ref()).await,
            Intent::Currency(request) => handlers::currency(request, self.rates.as_ref()).await,
            Intent::General(prompt) => handlers::general(prompt, self.brain.as_ref()).await,
        }
    }
}

/// Turn a panic inside a collaborator into `UnclassifiedError`.
async fn guarded<F>(call: F) -> Result<String, ToolError>
where
    F: Future<Output = Result<String, ToolError>>,
{
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ToolError::unclassified(panic_message(panic.as_ref()))))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Unexpected failure: {detail}")
}
