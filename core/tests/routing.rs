use assistant_core::config::RoutingConfig;
use assistant_core::{
    Conditions, ErrorKind, FailurePolicy, LlmService, Place, Quote, RateService, Router, Source,
    ToolError, WeatherService,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Calls {
    resolve: AtomicUsize,
    forecast: AtomicUsize,
    rate: AtomicUsize,
    complete: AtomicUsize,
    rate_args: Mutex<Vec<(String, String)>>,
}

impl Calls {
    fn total(&self) -> usize {
        self.resolve.load(Ordering::SeqCst)
            + self.forecast.load(Ordering::SeqCst)
            + self.rate.load(Ordering::SeqCst)
            + self.complete.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy)]
enum Behaviour {
    Ok,
    Down,
    Panic,
}

struct MockWeather {
    calls: Arc<Calls>,
    places: Vec<Place>,
    behaviour: Behaviour,
}

#[async_trait]
impl WeatherService for MockWeather {
    async fn resolve(&self, _location: &str) -> Result<Vec<Place>, ToolError> {
        self.calls.resolve.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Ok => Ok(self.places.clone()),
            Behaviour::Down => Err(ToolError::service_unavailable("Geocoding request timed out.")),
            Behaviour::Panic => panic!("geocoder exploded"),
        }
    }

    async fn forecast(&self, _lat: f64, _lon: f64) -> Result<Conditions, ToolError> {
        self.calls.forecast.fetch_add(1, Ordering::SeqCst);
        Ok(Conditions {
            temperature: 21.5,
            wind_speed: 12.0,
            description: "Partly cloudy".to_string(),
        })
    }
}

struct MockRates {
    calls: Arc<Calls>,
    rate: f64,
}

#[async_trait]
impl RateService for MockRates {
    async fn rate(&self, source: &str, target: &str) -> Result<Quote, ToolError> {
        self.calls.rate.fetch_add(1, Ordering::SeqCst);
        self.calls
            .rate_args
            .lock()
            .unwrap()
            .push((source.to_string(), target.to_string()));
        if target == "XXX" {
            return Err(ToolError::unknown_currency("Currency XXX not supported"));
        }
        Ok(Quote::live(self.rate))
    }
}

struct MockLlm {
    calls: Arc<Calls>,
    behaviour: Behaviour,
}

#[async_trait]
impl LlmService for MockLlm {
    async fn complete(&self, prompt: &str) -> Result<String, ToolError> {
        self.calls.complete.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Ok => Ok(format!("LLM says: {prompt}")),
            Behaviour::Down => Err(ToolError::service_unavailable("LLM request failed")),
            Behaviour::Panic => panic!("llm exploded"),
        }
    }
}

struct Harness {
    calls: Arc<Calls>,
    router: Router,
}

fn new_york() -> Place {
    Place {
        name: "New York".to_string(),
        country: Some("United States".to_string()),
        latitude: 40.71,
        longitude: -74.01,
    }
}

fn harness_with(
    places: Vec<Place>,
    weather: Behaviour,
    llm: Behaviour,
    on_failure: FailurePolicy,
) -> Harness {
    let calls = Arc::new(Calls::default());
    let router = Router::new(
        Arc::new(MockWeather {
            calls: calls.clone(),
            places,
            behaviour: weather,
        }),
        Arc::new(MockRates {
            calls: calls.clone(),
            rate: 5.0,
        }),
        Arc::new(MockLlm {
            calls: calls.clone(),
            behaviour: llm,
        }),
        RoutingConfig {
            on_failure,
            ..RoutingConfig::default()
        },
    );
    Harness { calls, router }
}

fn harness() -> Harness {
    harness_with(
        vec![new_york()],
        Behaviour::Ok,
        Behaviour::Ok,
        FailurePolicy::Surface,
    )
}

fn without_timing(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with("(response time:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn math_inputs_never_reach_collaborators() {
    let h = harness();
    for input in ["128 * 46", "What is 128 * 46?", "weather in 2 + 2", "10 / 0"] {
        let reply = h.router.respond(input).await;
        assert_eq!(reply.source, Source::Calculator, "input: {input}");
    }
    assert_eq!(h.calls.total(), 0);
}

#[tokio::test]
async fn math_success_and_failure_blocks() {
    let h = harness();

    let text = h.router.route("What is 128 * 46?").await;
    assert!(text.contains("Source: 🧮 Calculator"));
    assert!(text.contains("128 * 46 = 5888"));
    assert!(text.contains("(response time: "));

    let reply = h.router.respond("10 / 0").await;
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::DivisionByZero));
    assert!(reply.render().contains("Math error: Division by zero."));
}

#[tokio::test]
async fn thousands_separators_are_part_of_the_operand() {
    let h = harness();

    let reply = h.router.respond("What is 1,000 + 500?").await;
    assert_eq!(reply.content(), "1000 + 500 = 1500");

    let reply = h.router.respond("Convert 1.000,50 EUR to BRL").await;
    assert_eq!(reply.source, Source::Currency);
    assert!(reply.content().starts_with("1000.5 EUR = 5002.50 BRL"));
}

#[tokio::test]
async fn math_failure_does_not_fall_through_to_llm() {
    let h = harness();
    let reply = h.router.respond("1.2.3 + 4").await;
    assert_eq!(reply.source, Source::Calculator);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::InvalidExpression));
    assert_eq!(h.calls.complete.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn currency_conversion_uses_rate() {
    let h = harness();
    let reply = h.router.respond("Convert 100 USD to BRL").await;

    assert_eq!(reply.source, Source::Currency);
    assert!(reply.result.is_success());
    assert_eq!(reply.content(), "100 USD = 500.00 BRL (rate: 5.000000)");
    assert_eq!(
        *h.calls.rate_args.lock().unwrap(),
        vec![("USD".to_string(), "BRL".to_string())]
    );
}

#[tokio::test]
async fn unknown_currency_is_surfaced() {
    let h = harness();
    let reply = h.router.respond("convert 5 usd to xxx").await;
    assert_eq!(reply.source, Source::Currency);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::UnknownCurrency));
}

#[tokio::test]
async fn negative_amount_rejected_without_collaborator_calls() {
    let h = harness();
    let reply = h.router.respond("Convert -5 USD to BRL").await;

    assert_eq!(reply.source, Source::Currency);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::InvalidAmount));
    assert!(reply.render().contains("Currency error: "));
    assert_eq!(h.calls.total(), 0);
}

#[tokio::test]
async fn weather_success() {
    let h = harness();
    let reply = h.router.respond("Weather in New York").await;

    assert_eq!(reply.source, Source::Weather);
    assert_eq!(
        reply.content(),
        "Weather in New York, United States: Partly cloudy, 21.5°C, wind 12 km/h."
    );
    assert_eq!(h.calls.resolve.load(Ordering::SeqCst), 1);
    assert_eq!(h.calls.forecast.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_location_does_not_reach_llm() {
    let h = harness_with(vec![], Behaviour::Ok, Behaviour::Ok, FailurePolicy::Surface);
    let reply = h.router.respond("Weather in Atlantis").await;

    assert_eq!(reply.source, Source::Weather);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::LocationNotFound));
    assert_eq!(h.calls.forecast.load(Ordering::SeqCst), 0);
    assert_eq!(h.calls.complete.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn general_questions_go_to_llm() {
    let h = harness();
    let reply = h.router.respond("  Who was Albert Einstein?  ").await;

    assert_eq!(reply.source, Source::Llm);
    assert_eq!(reply.content(), "LLM says: Who was Albert Einstein?");
    assert_eq!(h.calls.complete.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn llm_outage_is_formatted() {
    let h = harness_with(
        vec![new_york()],
        Behaviour::Ok,
        Behaviour::Down,
        FailurePolicy::Surface,
    );
    let text = h.router.route("Tell me a joke").await;
    assert!(text.contains("Source: 💡 LLM"));
    assert!(text.contains("LLM error: LLM request failed"));
    assert!(text.contains("(response time: "));
}

#[tokio::test]
async fn collaborator_panic_becomes_unclassified_error() {
    let h = harness_with(
        vec![new_york()],
        Behaviour::Panic,
        Behaviour::Ok,
        FailurePolicy::Surface,
    );
    let reply = h.router.respond("Weather in New York").await;

    assert_eq!(reply.source, Source::Weather);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::UnclassifiedError));
    assert!(reply.content().contains("geocoder exploded"));
}

#[tokio::test]
async fn identical_inputs_give_identical_replies() {
    let h = harness();
    for input in [
        "Convert 100 USD to BRL",
        "Weather in New York",
        "128 * 46",
        "Who was Albert Einstein?",
    ] {
        let first = h.router.route(input).await;
        let second = h.router.route(input).await;
        assert_eq!(without_timing(&first), without_timing(&second), "input: {input}");
    }
}

#[tokio::test]
async fn fallback_policy_asks_llm_after_failure() {
    let h = harness_with(
        vec![new_york()],
        Behaviour::Down,
        Behaviour::Ok,
        FailurePolicy::FallbackToLlm,
    );
    let reply = h.router.respond("Weather in New York").await;

    assert_eq!(reply.source, Source::Llm);
    assert!(reply.result.is_success());
    assert_eq!(h.calls.complete.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fallback_policy_surfaces_original_failure_when_llm_fails() {
    let h = harness_with(
        vec![new_york()],
        Behaviour::Down,
        Behaviour::Down,
        FailurePolicy::FallbackToLlm,
    );
    let reply = h.router.respond("Weather in New York").await;

    assert_eq!(reply.source, Source::Weather);
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::ServiceUnavailable));
}

#[tokio::test]
async fn fallback_policy_never_applies_to_rejected_input() {
    let h = harness_with(
        vec![new_york()],
        Behaviour::Ok,
        Behaviour::Ok,
        FailurePolicy::FallbackToLlm,
    );
    let reply = h.router.respond("Convert -5 USD to BRL").await;
    assert_eq!(reply.result.error_kind(), Some(ErrorKind::InvalidAmount));
    assert_eq!(h.calls.total(), 0);
}
