use crate::intent::WeatherRequest;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref KEYWORD: Regex =
        Regex::new(r"(?i)\b(?:weather|forecast|temperature|tempo|clima|pron[oó]stico)\b").unwrap();

    static ref PREPOSITION: Regex = Regex::new(r"(?i)\b(?:in|at|for|em|en|para)\s+").unwrap();
}

/// Words dropped from either end of a location candidate.
const FILLER: &[&str] = &[
    "what", "what's", "whats", "how", "how's", "is", "the", "a", "like", "today", "tomorrow",
    "tonight", "now", "right", "current", "currently", "in", "at", "for", "of", "em", "en",
    "para", "de", "do", "da", "del", "o", "el", "la", "qual", "como", "está", "esta", "es",
    "hoje", "amanhã", "amanha", "agora", "hoy", "mañana", "manana", "ahora", "this", "next",
    "night", "morning", "afternoon", "evening", "noon", "midnight", "weekend", "week",
    "noite", "manhã", "manha", "tarde", "noche", "semana", "fim",
];

/// Detect a weather query and extract its location.
///
/// Input with a weather keyword but no usable location is not a weather
/// query.
pub fn detect(text: &str) -> Option<WeatherRequest> {
    let keyword = KEYWORD.find(text)?;

    // Prepositions after the keyword first, in order; a span that is only
    // time words ("for tomorrow in Paris") moves on to the next one.
    let (following, preceding): (Vec<_>, Vec<_>) = PREPOSITION
        .find_iter(text)
        .partition(|m| m.start() >= keyword.end());
    let after_preposition = following
        .into_iter()
        .chain(preceding)
        .find_map(|m| clean(location_span(&text[m.end()..])));

    let location = after_preposition.or_else(|| {
        // "weather Paris" / "Paris weather"
        let before = &text[..keyword.start()];
        let after = &text[keyword.end()..];
        clean(cut_sentence(after)).or_else(|| clean(before))
    })?;

    Some(WeatherRequest { location })
}

/// A location ends where the next preposition starts: "London at night".
fn location_span(span: &str) -> &str {
    let span = cut_sentence(span);
    match PREPOSITION.find(span) {
        Some(m) => &span[..m.start()],
        None => span,
    }
}

/// Stop at sentence punctuation or at a second weather keyword.
fn cut_sentence(span: &str) -> &str {
    let end = span.find(['?', '!', ';']).unwrap_or(span.len());
    let span = &span[..end];
    match KEYWORD.find(span) {
        Some(m) => &span[..m.start()],
        None => span,
    }
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_whitespace() || ",.;:!?¿¡\"'-".contains(c))
}

fn is_filler(word: &str) -> bool {
    let word = trim_punctuation(word).to_lowercase();
    word.is_empty() || FILLER.contains(&word.as_str())
}

fn clean(span: &str) -> Option<String> {
    let mut words: Vec<&str> = span.split_whitespace().collect();
    while words.first().is_some_and(|w| is_filler(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| is_filler(w)) {
        words.pop();
    }

    let location = trim_punctuation(&words.join(" ")).to_string();
    if location.is_empty() {
        None
    } else {
        Some(location)
    }
}
