//! Language Detection Scenario
//!
//! Asks the model to classify free-form text into a small set of language
//! categories, with special care for Sinhala written in native script versus
//! romanized "Singlish".

use serde_json::Value;

use crate::models::{DetectionResult, UNKNOWN_LANGUAGE};
use crate::services::llm::models::{LLMError, LLMScenario};
use crate::services::llm::service::{LLMAnalysisRequestTrait, LLMAnalysisResponseTrait};

/// Categories the prompt offers the model. Replies are not checked against it.
pub const LANGUAGE_CATEGORIES: &[&str] =
    &["english", "sinhala", "singlish", "tamil", "mixed", "other"];

pub const NO_ANALYSIS_PLACEHOLDER: &str = "No analysis provided";

const PROMPT_HEADER: &str = "Analyze the following text and detect its language(s).";

const PROMPT_FORMAT: &str = r#"Please provide your analysis in the following JSON format:
{
    "language": "primary language (one of: english, sinhala, singlish, tamil, mixed, or other)",
    "confidence": confidence percentage as a number between 0-100,
    "analysis": "brief explanation of your detection including what languages you found and why"
}

Category definitions:
- "sinhala": text written in Sinhala Unicode script (සිංහල)
- "singlish": Sinhala words spelled with English/Latin letters (e.g. "kohomada", "oyata", "mama")
- "english": standard English text
- "tamil": text written in Tamil script
- "mixed": several languages combined in the same text
- "other": any language not listed above
- Distinguish carefully between Sinhala script and Singlish (romanized Sinhala)

Return ONLY the JSON object, nothing else."#;

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone)]
pub struct LanguageDetectionRequest<'a> {
    pub text: &'a str,
}

impl<'a> LanguageDetectionRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl LLMAnalysisRequestTrait for LanguageDetectionRequest<'_> {
    fn scenario(&self) -> LLMScenario {
        LLMScenario::LanguageDetection
    }

    /// The user text is embedded verbatim, untrimmed and unescaped.
    fn prompt(&self) -> String {
        format!("{}\n\nText: \"{}\"\n\n{}", PROMPT_HEADER, self.text, PROMPT_FORMAT)
    }
}

// ============================================================================
// Response
// ============================================================================

impl LLMAnalysisResponseTrait for DetectionResult {
    fn from_reply(reply: &str) -> Result<Self, LLMError> {
        let value: Value = serde_json::from_str(strip_code_fences(reply))?;
        normalize(value)
    }

    fn from_error(err: &LLMError) -> Self {
        if err.is_parse_error() {
            DetectionResult::fallback(format!("Error parsing AI response: {}", err))
        } else {
            DetectionResult::fallback(format!("Error: {}", err))
        }
    }
}

/// Remove a markdown code fence that models like to wrap JSON in.
///
/// Handles an opening marker with or without a language hint (```` ```json ````)
/// and a closing marker, each independently optional.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = &rest[language_hint_len(rest)..];
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

// A hint is an identifier starting with a letter, directly followed by
// whitespace or the JSON payload. Anything else is fenced content.
fn language_hint_len(rest: &str) -> usize {
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return 0;
    }
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(rest.len());
    match rest[len..].chars().next() {
        None | Some('{' | '[') => len,
        Some(c) if c.is_whitespace() => len,
        _ => 0,
    }
}

fn normalize(value: Value) -> Result<DetectionResult, LLMError> {
    let Value::Object(map) = value else {
        return Err(LLMError::invalid_field(
            "reply",
            format!("expected a JSON object, got {}", json_kind(&value)),
        ));
    };

    let language = match map.get("language") {
        None | Some(Value::Null) => UNKNOWN_LANGUAGE.to_string(),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(other) => {
            return Err(LLMError::invalid_field(
                "language",
                format!("expected a string, got {}", json_kind(other)),
            ));
        },
    };

    let confidence = match map.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| {
                LLMError::invalid_field("confidence", format!("'{}' is not a number", s))
            })?,
        Some(other) => {
            return Err(LLMError::invalid_field(
                "confidence",
                format!("expected a number, got {}", json_kind(other)),
            ));
        },
    };

    let analysis = match map.get("analysis") {
        None | Some(Value::Null) => NO_ANALYSIS_PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(DetectionResult { language, confidence, analysis })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
