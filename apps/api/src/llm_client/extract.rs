//! Response-shape normalization for chat-completion payloads.
//!
//! Providers behind OpenAI-compatible bridges do not agree on where the text
//! lives. Strategies are tried in order; the first one whose field is present
//! wins, even if it holds an empty string. Only when none match is the content
//! empty.

use serde_json::Value;
use tracing::debug;

/// Provider output reduced to what the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    pub finish_reason: Option<String>,
}

impl ChatCompletion {
    /// Number of characters in the content (not bytes).
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn finished_normally(&self) -> bool {
        self.finish_reason.as_deref() == Some("stop")
    }
}

type Strategy = fn(&Value) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("choices[0].message.content", message_content_text),
    ("choices[0].message.content[]", message_content_parts),
    ("choices[0].text", choice_text),
    ("output_text", output_text),
];

pub fn normalize(raw: &Value) -> ChatCompletion {
    ChatCompletion {
        content: extract_content(raw),
        finish_reason: raw
            .pointer("/choices/0/finish_reason")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

pub fn extract_content(raw: &Value) -> String {
    for (name, strategy) in STRATEGIES {
        if let Some(content) = strategy(raw) {
            debug!(strategy = *name, "Extracted completion content");
            return content;
        }
    }
    debug!("No known content field in provider response");
    String::new()
}

fn message_content_text(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn message_content_parts(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/message/content")
        .and_then(Value::as_array)
        .map(|parts| join_parts(parts))
}

fn choice_text(raw: &Value) -> Option<String> {
    raw.pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn output_text(raw: &Value) -> Option<String> {
    match raw.get("output_text")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(join_parts(parts)),
        _ => None,
    }
}

/// Joins content parts that are either bare strings or `{ "text": ... }` objects.
fn join_parts(parts: &[Value]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Value::String(s) => Some(s.as_str()),
            other => other.get("text").and_then(Value::as_str),
        })
        .filter(|s| !s.is_empty())
        .collect()
}
