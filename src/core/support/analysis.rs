//! Classification and sentiment nodes. Both ask for strict JSON and fall back
//! to `{ "raw": ... }` when the reply does not fit.

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::state::{Classification, ClassificationReport, SentimentAnalysis, SentimentReport};
use crate::core::llm::{ChatMessage, LlmManager};

pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a banking support triage classifier.
Classify the user message into one of:
1) feedback_positive
2) feedback_negative
3) query
Return STRICT JSON with keys: label, confidence (0-1), rationale (short).
If it expresses praise/thanks -> feedback_positive.
If it expresses complaint/frustration -> feedback_negative.
If it asks for help/status/how-to -> query.";

pub const SENTIMENT_SYSTEM_PROMPT: &str = "You are a sentiment analyzer for banking customer messages.
Return STRICT JSON: sentiment (positive|neutral|negative), intensity (0-1), emotions (list), notes (short).";

/// Extract a JSON block from LLM output. Tries fenced ```json ... ``` first,
/// then a bare fence, then raw JSON starting with `{`.
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let content_start = start + fence.len();
            if let Some(end) = trimmed[content_start..].find("```") {
                let block = trimmed[content_start..content_start + end].trim();
                if !block.is_empty() {
                    return Some(block);
                }
            }
        }
    }
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }
    None
}

fn parse_strict<T: DeserializeOwned>(reply: &str) -> Option<T> {
    serde_json::from_str(extract_json_block(reply)?).ok()
}

fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

pub(crate) fn parse_classification(reply: &str) -> Classification {
    match parse_strict::<ClassificationReport>(reply) {
        Some(report) if in_unit_range(report.confidence) => Classification::Parsed(report),
        _ => {
            warn!("Classifier reply was not the expected JSON; keeping raw text");
            Classification::Unparsed {
                raw: reply.to_string(),
            }
        }
    }
}

pub(crate) fn parse_sentiment(reply: &str) -> SentimentAnalysis {
    match parse_strict::<SentimentReport>(reply) {
        Some(report) if in_unit_range(report.intensity) => SentimentAnalysis::Parsed(report),
        _ => {
            warn!("Sentiment reply was not the expected JSON; keeping raw text");
            SentimentAnalysis::Unparsed {
                raw: reply.to_string(),
            }
        }
    }
}

/// The `classify` node. Provider failures propagate; malformed replies do not.
pub async fn classify_message(llm: &LlmManager, message: &str) -> Result<Classification> {
    let reply = llm
        .generate_with_selected(&[
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ])
        .await?;
    Ok(parse_classification(&reply))
}

/// The `sentiment` node.
pub async fn analyze_sentiment(llm: &LlmManager, message: &str) -> Result<SentimentAnalysis> {
    let reply = llm
        .generate_with_selected(&[
            ChatMessage::system(SENTIMENT_SYSTEM_PROMPT),
            ChatMessage::user(message),
        ])
        .await?;
    Ok(parse_sentiment(&reply))
}
