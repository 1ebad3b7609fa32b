mod graph;
mod intent;

use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::analysis::{CLASSIFIER_SYSTEM_PROMPT, SENTIMENT_SYSTEM_PROMPT};
use super::respond::RESPONSE_SYSTEM_PROMPT;
use crate::core::llm::{ChatMessage, LlmManager, LlmProvider};

pub(super) const QUERY_JSON: &str =
    r#"{"label": "query", "confidence": 0.93, "rationale": "asks about a ticket"}"#;
pub(super) const NEGATIVE_JSON: &str =
    r#"{"label": "feedback_negative", "confidence": 0.88, "rationale": "complaint"}"#;
pub(super) const POSITIVE_JSON: &str =
    r#"{"label": "feedback_positive", "confidence": 0.91, "rationale": "thanks"}"#;
pub(super) const NEUTRAL_SENTIMENT_JSON: &str =
    r#"{"sentiment": "neutral", "intensity": 0.2, "emotions": [], "notes": "plain question"}"#;

/// Which node a scripted call served, inferred from its system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stage {
    Classify,
    Sentiment,
    Respond,
}

#[derive(Debug, Clone)]
pub(super) struct RecordedCall {
    pub stage: Stage,
    pub user_prompt: String,
}

/// Deterministic provider: canned replies per stage, optional failure per
/// stage, and a log of every call it served.
#[derive(Clone)]
pub(super) struct ScriptedProvider {
    classify: String,
    sentiment: String,
    respond: String,
    fail_on: Option<Stage>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedProvider {
    pub fn new(classify: &str) -> Self {
        Self {
            classify: classify.to_string(),
            sentiment: NEUTRAL_SENTIMENT_JSON.to_string(),
            respond: "Thanks for reaching out. Here is what we found.".to_string(),
            fail_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn respond_with(mut self, reply: &str) -> Self {
        self.respond = reply.to_string();
        self
    }

    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.fail_on = Some(stage);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn manager(&self) -> LlmManager {
        let mut mgr = LlmManager::new();
        mgr.register_provider(Box::new(self.clone()));
        mgr.set_active("scripted", "scripted-model".to_string());
        mgr
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _model_id: &str, messages: &[ChatMessage]) -> Result<String> {
        let system = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let stage = match system {
            s if s == CLASSIFIER_SYSTEM_PROMPT => Stage::Classify,
            s if s == SENTIMENT_SYSTEM_PROMPT => Stage::Sentiment,
            s if s == RESPONSE_SYSTEM_PROMPT => Stage::Respond,
            other => bail!("unexpected system prompt: {}", other),
        };
        let user_prompt = messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { stage, user_prompt });

        if self.fail_on == Some(stage) {
            bail!("text generation unavailable");
        }
        Ok(match stage {
            Stage::Classify => self.classify.clone(),
            Stage::Sentiment => self.sentiment.clone(),
            Stage::Respond => self.respond.clone(),
        })
    }
}
