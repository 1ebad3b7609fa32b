use serde::{Deserialize, Serialize};

use super::ticket::TicketAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLabel {
    FeedbackPositive,
    FeedbackNegative,
    Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub label: MessageLabel,
    pub confidence: f64,
    pub rationale: String,
}

/// Classifier output. `Unparsed` keeps the verbatim reply when it was not the
/// requested JSON, so consumers must tolerate a missing label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Classification {
    Parsed(ClassificationReport),
    Unparsed { raw: String },
}

impl Classification {
    pub fn label(&self) -> Option<MessageLabel> {
        match self {
            Classification::Parsed(report) => Some(report.label),
            Classification::Unparsed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub sentiment: SentimentLabel,
    pub intensity: f64,
    pub emotions: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentAnalysis {
    Parsed(SentimentReport),
    Unparsed { raw: String },
}

impl SentimentAnalysis {
    pub fn sentiment(&self) -> Option<SentimentLabel> {
        match self {
            SentimentAnalysis::Parsed(report) => Some(report.sentiment),
            SentimentAnalysis::Unparsed { .. } => None,
        }
    }
}

/// The record threaded through one run of the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionState {
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_action: Option<TicketAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
}

/// The single field a node is allowed to write.
#[derive(Debug, Clone, PartialEq)]
pub enum StatePatch {
    Classification(Classification),
    Sentiment(SentimentAnalysis),
    /// `None` when the message carried no ticket intent.
    TicketAction(Option<TicketAction>),
    FinalResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("state field `{0}` was already written in this run")]
pub struct FieldAlreadyWritten(pub &'static str);

fn write_once<T>(
    slot: &mut Option<T>,
    value: T,
    field: &'static str,
) -> Result<(), FieldAlreadyWritten> {
    if slot.is_some() {
        return Err(FieldAlreadyWritten(field));
    }
    *slot = Some(value);
    Ok(())
}

impl ExecutionState {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            classification: None,
            sentiment: None,
            ticket_action: None,
            final_response: None,
        }
    }

    /// Fold one node's patch into the state. Every field is write-once.
    pub fn merge(mut self, patch: StatePatch) -> Result<Self, FieldAlreadyWritten> {
        match patch {
            StatePatch::Classification(c) => {
                write_once(&mut self.classification, c, "classification")?
            }
            StatePatch::Sentiment(s) => write_once(&mut self.sentiment, s, "sentiment")?,
            StatePatch::TicketAction(Some(a)) => {
                write_once(&mut self.ticket_action, a, "ticket_action")?
            }
            StatePatch::TicketAction(None) => {}
            StatePatch::FinalResponse(r) => {
                write_once(&mut self.final_response, r, "final_response")?
            }
        }
        Ok(self)
    }
}
