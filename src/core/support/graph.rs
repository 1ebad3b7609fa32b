//! The support graph: a fixed acyclic chain executed once per inbound message.
//!
//! ```text
//! classify ──(query + "ticket"/"#")──> ticket ──> sentiment ──> respond
//!     └──────────────(otherwise)──────────────────^
//! ```
//!
//! Each node returns a [`StatePatch`] for the one field it owns; the executor
//! folds patches into the [`ExecutionState`] and picks the next node. A node
//! failure stops the run and is reported with the partial state.

use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::analysis::{analyze_sentiment, classify_message};
use super::respond::generate_response;
use super::state::{
    Classification, ExecutionState, FieldAlreadyWritten, MessageLabel, SentimentAnalysis,
    StatePatch,
};
use super::ticket::{TicketAction, resolve_ticket_action};
use crate::core::llm::LlmManager;
use crate::core::tickets::TicketStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    Classify,
    Ticket,
    Sentiment,
    Respond,
}

impl NodeName {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeName::Classify => "classify",
            NodeName::Ticket => "ticket",
            NodeName::Sentiment => "sentiment",
            NodeName::Respond => "respond",
        }
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to go after `classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Ticket,
    Sentiment,
}

static TICKET_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bticket\b|#").expect("ticket mention regex"));

/// Queries that mention a ticket go through the ticket node. An unparsed
/// classification has no label and counts as a query.
pub fn route_after_classify(classification: &Classification, user_message: &str) -> Route {
    let label = classification.label().unwrap_or(MessageLabel::Query);
    if label == MessageLabel::Query && TICKET_MENTION_RE.is_match(user_message) {
        Route::Ticket
    } else {
        Route::Sentiment
    }
}

/// Fixed wiring. `None` means the run is complete.
pub fn next_node(current: NodeName, state: &ExecutionState) -> Option<NodeName> {
    match current {
        NodeName::Classify => {
            let route = state
                .classification
                .as_ref()
                .map(|c| route_after_classify(c, &state.user_message))
                .unwrap_or(Route::Sentiment);
            match route {
                Route::Ticket => Some(NodeName::Ticket),
                Route::Sentiment => Some(NodeName::Sentiment),
            }
        }
        NodeName::Ticket => Some(NodeName::Sentiment),
        NodeName::Sentiment => Some(NodeName::Respond),
        NodeName::Respond => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("user message is empty")]
    EmptyMessage,

    #[error("node `{node}` failed: {reason}")]
    NodeFailed {
        node: NodeName,
        reason: String,
        partial: Box<ExecutionState>,
    },

    #[error("node `{0}` was scheduled twice in one run")]
    NodeRevisited(NodeName),

    #[error(transparent)]
    StateConflict(#[from] FieldAlreadyWritten),

    #[error("run finished without `{0}`")]
    Incomplete(&'static str),
}

impl RunError {
    pub fn failed_node(&self) -> Option<NodeName> {
        match self {
            RunError::NodeFailed { node, .. } | RunError::NodeRevisited(node) => Some(*node),
            _ => None,
        }
    }

    pub fn partial_state(&self) -> Option<&ExecutionState> {
        match self {
            RunError::NodeFailed { partial, .. } => Some(partial.as_ref()),
            _ => None,
        }
    }
}

/// What a completed run hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportOutcome {
    pub run_id: String,
    pub path: Vec<NodeName>,
    pub classification: Classification,
    pub sentiment: SentimentAnalysis,
    pub ticket_action: Option<TicketAction>,
    pub final_response: String,
}

pub struct SupportGraph<'a> {
    llm: &'a LlmManager,
    store: &'a TicketStore,
}

impl<'a> SupportGraph<'a> {
    pub fn new(llm: &'a LlmManager, store: &'a TicketStore) -> Self {
        Self { llm, store }
    }

    pub async fn run(&self, user_message: &str) -> Result<SupportOutcome, RunError> {
        if user_message.trim().is_empty() {
            return Err(RunError::EmptyMessage);
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        info!("Support run {} started", run_id);

        let mut state = ExecutionState::new(user_message);
        let mut path: Vec<NodeName> = Vec::with_capacity(4);
        let mut current = Some(NodeName::Classify);

        while let Some(node) = current {
            if path.contains(&node) {
                return Err(RunError::NodeRevisited(node));
            }
            path.push(node);

            let result = self.execute_node(node, &state).await;
            let patch = match result {
                Ok(patch) => patch,
                Err(e) => {
                    error!("Support run {} failed at {}: {:#}", run_id, node, e);
                    return Err(RunError::NodeFailed {
                        node,
                        reason: format!("{:#}", e),
                        partial: Box::new(state),
                    });
                }
            };
            state = state.merge(patch)?;
            current = next_node(node, &state);
            info!(
                "Support run {}: {} done, next {}",
                run_id,
                node,
                current.map(NodeName::as_str).unwrap_or("end")
            );
        }
        info!("Support run {} finished after {} nodes", run_id, path.len());

        let ExecutionState {
            classification,
            sentiment,
            ticket_action,
            final_response,
            ..
        } = state;

        Ok(SupportOutcome {
            run_id,
            path,
            classification: classification.ok_or(RunError::Incomplete("classification"))?,
            sentiment: sentiment.ok_or(RunError::Incomplete("sentiment"))?,
            ticket_action,
            final_response: final_response.ok_or(RunError::Incomplete("final_response"))?,
        })
    }

    async fn execute_node(
        &self,
        node: NodeName,
        state: &ExecutionState,
    ) -> anyhow::Result<StatePatch> {
        match node {
            NodeName::Classify => Ok(StatePatch::Classification(
                classify_message(self.llm, &state.user_message).await?,
            )),
            NodeName::Ticket => Ok(StatePatch::TicketAction(
                resolve_ticket_action(self.store, &state.user_message).await?,
            )),
            NodeName::Sentiment => Ok(StatePatch::Sentiment(
                analyze_sentiment(self.llm, &state.user_message).await?,
            )),
            NodeName::Respond => {
                let classification = state
                    .classification
                    .as_ref()
                    .ok_or_else(|| anyhow!("respond reached before classify"))?;
                let sentiment = state
                    .sentiment
                    .as_ref()
                    .ok_or_else(|| anyhow!("respond reached before sentiment"))?;
                Ok(StatePatch::FinalResponse(
                    generate_response(
                        self.llm,
                        &state.user_message,
                        classification,
                        sentiment,
                        state.ticket_action.as_ref(),
                    )
                    .await?,
                ))
            }
        }
    }
}

/// Caller-facing entry point: one message in, one outcome (or failure) out.
pub async fn run_support_graph(
    user_message: &str,
    llm: &LlmManager,
    store: &TicketStore,
) -> Result<SupportOutcome, RunError> {
    SupportGraph::new(llm, store).run(user_message).await
}
