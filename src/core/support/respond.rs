use anyhow::{Result, bail};

use super::state::{Classification, SentimentAnalysis};
use super::ticket::TicketAction;
use crate::core::llm::{ChatMessage, LlmManager};

pub const RESPONSE_SYSTEM_PROMPT: &str = "You are a helpful banking customer support agent.
Use the message classification and sentiment to craft a personalized response.
If ticket_action is present, include status/update details.
Be empathetic if sentiment is negative.
Never invent ticket IDs or private details.
Return a clear, concise answer with next steps.";

pub(crate) fn build_response_messages(
    user_message: &str,
    classification: &Classification,
    sentiment: &SentimentAnalysis,
    ticket_action: Option<&TicketAction>,
) -> Result<Vec<ChatMessage>> {
    let ticket_block = match ticket_action {
        Some(action) => serde_json::to_string_pretty(action)?,
        None => "(none)".to_string(),
    };
    let human = format!(
        "User message: {}\n\nClassification: {}\nSentiment: {}\nTicket action result (optional): {}\n",
        user_message,
        serde_json::to_string_pretty(classification)?,
        serde_json::to_string_pretty(sentiment)?,
        ticket_block
    );
    Ok(vec![
        ChatMessage::system(RESPONSE_SYSTEM_PROMPT),
        ChatMessage::user(human),
    ])
}

/// The `respond` node. The reply is returned as-is; a blank reply is an error.
pub async fn generate_response(
    llm: &LlmManager,
    user_message: &str,
    classification: &Classification,
    sentiment: &SentimentAnalysis,
    ticket_action: Option<&TicketAction>,
) -> Result<String> {
    let messages = build_response_messages(user_message, classification, sentiment, ticket_action)?;
    let reply = llm.generate_with_selected(&messages).await?;
    if reply.trim().is_empty() {
        bail!("text generation returned an empty response");
    }
    Ok(reply)
}
