use std::path::Path;

use anyhow::Result;
use console::style;

use super::RunCommandArgs;
use crate::core::config::Settings;
use crate::core::llm::LlmManager;
use crate::core::support::ticket::TICKET_NOT_FOUND;
use crate::core::support::{SupportOutcome, TicketAction, run_support_graph};
use crate::core::terminal::{self, print_error, print_status, print_step};
use crate::core::tickets::TicketStore;

pub async fn run_single_message(
    mut settings: Settings,
    data_dir: &Path,
    args: RunCommandArgs,
) -> Result<()> {
    if let Some(provider) = args.provider {
        settings.llm_provider = provider.to_lowercase();
    }
    if let Some(model) = args.model {
        settings.llm_model = Some(model);
    }

    let llm = LlmManager::from_settings(&settings)?;
    let store = TicketStore::open(settings.resolved_db_path(data_dir)).await?;

    match run_support_graph(&args.message, &llm, &store).await {
        Ok(outcome) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "success": true,
                        "outcome": outcome,
                    }))?
                );
            } else {
                print_outcome(&outcome)?;
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "success": false,
                        "failed_node": e.failed_node(),
                        "error": e.to_string(),
                    }))?
                );
            } else if let Some(node) = e.failed_node() {
                print_error(&format!("Run stopped at node '{}'", node));
            }
            Err(e.into())
        }
    }
}

fn print_outcome(outcome: &SupportOutcome) -> Result<()> {
    print_step("Classification");
    match outcome.classification.label() {
        Some(label) => print_status("Label", serde_json::to_string(&label)?.trim_matches('"')),
        None => print_status("Label", "(unparsed, treated as query)"),
    }

    print_step("Sentiment");
    match outcome.sentiment.sentiment() {
        Some(s) => print_status("Sentiment", serde_json::to_string(&s)?.trim_matches('"')),
        None => print_status("Sentiment", "(unparsed)"),
    }

    if let Some(action) = &outcome.ticket_action {
        print_step("Ticket");
        print_ticket_action(action);
    }

    print_step("Response");
    println!("\n{}\n", outcome.final_response);
    println!(
        "  {}",
        style(format!(
            "run {} · {}",
            outcome.run_id,
            outcome
                .path
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(" → ")
        ))
        .dim()
    );
    Ok(())
}

fn print_ticket_action(action: &TicketAction) {
    match action {
        TicketAction::GetStatus {
            ticket_id,
            ticket: Some(ticket),
            ..
        } => terminal::print_ticket_line(
            *ticket_id,
            ticket.status.as_str(),
            &ticket.customer_name,
            &ticket.issue_type,
        ),
        TicketAction::UpdateStatus {
            ticket_id,
            updated_status: Some(status),
            ..
        } => print_status(&format!("#{}", ticket_id), &format!("now {}", status)),
        TicketAction::Create {
            ticket_id, status, ..
        } => print_status(&format!("#{}", ticket_id), &format!("created ({})", status)),
        TicketAction::GetStatus {
            ticket_id, message, ..
        }
        | TicketAction::UpdateStatus {
            ticket_id, message, ..
        } => print_status(
            &format!("#{}", ticket_id),
            message.as_deref().unwrap_or(TICKET_NOT_FOUND),
        ),
    }
}
