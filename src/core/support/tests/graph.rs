use crate::core::support::graph::{NodeName, RunError, run_support_graph};
use crate::core::support::state::MessageLabel;
use crate::core::support::ticket::TicketAction;
use crate::core::tickets::{TicketStatus, test_ticket_store};

use super::{NEGATIVE_JSON, POSITIVE_JSON, QUERY_JSON, ScriptedProvider, Stage};

#[tokio::test]
async fn seeded_status_query_reaches_respond_with_ticket_data() {
    let store = test_ticket_store();
    store.seed_demo_tickets().await.unwrap();
    let provider = ScriptedProvider::new(QUERY_JSON)
        .respond_with("Your ticket 1001 is In Progress. We will update you soon.");
    let llm = provider.manager();

    let outcome = run_support_graph("What's happening with ticket #1001?", &llm, &store)
        .await
        .unwrap();

    assert_eq!(
        outcome.path,
        vec![
            NodeName::Classify,
            NodeName::Ticket,
            NodeName::Sentiment,
            NodeName::Respond
        ]
    );
    assert_eq!(outcome.classification.label(), Some(MessageLabel::Query));
    match &outcome.ticket_action {
        Some(TicketAction::GetStatus {
            ticket_id: 1001,
            found: true,
            ticket: Some(ticket),
            ..
        }) => assert_eq!(ticket.status, TicketStatus::InProgress),
        other => panic!("unexpected ticket action: {:?}", other),
    }
    assert!(outcome.final_response.contains("In Progress"));

    let calls = provider.calls();
    let stages: Vec<Stage> = calls.iter().map(|c| c.stage).collect();
    assert_eq!(stages, vec![Stage::Classify, Stage::Sentiment, Stage::Respond]);
    let respond_prompt = &calls[2].user_prompt;
    assert!(respond_prompt.contains("\"status\": \"In Progress\""));
    assert!(respond_prompt.contains("\"action\": \"get_status\""));
}

#[tokio::test]
async fn feedback_skips_ticket_node() {
    let store = test_ticket_store();
    store.seed_demo_tickets().await.unwrap();
    let provider = ScriptedProvider::new(NEGATIVE_JSON);
    let llm = provider.manager();

    let outcome = run_support_graph(
        "Ticket #1002 has been pending for a week, this is unacceptable",
        &llm,
        &store,
    )
    .await
    .unwrap();

    assert!(!outcome.path.contains(&NodeName::Ticket));
    assert_eq!(outcome.ticket_action, None);
    // The store is untouched by feedback runs.
    let ticket = store.get_ticket(1002).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Open);

    let respond_prompt = &provider.calls()[2].user_prompt;
    assert!(respond_prompt.contains("Ticket action result (optional): (none)"));
}

#[tokio::test]
async fn positive_feedback_runs_three_nodes() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(POSITIVE_JSON);
    let outcome = run_support_graph("Thanks, great service!", &provider.manager(), &store)
        .await
        .unwrap();
    assert_eq!(
        outcome.path,
        vec![NodeName::Classify, NodeName::Sentiment, NodeName::Respond]
    );
}

#[tokio::test]
async fn query_with_ticket_but_no_intent_has_no_action() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(QUERY_JSON);
    let outcome = run_support_graph(
        "How do tickets work? I mean a ticket",
        &provider.manager(),
        &store,
    )
    .await
    .unwrap();
    assert!(outcome.path.contains(&NodeName::Ticket));
    assert_eq!(outcome.ticket_action, None);
}

#[tokio::test]
async fn create_through_graph_persists_ticket() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(QUERY_JSON);
    let outcome = run_support_graph(
        "Please create a ticket for a duplicate charge",
        &provider.manager(),
        &store,
    )
    .await
    .unwrap();

    let ticket_id = match outcome.ticket_action {
        Some(TicketAction::Create { ticket_id, .. }) => ticket_id,
        other => panic!("expected create action, got {:?}", other),
    };
    let ticket = store.get_ticket(ticket_id).await.unwrap().unwrap();
    assert_eq!(ticket.issue_type, "a duplicate charge");
    assert_eq!(ticket.status, TicketStatus::Open);
}

#[tokio::test]
async fn malformed_classifier_reply_still_completes() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new("This looks like a question to me.");
    let outcome = run_support_graph("status of ticket 1003", &provider.manager(), &store)
        .await
        .unwrap();
    assert_eq!(outcome.classification.label(), None);
    // Missing label counts as a query, so the ticket node runs.
    assert!(outcome.path.contains(&NodeName::Ticket));
}

#[tokio::test]
async fn classify_failure_stops_the_run() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(QUERY_JSON).failing_at(Stage::Classify);
    let err = run_support_graph("status of ticket 1001", &provider.manager(), &store)
        .await
        .unwrap_err();

    assert_eq!(err.failed_node(), Some(NodeName::Classify));
    let partial = err.partial_state().unwrap();
    assert!(partial.classification.is_none());
    assert!(partial.final_response.is_none());
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn store_failure_is_reported_at_ticket_node() {
    let store = test_ticket_store();
    store
        .get_db()
        .lock()
        .await
        .execute_batch("DROP TABLE tickets")
        .unwrap();
    let provider = ScriptedProvider::new(QUERY_JSON);
    let err = run_support_graph("status of ticket 1001", &provider.manager(), &store)
        .await
        .unwrap_err();

    assert_eq!(err.failed_node(), Some(NodeName::Ticket));
    let partial = err.partial_state().unwrap();
    assert!(partial.classification.is_some());
    assert!(partial.final_response.is_none());
}

#[tokio::test]
async fn respond_failure_keeps_partial_state() {
    let store = test_ticket_store();
    store.seed_demo_tickets().await.unwrap();
    let provider = ScriptedProvider::new(QUERY_JSON).failing_at(Stage::Respond);
    let err = run_support_graph("update ticket 1002 to closed", &provider.manager(), &store)
        .await
        .unwrap_err();

    assert_eq!(err.failed_node(), Some(NodeName::Respond));
    let partial = err.partial_state().unwrap();
    assert!(partial.sentiment.is_some());
    assert!(partial.ticket_action.is_some());
    assert!(partial.final_response.is_none());
    // The update committed before respond failed.
    let ticket = store.get_ticket(1002).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Closed);
}

#[tokio::test]
async fn blank_reply_from_respond_is_a_failure() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(POSITIVE_JSON).respond_with("   ");
    let err = run_support_graph("thank you", &provider.manager(), &store)
        .await
        .unwrap_err();
    assert_eq!(err.failed_node(), Some(NodeName::Respond));
}

#[tokio::test]
async fn empty_message_is_rejected_before_any_node() {
    let store = test_ticket_store();
    let provider = ScriptedProvider::new(QUERY_JSON);
    let err = run_support_graph("   ", &provider.manager(), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::EmptyMessage));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn concurrent_runs_do_not_share_state() {
    let store = test_ticket_store();
    store.seed_demo_tickets().await.unwrap();
    let provider = ScriptedProvider::new(QUERY_JSON);
    let llm = provider.manager();

    let (a, b) = tokio::join!(
        run_support_graph("status of ticket 1001", &llm, &store),
        run_support_graph("status of ticket 1003", &llm, &store),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.run_id, b.run_id);
    assert!(matches!(
        a.ticket_action,
        Some(TicketAction::GetStatus { ticket_id: 1001, .. })
    ));
    assert!(matches!(
        b.ticket_action,
        Some(TicketAction::GetStatus { ticket_id: 1003, .. })
    ));
}
