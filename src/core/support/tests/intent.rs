use crate::core::support::intent::{
    DEFAULT_CUSTOMER_NAME, DEFAULT_ISSUE_TYPE, TicketIntent, parse_ticket_request,
};
use crate::core::tickets::TicketStatus;

#[test]
fn update_with_hash_and_to() {
    assert_eq!(
        parse_ticket_request("Update ticket #1002 to resolved"),
        Some(TicketIntent::UpdateStatus {
            ticket_id: 1002,
            status: TicketStatus::Resolved,
        })
    );
}

#[test]
fn update_accepts_set_and_multiword_status() {
    assert_eq!(
        parse_ticket_request("please set 1001 IN   PROGRESS"),
        Some(TicketIntent::UpdateStatus {
            ticket_id: 1001,
            status: TicketStatus::InProgress,
        })
    );
}

#[test]
fn set_ticket_open_is_an_update_not_a_create() {
    assert_eq!(
        parse_ticket_request("set ticket #5 open"),
        Some(TicketIntent::UpdateStatus {
            ticket_id: 5,
            status: TicketStatus::Open,
        })
    );
}

#[test]
fn status_question_extracts_first_number() {
    assert_eq!(
        parse_ticket_request("What's the status of ticket 1001?"),
        Some(TicketIntent::GetStatus { ticket_id: 1001 })
    );
    assert_eq!(
        parse_ticket_request("any update on #1002"),
        Some(TicketIntent::GetStatus { ticket_id: 1002 })
    );
    assert_eq!(
        parse_ticket_request("what is happening with ticket 1003"),
        Some(TicketIntent::GetStatus { ticket_id: 1003 })
    );
    assert_eq!(
        parse_ticket_request("what’s happening with 77"),
        Some(TicketIntent::GetStatus { ticket_id: 77 })
    );
}

#[test]
fn status_words_without_number_do_not_match() {
    assert_eq!(parse_ticket_request("what is the status please"), None);
}

#[test]
fn create_captures_issue_after_for_or_about() {
    let msg = "Please create a ticket for failed card payment";
    assert_eq!(
        parse_ticket_request(msg),
        Some(TicketIntent::Create {
            customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
            issue_type: "failed card payment".to_string(),
            notes: msg.to_string(),
        })
    );

    match parse_ticket_request("I want to open a ticket about a missing deposit") {
        Some(TicketIntent::Create { issue_type, .. }) => {
            assert_eq!(issue_type, "a missing deposit")
        }
        other => panic!("expected create intent, got {:?}", other),
    }
}

#[test]
fn create_without_issue_uses_default_type() {
    match parse_ticket_request("open a ticket") {
        Some(TicketIntent::Create { issue_type, .. }) => {
            assert_eq!(issue_type, DEFAULT_ISSUE_TYPE)
        }
        other => panic!("expected create intent, got {:?}", other),
    }
}

#[test]
fn create_truncates_issue_and_notes() {
    let long_issue = "x".repeat(300);
    let msg = format!("create ticket for {}", long_issue);
    match parse_ticket_request(&msg) {
        Some(TicketIntent::Create {
            issue_type, notes, ..
        }) => {
            assert_eq!(issue_type.chars().count(), 80);
            assert_eq!(notes.chars().count(), 200);
        }
        other => panic!("expected create intent, got {:?}", other),
    }
}

#[test]
fn no_intent_cases() {
    for msg in [
        "",
        "Hi there, thanks for the help!",
        "ticket 1001",
        "I reopened the app",
        "my ticketing app crashed",
    ] {
        assert_eq!(parse_ticket_request(msg), None, "message: {:?}", msg);
    }
}

#[test]
fn oversized_ticket_number_is_not_an_intent() {
    assert_eq!(
        parse_ticket_request("update ticket 99999999999999999999 to closed"),
        None
    );
}

#[test]
fn parsing_is_pure_and_repeatable() {
    let msg = "status of ticket 1002";
    assert_eq!(parse_ticket_request(msg), parse_ticket_request(msg));
}

#[test]
fn trailing_status_word_is_a_status_request() {
    assert_eq!(
        parse_ticket_request("ticket 1002 status"),
        Some(TicketIntent::GetStatus { ticket_id: 1002 })
    );
}

#[test]
fn create_ticket_for_transfer_failure() {
    match parse_ticket_request("create ticket for transfer failure") {
        Some(TicketIntent::Create {
            customer_name,
            issue_type,
            notes,
        }) => {
            assert_eq!(customer_name, "Customer");
            assert_eq!(issue_type, "transfer failure");
            assert_eq!(notes, "create ticket for transfer failure");
        }
        other => panic!("expected create intent, got {:?}", other),
    }
}

#[test]
fn reset_is_read_as_a_status_change() {
    assert_eq!(
        parse_ticket_request("reset ticket 5 to open"),
        Some(TicketIntent::UpdateStatus {
            ticket_id: 5,
            status: TicketStatus::Open,
        })
    );
}

#[test]
fn notes_keep_whitespace_at_the_cut() {
    let msg = format!("create ticket {} tail", "a".repeat(185));
    let cut: String = msg.chars().take(200).collect();
    assert!(cut.ends_with(' '));
    match parse_ticket_request(&msg) {
        Some(TicketIntent::Create { notes, .. }) => assert_eq!(notes, cut),
        other => panic!("expected create intent, got {:?}", other),
    }
}
