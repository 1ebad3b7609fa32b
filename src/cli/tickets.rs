use std::path::Path;

use anyhow::Result;

use super::parse_limit_flag;
use crate::core::config::Settings;
use crate::core::terminal::{
    GuideSection, print_error, print_info, print_status, print_success, print_ticket_line,
};
use crate::core::tickets::TicketStore;

pub async fn run_tickets_command(
    args: &[String],
    settings: &Settings,
    data_dir: &Path,
) -> Result<()> {
    let sub_cmd = if args.len() > 2 { args[2].as_str() } else { "" };
    let store = TicketStore::open(settings.resolved_db_path(data_dir)).await?;

    match sub_cmd {
        "list" | "ls" => {
            let limit = parse_limit_flag(args, 3, settings.list_limit);
            let tickets = store.list_tickets(limit).await?;
            if tickets.is_empty() {
                print_info("No tickets yet. Run 'supportflow tickets seed' to add demo data.");
            }
            for t in tickets {
                print_ticket_line(t.ticket_id, t.status.as_str(), &t.customer_name, &t.issue_type);
            }
        }
        "show" | "get" => {
            let Some(ticket_id) = args
                .get(3)
                .and_then(|a| a.trim_start_matches('#').parse::<i64>().ok())
            else {
                print_error("Usage: supportflow tickets show <ticket_id>");
                return Ok(());
            };
            match store.get_ticket(ticket_id).await? {
                Some(ticket) => {
                    print_ticket_line(
                        ticket.ticket_id,
                        ticket.status.as_str(),
                        &ticket.customer_name,
                        &ticket.issue_type,
                    );
                    print_status("Created", &ticket.created_at);
                    print_status("Updated", &ticket.updated_at);
                    if !ticket.notes.is_empty() {
                        print_status("Notes", &ticket.notes);
                    }
                }
                None => print_error(&format!("Ticket {} not found.", ticket_id)),
            }
        }
        "seed" => {
            let seeded = store.seed_demo_tickets().await?;
            print_success(&format!("Seeded {} demo tickets.", seeded));
        }
        _ => {
            GuideSection::new("supportflow tickets")
                .command("list", "List tickets, most recently updated first")
                .command("show", "Show one ticket")
                .command("seed", "Insert (or reset) demo tickets 1001-1003")
                .blank()
                .text("Options: --limit <n>")
                .print();
            println!();
        }
    }
    Ok(())
}
