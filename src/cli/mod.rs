mod install;
mod run;
mod serve;
mod tickets;

use anyhow::Result;
use console::style;

use crate::core::config::{self, Settings};
use crate::core::terminal::{self, GuideSection, print_error};
use crate::logging;

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Core")
        .command("run", "Handle a single customer message end to end")
        .command("serve", "Start the HTTP API")
        .print();

    GuideSection::new("Tickets")
        .command("tickets list", "List the most recently updated tickets")
        .command("tickets show", "Show one ticket by id")
        .command("tickets seed", "Insert (or reset) the demo tickets")
        .print();

    GuideSection::new("Setup")
        .command("init", "Create the data directory, config, and database")
        .command("help", "Show this message")
        .print();

    GuideSection::new("Examples")
        .hint("supportflow run --message \"What's the status of ticket 1001?\"", "")
        .hint("supportflow run -m \"update ticket 1002 to resolved\" --json", "")
        .hint("supportflow run -m \"thanks!\" --provider ollama --model llama3.1", "")
        .print();

    println!(
        "\n {} {} <command> [subcommand]\n",
        style("Usage:").bold(),
        style("supportflow").green()
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunCommandArgs {
    pub message: String,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub json: bool,
}

pub(crate) fn parse_run_command_args(args: &[String], start: usize) -> RunCommandArgs {
    let mut parsed = RunCommandArgs::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--message" | "-m" => {
                if i + 1 < args.len() {
                    parsed.message = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--provider" => {
                if i + 1 < args.len() {
                    parsed.provider = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--model" => {
                if i + 1 < args.len() {
                    parsed.model = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--json" => {
                parsed.json = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    parsed
}

pub(crate) fn parse_api_server_flags(
    args: &[String],
    start: usize,
    mut api_host: String,
    mut api_port: u16,
) -> (String, u16) {
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--api-port" => {
                if i + 1 < args.len() {
                    api_port = args[i + 1].parse().unwrap_or(api_port);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--api-host" => {
                if i + 1 < args.len() {
                    api_host = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    (api_host, api_port)
}

pub(crate) fn parse_limit_flag(args: &[String], start: usize, default: usize) -> usize {
    let mut limit = default;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" | "-n" => {
                if i + 1 < args.len() {
                    limit = args[i + 1].parse().unwrap_or(default);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    limit.max(1)
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = config::data_dir();
    let settings = Settings::load(&data_dir).await?;

    if args.len() <= 1 {
        print_help();
        return Ok(());
    }

    let cmd = args[1].as_str();
    match cmd {
        "run" => {
            let parsed = parse_run_command_args(&args, 2);
            if parsed.message.trim().is_empty() {
                print_error("Error: --message is required for run mode.");
                print_help();
                return Ok(());
            }
            logging::init_logging(settings.log_level(), parsed.json);
            run::run_single_message(settings, &data_dir, parsed).await
        }
        "serve" => {
            let (api_host, api_port) = parse_api_server_flags(
                &args,
                2,
                settings.api_host.clone(),
                settings.api_port,
            );
            let log_tx = logging::init_logging(settings.log_level(), false);
            serve::run_serve(settings, &data_dir, api_host, api_port, log_tx).await
        }
        "tickets" | "ticket" => {
            logging::init_logging(settings.log_level(), true);
            tickets::run_tickets_command(&args, &settings, &data_dir).await
        }
        "init" | "install" => {
            logging::init_logging(settings.log_level(), true);
            install::run_init(&settings, &data_dir).await
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            print_error(&format!("Unknown command: {}", cmd));
            print_help();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_api_server_flags, parse_limit_flag, parse_run_command_args};

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_run_command_args_reads_all_flags() {
        let args = argv(&[
            "supportflow",
            "run",
            "--message",
            "status of ticket 1001",
            "--provider",
            "ollama",
            "--model",
            "llama3.1",
            "--json",
        ]);
        let parsed = parse_run_command_args(&args, 2);
        assert_eq!(parsed.message, "status of ticket 1001");
        assert_eq!(parsed.provider.as_deref(), Some("ollama"));
        assert_eq!(parsed.model.as_deref(), Some("llama3.1"));
        assert!(parsed.json);
    }

    #[test]
    fn parse_run_command_args_defaults() {
        let args = argv(&["supportflow", "run", "-m", "hi"]);
        let parsed = parse_run_command_args(&args, 2);
        assert_eq!(parsed.message, "hi");
        assert_eq!(parsed.provider, None);
        assert!(!parsed.json);
    }

    #[test]
    fn parse_run_command_args_tolerates_dangling_flag() {
        let args = argv(&["supportflow", "run", "--message"]);
        assert_eq!(parse_run_command_args(&args, 2).message, "");
    }

    #[test]
    fn parse_api_server_flags_reads_host_and_port() {
        let args = argv(&[
            "supportflow",
            "serve",
            "--api-host",
            "0.0.0.0",
            "--api-port",
            "19000",
        ]);
        let (host, port) = parse_api_server_flags(&args, 2, "127.0.0.1".to_string(), 17990);
        assert_eq!(host, "0.0.0.0");
        assert_eq!(port, 19000);
    }

    #[test]
    fn parse_api_server_flags_keeps_port_on_garbage() {
        let args = argv(&["supportflow", "serve", "--api-port", "nope"]);
        let (_, port) = parse_api_server_flags(&args, 2, "127.0.0.1".to_string(), 17990);
        assert_eq!(port, 17990);
    }

    #[test]
    fn parse_limit_flag_reads_and_clamps() {
        let args = argv(&["supportflow", "tickets", "list", "--limit", "5"]);
        assert_eq!(parse_limit_flag(&args, 3, 50), 5);
        let args = argv(&["supportflow", "tickets", "list", "--limit", "0"]);
        assert_eq!(parse_limit_flag(&args, 3, 50), 1);
        let args = argv(&["supportflow", "tickets", "list"]);
        assert_eq!(parse_limit_flag(&args, 3, 50), 50);
    }
}
