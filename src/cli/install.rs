use std::path::Path;

use anyhow::Result;
use console::style;

use crate::core::config::{CONFIG_FILE, Settings};
use crate::core::terminal::{self, print_info, print_link, print_success, print_warn};
use crate::core::tickets::TicketStore;

const CONFIG_TEMPLATE: &str = r#"# supportflow configuration. Environment variables override these values.

# groq | ollama | openai
llm_provider = "groq"
# llm_model = "llama-3.1-70b-versatile"

log_level = "info"
request_timeout_secs = 60
api_host = "127.0.0.1"
api_port = 17990
list_limit = 50

[models]
# groq = "llama-3.1-70b-versatile"
# ollama = "llama3"

[api_keys]
# groq = "gsk_..."

[base_urls]
# ollama = "http://localhost:11434/api/chat"
"#;

/// Non-interactive first-run setup: data dir, config template, database, demo tickets.
pub async fn run_init(settings: &Settings, data_dir: &Path) -> Result<()> {
    terminal::print_banner();
    println!("  {}\n", style("Setting up supportflow...").bold());

    tokio::fs::create_dir_all(data_dir).await?;

    let config_path = data_dir.join(CONFIG_FILE);
    if config_path.exists() {
        print_info(&format!("Keeping existing {}", config_path.display()));
    } else {
        tokio::fs::write(&config_path, CONFIG_TEMPLATE).await?;
        print_success(&format!("Wrote {}", config_path.display()));
    }

    let db_path = settings.resolved_db_path(data_dir);
    let store = TicketStore::open(&db_path).await?;
    let seeded = store.seed_demo_tickets().await?;
    print_success(&format!(
        "Database ready at {} ({} demo tickets)",
        db_path.display(),
        seeded
    ));

    if settings.llm_provider == "groq" && !settings.api_keys.contains_key("groq") {
        print_warn("No Groq API key configured yet.");
        print_link("Groq API keys", "https://console.groq.com/keys");
    }
    println!(
        "\n  Set {} (or choose {}) and run {}.\n",
        style("GROQ_API_KEY").cyan().bold(),
        style("LLM_PROVIDER=ollama").cyan().bold(),
        style("supportflow run --message \"...\"").cyan().bold()
    );
    Ok(())
}
