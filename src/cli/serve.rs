use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tracing::info;

use crate::core::config::Settings;
use crate::core::llm::LlmManager;
use crate::core::terminal::GuideSection;
use crate::core::tickets::TicketStore;
use crate::interfaces::web::{ApiServer, ApiServerConfig};

pub async fn run_serve(
    settings: Settings,
    data_dir: &Path,
    api_host: String,
    api_port: u16,
    log_tx: tokio::sync::broadcast::Sender<String>,
) -> Result<()> {
    let llm = LlmManager::from_settings(&settings)?;
    let db_path = settings.resolved_db_path(data_dir);
    let store = TicketStore::open(&db_path).await?;
    info!("Ticket store at {}", db_path.display());

    let server = ApiServer::new(ApiServerConfig {
        store,
        llm: Arc::new(llm),
        log_tx,
        api_host,
        api_port,
        list_limit: settings.list_limit,
    });

    GuideSection::new("supportflow API")
        .status(
            "Endpoint",
            &format!("{}", style(format!("http://{}", server.addr())).underlined().cyan()),
        )
        .status("Logs", "GET /api/logs (SSE)")
        .blank()
        .status(
            "Press Ctrl+C to stop the server.",
            &format!("{}", style("Ctrl+C").bold().yellow()),
        )
        .print();
    println!();

    server.run().await
}
