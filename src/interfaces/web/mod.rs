mod handlers;
mod router;

use anyhow::Result;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::info;

use crate::core::llm::LlmManager;
use crate::core::tickets::TicketStore;

pub struct ApiServerConfig {
    pub store: TicketStore,
    pub llm: Arc<LlmManager>,
    pub log_tx: tokio::sync::broadcast::Sender<String>,
    pub api_host: String,
    pub api_port: u16,
    pub list_limit: usize,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: TicketStore,
    pub(crate) llm: Arc<LlmManager>,
    pub(crate) log_tx: tokio::sync::broadcast::Sender<String>,
    pub(crate) api_port: u16,
    pub(crate) list_limit: usize,
}

pub struct ApiServer {
    state: AppState,
    api_host: String,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        Self {
            state: AppState {
                store: config.store,
                llm: config.llm,
                log_tx: config.log_tx,
                api_port: config.api_port,
                list_limit: config.list_limit,
            },
            api_host: config.api_host,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.api_host, self.state.api_port)
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        let addr = self.addr();
        let app = router::build_api_router(self.state);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API Server running at http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("API Server shutting down...");
            })
            .await?;
        Ok(())
    }
}

// --- SSE Logs (used by router) ---

async fn sse_logs_endpoint(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.log_tx.subscribe();
    let stream = BroadcastStream::new(receiver).map(|msg| match msg {
        Ok(log) => Ok(Event::default().data(log)),
        Err(_) => Ok(Event::default().data("Log stream lagged")),
    });

    Sse::new(stream)
}
