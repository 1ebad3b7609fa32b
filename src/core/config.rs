use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "supportflow.toml";
const DB_FILE: &str = "support_tickets.db";

/// Runtime settings: `supportflow.toml` in the data dir, then environment overrides.
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Registry id of the text-generation provider (`groq`, `ollama`, `openai`).
    #[serde(default = "default_provider")]
    pub llm_provider: String,

    /// Model override applied to whichever provider is active.
    #[serde(default)]
    pub llm_model: Option<String>,

    /// Per-provider model overrides, keyed by provider id.
    #[serde(default)]
    pub models: BTreeMap<String, String>,

    #[serde(default)]
    pub api_keys: BTreeMap<String, String>,

    #[serde(default)]
    pub base_urls: BTreeMap<String, String>,

    #[serde(default)]
    pub db_path: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_api_host")]
    pub api_host: String,

    #[serde(default = "default_api_port")]
    pub api_port: u16,

    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_api_host() -> String {
    "127.0.0.1".to_string()
}
fn default_api_port() -> u16 {
    17990
}
fn default_list_limit() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_provider: default_provider(),
            llm_model: None,
            models: BTreeMap::new(),
            api_keys: BTreeMap::new(),
            base_urls: BTreeMap::new(),
            db_path: None,
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
            api_host: default_api_host(),
            api_port: default_api_port(),
            list_limit: default_list_limit(),
        }
    }
}

/// Root data directory: `$SUPPORTFLOW_DATA_DIR`, else `~/.supportflow`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SUPPORTFLOW_DATA_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".supportflow")
}

impl Settings {
    pub async fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::load_with(data_dir, |key| std::env::var(key).ok().filter(|v| !v.is_empty())).await
    }

    /// `load` with the environment lookup supplied by the caller.
    pub async fn load_with<P, F>(data_dir: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        let mut settings = if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            info!("No {} found, using defaults.", CONFIG_FILE);
            Self::default()
        };
        settings.apply_env(lookup);
        Ok(settings)
    }

    /// Apply environment overrides through `lookup` so callers (and tests) control the source.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LLM_PROVIDER") {
            self.llm_provider = v.to_lowercase();
        }
        if let Some(v) = lookup("LLM_MODEL") {
            self.llm_model = Some(v);
        }
        for (var, provider) in [
            ("GROQ_MODEL", "groq"),
            ("OLLAMA_MODEL", "ollama"),
            ("OPENAI_MODEL", "openai"),
        ] {
            if let Some(v) = lookup(var) {
                self.models.insert(provider.to_string(), v);
            }
        }
        for (var, provider) in [("GROQ_API_KEY", "groq"), ("OPENAI_API_KEY", "openai")] {
            if let Some(v) = lookup(var) {
                self.api_keys.insert(provider.to_string(), v);
            }
        }
        if let Some(v) = lookup("OLLAMA_BASE_URL") {
            self.base_urls
                .insert("ollama".to_string(), format!("{}/api/chat", v.trim_end_matches('/')));
        }
        if let Some(v) = lookup("DB_PATH") {
            self.db_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("SUPPORTFLOW_LOG") {
            self.log_level = v;
        }
    }

    pub fn model_for(&self, provider_id: &str) -> Option<&str> {
        self.llm_model
            .as_deref()
            .or_else(|| self.models.get(provider_id).map(String::as_str))
    }

    pub fn resolved_db_path(&self, data_dir: &Path) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| data_dir.join(DB_FILE))
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
