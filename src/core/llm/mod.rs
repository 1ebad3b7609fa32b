pub mod generic_provider;
pub mod registry;

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::info;

use crate::core::config::Settings;
use generic_provider::GenericProvider;
use registry::ProviderRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Black-box text generation. Implementations hold no per-run state and must
/// be callable from concurrent runs.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider_id(&self) -> &str;

    // Execute a prompt against a selected model using a structured conversation history
    async fn generate(&self, model_id: &str, messages: &[ChatMessage]) -> Result<String>;
}

pub struct LlmManager {
    providers: Vec<Box<dyn LlmProvider>>,
    selected_provider: Option<String>,
    selected_model: Option<String>,
}

impl Default for LlmManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmManager {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            selected_provider: None,
            selected_model: None,
        }
    }

    /// Build a manager with the configured provider registered and selected.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = ProviderRegistry::load();
        let def = registry
            .get_provider(&settings.llm_provider)
            .ok_or_else(|| anyhow!("Unknown LLM provider: {}", settings.llm_provider))?
            .clone();

        let provider_id = def.id.clone();
        let model_id = settings
            .model_for(&provider_id)
            .map(str::to_string)
            .unwrap_or_else(|| def.default_model.clone());
        let api_key = settings.api_keys.get(&provider_id).cloned();
        let base_url = settings.base_urls.get(&provider_id).cloned();

        let mut provider = GenericProvider::new(
            def,
            api_key,
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        if let Some(url) = base_url {
            provider = provider.with_base_url(url);
        }

        let mut manager = Self::new();
        manager.register_provider(Box::new(provider));
        manager.set_active(&provider_id, model_id);
        Ok(manager)
    }

    pub fn register_provider(&mut self, provider: Box<dyn LlmProvider>) {
        info!("Registered LLM Provider: {}", provider.provider_id());
        self.providers.push(provider);
    }

    pub fn set_active(&mut self, provider_id: &str, model_id: String) {
        info!("Setting active LLM: {} ({})", provider_id, model_id);
        self.selected_provider = Some(provider_id.to_string());
        self.selected_model = Some(model_id);
    }

    pub fn get_provider(&self, provider_id: &str) -> Option<&dyn LlmProvider> {
        self.providers
            .iter()
            .find(|p| p.provider_id() == provider_id)
            .map(|p| p.as_ref())
    }

    pub fn get_active_info(&self) -> (Option<&str>, Option<&str>) {
        (
            self.selected_provider.as_deref(),
            self.selected_model.as_deref(),
        )
    }

    pub async fn generate_with_selected(&self, messages: &[ChatMessage]) -> Result<String> {
        let provider_id = self
            .selected_provider
            .as_deref()
            .ok_or_else(|| anyhow!("No LLM Provider selected."))?;

        let model_id = self
            .selected_model
            .as_deref()
            .ok_or_else(|| anyhow!("No LLM Model selected."))?;

        let provider = self
            .get_provider(provider_id)
            .ok_or_else(|| anyhow!("Selected provider not found in registry"))?;

        provider.generate(model_id, messages).await
    }
}
