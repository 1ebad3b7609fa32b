use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::registry::{ApiFormat, AuthType, ProviderDef};
use super::{ChatMessage, LlmProvider};

// ── OpenAI-compatible request/response (OpenAI, Groq) ──

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: MessageOwned,
}

#[derive(Deserialize)]
struct MessageOwned {
    #[serde(default)]
    content: Option<String>,
}

// ── Ollama request/response ──

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: MessageOwned,
}

// ── Generic Provider ──

pub struct GenericProvider {
    provider_def: ProviderDef,
    api_key: Option<String>,
    client: Client,
}

impl GenericProvider {
    pub fn new(
        provider_def: ProviderDef,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        if provider_def.auth.auth_type == AuthType::Bearer
            && api_key.as_deref().is_none_or(str::is_empty)
        {
            return Err(anyhow!(
                "{} requires an API key. Set it in supportflow.toml or the environment.",
                provider_def.name
            ));
        }
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            provider_def,
            api_key,
            client,
        })
    }

    /// Point the provider at a different endpoint (self-hosted Ollama, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.provider_def.base_url = base_url.into();
        self
    }

    fn wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage<'_>> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: &m.role,
                content: &m.content,
            })
            .collect()
    }

    async fn generate_openai(&self, model_id: &str, messages: &[ChatMessage]) -> Result<String> {
        let req = OpenAiRequest {
            model: model_id,
            messages: Self::wire_messages(messages),
        };

        let mut request = self.client.post(&self.provider_def.base_url).json(&req);
        if let (AuthType::Bearer, Some(key)) = (&self.provider_def.auth.auth_type, &self.api_key) {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let res = request.send().await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "{} API Error ({}): {}",
                self.provider_def.name,
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: OpenAiResponse = res.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("{} returned no completion", self.provider_def.name))
    }

    async fn generate_ollama(&self, model_id: &str, messages: &[ChatMessage]) -> Result<String> {
        let req = OllamaRequest {
            model: model_id,
            messages: Self::wire_messages(messages),
            stream: false,
        };

        let res = self
            .client
            .post(&self.provider_def.base_url)
            .json(&req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "{} API Error ({}): {}",
                self.provider_def.name,
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: OllamaResponse = res.json().await?;
        parsed
            .message
            .content
            .ok_or_else(|| anyhow!("{} returned no message content", self.provider_def.name))
    }
}

#[async_trait]
impl LlmProvider for GenericProvider {
    fn provider_id(&self) -> &str {
        &self.provider_def.id
    }

    async fn generate(&self, model_id: &str, messages: &[ChatMessage]) -> Result<String> {
        match self.provider_def.api_format {
            ApiFormat::Openai => self.generate_openai(model_id, messages).await,
            ApiFormat::Ollama => self.generate_ollama(model_id, messages).await,
        }
    }
}
