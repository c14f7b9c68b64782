pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    ai_service::AIService,
    completion_client::{CompletionClient, OpenAiClient},
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub ai_service: AIService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.llm_timeout_secs);
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let client = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            http_client,
            timeout,
        );
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Wires the services around an already constructed completion backend.
    pub fn with_client(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        let ai_service = AIService::new(
            client,
            config.default_model.clone(),
            config.llm_max_tokens,
            Duration::from_secs(config.llm_timeout_secs),
        );
        Self { ai_service }
    }
}
