use std::sync::Arc;

use crate::config::Config;
use crate::services::completion::{CompletionClient, OpenAiClient};

pub struct AppState {
    pub config: Config,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let completion = OpenAiClient::new(&config.completion)?;

        tracing::info!(
            "Completion client ready: base_url={}, model={}, timeout={}s",
            config.completion.base_url,
            config.completion.model,
            config.completion.timeout_secs
        );

        Ok(Self::with_completion(config, Arc::new(completion)))
    }

    /// Builds state around an existing completion backend.
    pub fn with_completion(config: Config, completion: Arc<dyn CompletionClient>) -> Self {
        Self { config, completion }
    }
}

pub mod completion;
pub mod prompt;
pub mod transcript_service;
