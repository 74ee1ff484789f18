pub mod config;
pub mod error;
pub mod gemini;
pub mod model_client;
pub mod orchestrator;
pub mod prompt;

pub use config::{AppConfig, GenerationSettings, GraphSettings};
pub use error::{AnalysisError, OrchestratorError, TransportError};
pub use gemini::GeminiClient;
pub use model_client::{GenerationRequest, ModelClient};
pub use orchestrator::{
    AnalysisOutcome, AnalysisState, CancelToken, DEFAULT_DEADLINE, Orchestrator, SubmitOutcome,
};
pub use prompt::build_analysis_prompt;

use anyhow::Context;
use codeflow_events::EventBus;
use codeflow_storage::{CredentialProvider, MemoryCredentials, Storage};
use std::sync::Arc;

/// Opens the credential store named by `config`. When no database can be opened the
/// credential lives in memory for this run only.
pub fn open_credentials(config: &AppConfig) -> Arc<dyn CredentialProvider> {
    let opened = match &config.database_path {
        Some(path) => Storage::open(path),
        None => Storage::open_default(),
    };
    match opened {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            tracing::error!("Failed to open credential store, key will not persist: {}", e);
            Arc::new(MemoryCredentials::new())
        }
    }
}

/// Wires the Gemini client and credential store into an orchestrator.
pub fn build_orchestrator(config: &AppConfig, events: EventBus) -> anyhow::Result<Orchestrator> {
    let client = GeminiClient::new(config).context("failed to create model client")?;
    tracing::info!(endpoint = client.endpoint(), "model client ready");
    let credentials = open_credentials(config);
    Ok(Orchestrator::new(Arc::new(client), credentials, events)
        .with_deadline(config.analysis_deadline()))
}
