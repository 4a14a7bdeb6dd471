#![allow(clippy::future_not_send)]

pub mod cli;
mod config;
mod error;
mod huggingface;
mod model;
mod openai;
mod prompts;
mod transport;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

pub use config::{ApiToken, Provider, ProviderConfig, Settings, SettingsError, UpstreamSettings};
pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use model::TaskRequest;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};

fn build_payload(request: &TaskRequest, config: &ProviderConfig) -> Result<Value, GatewayError> {
    match (config.provider, request) {
        (Provider::OpenAICompletion, _) => Ok(openai::build_payload(request, &config.model_id)),
        (Provider::HFQuestionAnswering, TaskRequest::Ask { .. }) => {
            Ok(huggingface::question_answering_payload(request))
        }
        (Provider::HFSummarization, TaskRequest::Summarize { .. }) => {
            Ok(huggingface::summarization_payload(request))
        }
        (provider, request) => Err(GatewayError::config(format!(
            "the {provider} provider cannot {} text",
            request.task_name()
        ))),
    }
}

/// Turns a 200 body into the answer text. Bodies that are not in the expected
/// shape are handed back as-is: warm-up notices arrive with a 200 as well.
fn normalize(provider: Provider, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        warn!(%provider, "upstream body is not JSON, returning it unparsed");
        return body.to_string();
    };
    let extracted = match provider {
        Provider::OpenAICompletion => openai::extract(&value),
        Provider::HFQuestionAnswering => huggingface::extract_answer(&value),
        Provider::HFSummarization => huggingface::extract_summary(&value),
    };
    extracted.unwrap_or_else(|| {
        warn!(%provider, "unexpected response shape, returning the raw JSON");
        value.to_string()
    })
}

/// Sends one request upstream and normalizes whatever comes back.
///
/// Empty input and configuration problems are reported without touching the
/// network. A single attempt is made; nothing is retried.
pub async fn dispatch(
    request: &TaskRequest,
    config: &ProviderConfig,
    transport: &dyn Transport,
) -> GatewayResult {
    request.validate()?;
    let payload = build_payload(request, config)?;
    let token = config.token()?;
    let url = config.url();

    debug!(provider = %config.provider, model = %config.model_id, %url, task = request.task_name(), "dispatching");
    let response = transport
        .post_json(&url, token, &payload)
        .await
        .map_err(|err| {
            warn!(provider = %config.provider, error = %err, "upstream unreachable");
            GatewayError::network(err.0)
        })?;

    if response.status != 200 {
        warn!(provider = %config.provider, status = response.status, "upstream rejected request");
        return Err(GatewayError::upstream(response.status, &response.body));
    }
    info!(provider = %config.provider, status = response.status, "upstream answered");
    Ok(normalize(config.provider, &response.body))
}

/// The immutable configuration and shared client a caller dispatches through.
/// Cloning is cheap and clones share the same transport.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<ProviderConfig>,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    pub fn new(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub async fn dispatch(&self, request: &TaskRequest) -> GatewayResult {
        dispatch(request, &self.config, self.transport.as_ref()).await
    }

    pub async fn ask_question(&self, question: &str, context: Option<&str>) -> GatewayResult {
        self.dispatch(&TaskRequest::ask(question, context.map(str::to_string)))
            .await
    }

    pub async fn summarize_text(&self, text: &str) -> GatewayResult {
        self.dispatch(&TaskRequest::summarize(text)).await
    }
}
