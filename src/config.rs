use std::fmt::Debug;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::GatewayError;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const HF_ENDPOINT: &str = "https://api-inference.huggingface.co/models/{model}";
const MODEL_PLACEHOLDER: &str = "{model}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAICompletion,
    HFQuestionAnswering,
    HFSummarization,
}

impl Provider {
    /// Environment variable holding the bearer token for this provider.
    pub const fn token_var(self) -> &'static str {
        match self {
            Self::OpenAICompletion => "OPENAI_API_KEY",
            Self::HFQuestionAnswering | Self::HFSummarization => "HF_API_TOKEN",
        }
    }

    const fn default_endpoint(self) -> &'static str {
        match self {
            Self::OpenAICompletion => OPENAI_ENDPOINT,
            Self::HFQuestionAnswering | Self::HFSummarization => HF_ENDPOINT,
        }
    }

    const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAICompletion => "gpt-3.5-turbo",
            Self::HFQuestionAnswering => "deepset/roberta-base-squad2",
            Self::HFSummarization => "facebook/bart-large-cnn",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAICompletion => write!(f, "openai-completion"),
            Self::HFQuestionAnswering => write!(f, "hf-question-answering"),
            Self::HFSummarization => write!(f, "hf-summarization"),
        }
    }
}

/// Bearer token. Its value never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiToken(***)")
    }
}

/// Overrides for a single upstream, read from the settings file.
#[derive(Deserialize, Default, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamSettings {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// Optional YAML settings. Credentials are never read from here.
#[derive(Deserialize, Default, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub openai: UpstreamSettings,
    pub question_answering: UpstreamSettings,
    pub summarization: UpstreamSettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl Settings {
    #[allow(clippy::missing_errors_doc)]
    pub fn from_yaml(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(text)?)
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    const fn upstream(&self, provider: Provider) -> &UpstreamSettings {
        match provider {
            Provider::OpenAICompletion => &self.openai,
            Provider::HFQuestionAnswering => &self.question_answering,
            Provider::HFSummarization => &self.summarization,
        }
    }
}

/// Which upstream to call and how. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub auth_token: Option<ApiToken>,
    pub model_id: String,
}

impl ProviderConfig {
    pub fn new(
        provider: Provider,
        endpoint: impl Into<String>,
        auth_token: Option<ApiToken>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            endpoint: endpoint.into(),
            auth_token,
            model_id: model_id.into(),
        }
    }

    /// Builds a config from settings, fetching the credential through `lookup`.
    /// An absent or blank credential is kept as `None` and reported on dispatch.
    pub fn resolve(
        provider: Provider,
        settings: &Settings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let upstream = settings.upstream(provider);
        let auth_token = lookup(provider.token_var())
            .filter(|token| !token.trim().is_empty())
            .map(ApiToken::new);
        Self {
            provider,
            endpoint: upstream
                .endpoint
                .clone()
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            auth_token,
            model_id: upstream
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
        }
    }

    pub fn from_env(provider: Provider, settings: &Settings) -> Self {
        Self::resolve(provider, settings, |var| std::env::var(var).ok())
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Endpoint with `{model}` replaced by the configured model id.
    pub fn url(&self) -> String {
        self.endpoint.replace(MODEL_PLACEHOLDER, &self.model_id)
    }

    /// The bearer token, refused when absent or when it cannot go into an HTTP header.
    #[allow(clippy::missing_errors_doc)]
    pub fn token(&self) -> Result<&str, GatewayError> {
        let token = self.auth_token.as_ref().map(ApiToken::expose).ok_or_else(|| {
            GatewayError::config(format!(
                "{} is not set; export it to use the {} provider",
                self.provider.token_var(),
                self.provider
            ))
        })?;
        // header values allow tab and anything from space up, except DEL
        if token.bytes().any(|b| (b < 0x20 && b != b'\t') || b == 0x7f) {
            return Err(GatewayError::config(format!(
                "{} contains characters that are not allowed in an HTTP header",
                self.provider.token_var()
            )));
        }
        Ok(token)
    }
}
