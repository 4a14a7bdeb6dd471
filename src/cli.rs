use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{Gateway, Provider, ProviderConfig, ReqwestTransport, Settings};

#[derive(Parser, Clone)]
#[command(name = "qabot", author, version, about, long_about = None)]
pub struct QabotCLIArgs {
    /// YAML file overriding upstream endpoints and models
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "openai", global = true)]
    provider: ArgProviderKind,

    /// Model identifier, overriding the provider default
    #[arg(long, global = true)]
    model: Option<String>,

    /// Endpoint URL; `{model}` is replaced by the model identifier
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: QabotCommand,
}

#[derive(clap::Subcommand, Clone)]
pub enum QabotCommand {
    Ask(AskArgs),
    Summarize(SummarizeArgs),
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum ArgProviderKind {
    #[value(name = "openai")]
    OpenAI,
    HuggingFace,
}

#[derive(clap::Args, Clone)]
pub struct AskArgs {
    question: String,

    /// Passage the answer should be taken from (Hugging Face question answering)
    #[arg(long)]
    context: Option<String>,
}

#[derive(clap::Args, Clone)]
pub struct SummarizeArgs {
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    text: Option<String>,

    /// Read the text to summarize from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl QabotCommand {
    /// Hugging Face serves each task from a different pipeline.
    const fn provider(&self, kind: ArgProviderKind) -> Provider {
        match (kind, self) {
            (ArgProviderKind::OpenAI, _) => Provider::OpenAICompletion,
            (ArgProviderKind::HuggingFace, Self::Ask(_)) => Provider::HFQuestionAnswering,
            (ArgProviderKind::HuggingFace, Self::Summarize(_)) => Provider::HFSummarization,
        }
    }
}

impl QabotCLIArgs {
    fn provider_config(&self) -> Result<ProviderConfig, Box<dyn std::error::Error>> {
        let settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let mut config =
            ProviderConfig::from_env(self.command.provider(self.provider), &settings);
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        Ok(config)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries only the answer
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::missing_errors_doc)]
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = QabotCLIArgs::parse();
    let gateway = Gateway::new(args.provider_config()?, Arc::new(ReqwestTransport::new()?));

    // failures are shown as their bare detail, the way the upstream reported them
    let answer = match args.command {
        QabotCommand::Ask(ask) => {
            gateway
                .ask_question(&ask.question, ask.context.as_deref())
                .await
                .map_err(|err| err.detail)?
        }
        QabotCommand::Summarize(summarize) => {
            let text = match summarize.file {
                Some(file) => fs::read_to_string(file)?,
                None => summarize.text.unwrap_or_default(),
            };
            gateway.summarize_text(&text).await.map_err(|err| err.detail)?
        }
    };
    println!("{answer}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::QabotCLIArgs;
    use crate::Provider;

    #[test]
    fn cli_definition_is_valid() {
        QabotCLIArgs::command().debug_assert();
    }

    #[test]
    fn hugging_face_picks_pipeline_per_task() {
        let ask = QabotCLIArgs::parse_from(["qabot", "--provider", "hugging-face", "ask", "Who?"]);
        let summarize =
            QabotCLIArgs::parse_from(["qabot", "summarize", "--provider", "hugging-face", "Long text"]);
        assert_eq!(ask.command.provider(ask.provider), Provider::HFQuestionAnswering);
        assert_eq!(
            summarize.command.provider(summarize.provider),
            Provider::HFSummarization
        );
    }

    #[test]
    fn openai_is_the_default_provider() {
        let args = QabotCLIArgs::parse_from(["qabot", "ask", "Who?", "--context", "Ada."]);
        assert_eq!(args.command.provider(args.provider), Provider::OpenAICompletion);
    }

    #[test]
    fn model_and_endpoint_flags_override_config() {
        let args = QabotCLIArgs::parse_from([
            "qabot",
            "--provider",
            "hugging-face",
            "--model",
            "sshleifer/distilbart-cnn-12-6",
            "--endpoint",
            "http://localhost:8080/{model}",
            "summarize",
            "Long text",
        ]);
        let config = args.provider_config().unwrap();
        assert_eq!(config.url(), "http://localhost:8080/sshleifer/distilbart-cnn-12-6");
    }

    #[test]
    fn summarize_needs_exactly_one_source() {
        assert!(QabotCLIArgs::try_parse_from(["qabot", "summarize"]).is_err());
        assert!(QabotCLIArgs::try_parse_from(["qabot", "summarize", "text", "--file", "a.txt"]).is_err());
        assert!(QabotCLIArgs::try_parse_from(["qabot", "summarize", "--file", "a.txt"]).is_ok());
    }
}
