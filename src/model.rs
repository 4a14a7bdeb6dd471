use crate::error::GatewayError;

/// A single user submission, owned for the duration of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    Ask {
        question: String,
        context: Option<String>,
    },
    Summarize {
        text: String,
    },
}

impl TaskRequest {
    pub fn ask(question: impl Into<String>, context: Option<String>) -> Self {
        Self::Ask {
            question: question.into(),
            context,
        }
    }

    pub fn summarize(text: impl Into<String>) -> Self {
        Self::Summarize { text: text.into() }
    }

    pub fn primary_text(&self) -> &str {
        match self {
            Self::Ask { question, .. } => question,
            Self::Summarize { text } => text,
        }
    }

    /// Context for question answering, empty when none was supplied.
    pub fn context(&self) -> &str {
        match self {
            Self::Ask { context, .. } => context.as_deref().unwrap_or_default(),
            Self::Summarize { .. } => "",
        }
    }

    pub const fn task_name(&self) -> &'static str {
        match self {
            Self::Ask { .. } => "ask",
            Self::Summarize { .. } => "summarize",
        }
    }

    #[allow(clippy::missing_errors_doc)]
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !self.primary_text().trim().is_empty() {
            return Ok(());
        }
        let detail = match self {
            Self::Ask { .. } => "Please enter a question.",
            Self::Summarize { .. } => "Please paste some text to summarize.",
        };
        Err(GatewayError::invalid_input(detail))
    }
}
