pub const ASK_SYSTEM_PROMPT: &str = "You are a helpful assistant for answering questions.";
pub const SUMMARIZE_SYSTEM_PROMPT: &str = "Summarize text into 3 clear sentences.";
