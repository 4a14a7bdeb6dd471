use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::TaskRequest;
use crate::prompts;

#[derive(Deserialize)]
struct OpenAIGPTMessage {
    pub content: String,
}

#[derive(Deserialize)]
struct OpenAIGPTMessageEntry {
    pub message: OpenAIGPTMessage,
}

/// Two-message chat payload: the task's system instruction, then the user's text.
pub(crate) fn build_payload(request: &TaskRequest, model: &str) -> Value {
    let system_content = match request {
        TaskRequest::Ask { .. } => prompts::ASK_SYSTEM_PROMPT,
        TaskRequest::Summarize { .. } => prompts::SUMMARIZE_SYSTEM_PROMPT,
    };
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": system_content},
            {"role": "user", "content": request.primary_text()}
        ]
    })
}

/// `choices[0].message.content`, trimmed. `None` when the reply has another shape.
pub(crate) fn extract(response: &Value) -> Option<String> {
    // later choices are never looked at, whatever their shape
    let entry = OpenAIGPTMessageEntry::deserialize(response.get("choices")?.get(0)?).ok()?;
    Some(entry.message.content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_payload, extract};
    use crate::model::TaskRequest;

    #[test]
    fn ask_payload_uses_question_prompt() {
        let payload = build_payload(&TaskRequest::ask("Capital of France?", None), "gpt-3.5-turbo");
        assert_eq!(
            payload,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant for answering questions."},
                    {"role": "user", "content": "Capital of France?"}
                ]
            })
        );
    }

    #[test]
    fn summarize_payload_uses_summary_prompt() {
        let payload = build_payload(&TaskRequest::summarize("A long article."), "gpt-4");
        assert_eq!(payload["messages"][0]["content"], "Summarize text into 3 clear sentences.");
        assert_eq!(payload["messages"][1]["content"], "A long article.");
        assert_eq!(payload["model"], "gpt-4");
    }

    #[test]
    fn extracts_first_choice() {
        let response = json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "\n Paris. \n"}},
                {"index": 1, "message": {"role": "assistant", "content": "Lyon"}}
            ]
        });
        assert_eq!(extract(&response).as_deref(), Some("Paris."));
    }

    #[test]
    fn malformed_later_choices_are_ignored() {
        let response = json!({
            "choices": [
                {"message": {"content": " Paris "}},
                {"message": {"content": null}}
            ]
        });
        assert_eq!(extract(&response).as_deref(), Some("Paris"));
    }

    #[test]
    fn other_shapes_are_not_extracted() {
        assert_eq!(extract(&json!({"choices": []})), None);
        assert_eq!(extract(&json!({"choices": [{"message": {"content": null}}]})), None);
        assert_eq!(extract(&json!({"error": {"message": "bad"}})), None);
    }
}
