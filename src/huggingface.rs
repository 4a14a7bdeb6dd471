//! Payloads and reply shapes of the Hugging Face hosted inference API.
//!
//! Both pipelines answer with a list holding one object per input. While a
//! model is warming up the API answers 200 with an `{"error": ..., "estimated_time": ...}`
//! object instead; callers receive that verbatim.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::model::TaskRequest;

#[derive(Deserialize)]
struct QuestionAnsweringEntry {
    pub answer: String,
}

#[derive(Deserialize)]
struct SummarizationEntry {
    pub summary_text: String,
}

pub(crate) fn question_answering_payload(request: &TaskRequest) -> Value {
    json!({
        "inputs": {
            "question": request.primary_text(),
            "context": request.context(),
        }
    })
}

pub(crate) fn summarization_payload(request: &TaskRequest) -> Value {
    json!({ "inputs": request.primary_text() })
}

/// `[0].answer`, trimmed.
pub(crate) fn extract_answer(response: &Value) -> Option<String> {
    let entry = QuestionAnsweringEntry::deserialize(response.as_array()?.first()?).ok()?;
    Some(entry.answer.trim().to_string())
}

/// `[0].summary_text`, trimmed.
pub(crate) fn extract_summary(response: &Value) -> Option<String> {
    let entry = SummarizationEntry::deserialize(response.as_array()?.first()?).ok()?;
    Some(entry.summary_text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn question_answering_payload_defaults_context() {
        let payload = question_answering_payload(&TaskRequest::ask("Who wrote it?", None));
        assert_eq!(
            payload,
            json!({"inputs": {"question": "Who wrote it?", "context": ""}})
        );
    }

    #[test]
    fn question_answering_payload_carries_context() {
        let request = TaskRequest::ask("Who wrote it?", Some("Ada wrote it.".to_string()));
        let payload = question_answering_payload(&request);
        assert_eq!(payload["inputs"]["context"], "Ada wrote it.");
    }

    #[test]
    fn summarization_payload_wraps_text() {
        let payload = summarization_payload(&TaskRequest::summarize("Long text."));
        assert_eq!(payload, json!({"inputs": "Long text."}));
    }

    #[test]
    fn answer_from_list() {
        let response = json!([{"answer": " Paris ", "score": 0.9, "start": 0, "end": 5}]);
        assert_eq!(extract_answer(&response).as_deref(), Some("Paris"));
    }

    #[test]
    fn summary_from_list() {
        let response = json!([{"summary_text": "A short summary."}]);
        assert_eq!(extract_summary(&response).as_deref(), Some("A short summary."));
    }

    #[test]
    fn only_the_first_entry_has_to_match() {
        let answers = json!([{"answer": "Paris", "score": 0.9}, {"score": 0.1}]);
        let summaries = json!([{"summary_text": "Short."}, {"summary_text": null}]);
        assert_eq!(extract_answer(&answers).as_deref(), Some("Paris"));
        assert_eq!(extract_summary(&summaries).as_deref(), Some("Short."));
    }

    #[test]
    fn warm_up_and_empty_lists_are_not_extracted() {
        let loading = json!({"error": "currently loading", "estimated_time": 20.0});
        assert_eq!(extract_answer(&loading), None);
        assert_eq!(extract_summary(&loading), None);
        assert_eq!(extract_answer(&json!([])), None);
        assert_eq!(extract_summary(&json!([{"generated_text": "x"}])), None);
    }
}
