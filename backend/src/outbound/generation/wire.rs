//! Gemini request and response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{GenerationPrompt, PromptRole, TextGenerationError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub(super) fn from_prompt(prompt: &'a GenerationPrompt) -> Self {
        let contents = prompt
            .turns
            .iter()
            .map(|turn| Content {
                role: Some(match turn.role {
                    PromptRole::User => "user",
                    PromptRole::Model => "model",
                }),
                parts: [Part { text: &turn.text }],
            })
            .collect();
        Self {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: &prompt.system,
                }],
            },
            contents,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Decode one SSE payload into the text it carries, if any.
pub(super) fn decode_event(data: &str) -> Result<Option<String>, TextGenerationError> {
    let event: StreamEvent =
        serde_json::from_str(data).map_err(|err| TextGenerationError::decode(err.to_string()))?;
    if let Some(error) = event.error {
        return Err(TextGenerationError::status(error.code, error.message));
    }
    let text: String = event
        .candidates
        .into_iter()
        .take(1)
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect();
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PromptTurn;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn request_carries_system_instruction_and_roles() {
        let prompt = GenerationPrompt {
            system: "Be an interviewer".to_owned(),
            turns: vec![
                PromptTurn::user("easy"),
                PromptTurn::model("What is a trait?"),
                PromptTurn::user("hard"),
            ],
        };

        let body = serde_json::to_value(GenerateContentRequest::from_prompt(&prompt))
            .expect("serializable");

        assert_eq!(
            body,
            json!({
                "systemInstruction": { "parts": [{ "text": "Be an interviewer" }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "easy" }] },
                    { "role": "model", "parts": [{ "text": "What is a trait?" }] },
                    { "role": "user", "parts": [{ "text": "hard" }] },
                ],
            })
        );
    }

    #[rstest]
    #[case(
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#,
        Some("Hello")
    )]
    #[case(r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{}}"#, None)]
    #[case(r#"{"candidates":[]}"#, None)]
    fn events_decode_to_their_text(#[case] data: &str, #[case] expected: Option<&str>) {
        let text = decode_event(data).expect("decodable");

        assert_eq!(text.as_deref(), expected);
    }

    #[test]
    fn error_event_becomes_status_error() {
        let err = decode_event(r#"{"error":{"code":429,"message":"quota"}}"#)
            .expect_err("error event");

        assert_eq!(err, TextGenerationError::status(429_u16, "quota"));
    }

    #[test]
    fn malformed_event_is_decode_error() {
        let err = decode_event("not json").expect_err("malformed");

        assert!(matches!(err, TextGenerationError::Decode { .. }));
    }
}
