//! Gemini `generateContent` client.

use crate::config::{AppConfig, GenerationSettings};
use crate::error::TransportError;
use crate::model_client::{GenerationRequest, ModelClient};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'a str,
}

impl<'a> From<&'a GenerationSettings> for GenerationConfig<'a> {
    fn from(settings: &'a GenerationSettings) -> Self {
        Self {
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
            max_output_tokens: settings.max_output_tokens,
            response_mime_type: &settings.response_mime_type,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    generation: GenerationSettings,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint_url(&config.api_base_url, &config.model),
            generation: config.generation.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig::from(&self.generation),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &request.credential)
            .json(&body)
            .send()
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let text = response.text().map_err(map_reqwest_error)?;
        if !(200..300).contains(&status) {
            tracing::warn!(status, "model service returned an error status");
            return Err(classify_status(status, &text));
        }
        extract_text(&text)
    }
}

fn endpoint_url(base: &str, model: &str) -> String {
    format!("{}/{}:generateContent", base.trim_end_matches('/'), model)
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else if err.is_decode() {
        TransportError::InvalidBody(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

/// Maps a non-success HTTP response onto a transport error.
fn classify_status(status: u16, body: &str) -> TransportError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());
    let status_name = envelope.and_then(|e| e.error.status).unwrap_or_default();

    let invalid_key = status == 400
        && (message.contains("API key not valid") || body.contains("API_KEY_INVALID"));
    match status {
        401 | 403 => TransportError::Unauthorized { status, message },
        400 if invalid_key => TransportError::Unauthorized { status, message },
        429 => TransportError::QuotaExceeded(message),
        _ if status_name == "RESOURCE_EXHAUSTED" => TransportError::QuotaExceeded(message),
        _ => TransportError::Status { status, message },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, TransportError> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| TransportError::InvalidBody(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(TransportError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(TransportError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        return match reason.as_str() {
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                Err(TransportError::Blocked(reason.clone()))
            }
            _ => Err(TransportError::EmptyResponse),
        };
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url(
                "https://generativelanguage.googleapis.com/v1beta/models/",
                "gemini-2.5-flash-lite"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[test]
    fn test_request_body_uses_camel_case() {
        let settings = GenerationSettings::default();
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig::from(&settings),
        };
        let value = serde_json::to_value(&body).unwrap();
        let config = &value["generationConfig"];
        assert_eq!(config["topK"], 40);
        assert_eq!(config["maxOutputTokens"], 8192);
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            extract_text(body),
            Err(TransportError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        assert_eq!(
            extract_text(r#"{"candidates":[]}"#),
            Err(TransportError::EmptyResponse)
        );
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(
            extract_text(body),
            Err(TransportError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_extract_text_invalid_body() {
        assert!(matches!(
            extract_text("<html>oops</html>"),
            Err(TransportError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_classify_status() {
        let bad_key = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            classify_status(400, bad_key),
            TransportError::Unauthorized { status: 400, .. }
        ));
        assert!(matches!(
            classify_status(403, "forbidden"),
            TransportError::Unauthorized { status: 403, .. }
        ));

        let quota = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            classify_status(429, quota),
            TransportError::QuotaExceeded("Quota exceeded".to_string())
        );

        match classify_status(503, "upstream down") {
            TransportError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
