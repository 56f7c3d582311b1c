//! Google Gemini provider implementation

use super::types::{LlmRequest, LlmResponse, MessageRole, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
struct GenerationSettings {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
        }
    }
}

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    url: String,
    model_id: String,
    settings: GenerationSettings,
}

impl GeminiService {
    pub fn new(api_key: String, model: &str, gateway: Option<&str>) -> Result<Self, LlmError> {
        let url = match gateway {
            Some(gw) => format!(
                "{}/gemini/v1beta/models/{model}:generateContent",
                gw.trim_end_matches('/')
            ),
            None => format!("{API_BASE}/models/{model}:generateContent"),
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            url,
            model_id: model.to_string(),
            settings: GenerationSettings::default(),
        })
    }

    fn translate_request(&self, request: &LlmRequest) -> GeminiRequest {
        let system_instruction = request
            .system
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: text.clone() }],
            });

        // Gemini expects the history to open with a user turn; a leading
        // greeting from the assistant is display-only.
        let contents = request
            .messages
            .iter()
            .skip_while(|m| m.role == MessageRole::Assistant)
            .filter(|m| !m.text.is_empty())
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: m.text.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GeminiGenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                top_k: self.settings.top_k,
                max_output_tokens: request
                    .max_tokens
                    .unwrap_or(self.settings.max_output_tokens),
            },
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<LlmResponse, LlmError> {
        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Err(match resp.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => LlmError::invalid_request(format!("Prompt blocked: {reason}")),
                None => LlmError::unknown("No candidates in response"),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(LlmError::unknown(format!(
                "Empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("none")
            )));
        }

        let end_turn = candidate.finish_reason.as_deref() == Some("STOP");
        let usage = resp.usage_metadata.unwrap_or_default();

        Ok(LlmResponse {
            text,
            end_turn,
            usage: Usage {
                input_tokens: u64::from(usage.prompt_token_count),
                output_tokens: u64::from(usage.candidates_token_count),
            },
        })
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = self.translate_request(request);

        let mut builder = self.client.post(&self.url).json(&gemini_request);
        // Gateway mode authenticates upstream; the key never goes in the URL
        if !self.api_key.starts_with("implicit") {
            builder = builder.header(API_KEY_HEADER, &self.api_key);
        }

        let response = builder.send().await.map_err(LlmError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            LlmError::network(format!("Failed to read response: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |r| r.error.message);
            return Err(LlmError::from_status(status, &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e}")))?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmErrorKind, LlmMessage};
    use serde_json::json;

    fn service() -> GeminiService {
        GeminiService::new("test-key".to_string(), "gemini-pro", None).unwrap()
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            service().url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
        let gw = GeminiService::new("implicit".to_string(), "gemini-pro", Some("http://gw/")).unwrap();
        assert_eq!(gw.url, "http://gw/gemini/v1beta/models/gemini-pro:generateContent");
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        let service =
            GeminiService::new("SECRET123".to_string(), "gemini-pro", Some("http://127.0.0.1:1")).unwrap();
        let request = LlmRequest::new(None, vec![LlmMessage::user("hola")]);
        let err = service.complete(&request).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Network);
        assert!(!err.to_string().contains("SECRET123"), "{err}");
    }

    #[test]
    fn test_translate_request() {
        let request = LlmRequest::new(
            Some("Eres OMEX-IA".to_string()),
            vec![
                LlmMessage::assistant("¡Hola!"),
                LlmMessage::user("necesito un flete"),
                LlmMessage::assistant("Claro"),
                LlmMessage::user("a Monterrey"),
            ],
        );
        let body = serde_json::to_value(service().translate_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "necesito un flete"}]},
                    {"role": "model", "parts": [{"text": "Claro"}]},
                    {"role": "user", "parts": [{"text": "a Monterrey"}]}
                ],
                "systemInstruction": {"parts": [{"text": "Eres OMEX-IA"}]},
                "generationConfig": {
                    "temperature": 0.7,
                    "topP": 1.0,
                    "topK": 1,
                    "maxOutputTokens": 2048
                }
            })
        );
    }

    #[test]
    fn test_max_tokens_override() {
        let mut request = LlmRequest::new(None, vec![LlmMessage::user("hola")]);
        request.max_tokens = Some(64);
        let translated = service().translate_request(&request);
        assert_eq!(translated.generation_config.max_output_tokens, 64);
        assert!(translated.system_instruction.is_none());
    }

    #[test]
    fn test_normalize_response() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hola, "}, {"text": "¿qué tal?"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
        }))
        .unwrap();
        let out = GeminiService::normalize_response(resp).unwrap();
        assert_eq!(out.text, "Hola, ¿qué tal?");
        assert!(out.end_turn);
        assert_eq!(out.usage.input_tokens, 12);
        assert_eq!(out.usage.output_tokens, 5);
    }

    #[test]
    fn test_blocked_prompt_is_invalid_request() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = GeminiService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::InvalidRequest);
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_empty_candidate_is_error() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        let err = GeminiService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Unknown);
    }
}
