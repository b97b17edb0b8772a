use crate::config::{Credentials, GeminiSettings};
use crate::constants::limits;
use crate::error::GemLensError;
use crate::llm::traits::*;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    credentials: Credentials,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(credentials: Credentials) -> Self {
        let defaults = GeminiSettings::default();
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(limits::HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            credentials,
            model: defaults.model,
            base_url: defaults.base_url,
        }
    }

    pub fn from_settings(settings: &GeminiSettings, credentials: Credentials) -> Self {
        Self::new(credentials)
            .with_model(&settings.model)
            .with_base_url(&settings.base_url)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(parts: &[ContentPart<'_>]) -> GenerateContentRequest {
        let parts = parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => Part::Text {
                    text: text.to_string(),
                },
                ContentPart::Image(image) => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: BASE64_STANDARD.encode(&image.bytes),
                    },
                },
            })
            .collect();

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenate the text parts of the first candidate. A blocked prompt or a
/// candidate without text is an error.
fn extract_text(response: GenerateContentResponse) -> Result<String, GemLensError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GemLensError::Upstream(format!(
            "Prompt was blocked by Gemini ({reason})"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GemLensError::Upstream("Gemini returned no candidates".into()))?;

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

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(GemLensError::Upstream(format!(
            "Gemini returned no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}

fn describe_http_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => {
                    format!("{status_text}: {message}")
                }
                _ => message,
            }
        })
        .unwrap_or_else(|_| body.to_string());

    format!("Gemini API error ({status}): {detail}")
}

#[async_trait::async_trait]
impl ModelClient for GeminiClient {
    async fn generate_content(&self, parts: &[ContentPart<'_>]) -> Result<String, GemLensError> {
        let request_body = Self::build_request(parts);

        tracing::debug!(
            "Gemini request: model={} parts={}",
            self.model,
            request_body.contents[0].parts.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.credentials.api_key())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GemLensError::Upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GemLensError::Upstream(format!("Failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            return Err(GemLensError::Upstream(describe_http_error(
                status,
                &response_text,
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| GemLensError::Upstream(format!("Failed to parse response: {e}")))?;

        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GenerateContentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_request_serializes_text_then_image() {
        let image = ImageInput::new(vec![1, 2, 3], "image/png");
        let request =
            GeminiClient::build_request(&[ContentPart::Text("hi"), ContentPart::Image(&image)]);
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(parts[0]["text"], "hi");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"A cat "},{"text":"on a mat."}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(extract_text(response).unwrap(), "A cat on a mat.");
    }

    #[test]
    fn test_extract_text_keeps_whitespace() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"\n  ok  \n"}]}}]}"#);
        assert_eq!(extract_text(response).unwrap(), "\n  ok  \n");
    }

    #[test]
    fn test_blocked_prompt_is_upstream_error() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = extract_text(response).unwrap_err();
        assert!(matches!(err, GemLensError::Upstream(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_candidate_without_text_is_upstream_error() {
        let response = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(matches!(
            extract_text(response),
            Err(GemLensError::Upstream(_))
        ));
    }

    #[test]
    fn test_http_error_uses_structured_body() {
        let message = describe_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert!(message.contains("429"));
        assert!(message.contains("RESOURCE_EXHAUSTED: Quota exceeded"));
    }

    #[test]
    fn test_http_error_falls_back_to_raw_body() {
        let message = describe_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(message.ends_with("upstream down"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new(Credentials::new("k"))
            .with_model("gemini-test")
            .with_base_url("http://localhost:9999/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_upstream_error() {
        let client =
            GeminiClient::new(Credentials::new("k")).with_base_url("http://127.0.0.1:1");

        let err = client
            .generate_content(&[ContentPart::Text("hello")])
            .await
            .unwrap_err();

        assert!(matches!(err, GemLensError::Upstream(ref m) if m.contains("request failed")));
    }
}
