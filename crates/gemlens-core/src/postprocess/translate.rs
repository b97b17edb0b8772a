use crate::config::TranslateSettings;
use crate::constants::limits;
use crate::error::GemLensError;
use serde_json::Value;
use std::time::Duration;

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language` (an ISO 639-1 code such as `hi`).
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, GemLensError>;
}

/// Client for the public Google Translate `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(limits::HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &TranslateSettings) -> Self {
        Self::new(&settings.base_url)
    }
}

/// The endpoint answers with nested arrays; the first element lists
/// `[translated, original, ...]` segments.
fn parse_translation(body: &Value) -> Result<String, GemLensError> {
    let segments = body
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| GemLensError::Translation("Unexpected translation response".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(GemLensError::Translation(
            "Translation service returned no text".into(),
        ));
    }

    Ok(translated)
}

#[async_trait::async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, GemLensError> {
        let url = format!("{}/translate_a/single", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| GemLensError::Translation(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GemLensError::Translation(format!(
                "Translate API error ({status}): {body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GemLensError::Translation(format!("Failed to parse response: {e}")))?;

        parse_translation(&body)
    }
}
