use crate::error::GemLensError;
use crate::llm::traits::{ContentPart, ImageInput, ModelClient};

/// Builds one model request from a prompt and an optional image.
pub struct ResponseGenerator {
    client: Box<dyn ModelClient>,
}

impl ResponseGenerator {
    pub fn new(client: Box<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Ask the model and return its text unchanged.
    ///
    /// A blank prompt is dropped from the request when an image is present,
    /// so the model sees the image alone. A blank prompt without an image is
    /// rejected before any network call.
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
    ) -> Result<String, GemLensError> {
        let has_text = !prompt.trim().is_empty();

        let parts: Vec<ContentPart<'_>> = match (has_text, image) {
            (true, Some(image)) => vec![ContentPart::Text(prompt), ContentPart::Image(image)],
            (false, Some(image)) => vec![ContentPart::Image(image)],
            (true, None) => vec![ContentPart::Text(prompt)],
            (false, None) => {
                return Err(GemLensError::validation(
                    "Please enter a question or upload an image first.",
                ))
            }
        };

        tracing::info!(
            "Generating response (text: {}, image: {})",
            has_text,
            image.is_some()
        );

        match self.client.generate_content(&parts).await {
            Ok(text) if text.is_empty() => {
                Err(GemLensError::Upstream("Model returned an empty response".into()))
            }
            Ok(text) => Ok(text),
            // Whatever the client raised is a failed model call from here on.
            Err(e @ GemLensError::Upstream(_)) => Err(e),
            Err(other) => Err(GemLensError::Upstream(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records the shape of every request: "text:<prompt>" or "image:<mime>".
    #[derive(Clone, Default)]
    struct RecordingClient {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        reply: Option<String>,
    }

    #[async_trait::async_trait]
    impl ModelClient for RecordingClient {
        async fn generate_content(
            &self,
            parts: &[ContentPart<'_>],
        ) -> Result<String, GemLensError> {
            let shape = parts
                .iter()
                .map(|p| match p {
                    ContentPart::Text(t) => format!("text:{t}"),
                    ContentPart::Image(i) => format!("image:{}", i.mime_type),
                })
                .collect();
            self.calls.lock().unwrap().push(shape);
            self.reply
                .clone()
                .ok_or_else(|| GemLensError::Config("bad key".into()))
        }
    }

    fn image() -> ImageInput {
        ImageInput::new(vec![0xFF, 0xD8], "image/jpeg")
    }

    fn client(reply: &str) -> RecordingClient {
        RecordingClient {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_prompt_and_image_sent_together() {
        let client = client("A red bicycle.");
        let generator = ResponseGenerator::new(Box::new(client.clone()));

        let out = generator.generate("Describe.", Some(&image())).await.unwrap();

        assert_eq!(out, "A red bicycle.");
        assert_eq!(
            client.calls.lock().unwrap()[0],
            vec!["text:Describe.", "image:image/jpeg"]
        );
    }

    #[tokio::test]
    async fn test_blank_prompt_sends_image_only() {
        let client = client("ok");
        let generator = ResponseGenerator::new(Box::new(client.clone()));

        generator.generate("   ", Some(&image())).await.unwrap();

        assert_eq!(client.calls.lock().unwrap()[0], vec!["image:image/jpeg"]);
    }

    #[tokio::test]
    async fn test_text_only_request() {
        let client = client("Eat lentils.");
        let generator = ResponseGenerator::new(Box::new(client.clone()));

        generator.generate("What should I eat?", None).await.unwrap();

        assert_eq!(
            client.calls.lock().unwrap()[0],
            vec!["text:What should I eat?"]
        );
    }

    #[tokio::test]
    async fn test_nothing_to_send_is_rejected_without_calling_model() {
        let client = client("never");
        let generator = ResponseGenerator::new(Box::new(client.clone()));

        let err = generator.generate("", None).await.unwrap_err();

        assert!(err.is_warning());
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_response_is_returned_verbatim() {
        let generator = ResponseGenerator::new(Box::new(client("  padded\n")));
        let out = generator.generate("x", None).await.unwrap();
        assert_eq!(out, "  padded\n");
    }

    #[tokio::test]
    async fn test_client_failure_becomes_upstream_error() {
        let generator = ResponseGenerator::new(Box::new(RecordingClient::default()));
        let err = generator.generate("x", None).await.unwrap_err();
        assert!(matches!(err, GemLensError::Upstream(ref m) if m.contains("bad key")));
    }

    #[tokio::test]
    async fn test_empty_model_text_is_upstream_error() {
        let generator = ResponseGenerator::new(Box::new(client("")));
        let err = generator.generate("x", None).await.unwrap_err();
        assert!(matches!(err, GemLensError::Upstream(_)));
    }
}
