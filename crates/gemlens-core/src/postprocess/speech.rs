use crate::config::SpeechSettings;
use crate::constants::limits;
use crate::error::GemLensError;
use std::path::Path;
use std::time::Duration;

/// Playable speech audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "audio/mpeg".to_string(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GemLensError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip, GemLensError>;
}

/// Client for the Google Translate TTS endpoint, which returns MP3.
pub struct GoogleTts {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTts {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(limits::HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &SpeechSettings) -> Self {
        Self::new(&settings.base_url)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, GemLensError> {
        let url = format!("{}/translate_tts", self.base_url);
        let idx = index.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| GemLensError::SpeechSynthesis(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GemLensError::SpeechSynthesis(format!(
                "TTS API error ({status}) for language '{language}'"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GemLensError::SpeechSynthesis(format!("Failed to read audio: {e}")))?;

        Ok(bytes.to_vec())
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace where possible. Words longer than the limit are cut.
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}

#[async_trait::async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip, GemLensError> {
        let chunks = split_for_tts(text, limits::TTS_MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(GemLensError::SpeechSynthesis("No text to speak".into()));
        }

        tracing::debug!("Synthesizing {} TTS chunk(s) in '{}'", chunks.len(), language);

        // MP3 frames concatenate into a single playable stream.
        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, language, index, chunks.len()).await?);
        }

        Ok(AudioClip::mp3(audio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_for_tts("Hello there.", 100), vec!["Hello there."]);
    }

    #[test]
    fn test_chunks_respect_limit_and_word_boundaries() {
        let chunks = split_for_tts("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let chunks = split_for_tts("xy abcdefghij z", 4);
        assert_eq!(chunks, vec!["xy", "abcd", "efgh", "ij z"]);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let text = "नमस्ते ".repeat(30);
        for chunk in split_for_tts(&text, 100) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(split_for_tts(" \n\t ", 100).is_empty());
    }

    #[test]
    fn test_audio_clip_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audio").join("reply.mp3");

        AudioClip::mp3(vec![0x49, 0x44, 0x33]).save_to(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x49, 0x44, 0x33]);
    }
}
