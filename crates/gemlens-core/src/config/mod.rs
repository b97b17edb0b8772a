use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::{defaults, endpoints, models, paths};
use crate::error::GemLensError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub translate: TranslateSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub target_language: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Voice language when the response is not translated. A translated
    /// response is always read in the translation target language.
    pub language: String,
    pub base_url: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub path: PathBuf,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: endpoints::GEMINI_BASE_URL.to_string(),
        }
    }
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            base_url: endpoints::TRANSLATE_BASE_URL.to_string(),
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: defaults::SPEECH_LANGUAGE.to_string(),
            base_url: endpoints::TTS_BASE_URL.to_string(),
            output_dir: PathBuf::from(defaults::AUDIO_DIR),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::HISTORY_FILE),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini: GeminiSettings::default(),
            translate: TranslateSettings::default(),
            speech: SpeechSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or does not parse.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring invalid config {}: {}", path.display(), e)
                    }
                },
                Err(e) => tracing::warn!("Could not read config {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), GemLensError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GemLensError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

/// Process-wide model credential. Read once at startup and handed to the
/// model client explicitly.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Load `.env` if present, then read the key from `var`.
    pub fn from_env(var: &str) -> Result<Self, GemLensError> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(GemLensError::Config(format!(
                "API key not set: export {var} or add it to .env"
            ))),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
