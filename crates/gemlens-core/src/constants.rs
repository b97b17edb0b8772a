//! GemLens: centralized constants.
//! Model names, endpoints, defaults and limits live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";
    pub const TTS_BASE_URL: &str = "https://translate.google.com";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
    /// Hindi.
    pub const TARGET_LANGUAGE: &str = "hi";
    pub const SPEECH_LANGUAGE: &str = "en";
    pub const HISTORY_FILE: &str = "chat_history.json";
    pub const AUDIO_DIR: &str = ".";
}

// ─── Resource Limits ──────────────────────────────────────────────────────────

pub mod limits {
    pub const HTTP_TIMEOUT_SECS: u64 = 120;
    /// The TTS endpoint rejects longer inputs.
    pub const TTS_MAX_CHUNK_CHARS: usize = 100;
    pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "gemlens";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const AUDIO_FILE: &str = "response.mp3";
}
