use thiserror::Error;

#[derive(Error, Debug)]
pub enum GemLensError {
    /// Missing or unusable input. The user has to resubmit.
    #[error("{0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Upstream(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Speech synthesis error: {0}")]
    SpeechSynthesis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GemLensError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for failures the user fixes by changing their input rather than
    /// by retrying.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, GemLensError>;
