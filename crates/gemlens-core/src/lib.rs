pub mod error;
pub mod constants;
pub mod config;
pub mod prompt;
pub mod llm;
pub mod postprocess;
pub mod history;
pub mod controller;
pub mod bmi;

// Re-export key types
pub use error::GemLensError;
pub use config::{Credentials, Settings};
pub use prompt::{DietPreference, PromptBuilder, PromptOptions, Task};
pub use llm::{ContentPart, GeminiClient, ImageInput, ModelClient, ResponseGenerator};
pub use postprocess::{
    AudioClip, PostProcessFlags, PostProcessor, Processed, SpeechSynthesizer, Translator,
};
pub use history::{Exchange, HistoryStore};
pub use controller::{CyclePhase, InteractionController, Outcome, Submission};

/// Wire up a controller against the real Google services.
pub fn build_controller(settings: &Settings, credentials: Credentials) -> InteractionController {
    let client = GeminiClient::from_settings(&settings.gemini, credentials);
    InteractionController::new(
        ResponseGenerator::new(Box::new(client)),
        PostProcessor::from_settings(settings),
        HistoryStore::with_path(&settings.history.path),
    )
}
