mod speech;
mod translate;

pub use speech::{split_for_tts, AudioClip, GoogleTts, SpeechSynthesizer};
pub use translate::{GoogleTranslator, Translator};

use crate::config::Settings;
use crate::error::GemLensError;

/// Which optional transforms to run over a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessFlags {
    pub translate: bool,
    pub speak: bool,
}

/// The response after post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub text: String,
    pub audio: Option<AudioClip>,
    pub translated: bool,
}

/// Translation then speech, each behind its own flag. A failure in either
/// step is returned as-is; the untranslated text is never substituted.
pub struct PostProcessor {
    translator: Box<dyn Translator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    target_language: String,
    speech_language: String,
}

impl PostProcessor {
    pub fn new(
        translator: Box<dyn Translator>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        target_language: impl Into<String>,
        speech_language: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            synthesizer,
            target_language: target_language.into(),
            speech_language: speech_language.into(),
        }
    }

    /// Google-backed translator and narrator configured from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Box::new(GoogleTranslator::from_settings(&settings.translate)),
            Box::new(GoogleTts::from_settings(&settings.speech)),
            &settings.translate.target_language,
            &settings.speech.language,
        )
    }

    pub async fn process(
        &self,
        response: String,
        flags: PostProcessFlags,
    ) -> Result<Processed, GemLensError> {
        let mut text = response;

        if flags.translate {
            tracing::debug!("Translating response to '{}'", self.target_language);
            text = self
                .translator
                .translate(&text, &self.target_language)
                .await?;
        }

        let audio = if flags.speak {
            // Read translated text in the language it was translated into.
            let language = if flags.translate {
                &self.target_language
            } else {
                &self.speech_language
            };
            tracing::debug!("Synthesizing speech in '{}'", language);
            Some(self.synthesizer.synthesize(&text, language).await?)
        } else {
            None
        };

        Ok(Processed {
            text,
            audio,
            translated: flags.translate,
        })
    }
}
