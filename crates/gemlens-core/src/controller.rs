use crate::error::GemLensError;
use crate::history::{Exchange, HistoryStore};
use crate::llm::{ImageInput, ResponseGenerator};
use crate::postprocess::{AudioClip, PostProcessFlags, PostProcessor};
use crate::prompt::{PromptBuilder, PromptOptions, Task};

/// Everything the user handed in for one submit.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub task: Task,
    pub free_text: String,
    pub options: PromptOptions,
    pub image: Option<ImageInput>,
    pub flags: PostProcessFlags,
}

/// What a successful cycle produced and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub prompt: String,
    pub response: String,
    pub audio: Option<AudioClip>,
    pub translated: bool,
}

/// Where a submission is in its cycle. Failure in any phase returns to
/// `Idle` with the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Validating,
    Generating,
    PostProcessing,
    Persisting,
}

struct Cycle {
    phase: CyclePhase,
}

impl Cycle {
    fn start() -> Self {
        Self {
            phase: CyclePhase::Idle,
        }
    }

    fn enter(&mut self, next: CyclePhase) {
        tracing::debug!("Cycle {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn fail(&mut self, error: GemLensError) -> GemLensError {
        if error.is_warning() {
            tracing::info!("Submission rejected during {:?}: {}", self.phase, error);
        } else {
            tracing::warn!("Submission failed during {:?}: {}", self.phase, error);
        }
        self.enter(CyclePhase::Idle);
        error
    }
}

/// Runs submissions through prompt building, generation, post-processing and
/// persistence, in that order.
pub struct InteractionController {
    generator: ResponseGenerator,
    post: PostProcessor,
    history: HistoryStore,
}

impl InteractionController {
    pub fn new(generator: ResponseGenerator, post: PostProcessor, history: HistoryStore) -> Self {
        Self {
            generator,
            post,
            history,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Prompt text the submission would send, without validating it.
    pub fn preview_prompt(submission: &Submission) -> String {
        PromptBuilder::build(submission.task, &submission.free_text, &submission.options)
    }

    /// Check the input and build the prompt. Image tasks need an image; the
    /// rest need an image or some free text of the user's own. A task
    /// template alone is never sent.
    pub fn validate(submission: &Submission) -> Result<String, GemLensError> {
        if submission.task.requires_image() && submission.image.is_none() {
            return Err(GemLensError::validation("Please upload an image first."));
        }

        if submission.image.is_none() && submission.free_text.trim().is_empty() {
            return Err(GemLensError::validation(
                "Please enter a question or upload an image first.",
            ));
        }

        Ok(Self::preview_prompt(submission))
    }

    /// One full cycle. Nothing is written to history unless every step
    /// succeeds; a failed translation or narration discards the model's
    /// answer along with it.
    pub async fn submit(&self, submission: &Submission) -> Result<Outcome, GemLensError> {
        let mut cycle = Cycle::start();

        cycle.enter(CyclePhase::Validating);
        let prompt = Self::validate(submission).map_err(|e| cycle.fail(e))?;

        cycle.enter(CyclePhase::Generating);
        let raw = self
            .generator
            .generate(&prompt, submission.image.as_ref())
            .await
            .map_err(|e| cycle.fail(e))?;

        cycle.enter(CyclePhase::PostProcessing);
        let processed = self
            .post
            .process(raw, submission.flags)
            .await
            .map_err(|e| cycle.fail(e))?;

        cycle.enter(CyclePhase::Persisting);
        self.history
            .append(&Exchange::new(prompt.clone(), processed.text.clone()))
            .map_err(|e| cycle.fail(e))?;

        cycle.enter(CyclePhase::Idle);
        tracing::info!(
            "Response ready ({} chars, translated: {}, audio: {})",
            processed.text.len(),
            processed.translated,
            processed.audio.is_some()
        );

        Ok(Outcome {
            prompt,
            response: processed.text,
            audio: processed.audio,
            translated: processed.translated,
        })
    }

    /// Stored exchanges, most recent first.
    pub fn history_view(&self) -> Result<Vec<Exchange>, GemLensError> {
        self.history.load_recent_first()
    }

    pub fn export_history(&self) -> Result<String, GemLensError> {
        self.history.export_text()
    }
}
