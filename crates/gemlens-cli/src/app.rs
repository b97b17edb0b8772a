use anyhow::{Context, Result};
use gemlens_core::bmi;
use gemlens_core::constants::paths;
use gemlens_core::{
    Credentials, DietPreference, GemLensError, HistoryStore, ImageInput, InteractionController,
    Outcome, PostProcessFlags, PromptOptions, Settings, Submission, Task,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{handle_command, CommandResult};

/// Inputs for one submission from the command line.
#[derive(Debug, Clone, Default)]
pub struct AskRequest {
    pub task: Task,
    pub text: String,
    pub image: Option<PathBuf>,
    pub diet: Option<DietPreference>,
    pub flags: PostProcessFlags,
    pub audio_out: Option<PathBuf>,
}

fn controller(settings: &Settings) -> Result<InteractionController> {
    let credentials = Credentials::from_env(&settings.gemini.api_key_env)?;
    tracing::debug!(
        "Using model {} with history at {}",
        settings.gemini.model,
        settings.history.path.display()
    );
    Ok(gemlens_core::build_controller(settings, credentials))
}

fn default_audio_path(settings: &Settings) -> PathBuf {
    settings.speech.output_dir.join(paths::AUDIO_FILE)
}

fn print_outcome(outcome: &Outcome, audio_path: &Path) -> Result<()> {
    println!("\n🧠 Gemini's Response\n");
    println!("{}", outcome.response);

    if let Some(ref audio) = outcome.audio {
        audio
            .save_to(audio_path)
            .with_context(|| format!("saving audio to {}", audio_path.display()))?;
        tracing::debug!("Wrote {} bytes of audio", audio.bytes.len());
        println!("\n🔊 Audio saved to {}", audio_path.display());
    }
    Ok(())
}

fn print_failure(err: &GemLensError) {
    if err.is_warning() {
        eprintln!("⚠️  {err}");
    } else {
        eprintln!("❌ {err}");
    }
}

/// Run one submission and exit.
pub async fn run_single_prompt(settings: &Settings, request: AskRequest) -> Result<()> {
    let image = match request.image {
        Some(ref path) => Some(ImageInput::from_path(path)?),
        None => None,
    };

    let submission = Submission {
        task: request.task,
        free_text: request.text,
        options: PromptOptions { diet: request.diet },
        image,
        flags: request.flags,
    };

    // Reject bad input before asking for a credential.
    InteractionController::validate(&submission)?;

    let controller = controller(settings)?;
    let outcome = controller.submit(&submission).await?;
    let audio_path = request
        .audio_out
        .unwrap_or_else(|| default_audio_path(settings));
    print_outcome(&outcome, &audio_path)
}

pub fn show_history(store: &HistoryStore) -> Result<()> {
    let history = store.load_recent_first()?;
    if history.is_empty() {
        println!("No saved exchanges yet.");
        return Ok(());
    }
    for (idx, exchange) in history.iter().enumerate() {
        println!("🗨️ Q{}: {}", idx + 1, exchange.question);
        println!("💬 A{}: {}\n", idx + 1, exchange.response);
    }
    Ok(())
}

pub fn export_history(store: &HistoryStore, out: &Path) -> Result<()> {
    let transcript = store.export_text()?;
    tracing::info!("Exporting history from {}", store.path().display());
    std::fs::write(out, transcript)
        .with_context(|| format!("writing transcript to {}", out.display()))?;
    println!("📥 History exported to {}", out.display());
    Ok(())
}

pub fn show_bmi(height_cm: f64, weight_kg: f64) -> Result<()> {
    let report = bmi::calculate(height_cm, weight_kg)?;
    println!("⚖️  {report}");
    Ok(())
}

/// Interactive selections carried between submissions.
struct SessionState {
    task: Task,
    diet: Option<DietPreference>,
    image: Option<(PathBuf, ImageInput)>,
    flags: PostProcessFlags,
}

impl SessionState {
    fn submission(&self, free_text: &str) -> Submission {
        Submission {
            task: self.task,
            free_text: free_text.to_string(),
            options: PromptOptions { diet: self.diet },
            image: self.image.as_ref().map(|(_, img)| img.clone()),
            flags: self.flags,
        }
    }

    fn status(&self) -> String {
        let image = self
            .image
            .as_ref()
            .map(|(path, _)| path.display().to_string())
            .unwrap_or_else(|| "none".into());
        let diet = self
            .diet
            .map(|d| d.label().to_string())
            .unwrap_or_else(|| "none".into());
        format!(
            "Task: {}\nDiet: {}\nImage: {}\nTranslate: {}\nSpeak: {}",
            self.task,
            diet,
            image,
            on_off(self.flags.translate),
            on_off(self.flags.speak)
        )
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Line-based chat session on stdin.
pub async fn run_session(settings: &Settings, task: Task) -> Result<()> {
    let controller = controller(settings)?;
    let audio_path = default_audio_path(settings);
    let mut state = SessionState {
        task,
        diet: None,
        image: None,
        flags: PostProcessFlags::default(),
    };

    println!("🖼️ GemLens: type a question, or /help for commands.");
    println!("{}\n", state.status());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let free_text = match handle_command(&line) {
            CommandResult::Quit => break,
            CommandResult::NotACommand => line,
            CommandResult::Submit => String::new(),
            other => {
                if let Err(e) = apply_command(other, &mut state, &controller) {
                    eprintln!("❌ {e:#}");
                }
                continue;
            }
        };

        let submission = state.submission(&free_text);
        println!("⏳ Processing with Gemini...");
        match controller.submit(&submission).await {
            Ok(outcome) => {
                if let Err(e) = print_outcome(&outcome, &audio_path) {
                    eprintln!("❌ {e:#}");
                }
            }
            Err(e) => print_failure(&e),
        }
    }

    Ok(())
}

fn apply_command(
    command: CommandResult,
    state: &mut SessionState,
    controller: &InteractionController,
) -> Result<()> {
    match command {
        CommandResult::Message(msg) => println!("{msg}"),
        CommandResult::SetTask(task) => {
            state.task = task;
            println!("Task: {task}");
        }
        CommandResult::SetDiet(diet) => {
            state.diet = diet;
            match diet {
                Some(d) if !state.task.takes_diet() => {
                    println!("Diet: {d} (used by the protein-rich-diet task)")
                }
                Some(d) => println!("Diet: {d}"),
                None => println!("Diet cleared"),
            }
        }
        CommandResult::SetImage(path) => match ImageInput::from_path(&path) {
            Ok(image) => {
                println!("📁 Image attached: {} ({} bytes)", path.display(), image.bytes.len());
                state.image = Some((path, image));
            }
            Err(e) => print_failure(&e),
        },
        CommandResult::ClearImage => {
            state.image = None;
            println!("Image detached");
        }
        CommandResult::SetTranslate(toggle) => {
            state.flags.translate = toggle.apply(state.flags.translate);
            println!("🌍 Translate: {}", on_off(state.flags.translate));
        }
        CommandResult::SetSpeak(toggle) => {
            state.flags.speak = toggle.apply(state.flags.speak);
            println!("🔊 Speak: {}", on_off(state.flags.speak));
        }
        CommandResult::ShowHistory => show_history(controller.history())?,
        CommandResult::ExportHistory(path) => export_history(controller.history(), &path)?,
        CommandResult::Bmi {
            height_cm,
            weight_kg,
        } => show_bmi(height_cm, weight_kg)?,
        CommandResult::ShowStatus => println!("{}", state.status()),
        CommandResult::Quit | CommandResult::NotACommand | CommandResult::Submit => {}
    }
    Ok(())
}
