use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gemlens_core::{DietPreference, HistoryStore, PostProcessFlags, Settings, Task};
use std::path::PathBuf;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "gemlens")]
#[command(about = "GemLens - ask Gemini about images, training and diet")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Chat history file
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask one question and exit
    Ask(AskArgs),
    /// Interactive session (the default)
    Chat {
        /// Task to start with
        #[arg(short, long, default_value = "describe-image")]
        task: Task,
    },
    /// Show saved exchanges, newest first, or export them as text
    History {
        /// Write a plain-text transcript here instead of printing
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Body-mass index calculator
    Bmi {
        /// Height in centimetres
        #[arg(long)]
        height: f64,
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
    },
    /// List available tasks
    Tasks,
}

#[derive(Args)]
struct AskArgs {
    /// Task: describe-image, detect-objects, creative-story, training-advice,
    /// protein-rich-diet, custom-prompt
    #[arg(short, long, default_value = "describe-image")]
    task: Task,

    /// Free-form question or extra detail
    #[arg(default_value = "")]
    text: String,

    /// Image to send (.jpg, .jpeg, .png)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Diet preference for protein-rich-diet
    #[arg(long)]
    diet: Option<DietPreference>,

    /// Translate the answer into the configured language
    #[arg(long)]
    translate: bool,

    /// Target language for --translate (e.g. hi, fr)
    #[arg(long)]
    language: Option<String>,

    /// Read the answer aloud into an MP3 file
    #[arg(long)]
    speak: bool,

    /// Where to write the MP3
    #[arg(long)]
    audio_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path),
        None => Settings::load(),
    };

    if let Some(ref model) = cli.model {
        settings.gemini.model = model.clone();
    }
    if let Some(ref history) = cli.history {
        settings.history.path = history.clone();
    }

    match cli.command {
        Some(Command::Ask(args)) => {
            if let Some(language) = args.language {
                settings.translate.target_language = language;
            }
            let request = app::AskRequest {
                task: args.task,
                text: args.text,
                image: args.image,
                diet: args.diet,
                flags: PostProcessFlags {
                    translate: args.translate,
                    speak: args.speak,
                },
                audio_out: args.audio_out,
            };
            app::run_single_prompt(&settings, request).await?;
        }
        Some(Command::History { export }) => {
            let store = HistoryStore::with_path(&settings.history.path);
            match export {
                Some(path) => app::export_history(&store, &path)?,
                None => app::show_history(&store)?,
            }
        }
        Some(Command::Bmi { height, weight }) => app::show_bmi(height, weight)?,
        Some(Command::Tasks) => {
            if let commands::CommandResult::Message(list) = commands::handle_command("/tasks") {
                println!("{list}");
            }
        }
        Some(Command::Chat { task }) => app::run_session(&settings, task).await?,
        None => app::run_session(&settings, Task::default()).await?,
    }

    Ok(())
}
