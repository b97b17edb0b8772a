use gemlens_core::{DietPreference, Task};
use std::path::PathBuf;

/// Result of processing a line typed into the chat session.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the session.
    Quit,
    /// Select the task.
    SetTask(Task),
    /// Select or clear the diet preference.
    SetDiet(Option<DietPreference>),
    /// Attach an image for the next submissions.
    SetImage(PathBuf),
    /// Detach the image.
    ClearImage,
    /// Set or flip the translate toggle.
    SetTranslate(Toggle),
    /// Set or flip the read-aloud toggle.
    SetSpeak(Toggle),
    /// Submit with no free text (template and/or image only).
    Submit,
    /// Show stored exchanges, newest first.
    ShowHistory,
    /// Write the plain-text transcript to a file.
    ExportHistory(PathBuf),
    /// Compute BMI from height (cm) and weight (kg).
    Bmi { height_cm: f64, weight_kg: f64 },
    /// Show current task, image and toggles.
    ShowStatus,
    /// Not a command - treat as free text and submit.
    NotACommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
    Flip,
}

impl Toggle {
    pub fn apply(self, current: bool) -> bool {
        match self {
            Toggle::On => true,
            Toggle::Off => false,
            Toggle::Flip => !current,
        }
    }

    fn parse(arg: &str) -> Option<Self> {
        match arg.to_lowercase().as_str() {
            "" => Some(Toggle::Flip),
            "on" | "yes" | "true" => Some(Toggle::On),
            "off" | "no" | "false" => Some(Toggle::Off),
            _ => None,
        }
    }
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/go" | "/submit" => CommandResult::Submit,
        "/status" => CommandResult::ShowStatus,

        "/task" => {
            if arg.is_empty() {
                CommandResult::Message(task_list())
            } else {
                match arg.parse::<Task>() {
                    Ok(task) => CommandResult::SetTask(task),
                    Err(e) => CommandResult::Message(e.to_string()),
                }
            }
        }
        "/tasks" => CommandResult::Message(task_list()),
        "/diet" => match arg {
            "" => CommandResult::Message(
                "Usage: /diet <vegetarian|vegan|eggetarian|non-vegetarian|none>".into(),
            ),
            "none" | "clear" => CommandResult::SetDiet(None),
            _ => match arg.parse::<DietPreference>() {
                Ok(diet) => CommandResult::SetDiet(Some(diet)),
                Err(e) => CommandResult::Message(e.to_string()),
            },
        },
        "/image" => match arg {
            "" => CommandResult::Message("Usage: /image <path.jpg|path.png> or /image clear".into()),
            "clear" | "none" => CommandResult::ClearImage,
            path => CommandResult::SetImage(PathBuf::from(path)),
        },
        "/translate" => match Toggle::parse(arg) {
            Some(toggle) => CommandResult::SetTranslate(toggle),
            None => CommandResult::Message("Usage: /translate [on|off]".into()),
        },
        "/speak" => match Toggle::parse(arg) {
            Some(toggle) => CommandResult::SetSpeak(toggle),
            None => CommandResult::Message("Usage: /speak [on|off]".into()),
        },

        "/history" => CommandResult::ShowHistory,
        "/export" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /export <file.txt>".into())
            } else {
                CommandResult::ExportHistory(PathBuf::from(arg))
            }
        }
        "/bmi" => parse_bmi(arg),
        "/version" => CommandResult::Message(format!("GemLens v{}", env!("CARGO_PKG_VERSION"))),

        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn parse_bmi(arg: &str) -> CommandResult {
    let usage = || CommandResult::Message("Usage: /bmi <height-cm> <weight-kg>".into());
    let numbers: Vec<&str> = arg.split_whitespace().collect();
    if numbers.len() != 2 {
        return usage();
    }
    match (numbers[0].parse::<f64>(), numbers[1].parse::<f64>()) {
        (Ok(height_cm), Ok(weight_kg)) => CommandResult::Bmi {
            height_cm,
            weight_kg,
        },
        _ => usage(),
    }
}

fn task_list() -> String {
    let mut out = String::from("Available tasks:\n");
    for task in Task::all() {
        let image = if task.requires_image() { " (needs image)" } else { "" };
        out.push_str(&format!("  {:<18} {}{}\n", task.name(), task.label(), image));
    }
    out.push_str("Usage: /task <name>");
    out
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ GemLens Commands ─────────────────────────────────────────────╮

  ASKING
    <text>                    Ask with the current task and image
    /go, /submit              Ask with no extra text
    /task <name>              Choose task (/tasks to list)
    /diet <name|none>         Diet preference for protein-rich-diet
    /image <path|clear>       Attach or detach a .jpg/.png image

  OUTPUT
    /translate [on|off]       Translate the answer (toggles if no arg)
    /speak [on|off]           Read the answer aloud to an MP3 file
    /status                   Show current task, image and toggles

  HISTORY
    /history                  Show saved exchanges, newest first
    /export <file>            Save all exchanges as plain text

  OTHER
    /bmi <cm> <kg>            Body-mass index calculator
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
