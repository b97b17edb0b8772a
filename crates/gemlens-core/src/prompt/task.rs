use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GemLensError;

/// What the user asked the model to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    #[default]
    DescribeImage,
    DetectObjects,
    CreativeStory,
    TrainingAdvice,
    ProteinRichDiet,
    /// Free text is sent as-is.
    CustomPrompt,
}

impl Task {
    pub fn all() -> &'static [Task] {
        &[
            Task::DescribeImage,
            Task::DetectObjects,
            Task::CreativeStory,
            Task::TrainingAdvice,
            Task::ProteinRichDiet,
            Task::CustomPrompt,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::DescribeImage => "describe-image",
            Task::DetectObjects => "detect-objects",
            Task::CreativeStory => "creative-story",
            Task::TrainingAdvice => "training-advice",
            Task::ProteinRichDiet => "protein-rich-diet",
            Task::CustomPrompt => "custom-prompt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Task::DescribeImage => "Describe Image",
            Task::DetectObjects => "Detect Objects",
            Task::CreativeStory => "Creative Story",
            Task::TrainingAdvice => "Training Advice",
            Task::ProteinRichDiet => "Protein-Rich Diet",
            Task::CustomPrompt => "Custom Prompt",
        }
    }

    /// Base prompt for the task. Empty for [`Task::CustomPrompt`], whose
    /// prompt is the user's text.
    pub fn template(&self) -> &'static str {
        match self {
            Task::DescribeImage => "Give a detailed description of the image.",
            Task::DetectObjects => "List all identifiable objects in this image.",
            Task::CreativeStory => "Generate a creative short story based on this image.",
            Task::TrainingAdvice => {
                "Give me a weekly training plan to build strength and endurance."
            }
            Task::ProteinRichDiet => "What foods should I eat to reach 150g of protein daily?",
            Task::CustomPrompt => "",
        }
    }

    pub fn requires_image(&self) -> bool {
        matches!(
            self,
            Task::DescribeImage | Task::DetectObjects | Task::CreativeStory
        )
    }

    pub fn takes_diet(&self) -> bool {
        matches!(self, Task::ProteinRichDiet)
    }

    pub fn is_free_form(&self) -> bool {
        matches!(self, Task::CustomPrompt)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Task {
    type Err = GemLensError;

    /// Accepts the kebab-case name or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Task::all()
            .iter()
            .copied()
            .find(|t| t.name() == wanted || t.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Task::all().iter().map(|t| t.name()).collect();
                GemLensError::validation(format!(
                    "Unknown task '{s}'. Options: {}",
                    names.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietPreference {
    Vegetarian,
    Vegan,
    Eggetarian,
    NonVegetarian,
}

impl DietPreference {
    pub fn all() -> &'static [DietPreference] {
        &[
            DietPreference::Vegetarian,
            DietPreference::Vegan,
            DietPreference::Eggetarian,
            DietPreference::NonVegetarian,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::Vegan => "Vegan",
            DietPreference::Eggetarian => "Eggetarian",
            DietPreference::NonVegetarian => "Non-Vegetarian",
        }
    }
}

impl fmt::Display for DietPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DietPreference {
    type Err = GemLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DietPreference::all()
            .iter()
            .copied()
            .find(|d| d.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                GemLensError::validation(format!(
                    "Unknown diet '{s}'. Options: vegetarian, vegan, eggetarian, non-vegetarian"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_parses_name_and_label() {
        assert_eq!("describe-image".parse::<Task>().unwrap(), Task::DescribeImage);
        assert_eq!("Protein-Rich Diet".parse::<Task>().unwrap(), Task::ProteinRichDiet);
        assert_eq!("  CUSTOM-PROMPT ".parse::<Task>().unwrap(), Task::CustomPrompt);
    }

    #[test]
    fn test_unknown_task_is_validation_error() {
        let err = "paint-my-house".parse::<Task>().unwrap_err();
        assert!(err.is_warning());
        assert!(err.to_string().contains("describe-image"));
    }

    #[test]
    fn test_every_task_except_custom_has_template() {
        for task in Task::all() {
            assert_eq!(task.template().is_empty(), task.is_free_form(), "{task}");
        }
    }

    #[test]
    fn test_diet_parses_hyphenated_label() {
        assert_eq!(
            "non-vegetarian".parse::<DietPreference>().unwrap(),
            DietPreference::NonVegetarian
        );
        assert!("carnivore".parse::<DietPreference>().is_err());
    }
}
