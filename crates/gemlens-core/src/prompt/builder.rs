use super::task::{DietPreference, Task};

/// Secondary selections whose use depends on the task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptOptions {
    pub diet: Option<DietPreference>,
}

impl PromptOptions {
    pub fn with_diet(mut self, diet: DietPreference) -> Self {
        self.diet = Some(diet);
        self
    }
}

/// Turns a task selection plus the user's text into the prompt sent to the
/// model.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Free text is used verbatim for [`Task::CustomPrompt`]. Every other task
    /// starts from its template, gains a diet clause when the task takes one
    /// and one was chosen, and ends with the free text after a single space.
    pub fn build(task: Task, free_text: &str, options: &PromptOptions) -> String {
        if task.is_free_form() {
            return free_text.to_string();
        }

        let mut prompt = task.template().to_string();

        if task.takes_diet() {
            if let Some(diet) = options.diet {
                prompt.push_str(&format!(" I prefer a {} diet.", diet.label().to_lowercase()));
            }
        }

        if !free_text.is_empty() {
            prompt.push(' ');
            prompt.push_str(free_text);
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_only() {
        let prompt = PromptBuilder::build(Task::DescribeImage, "", &PromptOptions::default());
        assert_eq!(prompt, "Give a detailed description of the image.");
    }

    #[test]
    fn test_free_text_appended_with_single_space() {
        let prompt = PromptBuilder::build(
            Task::DetectObjects,
            "Focus on the kitchen.",
            &PromptOptions::default(),
        );
        assert_eq!(
            prompt,
            "List all identifiable objects in this image. Focus on the kitchen."
        );
    }

    #[test]
    fn test_diet_clause_uses_lowercase_label() {
        let options = PromptOptions::default().with_diet(DietPreference::Vegetarian);
        let prompt = PromptBuilder::build(Task::ProteinRichDiet, "", &options);
        assert_eq!(
            prompt,
            "What foods should I eat to reach 150g of protein daily? I prefer a vegetarian diet."
        );
    }

    #[test]
    fn test_diet_clause_precedes_free_text() {
        let options = PromptOptions::default().with_diet(DietPreference::NonVegetarian);
        let prompt =
            PromptBuilder::build(Task::ProteinRichDiet, "I am lactose intolerant.", &options);
        assert!(prompt.ends_with("I prefer a non-vegetarian diet. I am lactose intolerant."));
    }

    #[test]
    fn test_diet_ignored_for_tasks_without_diet() {
        let options = PromptOptions::default().with_diet(DietPreference::Vegan);
        let prompt = PromptBuilder::build(Task::TrainingAdvice, "", &options);
        assert!(!prompt.contains("vegan"));
    }

    #[test]
    fn test_custom_prompt_is_verbatim() {
        let options = PromptOptions::default().with_diet(DietPreference::Vegan);
        assert_eq!(
            PromptBuilder::build(Task::CustomPrompt, "  what is this?  ", &options),
            "  what is this?  "
        );
        assert_eq!(PromptBuilder::build(Task::CustomPrompt, "", &options), "");
    }

    #[test]
    fn test_whitespace_free_text_is_still_appended() {
        let prompt = PromptBuilder::build(Task::CreativeStory, " ", &PromptOptions::default());
        assert_eq!(
            prompt,
            "Generate a creative short story based on this image.  "
        );
    }
}
