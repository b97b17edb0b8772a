mod builder;
mod task;

pub use builder::{PromptBuilder, PromptOptions};
pub use task::{DietPreference, Task};
