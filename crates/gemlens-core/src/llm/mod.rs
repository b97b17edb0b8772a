mod traits;
mod gemini;
mod generator;

pub use traits::*;
pub use gemini::GeminiClient;
pub use generator::ResponseGenerator;
