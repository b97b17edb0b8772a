use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GemLensError;

/// One question and the answer that was shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub response: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
        }
    }
}

/// Chat history kept as a single JSON array, oldest first.
///
/// Every append rewrites the whole file. There is no locking, so only one
/// process should write to a given path.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored exchange in the order it was appended. A store that has
    /// never been written is empty.
    pub fn load_all(&self) -> Result<Vec<Exchange>, GemLensError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            GemLensError::History(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            GemLensError::History(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    pub fn append(&self, exchange: &Exchange) -> Result<(), GemLensError> {
        let mut history = self.load_all()?;
        history.push(exchange.clone());
        self.write_all(&history)?;
        tracing::debug!(
            "Appended exchange #{} to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Newest first, the order the history panel shows.
    pub fn load_recent_first(&self) -> Result<Vec<Exchange>, GemLensError> {
        let mut history = self.load_all()?;
        history.reverse();
        Ok(history)
    }

    /// Plain-text transcript of the whole history, oldest first.
    pub fn export_text(&self) -> Result<String, GemLensError> {
        Ok(render_transcript(&self.load_all()?))
    }

    fn write_all(&self, history: &[Exchange]) -> Result<(), GemLensError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    GemLensError::History(format!("Failed to create history directory: {}", e))
                })?;
            }
        }

        // Four-space indent keeps the file diff-friendly with hand edits.
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        history.serialize(&mut serializer)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &buf).map_err(|e| {
            GemLensError::History(format!("Failed to write temporary history file: {}", e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            GemLensError::History(format!("Failed to rename history file: {}", e))
        })?;

        Ok(())
    }
}

pub fn render_transcript(history: &[Exchange]) -> String {
    let mut out = String::new();
    for (idx, exchange) in history.iter().enumerate() {
        out.push_str(&format!(
            "Q{n}: {}\nA{n}: {}\n\n",
            exchange.question,
            exchange.response,
            n = idx + 1
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> HistoryStore {
        HistoryStore::with_path(temp.path().join("chat_history.json"))
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store(&temp).load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.append(&Exchange::new("q1", "a1")).unwrap();
        store.append(&Exchange::new("q2", "a2")).unwrap();
        store.append(&Exchange::new("q1", "a1")).unwrap();

        let history = store.load_all().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], Exchange::new("q1", "a1"));
        assert_eq!(history[1], Exchange::new("q2", "a2"));
        assert_eq!(history[2], Exchange::new("q1", "a1"));
    }

    #[test]
    fn test_file_is_array_of_question_response_records() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.append(&Exchange::new("Describe", "A dog")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n    {\n        \"question\": \"Describe\""));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["response"], "A dog");
        assert!(!temp.path().join("chat_history.json.tmp").exists());
    }

    #[test]
    fn test_reads_file_written_by_other_tools() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        fs::write(
            store.path(),
            r#"[{"question": "old q", "response": "old a"}]"#,
        )
        .unwrap();

        store.append(&Exchange::new("new q", "new a")).unwrap();

        let history = store.load_all().unwrap();
        assert_eq!(history[0].question, "old q");
        assert_eq!(history[1].question, "new q");
    }

    #[test]
    fn test_corrupt_file_is_an_error_and_left_untouched() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load_all(), Err(GemLensError::History(_))));
        assert!(store.append(&Exchange::new("q", "a")).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{not json");
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::with_path(temp.path().join("data/chats/history.json"));
        store.append(&Exchange::new("q", "a")).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_recent_first_and_transcript() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.append(&Exchange::new("first", "one")).unwrap();
        store.append(&Exchange::new("second", "two")).unwrap();

        let recent = store.load_recent_first().unwrap();
        assert_eq!(recent[0].question, "second");
        assert_eq!(recent[1].question, "first");

        assert_eq!(
            store.export_text().unwrap(),
            "Q1: first\nA1: one\n\nQ2: second\nA2: two\n\n"
        );
    }
}
