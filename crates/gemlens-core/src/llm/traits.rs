use crate::constants::limits;
use crate::error::GemLensError;
use std::path::Path;

/// An uploaded picture, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read a `.jpg`, `.jpeg` or `.png` file.
    pub fn from_path(path: &Path) -> Result<Self, GemLensError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !limits::ACCEPTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(GemLensError::validation(format!(
                "Unsupported image type '{}'. Use one of: {}",
                path.display(),
                limits::ACCEPTED_IMAGE_EXTENSIONS.join(", ")
            )));
        }

        let mime_type = if extension == "png" {
            "image/png"
        } else {
            "image/jpeg"
        };

        let bytes = std::fs::read(path).map_err(|e| {
            GemLensError::validation(format!("Could not read image {}: {e}", path.display()))
        })?;

        if bytes.is_empty() {
            return Err(GemLensError::validation(format!(
                "Image {} is empty",
                path.display()
            )));
        }

        Ok(Self::new(bytes, mime_type))
    }
}

/// One piece of a multimodal request, in the order the model should read it.
#[derive(Debug, Clone, Copy)]
pub enum ContentPart<'a> {
    Text(&'a str),
    Image(&'a ImageInput),
}

/// A hosted generative model that answers a single multimodal turn.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the parts as one user turn and return the model's text.
    async fn generate_content(&self, parts: &[ContentPart<'_>]) -> Result<String, GemLensError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_detects_mime_type() {
        let temp = TempDir::new().unwrap();
        let png = temp.path().join("cat.PNG");
        let jpg = temp.path().join("dog.jpeg");
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();
        std::fs::write(&jpg, [0xFF, 0xD8, 0xFF]).unwrap();

        assert_eq!(ImageInput::from_path(&png).unwrap().mime_type, "image/png");
        assert_eq!(ImageInput::from_path(&jpg).unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn test_from_path_rejects_other_types() {
        let temp = TempDir::new().unwrap();
        let gif = temp.path().join("anim.gif");
        std::fs::write(&gif, b"GIF89a").unwrap();

        let err = ImageInput::from_path(&gif).unwrap_err();
        assert!(err.is_warning());
    }

    #[test]
    fn test_from_path_missing_file_is_warning() {
        let err = ImageInput::from_path(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.is_warning());
    }
}
