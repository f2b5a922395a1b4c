//! GenerationRequest entity representing a sound-effect generation call.

use serde::{Deserialize, Serialize};

/// Parameters for a single sound-effect generation call.
///
/// Only `text` is required; every other field falls back to a provider or
/// daemon default. The request is immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt describing the desired sound effect.
    pub text: String,

    /// Desired duration in seconds (0.5-22.0). Provider default when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f32>,

    /// How strongly the prompt steers generation (0.0-1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_influence: Option<f32>,

    /// Directory for the generated file, absolute or relative to the
    /// daemon's working directory. Defaults to the configured output root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,

    /// Desired filename including extension. A `_vN` suffix is applied when
    /// the file already exists; `.mp3` is appended when no extension is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
}

impl GenerationRequest {
    /// Creates a request with only the text prompt set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration_seconds: None,
            prompt_influence: None,
            output_directory: None,
            output_filename: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_text_only() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"text": "a cat meowing"}"#).unwrap();
        assert_eq!(request.text, "a cat meowing");
        assert!(request.duration_seconds.is_none());
        assert!(request.output_filename.is_none());
    }

    #[test]
    fn missing_text_is_rejected() {
        let result: Result<GenerationRequest, _> =
            serde_json::from_str(r#"{"duration_seconds": 3.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializing_skips_unset_fields() {
        let json = serde_json::to_string(&GenerationRequest::new("whoosh")).unwrap();
        assert_eq!(json, r#"{"text":"whoosh"}"#);
    }
}
