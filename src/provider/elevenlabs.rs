//! Client for the ElevenLabs sound-generation endpoint.
//!
//! Validates parameters before any network traffic, classifies HTTP failures
//! into the [`SfxError`] taxonomy, and retries transient conditions (rate
//! limits, server errors) with exponential backoff and jitter.

use std::thread;
use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::error::{Result, SfxError};
use crate::provider::SoundGenerator;

/// ElevenLabs sound-generation endpoint.
pub const API_URL: &str = "https://api.elevenlabs.io/v1/sound-generation";

/// Request timeout. Generation takes seconds, not minutes; a hung request
/// should fail well before the surrounding transport gives up.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default maximum retries for transient API errors.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base factor in seconds for exponential backoff.
pub const DEFAULT_BACKOFF_SECS: f32 = 1.0;

/// Duration sent when the caller does not specify one.
pub const DEFAULT_DURATION_SECONDS: f32 = 5.0;

/// Prompt influence sent when the caller does not specify one.
pub const DEFAULT_PROMPT_INFLUENCE: f32 = 0.3;

const MIN_DURATION: f32 = 0.5;
const MAX_DURATION: f32 = 22.0;
const MIN_INFLUENCE: f32 = 0.0;
const MAX_INFLUENCE: f32 = 1.0;

/// Client for generating sound effects through the ElevenLabs API.
#[derive(Debug)]
pub struct ElevenLabsClient {
    http: Client,
    api_key: String,
    max_retries: u32,
    backoff_secs: f32,
}

impl ElevenLabsClient {
    /// Creates a client with default retry settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_retry(api_key, DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_SECS)
    }

    /// Creates a client with explicit retry settings.
    pub fn with_retry(
        api_key: impl Into<String>,
        max_retries: u32,
        backoff_secs: f32,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SfxError::invalid_parameter("API key cannot be empty."));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SfxError::unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            max_retries,
            backoff_secs,
        })
    }

    /// Delay before the retry following `attempt` (0-based), with jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.backoff_secs * 2f32.powi(attempt as i32);
        let jitter_max = 0.1 * base;
        let jitter = if jitter_max > 0.0 {
            rand::thread_rng().gen_range(0.0..jitter_max)
        } else {
            0.0
        };
        Duration::from_secs_f32(base + jitter)
    }

    fn validate(text: &str, duration: f32, influence: f32) -> Result<()> {
        if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
            return Err(SfxError::invalid_parameter(format!(
                "Duration must be between {} and {} seconds, got {}.",
                MIN_DURATION, MAX_DURATION, duration
            )));
        }
        if !(MIN_INFLUENCE..=MAX_INFLUENCE).contains(&influence) {
            return Err(SfxError::invalid_parameter(format!(
                "Prompt influence must be between {} and {}, got {}.",
                MIN_INFLUENCE, MAX_INFLUENCE, influence
            )));
        }
        if text.trim().is_empty() {
            return Err(SfxError::invalid_parameter(
                "Text prompt cannot be empty or whitespace only.",
            ));
        }
        Ok(())
    }
}

impl SoundGenerator for ElevenLabsClient {
    fn generate(
        &self,
        text: &str,
        duration_seconds: Option<f32>,
        prompt_influence: Option<f32>,
    ) -> Result<Vec<u8>> {
        let duration = duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS);
        let influence = prompt_influence.unwrap_or(DEFAULT_PROMPT_INFLUENCE);
        Self::validate(text, duration, influence)?;

        let body = serde_json::json!({
            "text": text,
            "duration_seconds": duration,
            "prompt_influence": influence,
        });

        let mut attempt = 0u32;
        loop {
            let response = self
                .http
                .post(API_URL)
                .header("xi-api-key", &self.api_key)
                .json(&body)
                .send()
                .map_err(|e| {
                    SfxError::unexpected(format!("Request to ElevenLabs failed: {}", e))
                })?;

            let status = response.status();
            if status.is_success() {
                let bytes = response.bytes().map_err(|e| {
                    SfxError::unexpected(format!("Failed to read audio response: {}", e))
                })?;
                return Ok(bytes.to_vec());
            }

            let detail = error_detail(status, &response.text().unwrap_or_default());

            match status {
                StatusCode::UNAUTHORIZED => {
                    return Err(SfxError::ApiKey(format!(
                        "Invalid API key or authentication failed: {}",
                        detail
                    )));
                }
                StatusCode::FORBIDDEN => {
                    return Err(SfxError::PermissionDenied(format!(
                        "Permission denied. API key may lack permissions: {}",
                        detail
                    )));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    if attempt < self.max_retries {
                        let delay = self.backoff_delay(attempt);
                        eprintln!(
                            "Rate limit hit. Retrying in {:.2} seconds...",
                            delay.as_secs_f32()
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(SfxError::RateLimited(format!(
                        "Rate limit exceeded after {} attempts: {}",
                        self.max_retries + 1,
                        detail
                    )));
                }
                StatusCode::BAD_REQUEST => {
                    return Err(SfxError::Generation(format!(
                        "Bad request to API (e.g., invalid prompt or parameters): {}",
                        detail
                    )));
                }
                status if status.is_server_error() => {
                    if attempt < self.max_retries {
                        let delay = self.backoff_delay(attempt);
                        eprintln!(
                            "Server error ({}). Retrying in {:.2} seconds...",
                            status.as_u16(),
                            delay.as_secs_f32()
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(SfxError::Generation(format!(
                        "Server error ({}) after {} attempts: {}",
                        status.as_u16(),
                        self.max_retries + 1,
                        detail
                    )));
                }
                status => {
                    return Err(SfxError::ProviderApi {
                        status: Some(status.as_u16()),
                        detail,
                    });
                }
            }
        }
    }
}

/// Extracts a human-readable message from an error response body.
///
/// The API wraps details as `{"detail": {"message": ...}}` or
/// `{"detail": "..."}`; anything else falls back to the raw body, or the
/// status line when the body is empty.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.pointer("/detail/message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.get("detail").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}
