//! Provider integration for sound-effect generation.
//!
//! The daemon talks to its audio provider through the [`SoundGenerator`]
//! trait so the service layer can be exercised with a stub in tests.
//! [`ElevenLabsClient`] is the real implementation.

pub mod elevenlabs;

pub use elevenlabs::ElevenLabsClient;

use crate::config::{DaemonConfig, API_KEY_ENV};
use crate::error::{Result, SfxError};

/// Generates raw audio bytes from a text prompt.
///
/// Implementations classify every failure into the [`SfxError`] taxonomy
/// themselves; callers never re-interpret provider errors.
pub trait SoundGenerator: Send + Sync {
    /// Generates a sound effect for `text`.
    ///
    /// `duration_seconds` and `prompt_influence` fall back to provider
    /// defaults when omitted. Returns the audio bytes ready to write.
    fn generate(
        &self,
        text: &str,
        duration_seconds: Option<f32>,
        prompt_influence: Option<f32>,
    ) -> Result<Vec<u8>>;
}

/// Provider gateway that builds the ElevenLabs client on demand.
///
/// The client is instantiated per generation call, so a daemon started
/// without a credential still serves protocol traffic; each attempt then
/// fails with the ApiKey failure until the environment is fixed.
pub struct ElevenLabsProxy {
    config: DaemonConfig,
}

impl ElevenLabsProxy {
    /// Creates a proxy over the given daemon configuration.
    pub fn new(config: DaemonConfig) -> Self {
        Self { config }
    }
}

impl SoundGenerator for ElevenLabsProxy {
    fn generate(
        &self,
        text: &str,
        duration_seconds: Option<f32>,
        prompt_influence: Option<f32>,
    ) -> Result<Vec<u8>> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            SfxError::ApiKey(format!(
                "{} is not configured. Set it in the daemon environment.",
                API_KEY_ENV
            ))
        })?;

        let client = ElevenLabsClient::with_retry(
            api_key,
            self.config.max_retries,
            self.config.backoff_secs,
        )?;
        client.generate(text, duration_seconds, prompt_influence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_without_key_fails_with_api_key_error() {
        let proxy = ElevenLabsProxy::new(DaemonConfig::default());
        let err = proxy.generate("a door creaking", None, None).unwrap_err();
        assert!(matches!(err, SfxError::ApiKey(_)));

        let (_, message) = err.rpc_error();
        assert!(message.contains(API_KEY_ENV));
    }
}
