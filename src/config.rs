//! Daemon configuration module.
//!
//! Provides configuration for the provider credential, the default output
//! directory, and retry behavior. The credential is read from the process
//! environment and never serialized or logged.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the ElevenLabs API key.
pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Environment variable overriding the default output directory.
pub const OUTPUT_DIR_ENV: &str = "SFX_OUTPUT_DIR";

/// Configuration for the sfx daemon.
#[derive(Clone)]
pub struct DaemonConfig {
    /// ElevenLabs API key, if configured.
    pub api_key: Option<String>,

    /// Directory used when a request carries no output_directory hint.
    pub output_root: PathBuf,

    /// Maximum retries for transient provider errors.
    pub max_retries: u32,

    /// Base factor in seconds for exponential retry backoff.
    pub backoff_secs: f32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        // Use platform-appropriate cache directory
        let base_cache = directories::BaseDirs::new()
            .map(|d| d.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".cache"));

        Self {
            api_key: None,
            output_root: base_cache.join("sfx-daemon").join("output"),
            max_retries: 3,
            backoff_secs: 1.0,
        }
    }
}

impl DaemonConfig {
    /// Builds a configuration from the process environment.
    ///
    /// Reads the API key from `ELEVENLABS_API_KEY` and an optional output
    /// directory override from `SFX_OUTPUT_DIR`. Blank values are treated
    /// as unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        if let Ok(dir) = env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.output_root = PathBuf::from(dir);
            }
        }

        config
    }

    /// Returns true if a provider credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for DaemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("output_root", &self.output_root)
            .field("max_retries", &self.max_retries)
            .field("backoff_secs", &self.backoff_secs)
            .finish()
    }
}
