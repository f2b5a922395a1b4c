//! Error types for the sfx-daemon.
//!
//! Provider failures are classified once, at the ElevenLabs client, into the
//! [`SfxError`] taxonomy. [`SfxError::rpc_error`] is the single place where
//! that taxonomy is mapped onto the JSON-RPC error contract.

use std::fmt;

/// Error codes matching the JSON-RPC error contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request line was not valid JSON.
    ParseError,
    /// Unknown method name.
    MethodNotFound,
    /// Caller-supplied parameter was missing or rejected.
    InvalidParams,
    /// Server-side failure: provider, filesystem, or configuration.
    InternalError,
}

impl ErrorCode {
    /// Returns the string code for JSON-RPC error responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::MethodNotFound => "METHOD_NOT_FOUND",
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Returns the numeric error code per JSON-RPC 2.0.
    pub fn as_code(&self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure taxonomy for a generation call.
///
/// Every failure the daemon can surface is one of these variants; the variant
/// is fixed at the point the failure is first observed and no other layer
/// re-classifies it. The detail string never contains the API key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SfxError {
    /// Credential missing from the environment or rejected by the provider
    /// (HTTP 401). An operator problem, not a caller problem.
    ApiKey(String),
    /// Caller-supplied value rejected before or by the provider.
    InvalidParameter(String),
    /// Provider rate limit still exceeded after retries (HTTP 429).
    RateLimited(String),
    /// API key lacks permission for sound generation (HTTP 403).
    PermissionDenied(String),
    /// Provider accepted the request but could not produce audio
    /// (HTTP 400 or persistent 5xx).
    Generation(String),
    /// Any other provider-side failure, with the HTTP status when known.
    ProviderApi {
        status: Option<u16>,
        detail: String,
    },
    /// Local disk problem: directory creation or audio write failed.
    /// Kept distinct from provider failures so diagnostics can tell
    /// "provider problem" from "local disk problem".
    Filesystem(String),
    /// Catch-all for failures outside the taxonomy.
    Unexpected(String),
}

impl SfxError {
    /// Filesystem failure with the given detail.
    pub fn filesystem(detail: impl Into<String>) -> Self {
        SfxError::Filesystem(detail.into())
    }

    /// Invalid caller-supplied parameter.
    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        SfxError::InvalidParameter(detail.into())
    }

    /// Unexpected failure outside the taxonomy.
    pub fn unexpected(detail: impl Into<String>) -> Self {
        SfxError::Unexpected(detail.into())
    }

    /// Maps this failure onto the JSON-RPC error contract.
    ///
    /// Only [`SfxError::InvalidParameter`] is a caller fault; everything else
    /// is INTERNAL_ERROR. A missing API key is operator-configured state, so
    /// it is a server fault even though it reads like a usage mistake. The
    /// returned message always carries the original detail verbatim.
    pub fn rpc_error(&self) -> (ErrorCode, String) {
        match self {
            SfxError::ApiKey(detail) => (
                ErrorCode::InternalError,
                format!("ElevenLabs API key configuration error: {}", detail),
            ),
            SfxError::InvalidParameter(detail) => (
                ErrorCode::InvalidParams,
                format!("ElevenLabs parameter error: {}", detail),
            ),
            SfxError::RateLimited(detail)
            | SfxError::PermissionDenied(detail)
            | SfxError::Generation(detail) => (
                ErrorCode::InternalError,
                format!("ElevenLabs API interaction error: {}", detail),
            ),
            SfxError::ProviderApi { status, detail } => {
                let message = match status {
                    Some(status) => format!(
                        "ElevenLabs API interaction error: (Status {}) {}",
                        status, detail
                    ),
                    None => format!("ElevenLabs API interaction error: {}", detail),
                };
                (ErrorCode::InternalError, message)
            }
            SfxError::Filesystem(detail) => (
                ErrorCode::InternalError,
                format!("Filesystem error: {}", detail),
            ),
            SfxError::Unexpected(detail) => (
                ErrorCode::InternalError,
                format!("An unexpected error occurred: {}", detail),
            ),
        }
    }
}

impl fmt::Display for SfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Logs and RPC responses read identically.
        let (code, message) = self.rpc_error();
        write!(f, "[{}] {}", code, message)
    }
}

impl std::error::Error for SfxError {}

/// Result type alias using SfxError.
pub type Result<T> = std::result::Result<T, SfxError>;
