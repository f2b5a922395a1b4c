//! JSON-RPC 2.0 envelope for the stdio transport.
//!
//! Requests arrive one per line on stdin; responses leave one per line on
//! stdout. This module only parses the envelope and dispatches to the
//! service; all generation semantics live in [`crate::service`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;
use crate::provider::SoundGenerator;
use crate::service::SfxService;
use crate::types::GenerationRequest;

/// The single method this daemon exposes.
pub const METHOD_GENERATE_SFX: &str = "generate_sfx";

const JSONRPC_VERSION: &str = "2.0";

/// Incoming request envelope.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Outgoing response envelope.
#[derive(Debug, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Error payload carried in a failed response.
#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl Response {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(RpcError {
                code: code.as_code(),
                message: message.into(),
            }),
        }
    }
}

/// Handles one request line, returning the serialized response.
///
/// Returns `None` for notifications (requests without an id), which receive
/// no reply per JSON-RPC 2.0.
pub fn handle_line<G: SoundGenerator>(line: &str, service: &SfxService<G>) -> Option<String> {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return Some(serialize(Response::failure(
                Value::Null,
                ErrorCode::ParseError,
                format!("Invalid JSON-RPC request: {}", e),
            )));
        }
    };

    let id = match request.id {
        Some(id) => id,
        None => {
            eprintln!("Ignoring notification for method '{}'", request.method);
            return None;
        }
    };

    Some(serialize(dispatch(id, &request.method, request.params, service)))
}

fn dispatch<G: SoundGenerator>(
    id: Value,
    method: &str,
    params: Option<Value>,
    service: &SfxService<G>,
) -> Response {
    if method != METHOD_GENERATE_SFX {
        return Response::failure(
            id,
            ErrorCode::MethodNotFound,
            format!("Unknown tool: {}", method),
        );
    }

    let params = params.unwrap_or(Value::Null);
    let has_text = params
        .get("text")
        .map(|text| text.is_string())
        .unwrap_or(false);
    if !has_text {
        return Response::failure(
            id,
            ErrorCode::InvalidParams,
            "Missing or invalid 'text' parameter.",
        );
    }

    let request: GenerationRequest = match serde_json::from_value(params) {
        Ok(request) => request,
        Err(e) => {
            return Response::failure(
                id,
                ErrorCode::InvalidParams,
                format!("Invalid parameters: {}", e),
            );
        }
    };

    if request.text.trim().is_empty() {
        return Response::failure(
            id,
            ErrorCode::InvalidParams,
            "Missing or invalid 'text' parameter.",
        );
    }

    match service.generate(&request) {
        Ok(result) => Response::success(
            id,
            Value::String(result.absolute_path.display().to_string()),
        ),
        Err(e) => {
            let (code, message) = e.rpc_error();
            Response::failure(id, code, message)
        }
    }
}

fn serialize(response: Response) -> String {
    serde_json::to_string(&response).unwrap_or_else(|_| {
        // A response we built ourselves should always serialize; this is the
        // last-resort envelope if it somehow does not.
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"Failed to serialize response"}}}}"#,
            ErrorCode::InternalError.as_code()
        )
    })
}
