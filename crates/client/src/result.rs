//! Uniform backend result envelope.

use serde::Deserialize;
use serde_json::Value;

/// The backend's uniform response envelope.
///
/// Transport failures are folded into the same shape with code 500,
/// so callers branch on `code` rather than on exceptions. Any non-200
/// code is a soft failure: logged, the operation skipped, the turn
/// unaffected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResult {
    /// Application-level status code; 200 is success.
    pub code: i64,

    /// Human-readable backend message.
    #[serde(default)]
    pub message: String,

    /// Operation-specific response data.
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiResult {
    /// Whether the operation succeeded.
    pub fn ok(&self) -> bool {
        self.code == 200
    }

    /// A success result carrying the given data.
    pub fn success(data: Value) -> Self {
        Self {
            code: 200,
            message: String::new(),
            data: Some(data),
        }
    }

    /// A soft-failure result for an exhausted or failed transport call.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            data: None,
        }
    }
}
