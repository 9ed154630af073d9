//! The JSON response envelope returned by the call-server route.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every response produced by the call-server route.
///
/// Exactly one shape is ever emitted: a success with `message` and `data`,
/// or a failure with `error` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    Success { message: String, data: Value },
    Failure { error: String },
}

impl Envelope {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Envelope::Success {
            message: message.into(),
            data,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Envelope::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}
