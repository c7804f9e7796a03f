//! JSON envelope shared by outbound commands and inbound events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RequestId;

/// `{"type": ..., "data": ..., "request_id"?: ...}` before any interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl WireMessage {
    /// Parse a raw transport string.
    ///
    /// Returns `None` for anything that is not a JSON object with a string
    /// `type`; host pages receive plenty of unrelated messages.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
