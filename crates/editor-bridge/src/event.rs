//! Events received from the embedded editor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::RequestId;
use crate::outcome::RequestOutcome;
use crate::wire::WireMessage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLoaded {
    pub document_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFocused {
    #[serde(default)]
    pub previous_page: Option<u32>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSent {
    #[serde(default)]
    pub document_id: Option<String>,
    pub submission_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResult {
    pub request_id: RequestId,
    pub result: RequestOutcome,
}

/// A message from the editor, after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    EditorReady,
    DocumentLoaded(DocumentLoaded),
    PageFocused(PageFocused),
    SubmissionSent(SubmissionSent),
    RequestResult(RequestResult),
}

impl EditorEvent {
    /// Wire `type` of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            EditorEvent::EditorReady => "EDITOR_READY",
            EditorEvent::DocumentLoaded(_) => "DOCUMENT_LOADED",
            EditorEvent::PageFocused(_) => "PAGE_FOCUSED",
            EditorEvent::SubmissionSent(_) => "SUBMISSION_SENT",
            EditorEvent::RequestResult(_) => "REQUEST_RESULT",
        }
    }

    /// Decode a raw transport string.
    ///
    /// Never fails loudly: malformed JSON, unknown types and payloads that do
    /// not match their type all yield `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        let msg = WireMessage::parse(raw)?;
        Self::from_wire(msg)
    }

    fn from_wire(msg: WireMessage) -> Option<Self> {
        let event = match msg.kind.as_str() {
            "EDITOR_READY" => EditorEvent::EditorReady,
            "DOCUMENT_LOADED" => EditorEvent::DocumentLoaded(payload(msg.data)?),
            "PAGE_FOCUSED" => EditorEvent::PageFocused(payload(msg.data)?),
            "SUBMISSION_SENT" => EditorEvent::SubmissionSent(payload(msg.data)?),
            "REQUEST_RESULT" => EditorEvent::RequestResult(payload(msg.data)?),
            other => {
                tracing::trace!(kind = other, "ignoring unrecognized editor message");
                return None;
            }
        };
        Some(event)
    }

    /// Encode back into wire form, mainly for test doubles.
    pub fn to_wire(&self) -> String {
        let data = match self {
            EditorEvent::EditorReady => Ok(Value::Object(Default::default())),
            EditorEvent::DocumentLoaded(data) => serde_json::to_value(data),
            EditorEvent::PageFocused(data) => serde_json::to_value(data),
            EditorEvent::SubmissionSent(data) => serde_json::to_value(data),
            EditorEvent::RequestResult(data) => serde_json::to_value(data),
        };
        let msg = WireMessage {
            kind: self.kind().to_owned(),
            data: data.unwrap_or(Value::Null),
            request_id: None,
        };
        serde_json::to_string(&msg).unwrap_or_default()
    }
}

fn payload<T: serde::de::DeserializeOwned>(data: Value) -> Option<T> {
    match serde_json::from_value(data) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "discarding editor message with malformed payload");
            None
        }
    }
}
