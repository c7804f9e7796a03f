//! Error codes, action errors and internal bridge failures.
//!
//! Every public action resolves to an [`ActionResult`]; nothing on the
//! action path panics or escapes as an internal error. Internal failures are
//! expressed as [`BridgeError`] and converted into an [`ActionError`] with an
//! `unexpected:*` code at the façade boundary.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a façade action.
pub type ActionResult<T> = Result<T, ActionError>;

/// Category prefix of an [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller-side misuse.
    BadRequest,
    /// Runtime or environment failure.
    Unexpected,
    /// Denied by the editor's own policy.
    Forbidden,
}

impl ErrorCategory {
    /// Wire prefix for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::BadRequest => "bad_request",
            ErrorCategory::Unexpected => "unexpected",
            ErrorCategory::Forbidden => "forbidden",
        }
    }
}

/// Namespaced error code of the form `<category>:<reason>`.
///
/// Codes coming from the editor are kept verbatim even when their category
/// is not one we know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    pub const EMBED_REF_NOT_AVAILABLE: ErrorCode =
        ErrorCode(Cow::Borrowed("bad_request:embed_ref_not_available"));
    pub const IFRAME_NOT_AVAILABLE: ErrorCode =
        ErrorCode(Cow::Borrowed("unexpected:iframe_not_available"));
    pub const REQUEST_TIMED_OUT: ErrorCode =
        ErrorCode(Cow::Borrowed("unexpected:request_timed_out"));
    pub const REQUEST_CANCELLED: ErrorCode =
        ErrorCode(Cow::Borrowed("unexpected:request_cancelled"));
    pub const FAILED_PROCESSING_REQUEST: ErrorCode =
        ErrorCode(Cow::Borrowed("unexpected:failed_processing_request"));

    /// Build a code from a category and a reason.
    pub fn new(category: ErrorCategory, reason: &str) -> Self {
        Self(Cow::Owned(format!("{}:{reason}", category.as_str())))
    }

    /// The full code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The category prefix, if it is a known one.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self.0.split_once(':')?.0 {
            "bad_request" => Some(ErrorCategory::BadRequest),
            "unexpected" => Some(ErrorCategory::Unexpected),
            "forbidden" => Some(ErrorCategory::Forbidden),
            _ => None,
        }
    }

    /// The part after the category prefix.
    pub fn reason(&self) -> &str {
        let code: &str = &self.0;
        code.split_once(':').map_or(code, |(_, reason)| reason)
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure outcome of an action, as reported by the editor or produced locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ActionError {
    pub code: ErrorCode,
    pub message: String,
}

impl ActionError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An action was invoked through a ref that no embed is attached to.
    pub fn embed_ref_not_available() -> Self {
        Self::new(
            ErrorCode::EMBED_REF_NOT_AVAILABLE,
            "embed ref is not available: attach an embed to the ref before invoking actions",
        )
    }

    /// No frame is attached to the embedding instance.
    pub fn iframe_not_available() -> Self {
        Self::new(ErrorCode::IFRAME_NOT_AVAILABLE, "Iframe not available")
    }

    /// No result arrived before the request deadline.
    pub fn request_timed_out() -> Self {
        Self::new(
            ErrorCode::REQUEST_TIMED_OUT,
            "The request timed out: try again",
        )
    }

    /// The instance was closed, detached or remounted while the request was pending.
    pub fn request_cancelled() -> Self {
        Self::new(
            ErrorCode::REQUEST_CANCELLED,
            "The request was cancelled: the editor was closed",
        )
    }

    /// The request could not be built, sent or its result understood.
    pub fn failed_processing_request(name: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::FAILED_PROCESSING_REQUEST,
            format!("The following error happened: {name}:{detail}"),
        )
    }

    /// Whether this error belongs to the given category.
    pub fn is(&self, category: ErrorCategory) -> bool {
        self.code.category() == Some(category)
    }
}

/// Internal failures on the send path.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The command payload could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),

    /// The content window refused the message.
    #[error("content window rejected the message: {0}")]
    Transport(String),

    /// The frame the request was issued against is gone.
    #[error("frame was detached before the command could be sent")]
    Detached,
}

impl BridgeError {
    fn name(&self) -> &'static str {
        match self {
            BridgeError::Encode(_) => "EncodeError",
            BridgeError::Transport(_) => "TransportError",
            BridgeError::Detached => "DetachedError",
        }
    }
}

impl From<BridgeError> for ActionError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Detached => ActionError::request_cancelled(),
            other => ActionError::failed_processing_request(other.name(), &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_error_matches_wire_text() {
        let err = ActionError::request_timed_out();
        assert_eq!(err.code.as_str(), "unexpected:request_timed_out");
        assert_eq!(err.message, "The request timed out: try again");
        assert!(err.is(ErrorCategory::Unexpected));
    }

    #[test]
    fn error_code_splits_category_and_reason() {
        let code = ErrorCode::from("forbidden:not_allowed".to_owned());
        assert_eq!(code.category(), Some(ErrorCategory::Forbidden));
        assert_eq!(code.reason(), "not_allowed");

        let unknown = ErrorCode::from("weird".to_owned());
        assert_eq!(unknown.category(), None);
        assert_eq!(unknown.reason(), "weird");
    }

    #[test]
    fn error_code_built_from_parts() {
        let code = ErrorCode::new(ErrorCategory::BadRequest, "page_out_of_range");
        assert_eq!(code.as_str(), "bad_request:page_out_of_range");
    }

    #[test]
    fn action_error_display() {
        let err = ActionError::iframe_not_available();
        assert_eq!(
            err.to_string(),
            "unexpected:iframe_not_available: Iframe not available"
        );
    }

    #[test]
    fn encode_failure_maps_to_failed_processing_request() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ActionError = BridgeError::from(json_err).into();
        assert_eq!(err.code, ErrorCode::FAILED_PROCESSING_REQUEST);
        assert!(err
            .message
            .starts_with("The following error happened: EncodeError:"));
    }

    #[test]
    fn detached_maps_to_cancelled() {
        let err: ActionError = BridgeError::Detached.into();
        assert_eq!(err.code, ErrorCode::REQUEST_CANCELLED);
    }

    const _: () = {
        #[allow(dead_code)]
        fn assert_send_sync<T: Send + Sync>() {}

        #[allow(dead_code)]
        fn check() {
            assert_send_sync::<ActionError>();
            assert_send_sync::<BridgeError>();
        }
    };
}
