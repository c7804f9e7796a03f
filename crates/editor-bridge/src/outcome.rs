//! Wire shape of a request result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ActionError, ActionResult};

/// `{success: true, data?}` or `{success: false, error: {code, message}}`.
///
/// This is what travels inside `REQUEST_RESULT`. Callers of the façade see
/// the typed [`ActionResult`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

impl RequestOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn ok_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ActionError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Split into the untyped payload or the reported error.
    ///
    /// A failure without an error body is itself reported as a processing
    /// failure rather than silently treated as success.
    pub fn into_result(self) -> ActionResult<Option<Value>> {
        if self.success {
            return Ok(self.data);
        }
        Err(self.error.unwrap_or_else(|| {
            ActionError::failed_processing_request(
                "InvalidResult",
                "the editor reported a failure without an error body",
            )
        }))
    }

    /// Render a typed action result back into wire shape.
    pub fn from_result<T: Serialize>(result: &ActionResult<T>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(Value::Null) => Self::ok(),
                Ok(data) => Self::ok_with(data),
                Err(err) => Self::failure(ActionError::failed_processing_request(
                    "EncodeError",
                    err,
                )),
            },
            Err(err) => Self::failure(err.clone()),
        }
    }
}
