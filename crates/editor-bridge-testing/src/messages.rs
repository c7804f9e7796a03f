//! Raw editor messages for hand-driven tests.

use editor_bridge::{EditorEvent, RequestId, RequestOutcome, RequestResult};

pub fn editor_ready() -> String {
    EditorEvent::EditorReady.to_wire()
}

pub fn request_result(request_id: &RequestId, result: RequestOutcome) -> String {
    EditorEvent::RequestResult(RequestResult {
        request_id: request_id.clone(),
        result,
    })
    .to_wire()
}
