//! An in-process stand-in for the remote editor.

use std::sync::{Arc, Mutex, MutexGuard};

use editor_bridge::{
    ActionError, BridgeError, ClearFields, ClearedFields, ContentWindow, CreateField,
    CreatedField, DocumentContent, DocumentLoaded, EditorEvent, ErrorCategory, ErrorCode,
    FieldType, FieldValue, GoTo, LoadDocument, PageContent, PageFocused, RequestOutcome,
    RequestResult, SubmissionSent, WindowId, WireMessage,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A field created through `CREATE_FIELD`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedField {
    pub field_id: String,
    pub field_type: FieldType,
    pub page: u32,
    pub value: Option<FieldValue>,
}

struct EditorState {
    document_id: String,
    document_name: Option<String>,
    total_pages: u32,
    current_page: u32,
    fields: Vec<SimulatedField>,
    next_field: u32,
    next_submission: u32,
    silent: bool,
    submissions_enabled: bool,
    received: Vec<WireMessage>,
}

/// A frame that answers commands like the remote editor would.
///
/// Replies are delivered through the [`FakeHost`](crate::FakeHost) from a
/// spawned task, never inline, so `post_message` must be called from within
/// a tokio runtime.
pub struct SimulatedEditor {
    id: WindowId,
    host: Arc<crate::FakeHost>,
    origin: String,
    state: Mutex<EditorState>,
}

impl SimulatedEditor {
    /// An editor served from `origin` holding a three page document.
    pub fn new(host: Arc<crate::FakeHost>, origin: &str) -> Arc<Self> {
        Arc::new(Self {
            id: WindowId::next(),
            host,
            origin: origin.to_owned(),
            state: Mutex::new(EditorState {
                document_id: "doc_simulated".to_owned(),
                document_name: None,
                total_pages: 3,
                current_page: 1,
                fields: Vec::new(),
                next_field: 1,
                next_submission: 1,
                silent: false,
                submissions_enabled: true,
                received: Vec::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap()
    }

    pub fn window_id(&self) -> WindowId {
        self.id
    }

    pub fn set_total_pages(&self, total_pages: u32) {
        self.state().total_pages = total_pages.max(1);
    }

    /// Keep recording commands but stop answering them.
    pub fn set_silent(&self, silent: bool) {
        self.state().silent = silent;
    }

    /// Answer `SUBMIT` with `forbidden:submission_disabled`.
    pub fn disable_submissions(&self) {
        self.state().submissions_enabled = false;
    }

    /// Announce readiness to the host.
    pub fn ready(&self) {
        self.emit(&EditorEvent::EditorReady);
    }

    /// Announce a loaded document to the host.
    pub fn document_loaded(&self) {
        let document_id = self.state().document_id.clone();
        self.emit(&EditorEvent::DocumentLoaded(DocumentLoaded { document_id }));
    }

    /// Deliver `event` synchronously, from this editor's window and origin.
    pub fn emit(&self, event: &EditorEvent) {
        self.host.deliver(&self.origin, Some(self.id), event.to_wire());
    }

    pub fn fields(&self) -> Vec<SimulatedField> {
        self.state().fields.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.state().current_page
    }

    /// Every command received so far, answered or not.
    pub fn received(&self) -> Vec<WireMessage> {
        self.state().received.clone()
    }

    pub fn received_types(&self) -> Vec<String> {
        self.state().received.iter().map(|msg| msg.kind.clone()).collect()
    }

    fn handle(&self, msg: WireMessage) -> Vec<EditorEvent> {
        let mut state = self.state();
        state.received.push(msg.clone());
        if state.silent {
            return Vec::new();
        }
        let Some(request_id) = msg.request_id else {
            return Vec::new();
        };

        let mut followups = Vec::new();
        let result = match msg.kind.as_str() {
            "LOAD_DOCUMENT" => decode::<LoadDocument>(msg.data).map(|cmd| {
                let total_pages = state.total_pages;
                state.document_name = cmd.name;
                state.current_page = cmd.page.unwrap_or(1).clamp(1, total_pages);
                state.fields.clear();
                followups.push(EditorEvent::DocumentLoaded(DocumentLoaded {
                    document_id: state.document_id.clone(),
                }));
                RequestOutcome::ok()
            }),
            "GO_TO" => decode::<GoTo>(msg.data).map(|GoTo { page }| {
                if page == 0 || page > state.total_pages {
                    return RequestOutcome::failure(ActionError::new(
                        ErrorCode::new(ErrorCategory::BadRequest, "page_out_of_range"),
                        format!("Page {page} does not exist"),
                    ));
                }
                let previous_page = state.current_page;
                state.current_page = page;
                followups.push(EditorEvent::PageFocused(PageFocused {
                    previous_page: Some(previous_page),
                    current_page: page,
                    total_pages: state.total_pages,
                }));
                RequestOutcome::ok()
            }),
            "SELECT_TOOL" => Ok(RequestOutcome::ok()),
            "CREATE_FIELD" => decode::<CreateField>(msg.data).map(|cmd| {
                let field_id = format!("f_{}", state.next_field);
                state.next_field += 1;
                state.fields.push(SimulatedField {
                    field_id: field_id.clone(),
                    field_type: cmd.field_type,
                    page: cmd.page,
                    value: cmd.value,
                });
                success(&CreatedField { field_id })
            }),
            "CLEAR_FIELDS" => decode::<ClearFields>(msg.data).map(|cmd| {
                let before = state.fields.len();
                state.fields.retain(|field| {
                    let id_matches = cmd
                        .field_ids
                        .as_ref()
                        .map_or(true, |ids| ids.contains(&field.field_id));
                    let page_matches = cmd.page.map_or(true, |page| page == field.page);
                    !(id_matches && page_matches)
                });
                let cleared_count = (before - state.fields.len()) as u32;
                success(&ClearedFields { cleared_count })
            }),
            "GET_DOCUMENT_CONTENT" => {
                let pages = (1..=state.total_pages)
                    .map(|page| PageContent {
                        page,
                        content: page_text(&state.fields, page),
                    })
                    .collect();
                let name = state
                    .document_name
                    .clone()
                    .unwrap_or_else(|| "document.pdf".to_owned());
                Ok(success(&DocumentContent { name, pages }))
            }
            "SUBMIT" => {
                if state.submissions_enabled {
                    let submission_id = format!("sub_{}", state.next_submission);
                    state.next_submission += 1;
                    followups.push(EditorEvent::SubmissionSent(SubmissionSent {
                        document_id: Some(state.document_id.clone()),
                        submission_id,
                    }));
                    Ok(RequestOutcome::ok())
                } else {
                    Ok(RequestOutcome::failure(ActionError::new(
                        ErrorCode::new(ErrorCategory::Forbidden, "submission_disabled"),
                        "Submissions are disabled for this editor",
                    )))
                }
            }
            other => Ok(RequestOutcome::failure(ActionError::new(
                ErrorCode::new(ErrorCategory::BadRequest, "unknown_command"),
                format!("Unknown command: {other}"),
            ))),
        };

        let result = result.unwrap_or_else(|err| {
            RequestOutcome::failure(ActionError::new(
                ErrorCode::new(ErrorCategory::BadRequest, "invalid_data"),
                err.to_string(),
            ))
        });

        let mut replies = vec![EditorEvent::RequestResult(RequestResult { request_id, result })];
        replies.extend(followups);
        replies
    }
}

impl ContentWindow for SimulatedEditor {
    fn id(&self) -> WindowId {
        self.id
    }

    fn post_message(&self, message: &str, target_origin: &str) -> Result<(), BridgeError> {
        if target_origin != self.origin {
            tracing::debug!(target_origin, origin = %self.origin, "message for another origin dropped");
            return Ok(());
        }
        let Some(msg) = WireMessage::parse(message) else {
            return Ok(());
        };

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| BridgeError::Transport(err.to_string()))?;
        let replies = self.handle(msg);
        if replies.is_empty() {
            return Ok(());
        }

        let host = self.host.clone();
        let origin = self.origin.clone();
        let source = Some(self.id);
        runtime.spawn(async move {
            for reply in replies {
                host.deliver(&origin, source, reply.to_wire());
            }
        });
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}

fn success<T: Serialize>(data: &T) -> RequestOutcome {
    RequestOutcome::from_result(&Ok(data))
}

fn page_text(fields: &[SimulatedField], page: u32) -> String {
    let mut text = format!("Page {page}");
    for field in fields.iter().filter(|field| field.page == page) {
        if let Some(FieldValue::Text(value)) = &field.value {
            text.push('\n');
            text.push_str(value);
        }
    }
    text
}
