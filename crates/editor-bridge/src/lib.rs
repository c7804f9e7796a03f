//! # Editor Bridge
//!
//! Request/response correlation for a PDF editor embedded in a cross-origin
//! frame.
//!
//! ## Core Concepts
//!
//! The host and the editor only share an asynchronous, untyped message
//! channel. The bridge layers typed calls on top of it:
//! - [`Command`] = Intent (an instruction sent to the editor, tagged with a [`RequestId`])
//! - [`EditorEvent`] = Facts (what the editor reports: readiness, document
//!   loads, page focus, submissions, and the results of commands)
//!
//! Every command resolves exactly once: to its typed output, to the error the
//! editor reported, or to a locally produced error (timeout, cancellation,
//! missing frame).
//!
//! ## Architecture
//!
//! ```text
//! EmbedActions (go_to, create_field, submit, ...)
//!     │
//!     ▼ request()
//! Embed ─────────────────────────────────────────────┐
//!     │                                              │
//!     ├─► RequestId::generate()                      │
//!     ├─► CorrelationTable::register() ─► PendingResult
//!     ├─► command::encode()                          │   (deadline)
//!     │                                              │
//!     ▼                                              │
//! ReadinessGate ── not ready ──► FIFO queue          │
//!     │                             │ EDITOR_READY   │
//!     ▼ ready                       ▼                │
//! ContentWindow::post_message(payload, editor origin)│
//!                                                    │
//! MessageSource ─► on_message()                      │
//!     │  parse ─► origin check ─► source check       │
//!     │                                              │
//!     ├─► REQUEST_RESULT ─► CorrelationTable::resolve()
//!     ├─► EDITOR_READY / DOCUMENT_LOADED ─► gate + EventHandler
//!     └─► PAGE_FOCUSED / SUBMISSION_SENT ─► EventHandler
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Single resolution** - a pending request resolves once; late or
//!    duplicate results are dropped
//! 2. **Trust boundary** - inbound messages are honored only from the
//!    editor origin and the attached frame's window
//! 3. **Ordered delivery** - commands issued before readiness are sent in
//!    call order once the editor is ready
//! 4. **Per instance** - every [`Embed`] has its own table, gate and queue
//! 5. **No leaks** - resolved, timed-out, dropped and cancelled requests
//!   leave the table
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use editor_bridge::{Embed, EmbedActions, EmbedConfig, EditorEvent};
//!
//! let embed = Embed::builder(EmbedConfig::new().with_company_identifier("acme"))
//!     .on_event(|event: &EditorEvent| {
//!         tracing::info!(event = event.kind(), "editor event");
//!         Ok(())
//!     })
//!     .build(host.message_source());
//!
//! embed.attach(host.editor_frame());
//!
//! // Queued until the editor reports readiness.
//! embed.go_to(2).await?;
//! let content = embed.get_document_content(Default::default()).await?;
//!
//! embed.close();
//! ```

mod actions;
mod command;
mod command_macro;
mod config;
mod document;
mod embed;
mod error;
mod event;
mod gate;
mod handler;
mod id;
mod outcome;
mod pending;
mod transport;
mod wire;


// Re-export commands and their payload types
pub use command::{
    encode, ClearFields, ClearedFields, Command, CreateField, CreatedField, DocumentContent,
    ExtractionMode, FieldType, FieldValue, GetDocumentContent, GoTo, LoadDocument, PageContent,
    SelectTool, SubmitDocument,
};

// Re-export inbound event types
pub use event::{DocumentLoaded, EditorEvent, PageFocused, RequestResult, SubmissionSent};
pub use outcome::RequestOutcome;
pub use wire::WireMessage;

// Re-export error types
pub use error::{ActionError, ActionResult, BridgeError, ErrorCategory, ErrorCode};

// Re-export identifiers
pub use id::{InstanceId, RequestId};

// Re-export the embedding instance and its action surface
pub use actions::{EmbedActions, EmbedRef};
pub use embed::{Embed, EmbedBuilder};
pub use gate::Lifecycle;
pub use handler::EventHandler;

// Re-export configuration
pub use config::{
    DocumentSource, EmbedConfig, Locale, DEFAULT_DOCUMENT_LOADED_GRACE, DEFAULT_REQUEST_TIMEOUT,
};
pub use document::{extract_document_name, pdf_data_url};

// Re-export host seams
pub use transport::{
    ContentWindow, ListenerId, MessageEvent, MessageListener, MessageSource, Subscription,
    WindowId,
};

// Re-export commonly used external types
pub use async_trait::async_trait;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
