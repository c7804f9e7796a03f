//! Tool surface for assistants driving an embedded editor.
//!
//! Six tools, each a JSON-schema'd argument object mapped onto one
//! [`EmbedActions`](editor_bridge::EmbedActions) call:
//!
//! | tool                | action                  |
//! |---------------------|-------------------------|
//! | `display_pdf`       | editor URL with `open=` |
//! | `add_annotation`    | `create_field`          |
//! | `extract_content`   | `get_document_content`  |
//! | `navigate_page`     | `go_to`                 |
//! | `submit_document`   | `submit`                |
//! | `clear_annotations` | `clear_fields`          |
//!
//! Transport plumbing is left to the caller: [`tool_definitions`] feeds a
//! `tools/list` response and [`call_tool`] a `tools/call` response.

mod args;
mod definitions;
mod dispatch;
mod result;

pub use args::{
    AddAnnotationArgs, ArgumentError, ClearAnnotationsArgs, DisplayPdfArgs, ExtractContentArgs,
    NavigatePageArgs, SubmitDocumentArgs,
};
pub use definitions::{tool_definitions, Tool};
pub use dispatch::call_tool;
pub use result::{TextContent, ToolCallResult};
