//! Outbound commands and their encoding.
//!
//! A command is a serializable payload plus compile-time metadata: the wire
//! `type`, whether it mutates the document, and how its success payload is
//! decoded. Encoding wraps the payload with its request id:
//!
//! ```text
//! {"type": "GO_TO", "data": {"page": 2}, "request_id": "1718000000000_k3j9x1"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::id::RequestId;
use crate::impl_command;

/// A typed instruction for the embedded editor.
pub trait Command: Serialize + Send + Sync + 'static {
    /// Wire `type` of the command.
    const TYPE: &'static str;

    /// Mutating commands wait for the document-loaded grace before sending.
    const MUTATING: bool = false;

    /// Payload of a successful result.
    type Output: Send + 'static;

    /// Decode the `data` of a successful result.
    fn decode_output(data: Option<Value>) -> Result<Self::Output, serde_json::Error>;
}

#[derive(Serialize)]
struct Envelope<'a, C> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a C,
    request_id: &'a RequestId,
}

/// Serialize a command and its request id into a transport string.
pub fn encode<C: Command>(command: &C, request_id: &RequestId) -> Result<String, BridgeError> {
    let envelope = Envelope {
        kind: C::TYPE,
        data: command,
        request_id,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Field and tool kinds offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    BoxedText,
    Checkbox,
    Picture,
    Signature,
}

impl FieldType {
    /// Wire name, e.g. `BOXED_TEXT`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::BoxedText => "BOXED_TEXT",
            FieldType::Checkbox => "CHECKBOX",
            FieldType::Picture => "PICTURE",
            FieldType::Signature => "SIGNATURE",
        }
    }
}

/// Initial value of a created field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
}

/// How page text is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    #[default]
    Auto,
    Ocr,
}

/// Load a document into the editor from a data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDocument {
    pub data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Focus a page (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoTo {
    pub page: u32,
}

/// Select a tool; `None` returns to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectTool {
    pub tool: Option<FieldType>,
}

/// Create a field at a position in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
}

/// Remove fields, all of them unless filtered by id or page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Extract the text content of every page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDocumentContent {
    pub extraction_mode: ExtractionMode,
}

/// Submit the document, optionally downloading a copy on the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitDocument {
    pub download_copy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedField {
    pub field_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedFields {
    pub cleared_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub page: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub name: String,
    pub pages: Vec<PageContent>,
}

impl_command!(LoadDocument, "LOAD_DOCUMENT");
impl_command!(GoTo, "GO_TO");
impl_command!(SelectTool, "SELECT_TOOL");
impl_command!(CreateField, "CREATE_FIELD" -> CreatedField, mutating);
impl_command!(ClearFields, "CLEAR_FIELDS" -> ClearedFields, mutating);
impl_command!(GetDocumentContent, "GET_DOCUMENT_CONTENT" -> DocumentContent);
impl_command!(SubmitDocument, "SUBMIT", mutating);
