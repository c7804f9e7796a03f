use serde::Serialize;
use serde_json::{json, Value};

/// A tool as listed to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

const FIELD_TYPES: [&str; 5] = ["TEXT", "BOXED_TEXT", "CHECKBOX", "SIGNATURE", "PICTURE"];

pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "display_pdf",
            description: "Load and display a PDF document in the editor. The editor will be shown in the UI where users can view and interact with the document.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "URL of the PDF document to load" },
                    "name": { "type": "string", "description": "Display name for the document" },
                    "page": { "type": "integer", "minimum": 1, "description": "Initial page to display (1-indexed)" }
                },
                "required": ["url"]
            }),
        },
        Tool {
            name: "add_annotation",
            description: "Add an annotation (text, checkbox, signature, or picture) to the PDF document at a specific position.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": FIELD_TYPES, "description": "Type of annotation to add" },
                    "page": { "type": "integer", "minimum": 1, "description": "Page number (1-indexed)" },
                    "x": { "type": "number", "description": "X coordinate in PDF points from left" },
                    "y": { "type": "number", "description": "Y coordinate in PDF points from bottom" },
                    "width": { "type": "number", "exclusiveMinimum": 0, "description": "Width in PDF points" },
                    "height": { "type": "number", "exclusiveMinimum": 0, "description": "Height in PDF points" },
                    "value": { "type": "string", "description": "Initial value for the annotation" }
                },
                "required": ["type", "page", "x", "y", "width", "height"]
            }),
        },
        Tool {
            name: "extract_content",
            description: "Extract text content from the loaded PDF document. Returns the text content of each page.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "extraction_mode": {
                        "type": "string",
                        "enum": ["auto", "ocr"],
                        "default": "auto",
                        "description": "Extraction mode: auto or ocr"
                    }
                }
            }),
        },
        Tool {
            name: "navigate_page",
            description: "Navigate to a specific page in the PDF document.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page": { "type": "integer", "minimum": 1, "description": "Page number to navigate to (1-indexed)" }
                },
                "required": ["page"]
            }),
        },
        Tool {
            name: "submit_document",
            description: "Submit the document with all annotations. Optionally triggers a download of the filled PDF.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "download_copy": {
                        "type": "boolean",
                        "default": false,
                        "description": "Whether to trigger download of the filled PDF"
                    }
                }
            }),
        },
        Tool {
            name: "clear_annotations",
            description: "Clear annotations from the document. Can clear all annotations or specific ones by ID or page.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "field_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Specific field IDs to remove (omit to clear all)"
                    },
                    "page": { "type": "integer", "minimum": 1, "description": "Only clear fields on this page" }
                }
            }),
        },
    ]
}
