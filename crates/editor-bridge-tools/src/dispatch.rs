use std::fmt::Write as _;

use editor_bridge::{
    ActionError, Command, DocumentSource, EmbedActions, EmbedConfig, GetDocumentContent,
    LoadDocument,
};
use serde_json::{json, Value};

use crate::args::{
    parse, AddAnnotationArgs, ArgumentError, ClearAnnotationsArgs, DisplayPdfArgs,
    ExtractContentArgs, NavigatePageArgs, SubmitDocumentArgs,
};
use crate::result::{TextContent, ToolCallResult};

/// Run tool `name` with `arguments` against `actions`.
///
/// Never fails: invalid arguments, unknown tools and action failures are
/// reported as error results.
pub async fn call_tool(
    actions: &dyn EmbedActions,
    config: &EmbedConfig,
    name: &str,
    arguments: Option<Value>,
) -> ToolCallResult {
    tracing::debug!(tool = name, "tool call");
    match name {
        "display_pdf" => match parse::<DisplayPdfArgs>(arguments) {
            Ok(args) => display_pdf(config, args),
            Err(err) => invalid(name, err),
        },
        "add_annotation" => match parse::<AddAnnotationArgs>(arguments) {
            Ok(args) => add_annotation(actions, args).await,
            Err(err) => invalid(name, err),
        },
        "extract_content" => match parse::<ExtractContentArgs>(arguments) {
            Ok(args) => extract_content(actions, args).await,
            Err(err) => invalid(name, err),
        },
        "navigate_page" => match parse::<NavigatePageArgs>(arguments) {
            Ok(args) => match actions.go_to(args.page).await {
                Ok(()) => ToolCallResult::text(format!("Navigated to page {}.", args.page)),
                Err(err) => failed(name, err),
            },
            Err(err) => invalid(name, err),
        },
        "submit_document" => match parse::<SubmitDocumentArgs>(arguments) {
            Ok(args) => match actions.submit(args.download_copy).await {
                Ok(()) if args.download_copy => ToolCallResult::text(
                    "Document submitted.\n\nA copy will be downloaded to your device.",
                ),
                Ok(()) => ToolCallResult::text("Document submitted."),
                Err(err) => failed(name, err),
            },
            Err(err) => invalid(name, err),
        },
        "clear_annotations" => match parse::<ClearAnnotationsArgs>(arguments) {
            Ok(args) => clear_annotations(actions, args).await,
            Err(err) => invalid(name, err),
        },
        other => {
            tracing::warn!(tool = other, "unknown tool");
            ToolCallResult::error(format!("Unknown tool: {other}"))
        }
    }
}

fn invalid(tool: &str, err: ArgumentError) -> ToolCallResult {
    tracing::debug!(tool, error = %err, "invalid tool arguments");
    ToolCallResult::error(format!("Invalid arguments: {err}"))
}

fn failed(tool: &str, err: ActionError) -> ToolCallResult {
    tracing::warn!(tool, code = %err.code, "tool action failed");
    ToolCallResult::error(format!(
        "The editor could not complete {tool}.\n\nError code: {}\nMessage: {}",
        err.code, err.message
    ))
}

fn display_pdf(config: &EmbedConfig, args: DisplayPdfArgs) -> ToolCallResult {
    let url = match config.editor_url(&DocumentSource::Open(args.url.clone())) {
        Ok(url) => url,
        Err(err) => return ToolCallResult::error(format!("Invalid editor configuration: {err}")),
    };
    let document = args.name.as_deref().unwrap_or(&args.url);
    let mut summary = format!("PDF ready to view in the editor.\n\nDocument: {document}");
    if let Some(page) = args.page {
        let _ = write!(summary, "\nInitial page: {page}");
    }
    let _ = write!(summary, "\nEditor URL: {url}");

    // The view replays this as a LOAD_DOCUMENT once its editor is ready.
    let load = LoadDocument {
        data_url: args.url,
        name: args.name,
        page: args.page,
    };
    let action = json!({ "action": LoadDocument::TYPE, "data": load });

    let mut result = ToolCallResult::text(summary);
    result.content.push(TextContent {
        text: action.to_string(),
    });
    result
}

async fn add_annotation(actions: &dyn EmbedActions, args: AddAnnotationArgs) -> ToolCallResult {
    let command = args.into_command();
    let summary = format!(
        "Type: {}\nPage: {}\nPosition: ({}, {})\nSize: {}x{}",
        command.field_type.as_str(),
        command.page,
        command.x,
        command.y,
        command.width,
        command.height
    );
    match actions.create_field(command).await {
        Ok(created) => ToolCallResult::text(format!(
            "Annotation added.\n\nField ID: {}\n{summary}",
            created.field_id
        )),
        Err(err) => failed("add_annotation", err),
    }
}

async fn extract_content(actions: &dyn EmbedActions, args: ExtractContentArgs) -> ToolCallResult {
    let command = GetDocumentContent {
        extraction_mode: args.extraction_mode,
    };
    match actions.get_document_content(command).await {
        Ok(content) => {
            let mut text = format!("Document: {}\nPages: {}\n", content.name, content.pages.len());
            for page in &content.pages {
                let _ = write!(text, "\n--- Page {} ---\n{}\n", page.page, page.content);
            }
            ToolCallResult::text(text)
        }
        Err(err) => failed("extract_content", err),
    }
}

async fn clear_annotations(
    actions: &dyn EmbedActions,
    args: ClearAnnotationsArgs,
) -> ToolCallResult {
    let scope = args.scope();
    match actions.clear_fields(args.into_command()).await {
        Ok(cleared) => ToolCallResult::text(format!(
            "Cleared {} annotation(s).\n\nScope: {scope}",
            cleared.cleared_count
        )),
        Err(err) => failed("clear_annotations", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use editor_bridge::{
        ActionResult, ClearFields, ClearedFields, CreateField, CreatedField, DocumentContent,
        FieldType, FieldValue, LoadDocument, PageContent,
    };
    use serde_json::json;

    #[derive(Default)]
    struct StubActions {
        calls: Mutex<Vec<String>>,
        fail_with: Option<ActionError>,
    }

    impl StubActions {
        fn record(&self, call: String) -> ActionResult<()> {
            self.calls.lock().unwrap().push(call);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmbedActions for StubActions {
        async fn load_document(&self, command: LoadDocument) -> ActionResult<()> {
            self.record(format!("load_document {:?}", command.name))
        }

        async fn go_to(&self, page: u32) -> ActionResult<()> {
            self.record(format!("go_to {page}"))
        }

        async fn select_tool(&self, tool: Option<FieldType>) -> ActionResult<()> {
            self.record(format!("select_tool {tool:?}"))
        }

        async fn create_field(&self, command: CreateField) -> ActionResult<CreatedField> {
            self.record(format!("create_field {:?} {:?}", command.field_type, command.value))?;
            Ok(CreatedField {
                field_id: "f_7".into(),
            })
        }

        async fn clear_fields(&self, command: ClearFields) -> ActionResult<ClearedFields> {
            self.record(format!("clear_fields {:?} {:?}", command.field_ids, command.page))?;
            Ok(ClearedFields { cleared_count: 2 })
        }

        async fn get_document_content(
            &self,
            command: GetDocumentContent,
        ) -> ActionResult<DocumentContent> {
            self.record(format!("get_document_content {:?}", command.extraction_mode))?;
            Ok(DocumentContent {
                name: "form.pdf".into(),
                pages: vec![
                    PageContent {
                        page: 1,
                        content: "Name:".into(),
                    },
                    PageContent {
                        page: 2,
                        content: "Signature:".into(),
                    },
                ],
            })
        }

        async fn submit(&self, download_copy: bool) -> ActionResult<()> {
            self.record(format!("submit {download_copy}"))
        }
    }

    async fn call(actions: &StubActions, name: &str, arguments: Value) -> ToolCallResult {
        call_tool(actions, &EmbedConfig::new(), name, Some(arguments)).await
    }

    #[tokio::test]
    async fn display_pdf_returns_editor_url() {
        let actions = StubActions::default();
        let result = call(
            &actions,
            "display_pdf",
            json!({ "url": "https://example.com/form.pdf", "name": "Form" }),
        )
        .await;

        assert!(!result.is_error);
        let text = result.joined_text();
        assert!(text.contains("Document: Form"));
        assert!(text.contains(
            "https://react-editor.simplepdf.com/en/editor?open=https%3A%2F%2Fexample.com%2Fform.pdf"
        ));
        assert!(actions.calls().is_empty());
    }

    #[tokio::test]
    async fn display_pdf_carries_initial_page() {
        let actions = StubActions::default();
        let url = "https://example.com/form.pdf";
        let with_page = call(&actions, "display_pdf", json!({ "url": url, "page": 3 })).await;
        let without_page = call(&actions, "display_pdf", json!({ "url": url })).await;

        assert_ne!(with_page, without_page);
        assert!(with_page.joined_text().contains("Initial page: 3"));
        let action: Value = serde_json::from_str(&with_page.content[1].text).unwrap();
        assert_eq!(
            action,
            json!({ "action": "LOAD_DOCUMENT", "data": { "data_url": url, "page": 3 } })
        );
        let action: Value = serde_json::from_str(&without_page.content[1].text).unwrap();
        assert_eq!(action["data"], json!({ "data_url": url }));
    }

    #[tokio::test]
    async fn add_annotation_creates_a_field() {
        let actions = StubActions::default();
        let result = call(
            &actions,
            "add_annotation",
            json!({
                "type": "TEXT", "page": 1, "x": 72, "y": 700,
                "width": 200, "height": 18, "value": "Jane Doe"
            }),
        )
        .await;

        assert!(!result.is_error);
        assert!(result.joined_text().contains("Field ID: f_7"));
        assert_eq!(
            actions.calls(),
            vec![format!(
                "create_field {:?} {:?}",
                FieldType::Text,
                Some(FieldValue::Text("Jane Doe".into()))
            )]
        );
    }

    #[tokio::test]
    async fn extract_content_lists_pages() {
        let actions = StubActions::default();
        let result = call(&actions, "extract_content", json!({})).await;

        let text = result.joined_text();
        assert!(text.starts_with("Document: form.pdf\nPages: 2\n"));
        assert!(text.contains("--- Page 2 ---\nSignature:"));
        assert_eq!(actions.calls(), vec!["get_document_content Auto"]);
    }

    #[tokio::test]
    async fn navigate_and_submit() {
        let actions = StubActions::default();
        assert!(!call(&actions, "navigate_page", json!({ "page": 3 })).await.is_error);
        let submitted = call(&actions, "submit_document", json!({ "download_copy": true })).await;
        assert!(submitted.joined_text().contains("downloaded"));
        assert_eq!(actions.calls(), vec!["go_to 3", "submit true"]);
    }

    #[tokio::test]
    async fn clear_annotations_reports_scope() {
        let actions = StubActions::default();
        let result = call(&actions, "clear_annotations", json!({ "page": 2 })).await;
        assert_eq!(
            result.joined_text(),
            "Cleared 2 annotation(s).\n\nScope: All fields on page 2"
        );
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_editor() {
        let actions = StubActions::default();
        let result = call(&actions, "navigate_page", json!({ "page": 0 })).await;

        assert!(result.is_error);
        assert_eq!(
            result.joined_text(),
            "Invalid arguments: page must be a positive integer"
        );
        assert!(actions.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let actions = StubActions::default();
        let result = call_tool(&actions, &EmbedConfig::new(), "rotate_page", None).await;
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Unknown tool: rotate_page");
    }

    #[tokio::test]
    async fn action_failures_carry_code_and_message() {
        let actions = StubActions {
            fail_with: Some(ActionError::request_timed_out()),
            ..StubActions::default()
        };
        let result = call(&actions, "submit_document", json!({})).await;

        assert!(result.is_error);
        let text = result.joined_text();
        assert!(text.contains("Error code: unexpected:request_timed_out"));
        assert!(text.contains("Message: The request timed out: try again"));
    }
}
