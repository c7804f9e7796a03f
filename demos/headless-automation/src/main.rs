//! # Headless Automation Example
//!
//! Fills a document from a JSON automation config by driving an editor
//! through the bridge: load, clear, create every field, extract, submit.
//! The editor is simulated in-process, so this runs without a browser.
//!
//! ```text
//! cargo run -p headless-automation-demo -- automation.json
//! RUST_LOG=editor_bridge=debug cargo run -p headless-automation-demo
//! ```
//!
//! Config shape:
//!
//! ```json
//! {
//!   "document": "https://example.com/form.pdf",
//!   "fields": [
//!     { "type": "TEXT", "x": 72, "y": 700, "width": 200, "height": 18, "page": 1, "value": "Jane Doe" },
//!     { "type": "CHECKBOX", "x": 72, "y": 650, "width": 12, "height": 12, "page": 1, "value": true }
//!   ]
//! }
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use editor_bridge::{
    ClearFields, CreateField, DocumentSource, EditorEvent, Embed, EmbedActions, EmbedConfig,
    FieldType, FieldValue, LoadDocument, RequestOutcome,
};
use editor_bridge_testing::{FakeHost, SimulatedEditor};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Deserialize)]
struct AutomationConfig {
    /// URL or local path of the PDF
    document: String,
    fields: Vec<FieldConfig>,
}

#[derive(Debug, Deserialize)]
struct FieldConfig {
    #[serde(rename = "type")]
    field_type: FieldType,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    page: u32,
    #[serde(default)]
    value: Option<FieldValue>,
}

impl FieldConfig {
    fn validate(&self, index: usize) -> Result<()> {
        if self.page == 0 {
            bail!("fields[{index}].page must be a positive integer");
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            bail!("fields[{index}] must have a positive width and height");
        }
        Ok(())
    }

    fn to_command(&self) -> CreateField {
        CreateField {
            field_type: self.field_type,
            page: self.page,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            value: self.value.clone(),
        }
    }
}

const SAMPLE_CONFIG: &str = r#"{
  "document": "https://example.com/forms/w9.pdf",
  "fields": [
    { "type": "TEXT", "x": 72, "y": 700, "width": 200, "height": 18, "page": 1, "value": "Jane Doe" },
    { "type": "BOXED_TEXT", "x": 72, "y": 660, "width": 120, "height": 18, "page": 1, "value": "123456789" },
    { "type": "CHECKBOX", "x": 72, "y": 620, "width": 12, "height": 12, "page": 1, "value": true },
    { "type": "SIGNATURE", "x": 72, "y": 120, "width": 180, "height": 40, "page": 2, "value": "Jane Doe" }
  ]
}"#;

async fn load_config() -> Result<AutomationConfig> {
    let raw = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read automation config {path}"))?,
        None => SAMPLE_CONFIG.to_owned(),
    };
    let config: AutomationConfig =
        serde_json::from_str(&raw).context("invalid automation config")?;
    for (index, field) in config.fields.iter().enumerate() {
        field.validate(index)?;
    }
    Ok(config)
}

/// Local files are read; anything else gets placeholder bytes since this
/// demo does not fetch over the network.
async fn document_bytes(document: &str) -> Vec<u8> {
    match tokio::fs::read(document).await {
        Ok(bytes) => bytes,
        Err(_) => b"%PDF-1.7\n% headless automation placeholder\n".to_vec(),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config().await?;
    let embed_config = EmbedConfig::new().with_company_identifier("automation");
    let editor_url = embed_config.editor_url(&DocumentSource::Command)?;
    tracing::info!(%editor_url, fields = config.fields.len(), "starting automation");

    let host = FakeHost::new();
    let embed = Embed::builder(embed_config)
        .on_event(|event: &EditorEvent| {
            tracing::info!(event = event.kind(), "editor event");
            Ok(())
        })
        .build(host.clone());

    let editor = SimulatedEditor::new(Arc::clone(&host), embed.editor_origin());
    embed.attach(editor.clone());
    editor.ready();

    let bytes = document_bytes(&config.document).await;
    embed
        .load_document(LoadDocument::from_bytes(&bytes, &config.document))
        .await
        .context("document_load_failed")?;

    let cleared = embed
        .clear_fields(ClearFields::default())
        .await
        .context("clear_fields_failed")?;
    tracing::info!(cleared = cleared.cleared_count, "cleared existing fields");

    for (index, field) in config.fields.iter().enumerate() {
        let created = embed
            .create_field(field.to_command())
            .await
            .with_context(|| format!("field_creation_failed: fields[{index}]"))?;
        tracing::info!(field_id = %created.field_id, field_type = field.field_type.as_str(), "field created");
    }

    let content = embed.get_document_content(Default::default()).await;
    if let Ok(content) = &content {
        for page in &content.pages {
            println!("--- {} page {} ---\n{}", content.name, page.page, page.content);
        }
    }

    let submitted = embed.submit(false).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&RequestOutcome::from_result(&submitted))?
    );

    embed.close();
    Ok(())
}
