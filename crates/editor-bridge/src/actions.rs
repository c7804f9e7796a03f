//! Typed action façade over an embedding instance.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::command::{
    ClearFields, ClearedFields, CreateField, CreatedField, DocumentContent, FieldType,
    GetDocumentContent, GoTo, LoadDocument, SelectTool, SubmitDocument,
};
use crate::embed::Embed;
use crate::error::{ActionError, ActionResult};

/// Operations available on an embedded editor.
///
/// Every action resolves exactly once, to either its output or an
/// [`ActionError`].
#[async_trait]
pub trait EmbedActions: Send + Sync {
    async fn load_document(&self, command: LoadDocument) -> ActionResult<()>;

    async fn go_to(&self, page: u32) -> ActionResult<()>;

    async fn select_tool(&self, tool: Option<FieldType>) -> ActionResult<()>;

    async fn create_field(&self, command: CreateField) -> ActionResult<CreatedField>;

    async fn clear_fields(&self, command: ClearFields) -> ActionResult<ClearedFields>;

    async fn get_document_content(
        &self,
        command: GetDocumentContent,
    ) -> ActionResult<DocumentContent>;

    async fn submit(&self, download_copy: bool) -> ActionResult<()>;
}

#[async_trait]
impl EmbedActions for Embed {
    async fn load_document(&self, command: LoadDocument) -> ActionResult<()> {
        self.request(command).await
    }

    async fn go_to(&self, page: u32) -> ActionResult<()> {
        self.request(GoTo { page }).await
    }

    async fn select_tool(&self, tool: Option<FieldType>) -> ActionResult<()> {
        self.request(SelectTool { tool }).await
    }

    async fn create_field(&self, command: CreateField) -> ActionResult<CreatedField> {
        self.request(command).await
    }

    async fn clear_fields(&self, command: ClearFields) -> ActionResult<ClearedFields> {
        self.request(command).await
    }

    async fn get_document_content(
        &self,
        command: GetDocumentContent,
    ) -> ActionResult<DocumentContent> {
        self.request(command).await
    }

    async fn submit(&self, download_copy: bool) -> ActionResult<()> {
        self.request(SubmitDocument { download_copy }).await
    }
}

/// Late-bound handle to an [`Embed`].
///
/// Lets callers hold on to the action surface before the instance exists;
/// actions fail with `bad_request:embed_ref_not_available` while it is empty.
#[derive(Clone, Default)]
pub struct EmbedRef {
    slot: Arc<RwLock<Option<Embed>>>,
}

impl EmbedRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, embed: Embed) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(embed);
    }

    /// Empty the handle, returning the instance it held.
    pub fn clear(&self) -> Option<Embed> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn get(&self) -> Option<Embed> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn current(&self) -> ActionResult<Embed> {
        self.get().ok_or_else(ActionError::embed_ref_not_available)
    }
}

#[async_trait]
impl EmbedActions for EmbedRef {
    async fn load_document(&self, command: LoadDocument) -> ActionResult<()> {
        self.current()?.load_document(command).await
    }

    async fn go_to(&self, page: u32) -> ActionResult<()> {
        self.current()?.go_to(page).await
    }

    async fn select_tool(&self, tool: Option<FieldType>) -> ActionResult<()> {
        self.current()?.select_tool(tool).await
    }

    async fn create_field(&self, command: CreateField) -> ActionResult<CreatedField> {
        self.current()?.create_field(command).await
    }

    async fn clear_fields(&self, command: ClearFields) -> ActionResult<ClearedFields> {
        self.current()?.clear_fields(command).await
    }

    async fn get_document_content(
        &self,
        command: GetDocumentContent,
    ) -> ActionResult<DocumentContent> {
        self.current()?.get_document_content(command).await
    }

    async fn submit(&self, download_copy: bool) -> ActionResult<()> {
        self.current()?.submit(download_copy).await
    }
}
