//! User callback for unsolicited editor events.

use crate::event::EditorEvent;

/// Receives `EDITOR_READY`, `DOCUMENT_LOADED`, `PAGE_FOCUSED` and
/// `SUBMISSION_SENT` notifications.
///
/// Runs inside message delivery, so it must return quickly. Errors and
/// panics are logged by the bridge and never reach the transport.
pub trait EventHandler: Send + Sync + 'static {
    fn on_event(&self, event: &EditorEvent) -> anyhow::Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(&EditorEvent) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn on_event(&self, event: &EditorEvent) -> anyhow::Result<()> {
        self(event)
    }
}
