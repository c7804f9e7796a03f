//! Seams to the host environment: the editor frame and the message bus.
//!
//! The bridge never touches a real browser. A host adapter provides a
//! [`ContentWindow`] for the frame that hosts the editor and a
//! [`MessageSource`] for the page-wide `message` events, and the bridge does
//! the rest.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::BridgeError;

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a window, compared by the source check on inbound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    /// Allocate an id distinct from every other id allocated in this process.
    pub fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Handle of a registered message listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A message delivered to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Origin declared by the sender.
    pub origin: String,
    /// Window that posted the message, when known.
    pub source: Option<WindowId>,
    /// Raw string payload.
    pub data: String,
}

/// The content window of the frame hosting the editor.
pub trait ContentWindow: Send + Sync + 'static {
    fn id(&self) -> WindowId;

    /// Post a string message restricted to `target_origin`.
    ///
    /// Called synchronously and possibly while bridge state is locked, so it
    /// must not deliver messages back to the host inline.
    fn post_message(&self, message: &str, target_origin: &str) -> Result<(), BridgeError>;
}

/// Callback invoked for every message delivered to the host page.
pub type MessageListener = Arc<dyn Fn(&MessageEvent) + Send + Sync>;

/// The page-wide `message` event subscription mechanism.
pub trait MessageSource: Send + Sync + 'static {
    fn add_listener(&self, listener: MessageListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// A registered listener. Removed exactly once, on [`close`](Self::close) or drop.
pub struct Subscription {
    source: Arc<dyn MessageSource>,
    id: Option<ListenerId>,
}

impl Subscription {
    /// Register `listener` with `source`.
    pub fn subscribe(source: Arc<dyn MessageSource>, listener: MessageListener) -> Self {
        let id = source.add_listener(listener);
        Self {
            source,
            id: Some(id),
        }
    }

    /// Remove the listener. Later calls do nothing.
    pub fn close(&mut self) {
        if let Some(id) = self.id.take() {
            self.source.remove_listener(id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.id.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
