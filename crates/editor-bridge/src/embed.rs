//! One embedding instance: a frame hosting the editor plus its correlation state.
//!
//! ```text
//! action ──► RequestId ──► encode ──► ReadinessGate ──► ContentWindow::post_message
//!    ▲                                  (queue until ready)          │
//!    │                                                            [editor]
//!    │                                                               │
//!    └── PendingResult ◄── CorrelationTable ◄── on_message ◄── MessageSource
//! ```
//!
//! Each instance owns its table, gate and queue. Nothing is shared between
//! instances except the host's message source, and every instance filters
//! inbound messages by the identity of its own frame.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::time::Instant;

use crate::command::{self, Command};
use crate::config::EmbedConfig;
use crate::error::{ActionError, ActionResult, BridgeError};
use crate::event::{EditorEvent, RequestResult};
use crate::gate::{self, Lifecycle, ReadinessGate};
use crate::handler::EventHandler;
use crate::id::{InstanceId, RequestId};
use crate::pending::CorrelationTable;
use crate::transport::{ContentWindow, MessageEvent, MessageListener, MessageSource, Subscription};

/// Builder for an [`Embed`].
pub struct EmbedBuilder {
    config: EmbedConfig,
    handler: Option<Arc<dyn EventHandler>>,
}

impl EmbedBuilder {
    pub fn new(config: EmbedConfig) -> Self {
        Self {
            config,
            handler: None,
        }
    }

    /// Receive unsolicited editor events.
    pub fn on_event(mut self, handler: impl EventHandler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Create the instance and subscribe its listener to `source`.
    ///
    /// The listener stays registered until [`Embed::close`] or until the last
    /// handle is dropped, whichever comes first.
    pub fn build(self, source: Arc<dyn MessageSource>) -> Embed {
        let id = InstanceId::new();
        let origin = self.config.editor_origin();
        let inner = Arc::new(Inner {
            id,
            gate: ReadinessGate::new(id, origin.clone()),
            origin,
            config: self.config,
            pending: CorrelationTable::new(),
            handler: self.handler,
            subscription: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        let listener: MessageListener = Arc::new(move |event: &MessageEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.on_message(event);
            }
        });
        *inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Subscription::subscribe(source, listener));

        tracing::debug!(instance = %id, origin = %inner.origin, "embed created");
        Embed { inner }
    }
}

/// Handle to an embedding instance. Clones share the same instance.
#[derive(Clone)]
pub struct Embed {
    inner: Arc<Inner>,
}

struct Inner {
    id: InstanceId,
    config: EmbedConfig,
    origin: String,
    pending: Arc<CorrelationTable>,
    gate: ReadinessGate,
    handler: Option<Arc<dyn EventHandler>>,
    subscription: Mutex<Option<Subscription>>,
    closed: AtomicBool,
}

impl Embed {
    pub fn builder(config: EmbedConfig) -> EmbedBuilder {
        EmbedBuilder::new(config)
    }

    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.inner.config
    }

    /// Origin inbound messages must declare, and outbound messages target.
    pub fn editor_origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.gate.lifecycle()
    }

    /// Number of requests still waiting for a result.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Attach the frame hosting the editor.
    ///
    /// Attaching a different window than the current one is a remount:
    /// readiness is reset and outstanding requests resolve as cancelled.
    pub fn attach(&self, window: Arc<dyn ContentWindow>) {
        if self.is_closed() {
            tracing::warn!(instance = %self.inner.id, "ignoring attach on a closed embed");
            return;
        }
        let window_id = window.id();
        if !self.inner.gate.attach(window) {
            return;
        }
        let cancelled = self.inner.pending.cancel_all();
        tracing::debug!(
            instance = %self.inner.id,
            window = %window_id,
            cancelled,
            "frame attached"
        );
    }

    /// Detach the frame. Outstanding requests resolve as cancelled.
    pub fn detach(&self) {
        if self.inner.gate.detach() {
            let cancelled = self.inner.pending.cancel_all();
            tracing::debug!(instance = %self.inner.id, cancelled, "frame detached");
        }
    }

    /// Tear the instance down: remove the message listener, resolve every
    /// outstanding request as cancelled and detach the frame.
    ///
    /// Idempotent; the listener is removed exactly once.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(mut subscription) = self
            .inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            subscription.close();
        }
        self.inner.gate.detach();
        let cancelled = self.inner.pending.cancel_all();
        tracing::info!(instance = %self.inner.id, cancelled, "embed closed");
    }

    /// Send `command` and wait for its result.
    ///
    /// Never fails with anything but an [`ActionError`]: a missing frame,
    /// encoding and transport failures, timeouts and cancellations all come
    /// back as error codes.
    pub async fn request<C: Command>(&self, command: C) -> ActionResult<C::Output> {
        let inner = &self.inner;
        let Some(generation) = inner.gate.generation() else {
            return Err(ActionError::iframe_not_available());
        };

        let deadline = gate::instant_after(Instant::now(), inner.config.request_timeout());
        let pending = loop {
            if let Some(pending) = inner.pending.register(RequestId::generate(), deadline) {
                break pending;
            }
        };
        let request_id = pending.request_id().clone();

        let payload = command::encode(&command, &request_id)?;

        if C::MUTATING {
            if let Some(settled) = inner.gate.settled_at(inner.config.document_loaded_grace()) {
                tokio::time::sleep_until(settled).await;
            }
        }

        match inner.gate.send_or_queue(generation, &request_id, payload) {
            Ok(dispatch) => {
                tracing::debug!(
                    instance = %inner.id,
                    request_id = %request_id,
                    command = C::TYPE,
                    ?dispatch,
                    "awaiting result"
                );
            }
            Err(err) => {
                tracing::debug!(
                    instance = %inner.id,
                    request_id = %request_id,
                    command = C::TYPE,
                    error = %err,
                    "command not sent"
                );
                inner.pending.resolve(&request_id, Err(err.into()));
            }
        }

        let data = pending.wait().await?;
        C::decode_output(data)
            .map_err(|err| ActionError::failed_processing_request("InvalidResult", err))
    }
}

impl Inner {
    /// Classify one message delivered to the host page.
    ///
    /// Runs synchronously inside message delivery and never fails: anything
    /// that is not a well-formed editor message from our own frame is dropped.
    fn on_message(&self, event: &MessageEvent) {
        let Some(decoded) = EditorEvent::decode(&event.data) else {
            return;
        };
        if event.origin != self.origin {
            tracing::trace!(instance = %self.id, origin = %event.origin, "ignoring message from foreign origin");
            return;
        }
        if !self.gate.is_tracked_source(event.source) {
            tracing::trace!(instance = %self.id, "ignoring message from untracked window");
            return;
        }

        match decoded {
            EditorEvent::RequestResult(RequestResult { request_id, result }) => {
                if self.pending.resolve(&request_id, result.into_result()) {
                    tracing::debug!(instance = %self.id, request_id = %request_id, "result correlated");
                } else {
                    tracing::warn!(instance = %self.id, request_id = %request_id, "result for unknown request dropped");
                }
            }
            EditorEvent::EditorReady => {
                let failed = self.gate.open();
                self.fail_unsent(failed);
                self.notify(&decoded);
            }
            EditorEvent::DocumentLoaded(_) => {
                let failed = self.gate.document_loaded();
                self.fail_unsent(failed);
                self.notify(&decoded);
            }
            EditorEvent::PageFocused(_) | EditorEvent::SubmissionSent(_) => self.notify(&decoded),
        }
    }

    fn fail_unsent(&self, failed: Vec<(RequestId, BridgeError)>) {
        for (request_id, err) in failed {
            tracing::warn!(instance = %self.id, request_id = %request_id, error = %err, "queued command could not be sent");
            self.pending.resolve(&request_id, Err(err.into()));
        }
    }

    fn notify(&self, event: &EditorEvent) {
        let Some(handler) = &self.handler else {
            return;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| handler.on_event(event))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::error!(
                    instance = %self.id,
                    event = event.kind(),
                    error = format!("{err:#}"),
                    "event handler failed to execute"
                );
            }
            Err(_) => {
                tracing::error!(instance = %self.id, event = event.kind(), "event handler panicked");
            }
        }
    }
}
