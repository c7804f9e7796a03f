//! Correlation table: request id to pending-result continuation.
//!
//! Every registered request resolves exactly once, through whichever comes
//! first of a matching result, its deadline, or cancellation. The entry is
//! gone from the table by the time the waiting side observes the outcome.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::error::{ActionError, ActionResult};
use crate::id::RequestId;

/// Untyped resolution delivered to a waiting action.
pub(crate) type Resolution = ActionResult<Option<Value>>;

struct PendingRequest {
    reply: oneshot::Sender<Resolution>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
pub(crate) struct CorrelationTable {
    entries: DashMap<RequestId, PendingRequest>,
}

impl CorrelationTable {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a pending request that times out at `deadline`.
    ///
    /// Returns `None` if `request_id` is already pending; ids are never
    /// registered twice.
    pub(crate) fn register(
        self: &Arc<Self>,
        request_id: RequestId,
        deadline: Instant,
    ) -> Option<PendingResult> {
        let (reply, rx) = oneshot::channel();
        match self.entries.entry(request_id.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(PendingRequest {
                    reply,
                    created_at: Utc::now(),
                });
                Some(PendingResult {
                    request_id,
                    deadline,
                    rx,
                    table: Arc::clone(self),
                })
            }
        }
    }

    /// Hand `resolution` to the request waiting on `request_id`.
    ///
    /// Unknown ids (already resolved, timed out, or never ours) are a no-op
    /// and return `false`.
    pub(crate) fn resolve(&self, request_id: &RequestId, resolution: Resolution) -> bool {
        let Some((_, pending)) = self.entries.remove(request_id) else {
            return false;
        };
        // The waiter may have given up in the meantime; nothing to do then.
        let _ = pending.reply.send(resolution);
        true
    }

    /// Resolve every pending request as cancelled. Returns how many there were.
    pub(crate) fn cancel_all(&self) -> usize {
        let ids: Vec<RequestId> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.iter()
            .filter(|id| self.resolve(id, Err(ActionError::request_cancelled())))
            .count()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, request_id: &RequestId) -> bool {
        self.entries.contains_key(request_id)
    }
}

/// Waiting side of a registered request.
///
/// Dropping it before resolution removes the entry from the table.
pub(crate) struct PendingResult {
    request_id: RequestId,
    deadline: Instant,
    rx: oneshot::Receiver<Resolution>,
    table: Arc<CorrelationTable>,
}

impl PendingResult {
    pub(crate) fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Wait for the result or the deadline, whichever comes first.
    pub(crate) async fn wait(mut self) -> Resolution {
        match tokio::time::timeout_at(self.deadline, &mut self.rx).await {
            Ok(Ok(resolution)) => resolution,
            // Sender dropped without an answer: the table went away.
            Ok(Err(_)) => Err(ActionError::request_cancelled()),
            Err(_elapsed) => {
                if let Some((_, pending)) = self.table.entries.remove(&self.request_id) {
                    let age = Utc::now() - pending.created_at;
                    tracing::warn!(
                        request_id = %self.request_id,
                        age_ms = age.num_milliseconds(),
                        "request timed out"
                    );
                }
                // A result may have slipped in between the deadline and the removal.
                match self.rx.try_recv() {
                    Ok(resolution) => resolution,
                    Err(_) => Err(ActionError::request_timed_out()),
                }
            }
        }
    }
}

impl Drop for PendingResult {
    fn drop(&mut self) {
        self.table.entries.remove(&self.request_id);
    }
}
