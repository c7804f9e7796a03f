//! Readiness gate and outgoing queue of one embedding instance.
//!
//! Commands issued before the editor reports readiness are held in a FIFO
//! queue and flushed, in call order, on the transition to ready. Sending and
//! flushing both happen under the same lock, so send order always matches
//! call order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::BridgeError;
use crate::id::{InstanceId, RequestId};
use crate::transport::{ContentWindow, WindowId};

/// Roughly thirty years; stands in for "never" when a duration overflows.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `at + duration`, clamped instead of overflowing.
pub(crate) fn instant_after(at: Instant, duration: Duration) -> Instant {
    at.checked_add(duration).unwrap_or_else(|| at + FAR_FUTURE)
}

/// Where an embedding instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No frame attached.
    Unattached,
    /// Frame attached, editor still loading; commands are queued.
    NotReady,
    /// Editor reported readiness; commands are sent immediately.
    Ready,
}

/// What happened to a command handed to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    Sent,
    Queued,
}

struct QueuedCommand {
    request_id: RequestId,
    payload: String,
}

#[derive(Default)]
struct Session {
    window: Option<Arc<dyn ContentWindow>>,
    generation: u64,
    ready: bool,
    document_loaded_at: Option<Instant>,
    queue: VecDeque<QueuedCommand>,
}

impl Session {
    /// Forget readiness and queued commands; bump the generation so that
    /// in-flight sends for the old frame are rejected.
    fn reset(&mut self) -> Vec<RequestId> {
        self.generation += 1;
        self.ready = false;
        self.document_loaded_at = None;
        self.queue.drain(..).map(|queued| queued.request_id).collect()
    }
}

pub(crate) struct ReadinessGate {
    instance: InstanceId,
    target_origin: String,
    session: Mutex<Session>,
}

impl ReadinessGate {
    pub(crate) fn new(instance: InstanceId, target_origin: String) -> Self {
        Self {
            instance,
            target_origin,
            session: Mutex::new(Session::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach `window`. Returns `false` if it was already the attached frame.
    ///
    /// Attaching over a different window is a remount: readiness and queued
    /// commands of the old frame are dropped.
    pub(crate) fn attach(&self, window: Arc<dyn ContentWindow>) -> bool {
        let mut session = self.lock();
        if let Some(current) = &session.window {
            if current.id() == window.id() {
                return false;
            }
        }
        let dropped = session.reset();
        if !dropped.is_empty() {
            tracing::debug!(
                instance = %self.instance,
                dropped = dropped.len(),
                "frame replaced, queued commands dropped"
            );
        }
        session.window = Some(window);
        true
    }

    /// Detach the current frame. Returns `false` if nothing was attached.
    pub(crate) fn detach(&self) -> bool {
        let mut session = self.lock();
        if session.window.take().is_none() {
            return false;
        }
        session.reset();
        true
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        let session = self.lock();
        match (&session.window, session.ready) {
            (None, _) => Lifecycle::Unattached,
            (Some(_), false) => Lifecycle::NotReady,
            (Some(_), true) => Lifecycle::Ready,
        }
    }

    /// Current frame generation, or `None` when nothing is attached.
    pub(crate) fn generation(&self) -> Option<u64> {
        let session = self.lock();
        session.window.as_ref().map(|_| session.generation)
    }

    /// Whether `source` is the attached frame's window.
    pub(crate) fn is_tracked_source(&self, source: Option<WindowId>) -> bool {
        let session = self.lock();
        match (&session.window, source) {
            (Some(window), Some(source)) => window.id() == source,
            _ => false,
        }
    }

    /// Instant from which mutating commands may be sent, if a document load
    /// has been observed.
    pub(crate) fn settled_at(&self, grace: Duration) -> Option<Instant> {
        self.lock()
            .document_loaded_at
            .map(|at| instant_after(at, grace))
    }

    /// Send `payload` now if the editor is ready, queue it otherwise.
    ///
    /// Fails with [`BridgeError::Detached`] when the frame of `generation`
    /// is no longer attached.
    pub(crate) fn send_or_queue(
        &self,
        generation: u64,
        request_id: &RequestId,
        payload: String,
    ) -> Result<Dispatch, BridgeError> {
        let mut session = self.lock();
        if session.generation != generation {
            return Err(BridgeError::Detached);
        }
        let Some(window) = session.window.clone() else {
            return Err(BridgeError::Detached);
        };

        if session.ready {
            window.post_message(&payload, &self.target_origin)?;
            tracing::debug!(instance = %self.instance, request_id = %request_id, "command sent");
            return Ok(Dispatch::Sent);
        }

        session.queue.push_back(QueuedCommand {
            request_id: request_id.clone(),
            payload,
        });
        tracing::debug!(
            instance = %self.instance,
            request_id = %request_id,
            queued = session.queue.len(),
            "editor not ready, command queued"
        );
        Ok(Dispatch::Queued)
    }

    /// Transition to ready and flush the queue in order.
    ///
    /// Returns the commands whose send failed, with the reason.
    pub(crate) fn open(&self) -> Vec<(RequestId, BridgeError)> {
        let mut session = self.lock();
        let Some(window) = session.window.clone() else {
            return Vec::new();
        };
        if session.ready {
            return Vec::new();
        }
        session.ready = true;

        let queued: Vec<QueuedCommand> = session.queue.drain(..).collect();
        if !queued.is_empty() {
            tracing::debug!(
                instance = %self.instance,
                count = queued.len(),
                "editor ready, flushing queued commands"
            );
        }

        let mut failed = Vec::new();
        for command in queued {
            if let Err(err) = window.post_message(&command.payload, &self.target_origin) {
                failed.push((command.request_id, err));
            }
        }
        failed
    }

    /// Record a document load and make sure the gate is open.
    pub(crate) fn document_loaded(&self) -> Vec<(RequestId, BridgeError)> {
        {
            let mut session = self.lock();
            if session.window.is_none() {
                return Vec::new();
            }
            session.document_loaded_at = Some(Instant::now());
        }
        self.open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        id: WindowId,
        sent: Mutex<Vec<(String, String)>>,
        reject: bool,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: WindowId::next(),
                sent: Mutex::new(Vec::new()),
                reject: false,
            })
        }

        fn payloads(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }
    }

    impl ContentWindow for Recorder {
        fn id(&self) -> WindowId {
            self.id
        }

        fn post_message(&self, message: &str, target_origin: &str) -> Result<(), BridgeError> {
            if self.reject {
                return Err(BridgeError::Transport("closed".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((message.to_owned(), target_origin.to_owned()));
            Ok(())
        }
    }

    fn gate() -> ReadinessGate {
        ReadinessGate::new(InstanceId::new(), "https://editor.example.com".into())
    }

    #[test]
    fn queues_until_open_then_flushes_in_order() {
        let gate = gate();
        let window = Recorder::new();
        gate.attach(window.clone());
        let generation = gate.generation().unwrap();

        for n in 0..3 {
            let id = RequestId::from(format!("r{n}"));
            let dispatch = gate.send_or_queue(generation, &id, format!("p{n}")).unwrap();
            assert_eq!(dispatch, Dispatch::Queued);
        }
        assert!(window.payloads().is_empty());
        assert_eq!(gate.lifecycle(), Lifecycle::NotReady);

        assert!(gate.open().is_empty());
        assert_eq!(window.payloads(), vec!["p0", "p1", "p2"]);
        assert_eq!(gate.lifecycle(), Lifecycle::Ready);

        let id = RequestId::from("r3");
        assert_eq!(gate.send_or_queue(generation, &id, "p3".into()).unwrap(), Dispatch::Sent);
        assert_eq!(window.payloads(), vec!["p0", "p1", "p2", "p3"]);
    }

    #[test]
    fn posts_to_the_exact_origin() {
        let gate = gate();
        let window = Recorder::new();
        gate.attach(window.clone());
        gate.open();
        gate.send_or_queue(gate.generation().unwrap(), &RequestId::from("a"), "p".into())
            .unwrap();
        assert_eq!(window.sent.lock().unwrap()[0].1, "https://editor.example.com");
    }

    #[test]
    fn remount_drops_queue_and_readiness() {
        let gate = gate();
        let first = Recorder::new();
        gate.attach(first.clone());
        let old_generation = gate.generation().unwrap();
        gate.send_or_queue(old_generation, &RequestId::from("q"), "p".into())
            .unwrap();

        let second = Recorder::new();
        assert!(gate.attach(second.clone()));
        assert_eq!(gate.lifecycle(), Lifecycle::NotReady);

        let err = gate
            .send_or_queue(old_generation, &RequestId::from("late"), "p".into())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Detached));

        gate.open();
        assert!(first.payloads().is_empty());
        assert!(second.payloads().is_empty());
    }

    #[test]
    fn reattaching_the_same_window_keeps_state() {
        let gate = gate();
        let window = Recorder::new();
        gate.attach(window.clone());
        gate.open();
        assert!(!gate.attach(window.clone()));
        assert_eq!(gate.lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn flush_failures_are_reported() {
        let gate = gate();
        let window = Arc::new(Recorder {
            id: WindowId::next(),
            sent: Mutex::new(Vec::new()),
            reject: true,
        });
        gate.attach(window);
        let generation = gate.generation().unwrap();
        gate.send_or_queue(generation, &RequestId::from("a"), "p".into())
            .unwrap();

        let failed = gate.open();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, RequestId::from("a"));
    }

    #[test]
    fn source_check_uses_attached_window() {
        let gate = gate();
        let window = Recorder::new();
        assert!(!gate.is_tracked_source(Some(window.id())));
        gate.attach(window.clone());
        assert!(gate.is_tracked_source(Some(window.id())));
        assert!(!gate.is_tracked_source(Some(WindowId::next())));
        assert!(!gate.is_tracked_source(None));
    }

    #[test]
    fn detached_gate_ignores_readiness() {
        let gate = gate();
        assert!(gate.open().is_empty());
        assert!(gate.document_loaded().is_empty());
        assert_eq!(gate.lifecycle(), Lifecycle::Unattached);
        assert_eq!(gate.settled_at(Duration::from_millis(200)), None);
    }

    #[test]
    fn instant_after_clamps_overflow() {
        let now = Instant::now();
        assert_eq!(instant_after(now, Duration::from_secs(5)), now + Duration::from_secs(5));
        assert_eq!(instant_after(now, Duration::MAX), now + FAR_FUTURE);
    }
}
