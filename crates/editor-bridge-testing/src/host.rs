use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use editor_bridge::{ListenerId, MessageEvent, MessageListener, MessageSource, WindowId};

/// In-memory host page message bus.
#[derive(Default)]
pub struct FakeHost {
    listeners: Mutex<Vec<(ListenerId, MessageListener)>>,
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver `event` to every registered listener.
    ///
    /// Listeners run outside the registry lock, so they may subscribe or
    /// unsubscribe while being called.
    pub fn dispatch(&self, event: &MessageEvent) {
        let listeners: Vec<MessageListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Deliver a raw message as if posted by `source` from `origin`.
    pub fn deliver(&self, origin: &str, source: Option<WindowId>, data: impl Into<String>) {
        self.dispatch(&MessageEvent {
            origin: origin.to_owned(),
            source,
            data: data.into(),
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Total number of `add_listener` calls.
    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    /// Total number of `remove_listener` calls that removed something.
    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }
}

impl MessageSource for FakeHost {
    fn add_listener(&self, listener: MessageListener) -> ListenerId {
        let id = ListenerId::next();
        self.listeners.lock().unwrap().push((id, listener));
        self.added.fetch_add(1, Ordering::SeqCst);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        if listeners.len() != before {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_to_listeners_and_counts_removals() {
        let host = FakeHost::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = host.add_listener(Arc::new(move |event: &MessageEvent| {
            sink.lock().unwrap().push(event.data.clone());
        }));

        host.deliver("https://a.example", None, "hello");
        assert_eq!(*seen.lock().unwrap(), vec!["hello".to_owned()]);

        host.remove_listener(id);
        host.remove_listener(id);
        assert_eq!(host.added(), 1);
        assert_eq!(host.removed(), 1);

        host.deliver("https://a.example", None, "ignored");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
