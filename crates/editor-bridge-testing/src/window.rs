use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use editor_bridge::{BridgeError, ContentWindow, RequestId, WindowId, WireMessage};

/// A message posted to a [`RecordingWindow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub message: String,
    pub target_origin: String,
}

impl PostedMessage {
    pub fn wire(&self) -> Option<WireMessage> {
        WireMessage::parse(&self.message)
    }
}

/// A frame that records posts and never answers.
pub struct RecordingWindow {
    id: WindowId,
    posted: Mutex<Vec<PostedMessage>>,
    rejecting: AtomicBool,
}

impl RecordingWindow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: WindowId::next(),
            posted: Mutex::new(Vec::new()),
            rejecting: AtomicBool::new(false),
        })
    }

    /// Make every following post fail, as a closed frame would.
    pub fn reject_posts(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn posted(&self) -> Vec<PostedMessage> {
        self.posted.lock().unwrap().clone()
    }

    /// Wire types of the posted commands, in send order.
    pub fn command_types(&self) -> Vec<String> {
        self.posted()
            .iter()
            .filter_map(PostedMessage::wire)
            .map(|msg| msg.kind)
            .collect()
    }

    /// Request ids of the posted commands, in send order.
    pub fn request_ids(&self) -> Vec<RequestId> {
        self.posted()
            .iter()
            .filter_map(PostedMessage::wire)
            .filter_map(|msg| msg.request_id)
            .collect()
    }
}

impl ContentWindow for RecordingWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn post_message(&self, message: &str, target_origin: &str) -> Result<(), BridgeError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(BridgeError::Transport("frame is closed".into()));
        }
        self.posted.lock().unwrap().push(PostedMessage {
            message: message.to_owned(),
            target_origin: target_origin.to_owned(),
        });
        Ok(())
    }
}
