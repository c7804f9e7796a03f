#![allow(dead_code)]

use std::sync::Arc;

use editor_bridge::{ContentWindow, Embed, EmbedConfig, RequestId, RequestOutcome, WireMessage};
use editor_bridge_testing::{editor_ready, request_result, FakeHost, RecordingWindow};

pub struct Harness {
    pub host: Arc<FakeHost>,
    pub embed: Embed,
    pub window: Arc<RecordingWindow>,
}

impl Harness {
    /// An embed attached to a recording frame that never answers.
    pub fn new() -> Self {
        Self::with_config(EmbedConfig::new())
    }

    pub fn with_config(config: EmbedConfig) -> Self {
        let host = FakeHost::new();
        let embed = Embed::builder(config).build(host.clone());
        let window = RecordingWindow::new();
        embed.attach(window.clone());
        Self {
            host,
            embed,
            window,
        }
    }

    /// Deliver `data` from the attached frame with the editor origin.
    pub fn from_editor(&self, data: impl Into<String>) {
        self.host
            .deliver(self.embed.editor_origin(), Some(self.window.id()), data);
    }

    pub fn ready(&self) {
        self.from_editor(editor_ready());
    }

    pub fn reply(&self, request_id: &RequestId, result: RequestOutcome) {
        self.from_editor(request_result(request_id, result));
    }

    /// Wait until `count` commands have been posted, returning them.
    pub async fn posted(&self, count: usize) -> Vec<WireMessage> {
        settle(|| self.window.posted().len() >= count).await;
        self.window
            .posted()
            .iter()
            .filter_map(|posted| posted.wire())
            .collect()
    }
}

/// Yield to other tasks until `done` holds.
pub async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
