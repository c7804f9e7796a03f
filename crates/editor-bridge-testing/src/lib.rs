//! Test doubles for the editor bridge.
//!
//! - [`FakeHost`] stands in for the host page's `message` event bus and
//!   counts listener registrations.
//! - [`RecordingWindow`] is a frame that records what was posted to it and
//!   never answers.
//! - [`SimulatedEditor`] is a frame that behaves like the remote editor:
//!   it answers commands asynchronously through the host.
//!
//! ```ignore
//! let host = FakeHost::new();
//! let embed = Embed::builder(EmbedConfig::new()).build(host.clone());
//! let editor = SimulatedEditor::new(host.clone(), embed.editor_origin());
//! embed.attach(editor.clone());
//! editor.ready();
//!
//! embed.go_to(2).await?;
//! ```

mod editor;
mod host;
mod messages;
mod window;

pub use editor::{SimulatedEditor, SimulatedField};
pub use host::FakeHost;
pub use messages::{editor_ready, request_result};
pub use window::{PostedMessage, RecordingWindow};
