//! Attach, remount, detach and close of an embedding instance.

mod support;

use std::sync::{Arc, Mutex};

use anyhow::bail;
use editor_bridge::{
    ActionError, EditorEvent, Embed, EmbedActions, EmbedConfig, EmbedRef, ErrorCode, Lifecycle,
    RequestOutcome,
};
use editor_bridge_testing::{FakeHost, RecordingWindow, SimulatedEditor};
use support::{settle, Harness};

#[tokio::test(start_paused = true)]
async fn close_cancels_pending_and_removes_listener_once() {
    let h = Harness::new();
    h.ready();
    assert_eq!(h.host.added(), 1);

    let embed = h.embed.clone();
    let task = tokio::spawn(async move { embed.submit(false).await });
    let request_id = h.posted(1).await[0].request_id.clone().unwrap();

    h.embed.close();
    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err.code, ErrorCode::REQUEST_CANCELLED);
    assert_eq!(h.host.removed(), 1);
    assert_eq!(h.host.listener_count(), 0);
    assert_eq!(h.embed.pending_requests(), 0);
    assert_eq!(h.embed.lifecycle(), Lifecycle::Unattached);

    h.embed.close();
    assert_eq!(h.host.removed(), 1);

    // A late result has nobody to reach.
    h.reply(&request_id, RequestOutcome::ok());
    assert!(h.embed.is_closed());
}

#[tokio::test(start_paused = true)]
async fn actions_after_close_report_missing_frame() {
    let h = Harness::new();
    h.embed.close();

    h.embed.attach(RecordingWindow::new());
    assert_eq!(h.embed.lifecycle(), Lifecycle::Unattached);
    assert_eq!(h.embed.go_to(1).await, Err(ActionError::iframe_not_available()));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_last_handle_removes_the_listener() {
    let host = FakeHost::new();
    let embed = Embed::builder(EmbedConfig::new()).build(host.clone());
    let clone = embed.clone();
    assert_eq!(host.listener_count(), 1);

    drop(embed);
    assert_eq!(host.removed(), 0);
    drop(clone);
    assert_eq!(host.removed(), 1);
    assert_eq!(host.listener_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unattached_instance_reports_missing_frame() {
    let host = FakeHost::new();
    let embed = Embed::builder(EmbedConfig::new()).build(host);
    assert_eq!(embed.lifecycle(), Lifecycle::Unattached);

    let err = embed.submit(false).await.unwrap_err();
    assert_eq!(err.code.as_str(), "unexpected:iframe_not_available");
    assert_eq!(err.message, "Iframe not available");
    assert_eq!(embed.pending_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn remount_cancels_outstanding_requests() {
    let h = Harness::new();

    let embed = h.embed.clone();
    let task = tokio::spawn(async move { embed.go_to(2).await });
    settle(|| h.embed.pending_requests() == 1).await;

    let replacement = RecordingWindow::new();
    h.embed.attach(replacement.clone());

    assert_eq!(task.await.unwrap(), Err(ActionError::request_cancelled()));
    assert_eq!(h.embed.lifecycle(), Lifecycle::NotReady);

    // Readiness of the old frame no longer counts.
    h.ready();
    assert_eq!(h.embed.lifecycle(), Lifecycle::NotReady);
    assert!(h.window.posted().is_empty());
    assert!(replacement.posted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reattaching_the_same_frame_is_not_a_remount() {
    let h = Harness::new();
    h.ready();

    let embed = h.embed.clone();
    let task = tokio::spawn(async move { embed.go_to(2).await });
    let request_id = h.posted(1).await[0].request_id.clone().unwrap();

    h.embed.attach(h.window.clone());
    assert_eq!(h.embed.lifecycle(), Lifecycle::Ready);

    h.reply(&request_id, RequestOutcome::ok());
    assert_eq!(task.await.unwrap(), Ok(()));
}

#[tokio::test(start_paused = true)]
async fn detach_cancels_outstanding_requests() {
    let h = Harness::new();
    h.ready();

    let embed = h.embed.clone();
    let task = tokio::spawn(async move { embed.go_to(2).await });
    h.posted(1).await;

    h.embed.detach();
    assert_eq!(task.await.unwrap(), Err(ActionError::request_cancelled()));
    assert_eq!(h.embed.lifecycle(), Lifecycle::Unattached);
    assert_eq!(h.host.removed(), 0);
}

#[tokio::test(start_paused = true)]
async fn embed_ref_requires_an_instance() {
    let host = FakeHost::new();
    let embed_ref = EmbedRef::new();

    let err = embed_ref.go_to(1).await.unwrap_err();
    assert_eq!(err.code.as_str(), "bad_request:embed_ref_not_available");

    let embed = Embed::builder(EmbedConfig::new()).build(host.clone());
    let editor = SimulatedEditor::new(host.clone(), embed.editor_origin());
    embed.attach(editor.clone());
    editor.ready();
    embed_ref.set(embed);

    let content = embed_ref
        .get_document_content(Default::default())
        .await
        .unwrap();
    assert_eq!(content.pages.len(), 3);

    embed_ref.clear();
    let err = embed_ref.submit(false).await.unwrap_err();
    assert_eq!(err, ActionError::embed_ref_not_available());
}

#[tokio::test(start_paused = true)]
async fn event_handler_sees_events_and_its_failures_are_contained() {
    let host = FakeHost::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let embed = Embed::builder(EmbedConfig::new())
        .on_event(move |event: &EditorEvent| {
            sink.lock().unwrap().push(event.kind());
            match event {
                EditorEvent::PageFocused(_) => bail!("handler rejected the page"),
                EditorEvent::SubmissionSent(_) => panic!("handler blew up"),
                _ => Ok(()),
            }
        })
        .build(host.clone());
    let editor = SimulatedEditor::new(host.clone(), embed.editor_origin());
    embed.attach(editor.clone());
    editor.ready();
    editor.document_loaded();

    embed.go_to(2).await.unwrap();
    embed.submit(false).await.unwrap();
    settle(|| seen.lock().unwrap().len() == 4).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "EDITOR_READY",
            "DOCUMENT_LOADED",
            "PAGE_FOCUSED",
            "SUBMISSION_SENT"
        ]
    );

    // Still serving requests after the handler failed.
    embed.go_to(1).await.unwrap();
    assert_eq!(embed.pending_requests(), 0);
}

#[tokio::test(start_paused = true)]
async fn results_are_not_forwarded_to_the_handler() {
    let host = FakeHost::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let embed = Embed::builder(EmbedConfig::new())
        .on_event(move |event: &EditorEvent| {
            sink.lock().unwrap().push(event.kind());
            Ok(())
        })
        .build(host.clone());
    let editor = SimulatedEditor::new(host.clone(), embed.editor_origin());
    embed.attach(editor.clone());
    editor.ready();

    embed
        .select_tool(Some(editor_bridge::FieldType::Signature))
        .await
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["EDITOR_READY"]);
}
