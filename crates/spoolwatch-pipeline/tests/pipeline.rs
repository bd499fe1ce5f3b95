// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end pipeline tests: a real watch directory, a shell stub standing
// in for the print tool, and shortened stabilization/timeout values so the
// whole pass fits in a test run.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::oneshot;

use spoolwatch_core::WatchConfiguration;
use spoolwatch_pipeline::Pipeline;

struct Fixture {
    _root: tempfile::TempDir,
    watch: PathBuf,
    completed: PathBuf,
    config: WatchConfiguration,
}

/// Build a watch/completion directory pair plus a configuration with
/// test-sized delays and the given tool stub body.
fn fixture(tool_body: &str, dispatch_timeout: Duration) -> Fixture {
    let root = tempfile::tempdir().expect("tempdir");
    let watch = root.path().join("in");
    std::fs::create_dir_all(&watch).expect("watch dir");

    let tool = root.path().join("print-stub.sh");
    std::fs::write(&tool, format!("#!/bin/sh\n{tool_body}\n")).expect("write stub");
    let mut perms = std::fs::metadata(&tool).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&tool, perms).expect("chmod stub");

    let mut config = WatchConfiguration::new(watch.clone(), None, None, Some(tool));
    config.stabilize_delay = Duration::from_millis(50);
    config.dispatch_timeout = dispatch_timeout;
    let completed = config.completed_dir.clone();
    std::fs::create_dir_all(&completed).expect("completed dir");

    Fixture {
        _root: root,
        watch,
        completed,
        config,
    }
}

/// Poll until the predicate holds or the deadline passes.
async fn wait_until<F: Fn() -> bool>(pred: F, deadline: Duration) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if pred() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    pred()
}

fn spawn_pipeline(config: WatchConfiguration) -> (oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let (quit_tx, quit_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        let pipeline = Pipeline::new(config);
        // Shutdown is the only expected way out in these tests.
        pipeline.run(quit_rx).await.expect("pipeline run");
    });
    (quit_tx, handle)
}

async fn drop_document(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    // Give the watcher a moment to come up before the creation happens.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write document");
    path
}

#[tokio::test]
async fn printed_document_is_relocated_with_content_intact() {
    let fx = fixture("exit 0", Duration::from_secs(5));
    let (quit_tx, handle) = spawn_pipeline(fx.config.clone());

    let content = vec![0x25u8; 64 * 1024]; // a fat-enough stand-in document
    let source = drop_document(&fx.watch, "invoice.pdf", &content).await;

    let destination = fx.completed.join("invoice.pdf");
    assert!(
        wait_until(|| destination.exists(), Duration::from_secs(5)).await,
        "document never reached the completion directory"
    );
    assert!(
        wait_until(|| !source.exists(), Duration::from_secs(2)).await,
        "document still present in the watch directory"
    );
    assert_eq!(std::fs::read(&destination).expect("read moved file"), content);

    let _ = quit_tx.send(());
    handle.await.expect("pipeline task");
}

#[tokio::test]
async fn hanging_tool_leaves_document_in_watch_directory() {
    let fx = fixture("exec sleep 60", Duration::from_millis(300));
    let (quit_tx, handle) = spawn_pipeline(fx.config.clone());

    let source = drop_document(&fx.watch, "invoice.pdf", b"%PDF-1.4").await;

    // Stabilization (50ms) + timeout (300ms) + margin: the job must have
    // failed by now, with the file left in place and nothing relocated.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(source.exists());
    assert!(!fx.completed.join("invoice.pdf").exists());

    let _ = quit_tx.send(());
    handle.await.expect("pipeline task");
}

#[tokio::test]
async fn non_matching_extension_is_never_dispatched() {
    let fx = fixture("exit 0", Duration::from_secs(5));
    let (quit_tx, handle) = spawn_pipeline(fx.config.clone());

    let source = drop_document(&fx.watch, "notes.txt", b"scratch").await;

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(source.exists());
    assert!(!fx.completed.join("notes.txt").exists());

    let _ = quit_tx.send(());
    handle.await.expect("pipeline task");
}

#[tokio::test]
async fn dispatch_never_begins_before_the_stabilization_delay() {
    let root = tempfile::tempdir().expect("tempdir");
    let watch = root.path().join("in");
    std::fs::create_dir_all(&watch).expect("watch dir");

    // The stub marks the moment it was invoked by creating a witness file.
    let witness = root.path().join("invoked");
    let tool = root.path().join("print-stub.sh");
    std::fs::write(&tool, format!("#!/bin/sh\n: > {}\n", witness.display()))
        .expect("write stub");
    let mut perms = std::fs::metadata(&tool).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&tool, perms).expect("chmod stub");

    let delay = Duration::from_millis(500);
    let mut config = WatchConfiguration::new(watch.clone(), None, None, Some(tool));
    config.stabilize_delay = delay;
    config.dispatch_timeout = Duration::from_secs(5);
    std::fs::create_dir_all(&config.completed_dir).expect("completed dir");

    let (quit_tx, handle) = spawn_pipeline(config);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let written_at = tokio::time::Instant::now();
    std::fs::write(watch.join("invoice.pdf"), b"%PDF-1.4").expect("write document");

    assert!(
        wait_until(|| witness.exists(), Duration::from_secs(5)).await,
        "print tool was never invoked"
    );
    // The witness appears only after the gate has held the event back for
    // the full grace period; seeing it earlier means dispatch jumped the
    // gate.
    assert!(
        written_at.elapsed() >= delay,
        "dispatch began {}ms after creation, before the {}ms delay",
        written_at.elapsed().as_millis(),
        delay.as_millis()
    );

    let _ = quit_tx.send(());
    handle.await.expect("pipeline task");
}

#[tokio::test]
async fn relocation_overwrites_stale_completion_file() {
    let fx = fixture("exit 0", Duration::from_secs(5));
    std::fs::write(fx.completed.join("invoice.pdf"), b"stale content").expect("seed stale");
    let (quit_tx, handle) = spawn_pipeline(fx.config.clone());

    drop_document(&fx.watch, "invoice.pdf", b"fresh content").await;

    let destination = fx.completed.join("invoice.pdf");
    assert!(
        wait_until(
            || std::fs::read(&destination).map(|c| c == b"fresh content").unwrap_or(false),
            Duration::from_secs(5)
        )
        .await,
        "stale completion file was not overwritten"
    );

    let _ = quit_tx.send(());
    handle.await.expect("pipeline task");
}
