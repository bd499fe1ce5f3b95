// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File event source: filesystem change notifications for the watch
// directory, filtered to the configured document extension.
//
// Delivery is at-least-once from the platform's perspective — a single
// physical write can surface as more than one creation notification.
// Downstream stages tolerate duplicates; the relocator's idempotent
// overwrite absorbs them.

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use spoolwatch_core::error::{Result, SpoolError};
use spoolwatch_core::types::FileEvent;
use spoolwatch_core::WatchConfiguration;

/// Messages forwarded from the notify callback thread into the async world.
enum WatchMessage {
    Event(FileEvent),
    /// The platform watcher reported an error. No events can be recovered
    /// past this point.
    Lost(String),
}

/// Subscription to file creations in the watch directory.
///
/// The underlying `notify` watcher lives exactly as long as this value;
/// dropping it ends the subscription.
pub struct WatchSource {
    // Held only to keep the subscription alive.
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatchMessage>,
}

impl WatchSource {
    /// Subscribe to the configured watch directory.
    ///
    /// The watch is non-recursive, so a completion directory nested inside
    /// the watch directory never re-triggers the pipeline.
    pub fn start(config: &WatchConfiguration) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let filter = config.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for file_event in convert_event(event, &filter) {
                        debug!(path = %file_event.path.display(), "file arrival observed");
                        // A gone receiver means the pipeline is shutting down.
                        let _ = tx.send(WatchMessage::Event(file_event));
                    }
                }
                Err(e) => {
                    error!(error = %e, "watch error");
                    let _ = tx.send(WatchMessage::Lost(e.to_string()));
                }
            },
            Config::default(),
        )
        .map_err(|e| SpoolError::WatchUnavailable(format!("create watcher: {e}")))?;

        watcher
            .watch(&config.watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                SpoolError::WatchUnavailable(format!(
                    "watch {}: {e}",
                    config.watch_dir.display()
                ))
            })?;

        info!(
            dir = %config.watch_dir.display(),
            extension = %config.extension,
            "watching directory"
        );
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next observed file creation.
    ///
    /// Fails with `WatchUnavailable` once the platform watcher has reported
    /// an error or the subscription is gone — fatal to the whole pipeline.
    pub async fn recv(&mut self) -> Result<FileEvent> {
        match self.rx.recv().await {
            Some(WatchMessage::Event(event)) => Ok(event),
            Some(WatchMessage::Lost(reason)) => Err(SpoolError::WatchUnavailable(reason)),
            None => Err(SpoolError::WatchUnavailable("event channel closed".into())),
        }
    }
}

/// Map a raw notify event to pipeline `FileEvent`s, applying the extension
/// filter to every reported path.
///
/// Plain creations and renames *into* the directory both count as arrivals:
/// a producer that writes elsewhere and atomically moves the finished file
/// in must be observed the same as one writing in place. Content
/// modifications and removals of files already present are deliberately not
/// re-reported.
fn convert_event(event: Event, config: &WatchConfiguration) -> Vec<FileEvent> {
    let paths = match event.kind {
        EventKind::Create(_) => event.paths,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths,
        // A combined rename carries [source, destination]; only the
        // destination is an arrival in the watch directory.
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.into_iter().last().into_iter().collect()
        }
        _ => return Vec::new(),
    };
    paths
        .into_iter()
        .filter(|path| config.matches_extension(path))
        .map(FileEvent::created)
        .collect()
}
