// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator: sequences watch → stabilize → dispatch → relocate
// per observed event, isolating failures so one bad file never stops future
// events from being processed.
//
// Per-event state machine:
//
//   Observed → Stabilizing → Dispatching → Succeeded → Relocating → Done
//                                        → Failed → Done
//
// Both terminal states are absorbing; there is no retry transition.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use spoolwatch_core::error::Result;
use spoolwatch_core::types::{FileEvent, JobOutcome, PrintJob};
use spoolwatch_core::{SpoolError, WatchConfiguration};

use crate::dispatch::PrintDispatcher;
use crate::relocate::relocate;
use crate::stabilize::settle;
use crate::watcher::WatchSource;

/// The event-to-action print pipeline.
pub struct Pipeline {
    config: Arc<WatchConfiguration>,
}

impl Pipeline {
    pub fn new(config: WatchConfiguration) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run the dispatch loop until shutdown is signalled or the watch is
    /// lost.
    ///
    /// Each observed event is fanned out to its own task, so a failing
    /// event never affects any other in-flight or future event. Shutdown
    /// only stops new events from being observed — events already
    /// mid-pipeline run to completion on the runtime.
    pub async fn run(&self, mut shutdown: oneshot::Receiver<()>) -> Result<()> {
        let mut source = WatchSource::start(&self.config)?;

        loop {
            tokio::select! {
                event = source.recv() => {
                    match event {
                        Ok(event) => {
                            let config = Arc::clone(&self.config);
                            tokio::spawn(handle_event(config, event));
                        }
                        Err(e) => {
                            error!(error = %e, "event source lost — stopping pipeline");
                            return Err(e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown requested — no further events will be observed");
                    return Ok(());
                }
            }
        }
    }
}

/// Drive one observed event through the full pipeline.
///
/// Every stage failure is absorbed here: logged with enough context to
/// diagnose, and terminal for this event only.
async fn handle_event(config: Arc<WatchConfiguration>, event: FileEvent) {
    info!(path = %event.path.display(), "new file detected");

    let mut job = PrintJob::new(&event, config.printer.clone());

    settle(&event, config.stabilize_delay).await;

    let dispatcher = PrintDispatcher::from_config(&config);
    match dispatcher.print(&event.path).await {
        Ok(()) => job.mark_succeeded(),
        Err(e @ SpoolError::ProcessTimeout { .. }) => {
            warn!(
                job_id = %job.id,
                path = %event.path.display(),
                error = %e,
                "print dispatch timed out"
            );
            job.mark_timed_out(e.to_string());
        }
        Err(e) => {
            warn!(
                job_id = %job.id,
                path = %event.path.display(),
                error = %e,
                "print dispatch failed"
            );
            job.mark_failed(e.to_string());
        }
    }

    if job.outcome != JobOutcome::Succeeded {
        // The file stays where it is. Creations are reported only once, so
        // it will not be re-observed until something writes it again.
        return;
    }

    match relocate(&event.path, &config.completed_dir).await {
        Ok(destination) => {
            info!(
                job_id = %job.id,
                to = %destination.display(),
                "document printed and relocated"
            );
        }
        Err(e) => {
            warn!(
                job_id = %job.id,
                path = %event.path.display(),
                error = %e,
                "relocation failed — file left in watch directory"
            );
        }
    }
}
