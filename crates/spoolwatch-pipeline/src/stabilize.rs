// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stabilization gate: a fixed grace period between observing a file and
// touching it, giving the producing process time to finish flushing it to
// disk.
//
// This is a heuristic, not a guarantee. The delay is not informed by file
// size or modification-time polling, so a pathologically slow writer can
// still be read prematurely.

use std::time::Duration;

use tracing::debug;

use spoolwatch_core::types::FileEvent;

/// Suspend handling of one observed event for the grace period.
///
/// Only this event's handling pauses; other events proceed independently.
pub async fn settle(event: &FileEvent, delay: Duration) {
    debug!(
        path = %event.path.display(),
        delay_ms = delay.as_millis(),
        "waiting for writer to settle"
    );
    tokio::time::sleep(delay).await;
}
