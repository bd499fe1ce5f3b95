// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolwatch pipeline — directory change detection, write stabilization,
// bounded print dispatch, and post-print relocation.  This crate bridges
// between the core domain types defined in `spoolwatch-core` and the
// platform's filesystem notification and process facilities.

pub mod dispatch;
pub mod orchestrator;
pub mod relocate;
pub mod stabilize;
pub mod watcher;

pub use dispatch::PrintDispatcher;
pub use orchestrator::Pipeline;
pub use relocate::relocate;
pub use watcher::WatchSource;
