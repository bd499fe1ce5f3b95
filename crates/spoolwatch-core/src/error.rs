// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spoolwatch.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Spoolwatch operations.
#[derive(Debug, Error)]
pub enum SpoolError {
    // -- Watch errors --
    #[error("watch unavailable: {0}")]
    WatchUnavailable(String),

    // -- Dispatch errors --
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("print tool did not exit within {timeout_secs}s and was terminated")]
    ProcessTimeout { timeout_secs: u64 },

    #[error("print tool invocation failed: {0}")]
    ProcessFailure(String),

    // -- Relocation errors --
    #[error("relocation failed: {0}")]
    RelocationFailure(String),

    // -- Storage / ambient I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpoolError {
    /// Whether this error must stop the whole pipeline.
    ///
    /// Every per-job condition is absorbed at its stage boundary and ends
    /// only that event's state machine. A lost watch is different: no
    /// further events can ever be observed, so the pipeline has to stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::WatchUnavailable(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpoolError>;
