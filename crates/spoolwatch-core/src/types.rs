// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Spoolwatch print spooler.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of filesystem change reported by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new file appeared in the watch directory.
    Created,
}

/// A single observed filesystem change.
///
/// Transient value: it exists for the duration of one pipeline pass and is
/// never persisted. The platform may report more than one event for a single
/// physical write; downstream stages tolerate duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: EventKind,
    pub observed_at: DateTime<Utc>,
}

impl FileEvent {
    pub fn created(path: PathBuf) -> Self {
        Self {
            path,
            kind: EventKind::Created,
            observed_at: Utc::now(),
        }
    }

    /// File name component of the observed path, if it has one.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Lifecycle outcome of a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// Created, not yet handed to the print tool.
    Pending,
    /// The print tool was started and its wait completed without error.
    Succeeded,
    /// Spawn or wait failed — see the job's error field.
    Failed,
    /// The print tool had to be terminated after the dispatch timeout.
    TimedOut,
}

impl JobOutcome {
    /// Terminal outcomes are absorbing; there is no retry transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// An ephemeral print job derived from one file event.
///
/// Created when an event passes the name filter, discarded once the
/// relocation stage completes or fails. Never retried automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    /// Path of the document in the watch directory.
    pub source: PathBuf,
    /// Resolved target printer; the tool's default printer when `None`.
    pub printer: Option<String>,
    pub outcome: JobOutcome,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl PrintJob {
    pub fn new(event: &FileEvent, printer: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            source: event.path.clone(),
            printer,
            outcome: JobOutcome::Pending,
            created_at: now,
            updated_at: now,
            error_message: None,
        }
    }

    pub fn mark_succeeded(&mut self) {
        self.outcome = JobOutcome::Succeeded;
        self.touch();
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.outcome = JobOutcome::Failed;
        self.error_message = Some(message.into());
        self.touch();
    }

    pub fn mark_timed_out(&mut self, message: impl Into<String>) {
        self.outcome = JobOutcome::TimedOut;
        self.error_message = Some(message.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
