// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print dispatcher: bounded invocation of the external print-capable tool.
//
// The tool is expected to accept the document path and an optional target
// printer name as positional arguments and to exit after handing the job to
// the print system. Tools that hang (e.g. waiting on a dismissed dialog)
// are forcibly terminated once the dispatch timeout expires, so a stuck
// print never blocks the pipeline.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use spoolwatch_core::error::{Result, SpoolError};
use spoolwatch_core::WatchConfiguration;

/// Invokes the configured external print tool against stabilized files.
#[derive(Debug, Clone)]
pub struct PrintDispatcher {
    tool: PathBuf,
    printer: Option<String>,
    timeout: Duration,
}

impl PrintDispatcher {
    pub fn from_config(config: &WatchConfiguration) -> Self {
        Self {
            tool: config.tool.clone(),
            printer: config.printer.clone(),
            timeout: config.dispatch_timeout,
        }
    }

    /// Hand one document to the external tool and wait for it to exit.
    ///
    /// Preconditions checked before anything is spawned: the document and
    /// the tool executable must both exist, otherwise the job fails fast
    /// with `NotFound`.
    ///
    /// The wait is bounded by the dispatch timeout; on expiry the child is
    /// killed and reaped and the job fails with `ProcessTimeout`. A wait
    /// that completes without error counts as success regardless of the
    /// child's exit code — the code is logged but deliberately not
    /// inspected.
    pub async fn print(&self, document: &Path) -> Result<()> {
        if !document.exists() {
            return Err(SpoolError::NotFound {
                path: document.to_path_buf(),
            });
        }
        if !self.tool.exists() {
            return Err(SpoolError::NotFound {
                path: self.tool.clone(),
            });
        }

        let mut command = Command::new(&self.tool);
        command.arg(document);
        if let Some(printer) = &self.printer {
            command.arg(printer);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // Termination must hold on every exit path, including the
            // monitoring task itself going away before the timeout branch
            // runs.
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn().map_err(|e| {
            SpoolError::ProcessFailure(format!("spawn {}: {e}", self.tool.display()))
        })?;

        info!(
            document = %document.display(),
            tool = %self.tool.display(),
            printer = self.printer.as_deref().unwrap_or("(default)"),
            "print tool started"
        );

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                if !status.success() {
                    // Exit codes are not part of the success contract.
                    warn!(
                        document = %document.display(),
                        ?status,
                        "print tool exited non-zero"
                    );
                }
                Ok(())
            }
            Ok(Err(e)) => Err(SpoolError::ProcessFailure(format!("wait: {e}"))),
            Err(_) => {
                warn!(
                    document = %document.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "print tool timed out — terminating"
                );
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "kill after timeout failed");
                }
                // Reap so no zombie outlives the job.
                let _ = child.wait().await;
                Err(SpoolError::ProcessTimeout {
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }
}
