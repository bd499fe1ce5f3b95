// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Grace period before a newly observed file is touched.
pub const DEFAULT_STABILIZE_DELAY: Duration = Duration::from_secs(1);

/// Bound on how long the external print tool may run.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Document extension observed in the watch directory.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Platform default for the external print-capable executable.
#[cfg(windows)]
pub const DEFAULT_PRINT_TOOL: &str =
    r"C:\Program Files\Adobe\Acrobat DC\Acrobat\Acrobat.exe";
#[cfg(not(windows))]
pub const DEFAULT_PRINT_TOOL: &str = "/usr/bin/lp";

/// Immutable pipeline configuration.
///
/// Constructed once at startup and passed by reference into the orchestrator
/// and every stage — no stage reads ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfiguration {
    /// Directory observed for newly arrived documents.
    pub watch_dir: PathBuf,
    /// Destination for documents that were handed to the print tool.
    pub completed_dir: PathBuf,
    /// Target printer name passed to the print tool; tool default when unset.
    pub printer: Option<String>,
    /// External print-capable executable.
    pub tool: PathBuf,
    /// Document extension filter, without the leading dot.
    pub extension: String,
    /// Grace period before a newly observed file is processed.
    pub stabilize_delay: Duration,
    /// Bound on the print tool's runtime before forced termination.
    pub dispatch_timeout: Duration,
}

impl WatchConfiguration {
    /// Build a configuration from operator-supplied values, applying the
    /// documented defaults for everything left unset.
    ///
    /// The default completion directory is nested inside the watch
    /// directory. The event source is scoped to top-level creations, so the
    /// nested directory never re-triggers the pipeline.
    pub fn new(
        watch_dir: PathBuf,
        completed_dir: Option<PathBuf>,
        printer: Option<String>,
        tool: Option<PathBuf>,
    ) -> Self {
        let completed_dir = completed_dir.unwrap_or_else(|| watch_dir.join("printed"));
        Self {
            watch_dir,
            completed_dir,
            printer,
            tool: tool.unwrap_or_else(|| PathBuf::from(DEFAULT_PRINT_TOOL)),
            extension: DEFAULT_EXTENSION.to_string(),
            stabilize_delay: DEFAULT_STABILIZE_DELAY,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Whether a path carries the configured document extension
    /// (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_nest_completion_dir_inside_watch_dir() {
        let config = WatchConfiguration::new("/spool/in".into(), None, None, None);
        assert_eq!(config.completed_dir, PathBuf::from("/spool/in/printed"));
        assert_eq!(config.extension, "pdf");
        assert_eq!(config.stabilize_delay, Duration::from_secs(1));
        assert_eq!(config.dispatch_timeout, Duration::from_secs(10));
        assert_eq!(config.tool, PathBuf::from(DEFAULT_PRINT_TOOL));
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let config = WatchConfiguration::new(
            "/spool/in".into(),
            Some("/spool/done".into()),
            Some("Office".into()),
            Some("/opt/print/render".into()),
        );
        assert_eq!(config.completed_dir, PathBuf::from("/spool/done"));
        assert_eq!(config.printer.as_deref(), Some("Office"));
        assert_eq!(config.tool, PathBuf::from("/opt/print/render"));
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let config = WatchConfiguration::new("/spool/in".into(), None, None, None);
        assert!(config.matches_extension(Path::new("invoice.pdf")));
        assert!(config.matches_extension(Path::new("INVOICE.PDF")));
        assert!(!config.matches_extension(Path::new("notes.txt")));
        assert!(!config.matches_extension(Path::new("no_extension")));
        // A bare ".pdf" name has no extension component at all.
        assert!(!config.matches_extension(Path::new(".pdf")));
    }
}
