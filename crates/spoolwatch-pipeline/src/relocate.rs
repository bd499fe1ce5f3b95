// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Relocator: moves printed documents into the completion directory.
//
// A pre-existing file of the same name at the destination is deleted first,
// then the move proceeds. Repeated relocations of the same logical document
// are therefore safe, at the cost of discarding the prior file's content
// (last write wins). The delete-then-move sequence is not atomic; the
// design assumes a single writer per destination name.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use spoolwatch_core::error::{Result, SpoolError};

/// Move a printed document into the completion directory under its original
/// file name, overwriting any pre-existing file of that name.
///
/// On failure the source file is left untouched in the watch directory.
/// Returns the destination path on success.
pub async fn relocate(source: &Path, completed_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        SpoolError::RelocationFailure(format!("no file name in {}", source.display()))
    })?;
    let destination = completed_dir.join(file_name);

    if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
        debug!(path = %destination.display(), "overwriting existing file at destination");
        tokio::fs::remove_file(&destination).await.map_err(|e| {
            SpoolError::RelocationFailure(format!("delete {}: {e}", destination.display()))
        })?;
    }

    tokio::fs::rename(source, &destination).await.map_err(|e| {
        SpoolError::RelocationFailure(format!(
            "move {} -> {}: {e}",
            source.display(),
            destination.display()
        ))
    })?;

    info!(
        from = %source.display(),
        to = %destination.display(),
        "moved printed document"
    );
    Ok(destination)
}
