use std::fs;

use anyhow::{Context, Result};
use simstow_core::{backup_path, ManifestRecord};

use crate::fs_utils::directory_is_empty;
use crate::ProgressEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UninstallOutcome {
    pub files_removed: usize,
    pub backups_restored: usize,
    pub directories_removed: usize,
}

/// Replays an install manifest in strict reverse append order. Reverse order
/// guarantees a directory is only considered for pruning after every file the
/// install copied into it (or below it) has been handled. Three conditions are
/// tolerated as already resolved: the recorded file is gone, the flagged
/// backup is gone, the parent directory is not empty.
pub fn reverse_manifest(
    records: &[ManifestRecord],
    observe: &mut dyn FnMut(&ProgressEvent),
) -> Result<UninstallOutcome> {
    let mut outcome = UninstallOutcome::default();

    for record in records.iter().rev() {
        if record.location.is_file() {
            observe(&ProgressEvent::RemoveFile(record.location.clone()));
            fs::remove_file(&record.location).with_context(|| {
                format!("failed to remove installed file: {}", record.location.display())
            })?;
            outcome.files_removed += 1;
        }

        if record.backup_created {
            let backup = backup_path(&record.location);
            if backup.exists() {
                observe(&ProgressEvent::RestoreBackup(record.location.clone()));
                fs::rename(&backup, &record.location).with_context(|| {
                    format!("failed to restore backup: {}", backup.display())
                })?;
                outcome.backups_restored += 1;
            }
        }

        // Only the immediate parent is pruned; ancestors are never climbed.
        if let Some(parent) = record.location.parent() {
            let empty = directory_is_empty(parent).with_context(|| {
                format!("failed to inspect directory: {}", parent.display())
            })?;
            if empty {
                observe(&ProgressEvent::RemoveDirectory(parent.to_path_buf()));
                fs::remove_dir(parent).with_context(|| {
                    format!("failed to remove directory: {}", parent.display())
                })?;
                outcome.directories_removed += 1;
            }
        }
    }

    Ok(outcome)
}
