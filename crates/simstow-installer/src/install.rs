use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use simstow_core::{backup_path, ManifestRecord, RunCounters};

use crate::fs_utils::remove_file_if_exists;
use crate::ProgressEvent;

#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    /// When a destination file already exists: rename it aside to `.bak` and
    /// replace it. Always enabled on the CLI surface; disabling it makes the
    /// copier skip existing destinations entirely, leaving them without a
    /// manifest record.
    pub backup_and_replace: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            backup_and_replace: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct InstallOutcome {
    pub counters: RunCounters,
    pub records: Vec<ManifestRecord>,
}

/// Mirrors `source_root` under `target_root`, depth-first with files before
/// subdirectories, appending one manifest record per file copied. Any
/// filesystem error aborts the walk; records appended so far stay in the
/// outcome the caller never sees (no manifest is saved for a failed run).
pub fn install_tree(
    source_root: &Path,
    target_root: &Path,
    options: InstallOptions,
    observe: &mut dyn FnMut(&ProgressEvent),
) -> Result<InstallOutcome> {
    if !source_root.is_dir() {
        return Err(anyhow!(
            "source is not a directory: {}",
            source_root.display()
        ));
    }

    let mut outcome = InstallOutcome::default();
    copy_directory(
        source_root,
        source_root,
        target_root,
        options,
        observe,
        &mut outcome,
    )?;
    Ok(outcome)
}

fn copy_directory(
    dir: &Path,
    source_root: &Path,
    target_root: &Path,
    options: InstallOptions,
    observe: &mut dyn FnMut(&ProgressEvent),
    outcome: &mut InstallOutcome,
) -> Result<()> {
    let mut files = Vec::new();
    let mut subdirectories = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read source directory: {}", dir.display()))?
    {
        let entry = entry
            .with_context(|| format!("failed to read source directory: {}", dir.display()))?;
        if entry.file_type()?.is_dir() {
            subdirectories.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    files.sort();
    subdirectories.sort();

    for file in files {
        let relative = file
            .strip_prefix(source_root)
            .with_context(|| format!("source entry escaped the source root: {}", file.display()))?;
        copy_file(&file, &target_root.join(relative), options, observe, outcome)?;
        outcome.counters.files_processed += 1;
    }

    for subdirectory in subdirectories {
        outcome.counters.directories_processed += 1;
        copy_directory(
            &subdirectory,
            source_root,
            target_root,
            options,
            observe,
            outcome,
        )?;
    }

    Ok(())
}

fn copy_file(
    source: &Path,
    destination: &Path,
    options: InstallOptions,
    observe: &mut dyn FnMut(&ProgressEvent),
    outcome: &mut InstallOutcome,
) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create destination directory: {}", parent.display())
        })?;
    }

    let mut backup_created = false;
    if !destination.exists() {
        copy_contents(source, destination, observe)?;
    } else if options.backup_and_replace {
        let backup = backup_path(destination);
        if !backup.exists() {
            fs::rename(destination, &backup).with_context(|| {
                format!("failed to back up existing file: {}", destination.display())
            })?;
            backup_created = true;
            outcome.counters.files_backed_up += 1;
        }

        remove_file_if_exists(destination).with_context(|| {
            format!("failed to remove existing file: {}", destination.display())
        })?;
        copy_contents(source, destination, observe)?;
    } else {
        outcome.counters.files_skipped += 1;
        return Ok(());
    }

    outcome.records.push(ManifestRecord {
        location: destination.to_path_buf(),
        backup_created,
    });
    Ok(())
}

fn copy_contents(
    source: &Path,
    destination: &Path,
    observe: &mut dyn FnMut(&ProgressEvent),
) -> Result<()> {
    observe(&ProgressEvent::CopyFile {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
    });
    fs::copy(source, destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}
