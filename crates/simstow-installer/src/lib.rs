use std::path::PathBuf;

mod fs_utils;
mod install;
mod target;
mod uninstall;

pub use install::{install_tree, InstallOptions, InstallOutcome};
pub use target::{resolve_target_root, TARGET_ROOT_ENV};
pub use uninstall::{reverse_manifest, UninstallOutcome};

/// One filesystem action taken by an install or uninstall run, reported as it
/// happens so the caller can render progress. Console output stays out of the
/// core algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
    },
    RemoveFile(PathBuf),
    RestoreBackup(PathBuf),
    RemoveDirectory(PathBuf),
}
