mod manifest;

pub use manifest::{
    backup_path, manifest_file_name, Manifest, ManifestRecord, ParsedManifest, RunCounters,
    BACKUP_SUFFIX, MANIFEST_EXTENSION, MANIFEST_FILE_PREFIX,
};

#[cfg(test)]
mod tests;
