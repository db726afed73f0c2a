use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

pub const BACKUP_SUFFIX: &str = ".bak";
pub const MANIFEST_EXTENSION: &str = "xml";
pub const MANIFEST_FILE_PREFIX: &str = "UninstallConfig_";

const FILE_NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%3f";
const DO_NOT_MODIFY_COMMENT: &str =
    "\tThis is an uninstallation configuration file. Please do not modify.\t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub location: PathBuf,
    pub backup_created: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub files_processed: usize,
    pub directories_processed: usize,
    pub files_skipped: usize,
    pub files_backed_up: usize,
}

/// An install run's full transaction log: one record per file copied, in the
/// exact order the tree copier visited them, plus the run summary that heads
/// the saved document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub source_dir: String,
    pub target_root: String,
    pub saved_at: String,
    pub counters: RunCounters,
    pub records: Vec<ManifestRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedManifest {
    pub records: Vec<ManifestRecord>,
    pub diagnostics: Vec<String>,
}

impl Manifest {
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))))?;
        writer.write_event(Event::Comment(BytesText::new(&self.summary_comment())))?;
        writer.write_event(Event::Comment(BytesText::new(DO_NOT_MODIFY_COMMENT)))?;
        writer.write_event(Event::Start(BytesStart::new("files")))?;
        for record in &self.records {
            let mut element = BytesStart::new("file");
            element.push_attribute(("location", record.location.to_string_lossy().as_ref()));
            element.push_attribute((
                "backupCreated",
                if record.backup_created { "true" } else { "false" },
            ));
            writer.write_event(Event::Empty(element))?;
        }
        writer.write_event(Event::End(BytesEnd::new("files")))?;

        String::from_utf8(writer.into_inner()).context("manifest xml is not valid utf-8")
    }

    /// Parses the per-record elements back out of a saved manifest. The
    /// summary comment block is presentation only and is not read back. A
    /// document without a `files` root is rejected outright; a `file` element
    /// with a missing or unparseable attribute is skipped with a diagnostic
    /// while the remaining records proceed.
    pub fn parse_records(input: &str) -> Result<ParsedManifest> {
        let mut reader = Reader::from_str(input);
        let mut records = Vec::new();
        let mut diagnostics = Vec::new();
        let mut saw_root = false;

        loop {
            match reader.read_event().context("malformed manifest xml")? {
                Event::Start(element) | Event::Empty(element) => {
                    match element.name().as_ref() {
                        b"files" => saw_root = true,
                        b"file" => match parse_file_element(&element) {
                            Ok(record) => records.push(record),
                            Err(err) => diagnostics
                                .push(format!("skipping manifest record {}: {err}", records.len() + 1)),
                        },
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(anyhow!("not an uninstall manifest: no <files> element"));
        }

        Ok(ParsedManifest {
            records,
            diagnostics,
        })
    }

    fn summary_comment(&self) -> String {
        format!(
            "\n\n\tSource directory: {}\n\tDestination directory: {}\n\tTime stamp: {}\n\tProcessed: {} files, {} directories\n\tSkipped {} file(s).\n\tBacked up {} file(s).\n\n",
            self.source_dir,
            self.target_root,
            self.saved_at,
            self.counters.files_processed,
            self.counters.directories_processed,
            self.counters.files_skipped,
            self.counters.files_backed_up,
        )
    }
}

fn parse_file_element(element: &BytesStart) -> Result<ManifestRecord> {
    let location = element
        .try_get_attribute("location")?
        .context("missing location attribute")?
        .unescape_value()?;
    let flag = element
        .try_get_attribute("backupCreated")?
        .context("missing backupCreated attribute")?
        .unescape_value()?;
    let backup_created = match flag.as_ref() {
        "true" => true,
        "false" => false,
        other => return Err(anyhow!("invalid backupCreated value: {other}")),
    };

    Ok(ManifestRecord {
        location: PathBuf::from(location.as_ref()),
        backup_created,
    })
}

/// The `.bak` path that shadows `location` while an install run's replacement
/// is in place.
pub fn backup_path(location: &Path) -> PathBuf {
    let mut raw = location.as_os_str().to_os_string();
    raw.push(BACKUP_SUFFIX);
    PathBuf::from(raw)
}

/// Save-timestamped manifest file name; millisecond precision keeps repeated
/// runs from colliding.
pub fn manifest_file_name(saved_at: &NaiveDateTime) -> String {
    format!(
        "{MANIFEST_FILE_PREFIX}{}.{MANIFEST_EXTENSION}",
        saved_at.format(FILE_NAME_TIMESTAMP_FORMAT)
    )
}
