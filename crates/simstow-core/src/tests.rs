use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{backup_path, manifest_file_name, Manifest, ManifestRecord, RunCounters};

fn sample_manifest() -> Manifest {
    Manifest {
        source_dir: "/home/user/addon".to_string(),
        target_root: "/opt/fsx".to_string(),
        saved_at: "Mon, 31 Aug 2026 14:30:05 +0000".to_string(),
        counters: RunCounters {
            files_processed: 2,
            directories_processed: 1,
            files_skipped: 0,
            files_backed_up: 1,
        },
        records: vec![
            ManifestRecord {
                location: PathBuf::from("/opt/fsx/a.txt"),
                backup_created: true,
            },
            ManifestRecord {
                location: PathBuf::from("/opt/fsx/sub/b.txt"),
                backup_created: false,
            },
        ],
    }
}

#[test]
fn manifest_file_name_encodes_save_timestamp() {
    let saved_at = NaiveDate::from_ymd_opt(2026, 8, 31)
        .expect("must build date")
        .and_hms_milli_opt(14, 30, 5, 123)
        .expect("must build time");
    assert_eq!(
        manifest_file_name(&saved_at),
        "UninstallConfig_2026-08-31_14-30-05-123.xml"
    );
}

#[test]
fn manifest_serializes_records_in_append_order() {
    let xml = sample_manifest().to_xml_string().expect("must serialize");

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>"));
    assert!(xml.contains("Source directory: /home/user/addon"));
    assert!(xml.contains("Please do not modify"));

    let first = xml
        .find("<file location=\"/opt/fsx/a.txt\" backupCreated=\"true\"/>")
        .expect("must contain first record");
    let second = xml
        .find("<file location=\"/opt/fsx/sub/b.txt\" backupCreated=\"false\"/>")
        .expect("must contain second record");
    assert!(first < second, "records must keep append order");
}

#[test]
fn manifest_summary_reflects_counters() {
    let xml = sample_manifest().to_xml_string().expect("must serialize");
    assert!(xml.contains("Processed: 2 files, 1 directories"));
    assert!(xml.contains("Skipped 0 file(s)."));
    assert!(xml.contains("Backed up 1 file(s)."));
}

#[test]
fn manifest_round_trips_through_xml() {
    let manifest = sample_manifest();
    let xml = manifest.to_xml_string().expect("must serialize");
    let parsed = Manifest::parse_records(&xml).expect("must parse");

    assert_eq!(parsed.records, manifest.records);
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn manifest_escapes_special_characters_in_locations() {
    let manifest = Manifest {
        records: vec![ManifestRecord {
            location: PathBuf::from("/opt/fsx/a & b/\"quoted\".txt"),
            backup_created: false,
        }],
        ..sample_manifest()
    };

    let xml = manifest.to_xml_string().expect("must serialize");
    let parsed = Manifest::parse_records(&xml).expect("must parse");
    assert_eq!(parsed.records, manifest.records);
}

#[test]
fn parse_skips_record_missing_location_with_diagnostic() {
    let xml = r#"<?xml version="1.0"?>
<files>
  <file backupCreated="true"/>
  <file location="/opt/fsx/kept.txt" backupCreated="false"/>
</files>"#;

    let parsed = Manifest::parse_records(xml).expect("must parse");
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].location, PathBuf::from("/opt/fsx/kept.txt"));
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].contains("missing location attribute"));
}

#[test]
fn parse_skips_record_with_invalid_backup_flag() {
    let xml = r#"<files><file location="/opt/fsx/a.txt" backupCreated="maybe"/></files>"#;

    let parsed = Manifest::parse_records(xml).expect("must parse");
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0].contains("invalid backupCreated value"));
}

#[test]
fn parse_rejects_document_without_files_root() {
    let err = Manifest::parse_records("<other/>").expect_err("must reject");
    assert!(err.to_string().contains("no <files> element"));

    Manifest::parse_records("not xml at all").expect_err("must reject plain text");
}

#[test]
fn parse_accepts_empty_files_element() {
    let parsed = Manifest::parse_records("<files></files>").expect("must parse");
    assert!(parsed.records.is_empty());
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn backup_path_appends_suffix() {
    assert_eq!(
        backup_path(Path::new("/opt/fsx/a.txt")),
        PathBuf::from("/opt/fsx/a.txt.bak")
    );
}
