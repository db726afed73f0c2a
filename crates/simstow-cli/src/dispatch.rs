use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use simstow_core::{manifest_file_name, Manifest, MANIFEST_EXTENSION};
use simstow_installer::{install_tree, resolve_target_root, reverse_manifest, InstallOptions};

use crate::render::{
    current_output_style, format_install_summary, format_uninstall_summary, render_progress_line,
    render_status_line, render_warning_line,
};

pub(crate) fn run_cli(path: &Path, target_root_override: Option<&Path>) -> Result<()> {
    if path.is_dir() {
        run_install(path, target_root_override)
    } else if is_manifest_file(path) {
        run_uninstall(path)
    } else {
        Err(anyhow!(
            "expected an add-on directory or a .{MANIFEST_EXTENSION} uninstall manifest, got: {}",
            path.display()
        ))
    }
}

pub(crate) fn is_manifest_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|v| v.to_str()) == Some(MANIFEST_EXTENSION)
}

fn run_install(source_root: &Path, target_root_override: Option<&Path>) -> Result<()> {
    let style = current_output_style();
    let target_root = resolve_target_root(target_root_override)?;
    println!(
        "{}",
        render_status_line(style, "target", &target_root.display().to_string())
    );

    let outcome = install_tree(
        source_root,
        &target_root,
        InstallOptions::default(),
        &mut |event| println!("{}", render_progress_line(style, event)),
    )?;

    let saved_at = Local::now();
    let manifest = Manifest {
        source_dir: source_root.display().to_string(),
        target_root: target_root.display().to_string(),
        saved_at: saved_at.to_rfc2822(),
        counters: outcome.counters,
        records: outcome.records,
    };
    let file_name = manifest_file_name(&saved_at.naive_local());
    fs::write(&file_name, manifest.to_xml_string()?)
        .with_context(|| format!("failed to write uninstall manifest: {file_name}"))?;
    println!("{}", render_status_line(style, "saved", &file_name));

    for line in format_install_summary(&manifest.counters) {
        println!("{line}");
    }
    Ok(())
}

fn run_uninstall(manifest_path: &Path) -> Result<()> {
    let style = current_output_style();
    let raw = fs::read_to_string(manifest_path)
        .with_context(|| format!("failed to read manifest: {}", manifest_path.display()))?;
    let parsed = Manifest::parse_records(&raw)
        .with_context(|| format!("failed to parse manifest: {}", manifest_path.display()))?;
    for diagnostic in &parsed.diagnostics {
        eprintln!("{}", render_warning_line(style, diagnostic));
    }

    let outcome = reverse_manifest(&parsed.records, &mut |event| {
        println!("{}", render_progress_line(style, event))
    })?;

    for line in format_uninstall_summary(&outcome) {
        println!("{line}");
    }
    Ok(())
}
