use std::env;
use std::io::IsTerminal;

use anstyle::{AnsiColor, Style};
use simstow_core::RunCounters;
use simstow_installer::{ProgressEvent, UninstallOutcome};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

fn status_style() -> Style {
    Style::new().bold().fg_color(Some(AnsiColor::Cyan.into()))
}

fn warning_style() -> Style {
    Style::new().bold().fg_color(Some(AnsiColor::Yellow.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    let status = format!("{status:>8}");
    let status = match style {
        OutputStyle::Plain => status,
        OutputStyle::Rich => colorize(status_style(), &status),
    };
    format!("{status} {message}")
}

pub(crate) fn render_warning_line(style: OutputStyle, message: &str) -> String {
    let label = match style {
        OutputStyle::Plain => "warning:".to_string(),
        OutputStyle::Rich => colorize(warning_style(), "warning:"),
    };
    format!("{label} {message}")
}

pub(crate) fn render_progress_line(style: OutputStyle, event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::CopyFile {
            source,
            destination,
        } => render_status_line(
            style,
            "copy",
            &format!("{} -> {}", source.display(), destination.display()),
        ),
        ProgressEvent::RemoveFile(path) => {
            render_status_line(style, "remove", &path.display().to_string())
        }
        ProgressEvent::RestoreBackup(path) => {
            render_status_line(style, "restore", &path.display().to_string())
        }
        ProgressEvent::RemoveDirectory(path) => {
            render_status_line(style, "rmdir", &path.display().to_string())
        }
    }
}

pub(crate) fn format_install_summary(counters: &RunCounters) -> Vec<String> {
    vec![
        format!(
            "Processed {} files, {} directories.",
            counters.files_processed, counters.directories_processed
        ),
        format!("Files skipped: {}", counters.files_skipped),
        format!("Files backed up: {}", counters.files_backed_up),
    ]
}

pub(crate) fn format_uninstall_summary(outcome: &UninstallOutcome) -> Vec<String> {
    vec![
        format!(
            "Removed {} file(s), {} directory(ies).",
            outcome.files_removed, outcome.directories_removed
        ),
        format!("Backups restored: {}", outcome.backups_restored),
    ]
}
