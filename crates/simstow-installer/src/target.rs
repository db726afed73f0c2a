use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

pub const TARGET_ROOT_ENV: &str = "SIMSTOW_TARGET_ROOT";

const SETUP_REGISTRY_KEY: &str =
    r"HKLM\SOFTWARE\Microsoft\microsoft games\flight simulator\10.0";
const SETUP_REGISTRY_VALUE: &str = "SetupPath";

/// Resolves the simulator's installation root: an explicit override wins, then
/// the environment, then the platform registry. Every path fails fast unless
/// the result names an existing directory — installing into an empty or bogus
/// destination is never attempted.
pub fn resolve_target_root(override_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = override_root {
        return validate_target_root(root.to_path_buf());
    }

    if let Ok(value) = env::var(TARGET_ROOT_ENV) {
        if !value.trim().is_empty() {
            return validate_target_root(PathBuf::from(value));
        }
    }

    let setup_path = query_registry_setup_path()?;
    validate_target_root(PathBuf::from(setup_path))
}

fn validate_target_root(root: PathBuf) -> Result<PathBuf> {
    if root.as_os_str().is_empty() {
        return Err(anyhow!("target application not found: empty install directory"));
    }
    if !root.is_dir() {
        return Err(anyhow!(
            "target application not found: {} is not a directory",
            root.display()
        ));
    }
    Ok(root)
}

fn query_registry_setup_path() -> Result<String> {
    let output = Command::new("reg")
        .args(["query", SETUP_REGISTRY_KEY, "/v", SETUP_REGISTRY_VALUE])
        .output()
        .with_context(|| {
            format!("registry lookup unavailable: set {TARGET_ROOT_ENV} or pass --target-root")
        })?;
    if !output.status.success() {
        return Err(anyhow!(
            "target application not found: registry key {SETUP_REGISTRY_KEY} is missing"
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_reg_query_output(&stdout, SETUP_REGISTRY_VALUE).ok_or_else(|| {
        anyhow!("target application not found: registry value {SETUP_REGISTRY_VALUE} is missing")
    })
}

/// Extracts a string value from `reg query` output, e.g.
/// `    SetupPath    REG_SZ    C:\Games\FSX`.
pub(crate) fn parse_reg_query_output(output: &str, value_name: &str) -> Option<String> {
    for line in output.lines().map(str::trim) {
        let Some(rest) = line.strip_prefix(value_name) else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(rest) = rest
            .strip_prefix("REG_EXPAND_SZ")
            .or_else(|| rest.strip_prefix("REG_SZ"))
        else {
            continue;
        };
        let value = rest.trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
