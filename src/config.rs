//! Settings for reading benchmark directories and for the viewer.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::institution::Institution;

/// File the viewer looks for in the working directory.
pub const SETTINGS_FILE: &str = "squeeze-bench.json";

/// What to do when a single file in a directory cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The first failing file aborts the whole read.
    #[default]
    Abort,
    /// Failing files are logged, recorded as skipped, and left out.
    Skip,
}

/// Options for one directory read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Sort files by name instead of keeping the filesystem's order.
    #[serde(default)]
    pub sort_by_name: bool,
}

/// Viewer configuration, loaded from [`SETTINGS_FILE`] when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default)]
    pub read: ReadOptions,

    #[serde(default = "default_institution")]
    pub default_institution: Institution,

    /// Plot against displacement when a record has no gap column.
    #[serde(default = "default_gap_axis_fallback")]
    pub gap_axis_fallback: bool,
}

fn default_institution() -> Institution {
    Institution::Kit
}

fn default_gap_axis_fallback() -> bool {
    true
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            read: ReadOptions::default(),
            default_institution: default_institution(),
            gap_axis_fallback: default_gap_axis_fallback(),
        }
    }
}

impl ViewerSettings {
    /// Load settings from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Load [`SETTINGS_FILE`] from `dir` if it exists, defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        if !path.exists() {
            log::debug!("No {} in {}, using defaults", SETTINGS_FILE, dir.display());
            return Ok(Self::default());
        }
        let settings = Self::from_json_file(&path)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_abort_and_keep_scan_order() {
        let opts = ReadOptions::default();
        assert_eq!(opts.failure_policy, FailurePolicy::Abort);
        assert!(!opts.sort_by_name);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ViewerSettings =
            serde_json::from_str(r#"{ "read": { "failure_policy": "skip" } }"#).unwrap();
        assert_eq!(settings.read.failure_policy, FailurePolicy::Skip);
        assert!(!settings.read.sort_by_name);
        assert_eq!(settings.default_institution, Institution::Kit);
        assert!(settings.gap_axis_fallback);
    }

    #[test]
    fn empty_object_is_default() {
        let settings: ViewerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ViewerSettings::default());
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(
            ViewerSettings::load_or_default(dir.path()).unwrap(),
            ViewerSettings::default()
        );

        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "default_institution": "ut", "read": { "sort_by_name": true } }"#,
        )
        .unwrap();
        let settings = ViewerSettings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings.default_institution, Institution::Ut);
        assert!(settings.read.sort_by_name);
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ nope").unwrap();
        assert!(ViewerSettings::load_or_default(dir.path()).is_err());
    }
}
