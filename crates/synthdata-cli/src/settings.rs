use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use synthdata_generate::{ExportFormat, GenerateOptions};

/// Row cap applied when neither the settings file nor a flag sets one.
pub const DEFAULT_MAX_ROWS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

/// Defaults read from `synthdata.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliSettings {
    pub run_dir: PathBuf,
    pub max_rows: u64,
    pub format: ExportFormat,
    pub workers: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub batch_size: usize,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            run_dir: PathBuf::from("runs"),
            max_rows: DEFAULT_MAX_ROWS,
            format: ExportFormat::Json,
            workers: None,
            timeout_ms: None,
            batch_size: GenerateOptions::default().batch_size,
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub run_dir: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub seed: Option<u64>,
    pub max_rows: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub workers: Option<usize>,
}

/// Effective settings for one run.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub run_dir: PathBuf,
    pub format: ExportFormat,
    pub options: GenerateOptions,
}

/// Load settings; a missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<CliSettings, SettingsError> {
    if !path.exists() {
        return Ok(CliSettings::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

impl CliSettings {
    pub fn resolve(&self, overrides: Overrides) -> Resolved {
        Resolved {
            run_dir: overrides.run_dir.unwrap_or_else(|| self.run_dir.clone()),
            format: overrides.format.unwrap_or(self.format),
            options: GenerateOptions {
                seed: overrides.seed,
                workers: overrides.workers.or(self.workers),
                batch_size: self.batch_size.max(1),
                max_rows: Some(overrides.max_rows.unwrap_or(self.max_rows)),
                timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: CliSettings = toml::from_str(
            r#"
run_dir = "out/runs"
format = "sql"
workers = 2
"#,
        )
        .expect("parse settings");
        assert_eq!(settings.run_dir, PathBuf::from("out/runs"));
        assert_eq!(settings.format, ExportFormat::Sql);
        assert_eq!(settings.workers, Some(2));
        assert_eq!(settings.max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<CliSettings>("rows = 3").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let settings = CliSettings {
            workers: Some(2),
            timeout_ms: Some(500),
            ..CliSettings::default()
        };
        let resolved = settings.resolve(Overrides {
            format: Some(ExportFormat::Csv),
            max_rows: Some(20),
            workers: Some(8),
            seed: Some(1),
            ..Overrides::default()
        });
        assert_eq!(resolved.format, ExportFormat::Csv);
        assert_eq!(resolved.run_dir, PathBuf::from("runs"));
        assert_eq!(resolved.options.max_rows, Some(20));
        assert_eq!(resolved.options.workers, Some(8));
        assert_eq!(resolved.options.timeout_ms, Some(500));
        assert_eq!(resolved.options.seed, Some(1));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("synthdata-{}.toml", uuid::Uuid::new_v4()));
        assert_eq!(load_settings(&path).expect("defaults"), CliSettings::default());
    }
}
