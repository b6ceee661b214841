use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use synthdata_generate::{
    ExportFormat, GenerateOptions, GenerationReport, RecordValidation, ValidationSummary,
    validation_summary,
};

use super::{RegistryResult, write_artifact, write_json_artifact};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub request_path: PathBuf,
    pub run_dir: PathBuf,
    pub format: ExportFormat,
    pub options: GenerateOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub command: &'a str,
    pub request: String,
    pub format: ExportFormat,
    pub options: &'a GenerateOptions,
    pub version: &'static str,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
}

/// Create `{run_dir}/{timestamp}__run_{id}` with its config and an empty log.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));
    create_dir_all(&root)?;

    let paths = RunPaths {
        config_path: root.join("config.json"),
        logs_path: root.join("logs.ndjson"),
        report_path: root.join("generation_report.json"),
        root,
    };

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        command: &ctx.command,
        request: ctx.request_path.display().to_string(),
        format: ctx.format,
        options: &ctx.options,
        version: env!("CARGO_PKG_VERSION"),
    };
    write_json_artifact(&paths.config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

/// Store an export as `{stem}.{ext}` in the run directory and, when given,
/// in `out_dir` as well. Returns the run-directory copy.
pub fn write_export(
    paths: &RunPaths,
    stem: &str,
    format: ExportFormat,
    contents: &str,
    out_dir: Option<&Path>,
) -> RegistryResult<PathBuf> {
    let file_name = format!("{stem}.{}", format.extension());
    let path = paths.root.join(&file_name);
    write_artifact(&path, contents.as_bytes())?;
    if let Some(out_dir) = out_dir {
        write_artifact(&out_dir.join(&file_name), contents.as_bytes())?;
    }
    Ok(path)
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json_artifact(&paths.report_path, report)
}

#[derive(Debug, Serialize)]
struct ValidationArtifact<'a> {
    summary: &'a ValidationSummary,
    results: &'a [RecordValidation],
}

/// Write `validation_report.json` with the summary and per-record results.
pub fn write_validation(
    paths: &RunPaths,
    results: &[RecordValidation],
) -> RegistryResult<ValidationSummary> {
    let summary = validation_summary(results);
    write_json_artifact(
        &paths.root.join("validation_report.json"),
        &ValidationArtifact {
            summary: &summary,
            results,
        },
    )?;
    Ok(summary)
}
