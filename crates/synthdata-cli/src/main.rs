mod registry;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use registry::{
    RegistryError, RunContext, init_run_logging, start_run, write_export, write_report,
    write_validation,
};
use settings::{Overrides, SettingsError, load_settings};
use synthdata_core::{
    Category, DEFAULT_TABLE_NAME, Error as CoreError, TypeInfo, catalog,
    generate_request_json_schema, parse_generate_request, parse_relational_request,
    relational_request_json_schema,
};
use synthdata_generate::output::{export_dataset, export_table};
use synthdata_generate::masking::mask_table_seeded;
use synthdata_generate::{
    ExportFormat, FieldRules, GenerationEngine, GenerationError, MaskRules, validate_table,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "synthdata", version, about = "Synthetic test data generator")]
struct Cli {
    /// Settings file with run defaults.
    #[arg(long, global = true, default_value = "synthdata.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one table from a `{fields, count}` request.
    Generate(GenerateArgs),
    /// Generate related tables from a `{tables, relations}` request.
    Relational(RelationalArgs),
    /// List the value types.
    Types(TypesArgs),
    /// Print the JSON Schema of a request document.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Request document (JSON).
    #[arg(long, value_name = "FILE")]
    request: PathBuf,
    /// Export format: json, csv or sql.
    #[arg(long)]
    format: Option<ExportFormat>,
    /// Directory for run artifacts.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Largest row count accepted per table.
    #[arg(long)]
    max_rows: Option<u64>,
    /// Wall-clock budget in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Worker threads.
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    run: RunArgs,
    /// Also write the export to this file.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Table name used by SQL exports.
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    table_name: String,
    /// Masking rules keyed by column, applied before export.
    #[arg(long, value_name = "FILE")]
    mask: Option<PathBuf>,
    /// Record rules keyed by column, checked against the unmasked rows.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RelationalArgs {
    #[command(flatten)]
    run: RunArgs,
    /// Also write the exports into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TypesArgs {
    /// Only list types of this category.
    #[arg(long)]
    category: Option<Category>,
    /// Print the catalog as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    #[arg(value_enum)]
    kind: SchemaKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    Generate,
    Relational,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(&cli.config, args).await,
        Command::Relational(args) => run_relational(&cli.config, args).await,
        Command::Types(args) => print_types(args),
        Command::Schema(args) => print_schema(args.kind),
    }
}

struct PreparedRun {
    ctx: RunContext,
    paths: registry::RunPaths,
    engine: GenerationEngine,
    request: Value,
}

fn prepare_run(config: &Path, command: &str, args: RunArgs) -> Result<PreparedRun, CliError> {
    let settings = load_settings(config)?;
    let resolved = settings.resolve(Overrides {
        run_dir: args.run_dir,
        format: args.format,
        seed: args.seed,
        max_rows: args.max_rows,
        timeout_ms: args.timeout_ms,
        workers: args.workers,
    });
    if resolved.options.workers == Some(0) {
        return Err(CliError::InvalidConfig("--workers must be at least 1".to_string()));
    }

    let contents = std::fs::read_to_string(&args.request)?;
    let request: Value = serde_json::from_str(&contents)?;

    let ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        request_path: args.request,
        run_dir: resolved.run_dir,
        format: resolved.format,
        options: resolved.options.clone(),
    };
    let paths = start_run(&ctx)?;
    init_run_logging(&paths)?;

    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        command,
        format = %ctx.format,
        request = %ctx.request_path.display()
    );

    Ok(PreparedRun {
        engine: GenerationEngine::new(resolved.options),
        ctx,
        paths,
        request,
    })
}

async fn run_generate(config: &Path, args: GenerateArgs) -> Result<(), CliError> {
    let PreparedRun {
        ctx,
        paths,
        engine,
        request,
    } = prepare_run(config, "generate", args.run)?;
    let timer = Instant::now();

    let request = parse_generate_request(&request)
        .inspect_err(|err| tracing::warn!(event = "request_rejected", error = %err))?;
    let mask_rules: Option<MaskRules> = args.mask.as_deref().map(read_json).transpose()?;
    let field_rules: Option<FieldRules> = args.rules.as_deref().map(read_json).transpose()?;
    let outcome = tokio::task::spawn_blocking(move || {
        let mut result = engine.run_table(&request.fields, request.count)?;
        let validation = field_rules
            .map(|rules| validate_table(&result.data, &rules))
            .transpose()?;
        if let Some(rules) = mask_rules {
            mask_table_seeded(&mut result.data, &rules, result.report.seed)?;
        }
        Ok::<_, GenerationError>((result, validation))
    })
    .await?;
    let (mut result, validation) = outcome.inspect_err(|err| {
        tracing::warn!(event = "run_failed", kind = err.kind(), error = %err)
    })?;
    result.report.run_id = ctx.run_id.clone();

    if let Some(results) = validation {
        let summary = write_validation(&paths, &results)?;
        tracing::info!(
            event = "records_validated",
            valid = summary.valid_count,
            invalid = summary.invalid_count
        );
    }

    let contents = export_table(&result.data, ctx.format, &args.table_name)?;
    let export_path = write_export(&paths, "data", ctx.format, &contents, None)?;
    if let Some(out) = args.out.as_deref() {
        registry::write_artifact(out, contents.as_bytes())?;
        tracing::info!(event = "export_copied", path = %out.display());
    } else {
        println!("{contents}");
    }
    write_report(&paths, &result.report)?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        rows = result.data.len(),
        export = %export_path.display(),
        duration_ms = timer.elapsed().as_millis() as u64
    );
    eprintln!("run written to {}", paths.root.display());
    Ok(())
}

async fn run_relational(config: &Path, args: RelationalArgs) -> Result<(), CliError> {
    let PreparedRun {
        ctx,
        paths,
        engine,
        request,
    } = prepare_run(config, "relational", args.run)?;
    let timer = Instant::now();

    let request = parse_relational_request(&request)
        .inspect_err(|err| tracing::warn!(event = "request_rejected", error = %err))?;
    let outcome = tokio::task::spawn_blocking(move || {
        engine.run_relational(&request.tables, &request.relations)
    })
    .await?;
    let mut result = outcome.inspect_err(|err| {
        tracing::warn!(event = "run_failed", kind = err.kind(), error = %err)
    })?;
    result.report.run_id = ctx.run_id.clone();

    for (stem, contents) in export_dataset(&result.data, ctx.format)? {
        let path = write_export(&paths, &stem, ctx.format, &contents, args.out_dir.as_deref())?;
        tracing::info!(event = "export_written", path = %path.display());
    }
    write_report(&paths, &result.report)?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = result.data.len(),
        rows = result.report.rows_total,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    eprintln!("run written to {}", paths.root.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_types(args: TypesArgs) -> Result<(), CliError> {
    let entries: Vec<TypeInfo> = match args.category {
        Some(category) => category.types(),
        None => catalog(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for info in entries {
        println!("{:<16}{:<12}{}", info.id.as_str(), info.category.as_str(), info.name);
    }
    Ok(())
}

fn print_schema(kind: SchemaKind) -> Result<(), CliError> {
    let schema = match kind {
        SchemaKind::Generate => generate_request_json_schema(),
        SchemaKind::Relational => relational_request_json_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
