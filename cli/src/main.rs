//! beastcp - resumable, verified copy
//!
//! Copies a file or a directory tree, picking up where an interrupted run
//! stopped and checking every transferred file by SHA-256.

use beastcp::{
    CopyOptions, CopyOutcome, CopyStats, Error as BeastError, ErrorCode, SharedSink,
    TerminalProgress, TreeReport, copy_file, plan_tree, run_tree,
};
use clap::{Parser, ValueEnum};
use serde_json::{Value, json};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// beastcp - resumable, verified, parallel copy
///
/// Copy a file or directory. Partial destination files are resumed,
/// complete ones are skipped, and every copied file is verified by SHA-256.
///
/// Usage:
///   beastcp SOURCE DESTINATION
///   beastcp -f SOURCE DESTINATION   (resume into an existing destination)
#[derive(Parser, Debug)]
#[command(name = "beastcp", version, about, long_about = None)]
struct Args {
    /// Source file or directory
    source: PathBuf,

    /// Destination path
    destination: PathBuf,

    /// Number of parallel copy workers (directory copies only)
    #[arg(short = 't', long, default_value = "4")]
    threads: usize,

    /// Always rewrite destination files from the beginning
    #[arg(long)]
    no_resume: bool,

    /// Skip SHA-256 verification after copying
    #[arg(long)]
    no_verify: bool,

    /// Proceed even though the destination already exists
    #[arg(short = 'f', long)]
    force: bool,

    /// Also verify files skipped because they already look complete
    #[arg(long)]
    verify_existing: bool,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Read/write block size in bytes
    #[arg(long, value_name = "BYTES")]
    block_size: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Disable progress bars
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Source does not exist: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read source metadata: {path}: {source}")]
    SourceMetadata { path: PathBuf, source: io::Error },

    #[error("Destination exists: {path} (use -f/--force to resume or overwrite)")]
    DestinationExists { path: PathBuf },

    #[error("Failed to copy {path}: {source}")]
    Copy { path: PathBuf, source: BeastError },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::SourceNotFound { .. } => ErrorCode::SourceNotFound,
            Self::SourceMetadata { source, .. } => ErrorCode::from_io(source),
            Self::DestinationExists { .. } => ErrorCode::DestinationExists,
            Self::Copy { source, .. } => source.code(),
            Self::JsonSerialize { .. } => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone)]
struct EffectiveConfig {
    threads: usize,
    resume: bool,
    verify: bool,
    verify_existing: bool,
    fsync: bool,
    block_size: usize,
    force: bool,
}

impl EffectiveConfig {
    fn to_json_value(&self) -> Value {
        json!({
            "threads": self.threads,
            "resume": self.resume,
            "verify": self.verify,
            "verify_existing": self.verify_existing,
            "fsync": self.fsync,
            "block_size": self.block_size,
            "force": self.force,
        })
    }

    fn print_human_stderr(&self) {
        eprintln!("Effective configuration:");
        eprintln!("  threads: {}", self.threads);
        eprintln!("  resume: {}", self.resume);
        eprintln!("  verify: {}", self.verify);
        eprintln!("  verify_existing: {}", self.verify_existing);
        eprintln!("  fsync: {}", self.fsync);
        eprintln!("  block_size: {}", self.block_size);
    }
}

/// One file's result, as reported in JSON output.
#[derive(Debug, Clone)]
struct ExecuteItem {
    source: String,
    destination: String,
    outcome: &'static str,
    bytes_copied: Option<u64>,
    resumed_from: Option<u64>,
    verified: Option<bool>,
    error_code: Option<ErrorCode>,
    error_message: Option<String>,
}

impl ExecuteItem {
    fn new(source: &Path, destination: &Path, result: &beastcp::Result<CopyOutcome>) -> Self {
        let mut item = Self {
            source: display_path(source),
            destination: display_path(destination),
            outcome: "skipped",
            bytes_copied: None,
            resumed_from: None,
            verified: None,
            error_code: None,
            error_message: None,
        };
        match result {
            Ok(CopyOutcome::Copied {
                bytes_written,
                resumed_from,
                verified,
            }) => {
                item.outcome = "copied";
                item.bytes_copied = Some(*bytes_written);
                item.resumed_from = Some(*resumed_from);
                item.verified = Some(*verified);
            }
            Ok(CopyOutcome::SkippedAlreadyComplete) => {}
            Err(error) => {
                item.outcome = "failed";
                item.error_code = Some(error.code());
                item.error_message = Some(error.to_string());
            }
        }
        item
    }

    fn to_json_value(&self) -> Value {
        let mut obj = serde_json::Map::new();
        obj.insert("source".to_owned(), Value::String(self.source.clone()));
        obj.insert(
            "destination".to_owned(),
            Value::String(self.destination.clone()),
        );
        obj.insert("outcome".to_owned(), Value::String(self.outcome.to_owned()));
        if let Some(bytes) = self.bytes_copied {
            obj.insert("bytes_copied".to_owned(), Value::Number(bytes.into()));
        }
        if let Some(offset) = self.resumed_from {
            obj.insert("resumed_from".to_owned(), Value::Number(offset.into()));
        }
        if let Some(verified) = self.verified {
            obj.insert("verified".to_owned(), Value::Bool(verified));
        }
        if let Some(code) = self.error_code {
            obj.insert("error_code".to_owned(), Value::String(code.as_str().to_owned()));
        }
        if let Some(ref message) = self.error_message {
            obj.insert("error_message".to_owned(), Value::String(message.clone()));
        }
        Value::Object(obj)
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error[{}]: {}", error.code(), error);
        if let CliError::Copy { source, .. } = &error {
            for failure in source.failures() {
                eprintln!("  failed: {failure}");
            }
        }
        // Exit code 2 stays reserved for clap usage errors
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let src_meta = source_metadata(&args.source)?;

    if !args.force && fs::symlink_metadata(&args.destination).is_ok() {
        return Err(CliError::DestinationExists {
            path: args.destination.clone(),
        });
    }

    let (mut options, effective_config) = build_options_and_effective_config(&args);
    tracing::debug!(config = ?effective_config, "resolved copy options");
    if args.output == OutputMode::Human && args.verbose {
        effective_config.print_human_stderr();
    }

    let show_progress = args.output == OutputMode::Human && !args.quiet;

    if src_meta.is_dir() {
        let tasks = plan_tree(&args.source, &args.destination, &options).map_err(|source| {
            CliError::Copy {
                path: args.source.clone(),
                source,
            }
        })?;

        if args.output == OutputMode::Human {
            println!(
                "Found {} files, copying using {} threads",
                tasks.len(),
                options.parallel
            );
        }

        let progress = show_progress
            .then(|| Arc::new(TerminalProgress::with_file_count(tasks.len() as u64)));
        if let Some(progress) = &progress {
            options = options.with_shared_progress(SharedSink::from_arc(progress.clone()));
        }

        let report = run_tree(&args.destination, tasks, &options);
        if let Some(progress) = &progress {
            progress.finish();
        }
        let report = report.map_err(|source| CliError::Copy {
            path: args.source.clone(),
            source,
        })?;

        finish_tree(&args, &effective_config, report)
    } else {
        let progress = show_progress.then(|| Arc::new(TerminalProgress::new()));
        if let Some(progress) = &progress {
            options = options.with_shared_progress(SharedSink::from_arc(progress.clone()));
        }

        let start_time = Instant::now();
        let result = copy_file(&args.source, &args.destination, &options);
        if let Some(progress) = &progress {
            progress.finish();
        }

        let mut stats = CopyStats::default();
        stats.record(&result);
        stats.duration = start_time.elapsed();

        if args.output == OutputMode::Json {
            let item = ExecuteItem::new(&args.source, &args.destination, &result);
            emit_execute_output(&effective_config, &stats, &[item])?;
        }

        result.map_err(|source| CliError::Copy {
            path: args.source.clone(),
            source,
        })?;

        if args.output == OutputMode::Human {
            print_stats(&stats, args.verbose);
        }
        Ok(())
    }
}

fn source_metadata(path: &Path) -> CliResult<Metadata> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Err(CliError::SourceNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::SourceMetadata {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn build_options_and_effective_config(args: &Args) -> (CopyOptions, EffectiveConfig) {
    let mut options = CopyOptions::default().with_parallel(args.threads);

    if args.no_resume {
        options = options.without_resume();
    }
    if args.no_verify {
        options = options.without_verify();
    }
    if args.verify_existing {
        options = options.with_verify_skipped();
    }
    if args.no_sync {
        options = options.without_fsync();
    }
    if let Some(block_size) = args.block_size {
        options = options.with_block_size(block_size);
    }

    let effective_config = EffectiveConfig {
        threads: options.parallel,
        resume: options.resume,
        verify: options.verify,
        verify_existing: options.verify_skipped,
        fsync: options.fsync,
        block_size: options.block_size,
        force: args.force,
    };

    (options, effective_config)
}

fn finish_tree(
    args: &Args,
    effective_config: &EffectiveConfig,
    report: TreeReport,
) -> CliResult<()> {
    if args.output == OutputMode::Json {
        let items: Vec<ExecuteItem> = report
            .entries
            .iter()
            .map(|entry| {
                ExecuteItem::new(entry.task.source(), entry.task.destination(), &entry.result)
            })
            .collect();
        emit_execute_output(effective_config, &report.stats(), &items)?;
    }

    let stats = report.into_result().map_err(|source| CliError::Copy {
        path: args.source.clone(),
        source,
    })?;

    if args.output == OutputMode::Human {
        print_stats(&stats, args.verbose);
    }
    Ok(())
}

fn emit_execute_output(
    effective_config: &EffectiveConfig,
    stats: &CopyStats,
    items: &[ExecuteItem],
) -> CliResult<()> {
    let payload = json!({
        "schema_version": "1.0",
        "effective_config": effective_config.to_json_value(),
        "summary": {
            "files_processed": stats.files_processed(),
            "files_copied": stats.files_copied,
            "files_skipped": stats.files_skipped,
            "files_failed": stats.files_failed,
            "files_verified": stats.files_verified,
            "bytes_copied": stats.bytes_copied,
        },
        "items": items.iter().map(ExecuteItem::to_json_value).collect::<Vec<Value>>(),
    });
    print_json_value(&payload)
}

fn print_stats(stats: &CopyStats, verbose: bool) {
    let bytes_str = format_bytes(stats.bytes_copied);

    println!(
        "Done: {} files processed ({} copied, {} skipped, {})",
        stats.files_processed(),
        stats.files_copied,
        stats.files_skipped,
        bytes_str
    );

    if verbose {
        println!("  Verified:       {}", stats.files_verified);
        println!("  Elapsed:        {:?}", stats.duration);
        if stats.duration.as_secs_f64() > 0.0 {
            let speed = stats.bytes_copied as f64 / stats.duration.as_secs_f64();
            println!("  Speed:          {}/s", format_bytes(speed as u64));
        }
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
