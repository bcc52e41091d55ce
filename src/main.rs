use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;
use selective_copier::{run_selective_copy, AppConfig, SelectiveCopyConfig, SelectiveCopyReport};

fn main() -> Result<()> {
    // .env must be loaded before clap reads the environment
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let matches = build_cli().get_matches();

    let config = create_app_config(&matches)?;

    initialize_logging(&config.log_level)?;

    if !dotenv_loaded {
        debug!("No .env file found, using system environment variables");
    }

    if let Err(e) = run_application(&config) {
        error!("Selective copy aborted: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn build_cli() -> Command {
    Command::new("selective-copier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy files whose 4-digit numeric suffix is within a threshold")
        .arg(
            Arg::new("source-dir")
                .long("source-dir")
                .value_name("DIR")
                .env("SELECTIVE_COPY_SOURCE_DIR")
                .help("Directory to scan for candidate files")
                .value_parser(value_parser!(PathBuf))
                .default_value("caltech101"),
        )
        .arg(
            Arg::new("dest-dir")
                .long("dest-dir")
                .value_name("DIR")
                .env("SELECTIVE_COPY_DEST_DIR")
                .help("Existing directory receiving the selected files")
                .value_parser(value_parser!(PathBuf))
                .default_value("caltech101_10"),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .value_name("PATTERN")
                .env("SELECTIVE_COPY_EXTENSION")
                .help("Extension filter: jpg, .jpg or a glob such as *.jpg")
                .default_value("*.jpg"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .value_name("N")
                .env("SELECTIVE_COPY_THRESHOLD")
                .help("Inclusive upper bound on the file identifier")
                .value_parser(value_parser!(u32))
                .default_value("10"),
        )
        .arg(
            Arg::new("ignore-case")
                .long("ignore-case")
                .help("Match the extension filter case-insensitively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("List the files that would be copied without copying them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Compare SHA-256 digests of each copy against its source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("PATH")
                .help("Write a JSON report of the run to this file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
}

/// Build the application configuration from parsed arguments
fn create_app_config(matches: &clap::ArgMatches) -> Result<AppConfig> {
    let required_path = |name: &str| -> Result<PathBuf> {
        matches
            .get_one::<PathBuf>(name)
            .cloned()
            .with_context(|| format!("Missing value for --{}", name))
    };

    let extension = matches
        .get_one::<String>("extension")
        .cloned()
        .context("Missing value for --extension")?;

    let threshold = *matches
        .get_one::<u32>("threshold")
        .context("Missing value for --threshold")?;

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| "info".to_string());

    Ok(AppConfig {
        selective_copy: SelectiveCopyConfig {
            source_dir: required_path("source-dir")?,
            dest_dir: required_path("dest-dir")?,
            extension,
            threshold,
            ignore_case: matches.get_flag("ignore-case"),
            dry_run: matches.get_flag("dry-run"),
            verify: matches.get_flag("verify"),
        },
        report_path: matches.get_one::<PathBuf>("report").cloned(),
        log_level,
    })
}

/// Initialize structured logging with tracing, on stderr so stdout only
/// carries the copied file list
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

fn run_application(config: &AppConfig) -> Result<()> {
    info!("Starting selective copy");
    debug!("Configuration: {:#?}", config);

    let copy_config = &config.selective_copy;
    let report = run_selective_copy(copy_config).with_context(|| {
        format!(
            "Failed to copy from {} to {}",
            copy_config.source_dir.display(),
            copy_config.dest_dir.display()
        )
    })?;

    print_copy_report(&report);

    if let Some(path) = &config.report_path {
        let json = report.to_json().context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_copy_report(report: &SelectiveCopyReport) {
    let verb = if report.dry_run { "Would copy" } else { "Copied" };

    info!("=== SELECTIVE COPY REPORT ===");
    info!("Pattern: {} (identifier <= {})", report.pattern, report.threshold);
    info!("Candidates found: {}", report.candidates_found);
    info!("{}: {}", verb, report.copied.len());
    info!("Excluded: {}", report.excluded);
    info!("Bytes: {}", report.total_bytes());
    info!("Selection rate: {:.2}%", report.selection_rate() * 100.0);
    info!(
        "Elapsed: {} ms",
        (report.finished_at - report.started_at).num_milliseconds()
    );
}
