use crate::error::{Result, SelectiveCopyError};
use crate::models::CandidateFile;
use crate::utils::{
    build_extension_matcher, canonical, copy_file, ensure_directory, list_matching_files,
    literal_suffix, normalize_extension_pattern, sha256_file,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for a selective copy run
#[derive(Debug, Clone)]
pub struct SelectiveCopyConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub extension: String,
    pub threshold: u32,
    pub ignore_case: bool,
    pub dry_run: bool,
    pub verify: bool,
}

impl Default for SelectiveCopyConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("caltech101"),
            dest_dir: PathBuf::from("caltech101_10"),
            extension: "*.jpg".to_string(),
            threshold: 10,
            ignore_case: false,
            dry_run: false,
            verify: false,
        }
    }
}

/// Copy every candidate whose identifier is within the threshold.
///
/// Diagnostic lines (one source path per selected file) go to stdout.
pub fn run_selective_copy(config: &SelectiveCopyConfig) -> Result<SelectiveCopyReport> {
    let stdout = std::io::stdout();
    run_selective_copy_with_output(config, &mut stdout.lock())
}

/// Same as [`run_selective_copy`], writing diagnostics to `out`.
pub fn run_selective_copy_with_output<W: Write>(
    config: &SelectiveCopyConfig,
    out: &mut W,
) -> Result<SelectiveCopyReport> {
    let started_at = Utc::now();
    let pattern = normalize_extension_pattern(&config.extension);

    info!(
        "Selecting {} files with identifier <= {} from {}",
        pattern,
        config.threshold,
        config.source_dir.display()
    );

    ensure_directory(&config.source_dir)?;
    ensure_directory(&config.dest_dir)?;

    let source_dir = canonical(&config.source_dir)?;
    if source_dir == canonical(&config.dest_dir)? {
        return Err(SelectiveCopyError::SameDirectory { path: source_dir });
    }

    let matcher = build_extension_matcher(&config.extension, config.ignore_case)?;
    let paths = list_matching_files(&config.source_dir, &matcher)?;

    info!("Found {} candidate files", paths.len());
    if paths.is_empty() {
        warn!("No files matching {} in {}", pattern, config.source_dir.display());
    }

    let suffix = literal_suffix(&pattern).map(str::to_string);
    let mut report = SelectiveCopyReport::new(config, pattern, started_at);
    report.candidates_found = paths.len();

    // Candidates are parsed one at a time so a bad name aborts before any
    // later file is touched.
    for path in paths {
        let candidate = CandidateFile::from_path(&path, suffix.as_deref())?;

        if !candidate.is_selected(config.threshold) {
            debug!(
                "Excluding {} (identifier {})",
                candidate.file_name, candidate.identifier
            );
            report.excluded += 1;
            continue;
        }

        writeln!(out, "{}", candidate.path.display()).map_err(|source| {
            SelectiveCopyError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            }
        })?;

        let destination = config.dest_dir.join(&candidate.file_name);
        let copied = if config.dry_run {
            CopiedFile::planned(&candidate, destination)?
        } else {
            copy_candidate(&candidate, destination, config.verify)?
        };
        report.copied.push(copied);
    }

    report.finished_at = Utc::now();

    info!(
        "Selective copy completed. Copied: {}, Excluded: {}, Bytes: {}",
        report.copied.len(),
        report.excluded,
        report.total_bytes()
    );

    Ok(report)
}

fn copy_candidate(
    candidate: &CandidateFile,
    destination: PathBuf,
    verify: bool,
) -> Result<CopiedFile> {
    debug!(
        "Copying {} to {}",
        candidate.path.display(),
        destination.display()
    );

    let bytes = copy_file(&candidate.path, &destination)?;

    let sha256 = if verify {
        Some(verify_copy(&candidate.path, &destination)?)
    } else {
        None
    };

    Ok(CopiedFile {
        file_name: candidate.file_name.clone(),
        identifier: candidate.identifier,
        source: candidate.path.clone(),
        destination,
        bytes,
        sha256,
    })
}

fn verify_copy(source: &Path, destination: &Path) -> Result<String> {
    let expected = sha256_file(source)?;
    let actual = sha256_file(destination)?;

    if expected != actual {
        return Err(SelectiveCopyError::VerificationFailed {
            file: destination.to_path_buf(),
        });
    }

    Ok(actual)
}

/// A file that was copied (or, on a dry run, would be).
#[derive(Debug, Clone, Serialize)]
pub struct CopiedFile {
    pub file_name: String,
    pub identifier: u32,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl CopiedFile {
    fn planned(candidate: &CandidateFile, destination: PathBuf) -> Result<Self> {
        let bytes = std::fs::metadata(&candidate.path)
            .map_err(|e| SelectiveCopyError::from_io(&candidate.path, e))?
            .len();

        Ok(Self {
            file_name: candidate.file_name.clone(),
            identifier: candidate.identifier,
            source: candidate.path.clone(),
            destination,
            bytes,
            sha256: None,
        })
    }
}

/// Report structure for a selective copy run
#[derive(Debug, Clone, Serialize)]
pub struct SelectiveCopyReport {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub pattern: String,
    pub threshold: u32,
    pub dry_run: bool,
    pub candidates_found: usize,
    pub copied: Vec<CopiedFile>,
    pub excluded: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SelectiveCopyReport {
    fn new(config: &SelectiveCopyConfig, pattern: String, started_at: DateTime<Utc>) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            dest_dir: config.dest_dir.clone(),
            pattern,
            threshold: config.threshold,
            dry_run: config.dry_run,
            candidates_found: 0,
            copied: Vec::new(),
            excluded: 0,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.copied.iter().map(|file| file.bytes).sum()
    }

    pub fn selection_rate(&self) -> f64 {
        if self.candidates_found == 0 {
            0.0
        } else {
            self.copied.len() as f64 / self.candidates_found as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
