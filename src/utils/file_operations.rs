use crate::error::{Result, SelectiveCopyError};
use globset::{GlobBuilder, GlobMatcher};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Turn `jpg`, `.jpg` or `*.jpg` into the glob `*.jpg`.
/// Anything already starting with `*` is taken as a full pattern.
pub fn normalize_extension_pattern(extension: &str) -> String {
    let extension = extension.trim();
    if extension.starts_with('*') {
        extension.to_string()
    } else if let Some(rest) = extension.strip_prefix('.') {
        format!("*.{}", rest)
    } else {
        format!("*.{}", extension)
    }
}

/// The fixed file-name ending of a normalized pattern, such as `.tar.gz` for
/// `*.tar.gz`. `None` when the rest of the pattern has wildcards of its own.
pub fn literal_suffix(pattern: &str) -> Option<&str> {
    let rest = pattern.strip_prefix('*')?;
    let has_wildcard =
        |c: char| matches!(c, '*' | '?' | '[' | ']' | '{' | '}' | '\\');
    if rest.is_empty() || rest.contains(has_wildcard) {
        return None;
    }
    Some(rest)
}

/// Compile the extension filter into a matcher applied to bare file names.
pub fn build_extension_matcher(extension: &str, ignore_case: bool) -> Result<GlobMatcher> {
    let pattern = normalize_extension_pattern(extension);

    let glob = GlobBuilder::new(&pattern)
        .case_insensitive(ignore_case)
        .literal_separator(true)
        .build()
        .map_err(|source| SelectiveCopyError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

    Ok(glob.compile_matcher())
}

/// Fail unless `path` exists and is a directory.
pub fn ensure_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| SelectiveCopyError::from_io(path, e))?;

    if !metadata.is_dir() {
        return Err(SelectiveCopyError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// List regular files directly inside `directory` whose name matches.
///
/// Dot-files are skipped, as a shell `*` would. The result is sorted by file
/// name; `read_dir` order is not stable across filesystems.
pub fn list_matching_files<P: AsRef<Path>>(
    directory: P,
    matcher: &GlobMatcher,
) -> Result<Vec<PathBuf>> {
    let dir_path = directory.as_ref();

    let entries = fs::read_dir(dir_path).map_err(|e| SelectiveCopyError::from_io(dir_path, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SelectiveCopyError::from_io(dir_path, e))?;
        let file_name = entry.file_name();

        if is_hidden(&file_name) || !matcher.is_match(Path::new(&file_name)) {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_hidden(file_name: &std::ffi::OsStr) -> bool {
    file_name
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Copy `source` to `destination`, replacing whatever is there.
/// Returns the number of bytes written.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<u64> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    // Creating the destination truncates it, so it must not be the source.
    if is_same_file(src_path, dest_path)? {
        return Err(SelectiveCopyError::SameFile {
            file: src_path.to_path_buf(),
            destination: dest_path.to_path_buf(),
        });
    }

    let mut reader = File::open(src_path).map_err(|e| SelectiveCopyError::from_io(src_path, e))?;
    let mut writer =
        File::create(dest_path).map_err(|e| SelectiveCopyError::from_io(dest_path, e))?;

    io::copy(&mut reader, &mut writer).map_err(|source| SelectiveCopyError::Io {
        path: dest_path.to_path_buf(),
        source,
    })
}

/// True when both paths resolve to the same file. A missing destination is
/// never the same file.
pub fn is_same_file(source: &Path, destination: &Path) -> Result<bool> {
    if !destination.exists() {
        return Ok(false);
    }

    Ok(canonical(source)? == canonical(destination)?)
}

/// `fs::canonicalize` with the error classified against `path`.
pub fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| SelectiveCopyError::from_io(path, e))
}

/// Hex SHA-256 of a file's content, read in 128KB chunks.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| SelectiveCopyError::from_io(path, e))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 128 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| SelectiveCopyError::from_io(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
