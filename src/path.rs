//! Output path normalization and validation.
//!
//! Performed before any compilation work so a bad path never produces a
//! partial export.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path contains more than one colon or a semicolon")]
    ForbiddenSeparator,
    #[error("file name contains invalid characters")]
    InvalidFileName,
    #[error("neither the target file nor its directory exists")]
    MissingDirectory,
    #[error("expected a .js or .json file extension")]
    WrongExtension,
}

/// Characters never allowed in a file name on any supported OS.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Normalize and validate an output path, returning the path that will be
/// written.
///
/// Rules, in order:
/// 1. Append `.json` unless the path already ends with it.
/// 2. Reject more than one colon (a single one covers a drive letter) or
///    any semicolon.
/// 3. Reject file names containing OS-invalid characters.
/// 4. Reject when neither the target file nor its parent directory exists.
/// 5. Reject when the caller named an extension other than `.js`/`.json`
///    (case-insensitive).
pub fn validate_output_path(input: &str) -> Result<PathBuf, PathError> {
    let mut path = input.to_string();
    if !path.ends_with(".json") {
        path.push_str(".json");
    }

    if path.matches(':').count() > 1 || path.contains(';') {
        return Err(PathError::ForbiddenSeparator);
    }

    let target = PathBuf::from(&path);
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(PathError::InvalidFileName)?;
    if file_name
        .chars()
        .any(|c| INVALID_FILENAME_CHARS.contains(&c) || c.is_control())
    {
        return Err(PathError::InvalidFileName);
    }

    // A bare file name writes into the current directory.
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !target.is_file() && !parent.is_dir() {
        return Err(PathError::MissingDirectory);
    }

    // The extension check runs against the caller's input: normalization
    // would otherwise mask something like `scene.txt` as `scene.txt.json`.
    if parent.is_dir() {
        if let Some(ext) = Path::new(input).extension().and_then(|e| e.to_str()) {
            if !ext.eq_ignore_ascii_case("js") && !ext.eq_ignore_ascii_case("json") {
                return Err(PathError::WrongExtension);
            }
        }
    }

    Ok(target)
}
