//! Utility functions for error handling
//!
//! This module provides file helpers that attach the path and the purpose of
//! the access to any IO failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, RiskError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(RiskError::io(
            format!("File not found: {} (needed for {purpose})", path.display()),
            io::Error::from(io::ErrorKind::NotFound),
        ));
    }

    if !path.is_file() {
        return Err(RiskError::io(
            format!("Path is not a file: {} (expected a file for {purpose})", path.display()),
            io::Error::from(io::ErrorKind::InvalidInput),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                format!("Permission denied opening {}", path.display())
            }
            _ => format!("Failed to open {} for {purpose}", path.display()),
        };
        RiskError::io(context, e)
    })
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    io::Read::read_to_string(&mut file, &mut content).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::InvalidData => {
                format!("{} contains invalid UTF-8 data", path.display())
            }
            _ => format!("Failed to read {} for {purpose}", path.display()),
        };
        RiskError::io(context, e)
    })?;

    Ok(content)
}

/// Open a file for appending, creating it (and its parent directory) if needed
///
/// Returns the file and whether it was newly created or empty.
pub fn open_for_append(path: &Path, purpose: &str) -> Result<(fs::File, bool)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            RiskError::io(
                format!("Failed to create directory {} for {purpose}", parent.display()),
                e,
            )
        })?;
    }

    let is_new = fs::metadata(path).map_or(true, |m| m.len() == 0);

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RiskError::io(format!("Failed to open {} for {purpose}", path.display()), e))?;

    Ok((file, is_new))
}
