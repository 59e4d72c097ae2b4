//! File-level conversion
//!
//! Reads a whole file, converts it in memory, then writes the result. The write
//! only happens after the conversion finished, so a failure never leaves a
//! half-written file behind. No backup is made.

use crate::convert::Converter;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Error raised when a target cannot be read or its output cannot be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAccessError {
    Read { path: PathBuf, message: String },
    Write { path: PathBuf, message: String },
}

impl FileAccessError {
    fn read(path: &Path, err: std::io::Error) -> Self {
        FileAccessError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    fn write(path: &Path, err: std::io::Error) -> Self {
        FileAccessError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileAccessError::Read { path, .. } | FileAccessError::Write { path, .. } => path,
        }
    }
}

impl fmt::Display for FileAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAccessError::Read { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            FileAccessError::Write { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for FileAccessError {}

/// Where converted text goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Overwrite the source file
    #[default]
    InPlace,
    /// Write a sibling file with the suffix inserted before the extension
    Suffix(String),
    /// Print the converted text; nothing is written
    Stdout,
}

impl OutputMode {
    /// Resolve the destination for `source`.
    pub fn destination(&self, source: &Path) -> Destination {
        match self {
            OutputMode::InPlace => Destination::File(source.to_path_buf()),
            OutputMode::Suffix(suffix) => Destination::File(suffixed_path(source, suffix)),
            OutputMode::Stdout => Destination::Stdout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => write!(f, "<stdout>"),
        }
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub destination: Destination,
    pub spans: usize,
}

/// `scripts/grader.js` + `-fixed` -> `scripts/grader-fixed.js`
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Fold `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(source: String) -> String {
    if !source.contains('\r') {
        return source;
    }
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// Read a target as UTF-8 with normalized line endings.
pub fn read_source(path: &Path) -> Result<String, FileAccessError> {
    fs::read_to_string(path)
        .map(normalize_line_endings)
        .map_err(|e| FileAccessError::read(path, e))
}

/// Convert the file at `path` and write the result according to `mode`.
pub fn convert_file(
    path: impl AsRef<Path>,
    converter: &Converter,
    mode: &OutputMode,
) -> Result<FileReport, FileAccessError> {
    let path = path.as_ref();
    let source = read_source(path)?;
    let conversion = converter.convert(&source);
    let destination = mode.destination(path);

    match &destination {
        Destination::File(target) => {
            fs::write(target, &conversion.text).map_err(|e| FileAccessError::write(target, e))?;
        }
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(conversion.text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| FileAccessError::write(Path::new("<stdout>"), e))?;
        }
    }

    tracing::info!(
        source = %path.display(),
        destination = %destination,
        spans = conversion.spans,
        strategy = %converter.strategy(),
        "converted file"
    );

    Ok(FileReport {
        source: path.to_path_buf(),
        destination,
        spans: conversion.spans,
    })
}
