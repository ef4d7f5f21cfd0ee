// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram files on disk.
//!
//! Diagrams are stored as pretty JSON. Saves go through a temp file in the same directory and
//! are renamed into place, so a crash never leaves a half-written diagram behind.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Diagram, DiagramKind};
use crate::render::Renderer;


#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    UnsupportedFormat { format: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::UnsupportedFormat { format } => write!(f, "unsupported export format: {format}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(StoreError::UnsupportedFormat { format: s.to_owned() }),
        }
    }
}

pub fn load_diagram(path: &Path) -> Result<Diagram, StoreError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

/// Loads `path`, or starts an empty diagram of `kind` if the file does not exist yet.
pub fn load_or_new(path: &Path, kind: DiagramKind) -> Result<Diagram, StoreError> {
    match load_diagram(path) {
        Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(Diagram::new(kind))
        }
        other => other,
    }
}

pub fn save_diagram(path: &Path, diagram: &Diagram) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(diagram)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Writes `diagram` to `path` as `format`. Text exports use `renderer`.
pub fn export_diagram(
    path: &Path,
    diagram: &Diagram,
    format: ExportFormat,
    renderer: &dyn Renderer,
) -> Result<(), StoreError> {
    match format {
        ExportFormat::Json => save_diagram(path, diagram),
        ExportFormat::Text => {
            let mut text = renderer.render(diagram).text;
            text.push('\n');
            write_atomic(path, text.as_bytes())
        }
    }
}

/// `diagram.json` exports to `diagram.txt`; without a source file, `diagram.<ext>`.
pub fn default_export_path(source: Option<&Path>, format: ExportFormat) -> PathBuf {
    let base = source.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("diagram"));
    base.with_extension(format.extension())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| StoreError::Io { path, source }
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        });
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path = parent.join(format!(".tessel.tmp.{}.{nanos}", file_name.to_string_lossy()));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    file.write_all(contents).map_err(io_err(&tmp_path))?;
    file.sync_all().map_err(io_err(&tmp_path))?;
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
