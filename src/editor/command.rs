// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write(Option<PathBuf>),
    WriteQuit(Option<PathBuf>),
    Quit { force: bool },
    Export { format: String, path: Option<PathBuf> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingExportFormat,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty command"),
            Self::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            Self::MissingExportFormat => f.write_str("usage: export <format> [file]"),
        }
    }
}

impl std::error::Error for CommandError {}

/// A save the host should perform. `None` means the file the diagram came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: String,
    pub path: Option<PathBuf>,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Empty);
    };
    let arg = words.next().map(PathBuf::from);

    match name {
        "w" | "write" => Ok(Command::Write(arg)),
        "wq" => Ok(Command::WriteQuit(arg)),
        "q" | "quit" => Ok(Command::Quit { force: false }),
        "q!" | "quit!" => Ok(Command::Quit { force: true }),
        "export" => {
            let Some(format) = arg else {
                return Err(CommandError::MissingExportFormat);
            };
            Ok(Command::Export {
                format: format.to_string_lossy().into_owned(),
                path: words.next().map(PathBuf::from),
            })
        }
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}
