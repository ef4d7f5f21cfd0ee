// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tessel CLI entrypoint.
//!
//! Opens (or starts) a diagram file in the interactive editor. A missing file is created on the
//! first `:w`.

use std::error::Error;
use std::path::{Path, PathBuf};

use tessel::editor::{Editor, EditorConfig};
use tessel::model::DiagramKind;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<file>] [--sequence] [--history <n>] [--trace <log-file>]\n\n<file> is a diagram JSON file; it is created on the first :w if it does not exist.\n--sequence starts a new diagram as a sequence diagram instead of a box diagram.\n--history sets how many undo snapshots are kept (default {}).\n--trace writes debug events to <log-file>; RUST_LOG controls the filter.",
        tessel::history::DEFAULT_CAPACITY
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    sequence: bool,
    history: Option<usize>,
    trace: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sequence" => {
                if options.sequence {
                    return Err(());
                }
                options.sequence = true;
            }
            "--history" => {
                if options.history.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let capacity: usize = raw.parse().map_err(|_| ())?;
                if capacity == 0 {
                    return Err(());
                }
                options.history = Some(capacity);
            }
            "--trace" => {
                if options.trace.is_some() {
                    return Err(());
                }
                options.trace = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(arg);
            }
        }
    }

    Ok(options)
}

fn init_tracing(path: &Path) -> Result<(), Box<dyn Error>> {
    let log_file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tessel".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Some(trace) = &options.trace {
            init_tracing(Path::new(trace))?;
        }

        let kind = if options.sequence { DiagramKind::Sequence } else { DiagramKind::Box };
        let file = options.file.map(PathBuf::from);
        let diagram = match &file {
            Some(path) => tessel::store::load_or_new(path, kind)?,
            None => tessel::model::Diagram::new(kind),
        };
        tracing::info!(
            file = ?file,
            kind = diagram.kind().as_str(),
            nodes = diagram.nodes().len(),
            connections = diagram.connections().len(),
            "starting editor"
        );

        let mut config = EditorConfig::default();
        if let Some(capacity) = options.history {
            config = config.with_history_capacity(capacity);
        }
        tessel::tui::run(Editor::with_config(diagram, config), file)
    })();

    if let Err(err) = result {
        eprintln!("tessel: {err}");
        std::process::exit(1);
    }
}
