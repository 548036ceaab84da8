// Copyright 2025 Oxide Computer Company

//! Command-line renderer for the specdiff engine
//!
//! Reads two specification documents, prints the classified diff as JSON on
//! stdout, and exits nonzero when breaking changes are present, so the tool
//! can gate CI merges.

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use clap::ValueEnum;
use specdiff::diff_specs;
use specdiff::ConfigLogging;
use specdiff::ConfigLoggingLevel;
use specdiff::SpecDocument;
use std::process::ExitCode;

/// Exit code when the diff contains breaking changes.
const BREAKING_EXIT_CODE: u8 = 1;
/// Exit code for usage, I/O, and parse failures.
const FAILURE_EXIT_CODE: u8 = 2;

/// Compare two Swagger/OpenAPI documents.
///
/// Prints the classified diff as JSON.  Exits 0 when the new document is
/// compatible, 1 when breaking changes are present.
#[derive(Debug, Parser)]
#[clap(name = "specdiff", version)]
struct App {
    /// Specification that existing clients were written against
    old: Utf8PathBuf,

    /// Proposed replacement specification
    new: Utf8PathBuf,

    /// Stderr log level
    #[clap(long, value_enum, default_value_t = LogLevel::Error)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for ConfigLoggingLevel {
    fn from(level: LogLevel) -> ConfigLoggingLevel {
        match level {
            LogLevel::Trace => ConfigLoggingLevel::Trace,
            LogLevel::Debug => ConfigLoggingLevel::Debug,
            LogLevel::Info => ConfigLoggingLevel::Info,
            LogLevel::Warn => ConfigLoggingLevel::Warn,
            LogLevel::Error => ConfigLoggingLevel::Error,
        }
    }
}

fn main() -> ExitCode {
    let app = App::parse();
    match app.exec() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            eprintln!("failure: {:#}", error);
            FAILURE_EXIT_CODE.into()
        }
    }
}

impl App {
    fn exec(&self) -> Result<ExitCode> {
        let log = ConfigLogging::StderrTerminal {
            level: self.log_level.into(),
        }
        .to_logger("specdiff")
        .context("failed to create logger")?;

        let old = load_document(&self.old)?;
        let new = load_document(&self.new)?;

        let report = diff_specs(&log, &old, &new);
        println!("{}", serde_json::to_string_pretty(&report)?);

        let breaking = !report.endpoints.breaking.is_empty()
            || !report.models.breaking.is_empty();
        if breaking {
            Ok(BREAKING_EXIT_CODE.into())
        } else {
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_document(path: &Utf8Path) -> Result<SpecDocument> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path))?;
    let document: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {} as JSON", path))?;
    SpecDocument::from_json(&document)
        .with_context(|| format!("{} is not a specification document", path))
}
