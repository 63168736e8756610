//! The infrascript command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use termcolor::ColorChoice;
use walkdir::WalkDir;

use crate::ast::{Template, TemplateBuilder};
use crate::cli::args::{Command, InfraArgs};
use crate::cli::diagnostics::{print_diagnostic_to_stderr, SyntaxDiagnostic};
use crate::cli::output::{print_error, Output};
use crate::config::Config;
use crate::errors::InfraError;
use crate::syntax::TemplateParser;

pub mod args;
pub mod diagnostics;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = InfraArgs::parse();
    init_logging(args.verbose);

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            print_error(error);
            return ExitCode::FAILURE;
        }
    };
    let session = Session {
        color: args.color.choice(config.pretty),
        config,
    };

    // Dispatch to the appropriate subcommand handler.
    let result = match &args.command {
        Command::Check { paths } => session.check(paths),
        Command::Tree { file } => session.tree(file).map(|_| true),
        Command::Tokens { file } => session.tokens(file).map(|_| true),
        Command::Ast { file, json } => session.ast(file, *json).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            session.report(error);
            ExitCode::FAILURE
        }
    }
}

/// `-v` steps through info, debug and trace; `RUST_LOG` overrides it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

struct Session {
    config: Config,
    color: ColorChoice,
}

impl Session {
    fn read(&self, path: &Path) -> Result<TemplateParser, InfraError> {
        let text = fs::read_to_string(path).map_err(|source| InfraError::io(path, source))?;
        log::info!("read {} ({} bytes)", path.display(), text.len());
        Ok(TemplateParser::with_config(text, &self.config).with_pretty(true))
    }

    fn output(&self) -> Output {
        Output::new(self.color)
    }

    /// Reports every file; `Ok(false)` if any failed to parse.
    fn check(&self, paths: &[PathBuf]) -> Result<bool, InfraError> {
        let files = collect_templates(paths, &self.config)?;
        let mut output = self.output();
        let mut failed = 0usize;

        for file in &files {
            let mut parser = self.read(file)?;
            match parser.parse() {
                Ok(_) => output.ok(file).map_err(|source| InfraError::io("<stdout>", source))?,
                Err(error) => {
                    failed += 1;
                    self.report(error.with_source_name(file.display().to_string()).into());
                }
            }
        }

        log::info!("checked {} templates, {} failed", files.len(), failed);
        Ok(failed == 0)
    }

    fn tree(&self, file: &Path) -> Result<(), InfraError> {
        let mut parser = self.read(file)?;
        let parsed = parser.parse().map_err(|error| error.with_source_name(file.display().to_string()))?;
        self.output()
            .tree(&parsed)
            .map_err(|source| InfraError::io("<stdout>", source))
    }

    fn tokens(&self, file: &Path) -> Result<(), InfraError> {
        let mut parser = self.read(file)?;
        let parsed = parser.parse().map_err(|error| error.with_source_name(file.display().to_string()))?;
        self.output()
            .tokens(&parsed)
            .map_err(|source| InfraError::io("<stdout>", source))
    }

    fn ast(&self, file: &Path, json: bool) -> Result<(), InfraError> {
        let mut parser = self.read(file)?;
        let parsed = parser.parse().map_err(|error| error.with_source_name(file.display().to_string()))?;
        let mut builder = TemplateBuilder::new();
        parsed.execute(&mut builder);
        let template: Template = builder.finish();

        let mut output = self.output();
        if json {
            return output.json(&template);
        }
        output
            .template(&template)
            .map_err(|source| InfraError::io("<stdout>", source))
    }

    fn report(&self, error: InfraError) {
        if let Some(syntax) = error.as_syntax() {
            let diagnostic = SyntaxDiagnostic::new(syntax).with_context_lines(self.config.snippet_context_lines);
            print_diagnostic_to_stderr(&diagnostic, self.color);
            return;
        }
        print_error(error);
    }
}

/// Expands directories into the templates under them, sorted; plain file
/// arguments are kept whatever their extension.
pub fn collect_templates(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, InfraError> {
    let mut files = Vec::new();
    for root in paths {
        if !root.is_dir() {
            files.push(root.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|error| {
                let path = error.path().unwrap_or(root.as_path()).to_path_buf();
                InfraError::io(path, error.into())
            })?;
            if entry.file_type().is_file() && config.matches_extension(entry.path()) {
                found.push(entry.path().to_path_buf());
            }
        }
        found.sort();
        log::debug!("{} templates under {}", found.len(), root.display());
        files.extend(found);
    }
    Ok(files)
}
