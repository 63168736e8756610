//! Handles all user-facing output for the CLI.
//!
//! Every command writes through a `termcolor` stream built here, so the
//! `--color` choice applies uniformly.

use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Template;
use crate::errors::InfraError;
use crate::syntax::ParsedTemplate;

pub struct Output {
    stdout: StandardStream,
}

impl Output {
    pub fn new(color: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(color),
        }
    }

    /// `ok <path>` with the status in green.
    pub fn ok(&mut self, path: &Path) -> io::Result<()> {
        self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.stdout, "ok")?;
        self.stdout.reset()?;
        writeln!(self.stdout, " {}", path.display())
    }

    pub fn tokens(&mut self, parsed: &ParsedTemplate<'_>) -> io::Result<()> {
        parsed.print_tokens(&mut self.stdout)
    }

    pub fn tree(&mut self, parsed: &ParsedTemplate<'_>) -> io::Result<()> {
        parsed.print_syntax_tree(&mut self.stdout)
    }

    pub fn template(&mut self, template: &Template) -> io::Result<()> {
        write!(self.stdout, "{}", template)
    }

    pub fn json(&mut self, template: &Template) -> Result<(), InfraError> {
        let json = serde_json::to_string_pretty(template)?;
        writeln!(self.stdout, "{}", json).map_err(|source| InfraError::io("<stdout>", source))
    }
}

/// Prints a non-syntax error through miette's report handler.
pub fn print_error(error: InfraError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
