//! Defines the command-line arguments and subcommands for the infrascript CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use termcolor::ColorChoice;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "infrascript",
    version,
    about = "Parse, check and inspect infrastructure templates."
)]
pub struct InfraArgs {
    /// YAML config file; defaults to ./infrascript.yaml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to color output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `auto` with the config's `pretty` setting, then with whether
    /// stdout is a terminal.
    pub fn choice(self, pretty: Option<bool>) -> ColorChoice {
        match (self, pretty) {
            (ColorMode::Always, _) | (ColorMode::Auto, Some(true)) => ColorChoice::Always,
            (ColorMode::Never, _) | (ColorMode::Auto, Some(false)) => ColorChoice::Never,
            (ColorMode::Auto, None) if std::io::stdout().is_terminal() => ColorChoice::Auto,
            (ColorMode::Auto, None) => ColorChoice::Never,
        }
    }
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse templates and report the first syntax error in each.
    Check {
        /// Template files, or directories to search by extension.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the concrete syntax tree of a template.
    Tree {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the flat token records of a template.
    Tokens {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the structured template built from a file.
    Ast {
        #[arg(required = true)]
        file: PathBuf,
        /// Emit JSON instead of template text.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = InfraArgs::try_parse_from(["infrascript", "tree", "a.aws", "-vv", "--color", "never"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.color, ColorMode::Never);
        assert!(matches!(args.command, Command::Tree { .. }));
    }

    #[test]
    fn check_needs_a_path() {
        assert!(InfraArgs::try_parse_from(["infrascript", "check"]).is_err());
    }

    #[test]
    fn explicit_mode_beats_config() {
        assert_eq!(ColorMode::Never.choice(Some(true)), ColorChoice::Never);
        assert_eq!(ColorMode::Auto.choice(Some(true)), ColorChoice::Always);
    }
}
