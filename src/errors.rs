//! Crate-level error type.
//!
//! Parsing itself only ever fails with a [`SyntaxError`]; everything else
//! here comes from the surfaces around it: reading templates and config from
//! disk, and serializing results.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::syntax::SyntaxError;

#[derive(Error, Diagnostic, Debug)]
pub enum InfraError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("cannot read {}", .path.display())]
    #[diagnostic(code(infrascript::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    #[diagnostic(
        code(infrascript::config),
        help("see `infrascript --help` for the recognized settings")
    )]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot serialize output")]
    #[diagnostic(code(infrascript::json))]
    Json(#[from] serde_json::Error),

    #[error("'{0}' is not a grammar production")]
    #[diagnostic(code(infrascript::rule), help("pick one of the named productions, e.g. Value"))]
    InvalidRule(String),
}

impl InfraError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The syntax error inside, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(error) => Some(error),
            _ => None,
        }
    }
}

pub type Result<T, E = InfraError> = std::result::Result<T, E>;
