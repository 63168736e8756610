pub use crate::ast::{Template, TemplateBuilder};
pub use crate::errors::InfraError;
pub use crate::executor::{Callback, Executor, TemplateActions};
pub use crate::syntax::{ParsedTemplate, Rule, SyntaxError, TemplateParser};

pub mod ast;
pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod syntax;
