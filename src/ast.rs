//! Structured templates assembled from executor callbacks.
//!
//! This is the reference receiver for [`crate::executor::TemplateActions`]:
//! [`TemplateBuilder`] turns one replay into a [`Template`], a list of
//! commands with their parameters in source order. Nothing here checks that
//! an action makes sense for an entity, or resolves references.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::InfraError;
use crate::syntax::TemplateParser;

pub mod builder;

pub use builder::TemplateBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Template {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `identifier = action entity params...`
    Declaration { identifier: String, command: Command },
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Command {
    pub action: String,
    pub entity: String,
    pub params: IndexMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Cidr(String),
    Ip(String),
    Int(i64),
    /// Integer ranges, plain strings, and integers too large for `i64`.
    Generic(String),
    /// `$name`
    Ref(String),
    /// `@name`
    Alias(String),
    /// `{name}`
    Hole(String),
}

impl Template {
    /// Parses `text` and replays it into a [`TemplateBuilder`].
    pub fn parse(text: &str) -> Result<Self, InfraError> {
        let mut parser = TemplateParser::new(text);
        let parsed = parser.parse()?;
        let mut builder = TemplateBuilder::default();
        parsed.execute(&mut builder);
        Ok(builder.finish())
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.statements.iter().map(Statement::command)
    }

    /// Names of every `{hole}` in order of first appearance.
    pub fn holes(&self) -> Vec<&str> {
        self.collect_names(|value| match value {
            ParamValue::Hole(name) => Some(name),
            _ => None,
        })
    }

    /// Names of every `$reference` in order of first appearance.
    pub fn references(&self) -> Vec<&str> {
        self.collect_names(|value| match value {
            ParamValue::Ref(name) => Some(name),
            _ => None,
        })
    }

    fn collect_names<'t>(&'t self, pick: impl Fn(&'t ParamValue) -> Option<&'t String>) -> Vec<&'t str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.commands().flat_map(|command| command.params.values()).filter_map(pick) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

impl Statement {
    pub fn command(&self) -> &Command {
        match self {
            Statement::Declaration { command, .. } => command,
            Statement::Command(command) => command,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match self {
            Statement::Declaration { identifier, .. } => Some(identifier),
            Statement::Command(_) => None,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Declaration { identifier, command } => write!(f, "{} = {}", identifier, command),
            Statement::Command(command) => write!(f, "{}", command),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.entity)?;
        for (key, value) in &self.params {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Cidr(text) | ParamValue::Ip(text) | ParamValue::Generic(text) => f.write_str(text),
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Ref(name) => write!(f, "${}", name),
            ParamValue::Alias(name) => write!(f, "@{}", name),
            ParamValue::Hole(name) => write!(f, "{{{}}}", name),
        }
    }
}
