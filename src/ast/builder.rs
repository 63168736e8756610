use crate::executor::TemplateActions;

use super::{Command, ParamValue, Statement, Template};

/// Assembles a [`Template`] from executor callbacks.
///
/// A statement is opened by `on_action`, filled by entity and parameter
/// callbacks, and closed by `on_statement_end`. An end with no open
/// statement comes from a `//` comment line and is dropped.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    template: Template,
    identifier: Option<String>,
    command: Option<Command>,
    key: Option<String>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Template {
        self.template
    }

    fn insert(&mut self, value: ParamValue) {
        let (Some(command), Some(key)) = (self.command.as_mut(), self.key.take()) else {
            log::warn!("parameter value {} has no open key", value);
            return;
        };
        command.params.insert(key, value);
    }
}

impl TemplateActions for TemplateBuilder {
    fn on_declaration_identifier(&mut self, identifier: &str) {
        self.identifier = Some(identifier.to_string());
    }

    fn on_action(&mut self, action: &str) {
        self.command = Some(Command {
            action: action.to_string(),
            ..Command::default()
        });
    }

    fn on_entity(&mut self, entity: &str) {
        if let Some(command) = self.command.as_mut() {
            command.entity = entity.to_string();
        }
    }

    fn on_param_key(&mut self, key: &str) {
        self.key = Some(key.to_string());
    }

    fn on_hole_value(&mut self, hole: &str) {
        self.insert(ParamValue::Hole(hole.to_string()));
    }

    fn on_alias_value(&mut self, alias: &str) {
        self.insert(ParamValue::Alias(alias.to_string()));
    }

    fn on_ref_value(&mut self, reference: &str) {
        self.insert(ParamValue::Ref(reference.to_string()));
    }

    fn on_cidr_value(&mut self, cidr: &str) {
        self.insert(ParamValue::Cidr(cidr.to_string()));
    }

    fn on_ip_value(&mut self, ip: &str) {
        self.insert(ParamValue::Ip(ip.to_string()));
    }

    fn on_generic_value(&mut self, value: &str) {
        self.insert(ParamValue::Generic(value.to_string()));
    }

    fn on_int_value(&mut self, value: &str) {
        let value = match value.parse::<i64>() {
            Ok(number) => ParamValue::Int(number),
            Err(_) => {
                log::debug!("{} does not fit in i64, keeping it as text", value);
                ParamValue::Generic(value.to_string())
            }
        };
        self.insert(value);
    }

    fn on_statement_end(&mut self) {
        let Some(command) = self.command.take() else {
            return;
        };
        let statement = match self.identifier.take() {
            Some(identifier) => Statement::Declaration { identifier, command },
            None => Statement::Command(command),
        };
        self.template.statements.push(statement);
    }
}
