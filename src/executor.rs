//! Replays a successful parse as semantic callbacks.
//!
//! The executor walks the trimmed record list once, left to right. A
//! [`Rule::Text`] record loads the text register; the semantic marker after
//! it fires the matching [`TemplateActions`] callback with that text. Every
//! other record is structure and is skipped.

use serde::{Deserialize, Serialize};

use crate::syntax::{Buffer, Rule, Token};

/// Receiver of the callbacks fired by [`Executor::run`].
///
/// All methods default to doing nothing, so an implementor only overrides
/// the events it cares about.
pub trait TemplateActions {
    /// Left-hand name of a declaration.
    fn on_declaration_identifier(&mut self, _identifier: &str) {}
    fn on_action(&mut self, _action: &str) {}
    fn on_entity(&mut self, _entity: &str) {}
    fn on_param_key(&mut self, _key: &str) {}
    fn on_hole_value(&mut self, _hole: &str) {}
    fn on_alias_value(&mut self, _alias: &str) {}
    fn on_ref_value(&mut self, _reference: &str) {}
    fn on_cidr_value(&mut self, _cidr: &str) {}
    fn on_ip_value(&mut self, _ip: &str) {}
    /// Integer ranges and plain strings.
    fn on_generic_value(&mut self, _value: &str) {}
    fn on_int_value(&mut self, _value: &str) {}
    /// Fired after each expression and after each `//` comment.
    fn on_statement_end(&mut self) {}
}

/// One callback with its argument, for recording and comparing replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "callback", content = "text", rename_all = "snake_case")]
pub enum Callback {
    DeclarationIdentifier(String),
    Action(String),
    Entity(String),
    ParamKey(String),
    HoleValue(String),
    AliasValue(String),
    RefValue(String),
    CidrValue(String),
    IpValue(String),
    GenericValue(String),
    IntValue(String),
    StatementEnd,
}

impl TemplateActions for Vec<Callback> {
    fn on_declaration_identifier(&mut self, identifier: &str) {
        self.push(Callback::DeclarationIdentifier(identifier.to_string()));
    }

    fn on_action(&mut self, action: &str) {
        self.push(Callback::Action(action.to_string()));
    }

    fn on_entity(&mut self, entity: &str) {
        self.push(Callback::Entity(entity.to_string()));
    }

    fn on_param_key(&mut self, key: &str) {
        self.push(Callback::ParamKey(key.to_string()));
    }

    fn on_hole_value(&mut self, hole: &str) {
        self.push(Callback::HoleValue(hole.to_string()));
    }

    fn on_alias_value(&mut self, alias: &str) {
        self.push(Callback::AliasValue(alias.to_string()));
    }

    fn on_ref_value(&mut self, reference: &str) {
        self.push(Callback::RefValue(reference.to_string()));
    }

    fn on_cidr_value(&mut self, cidr: &str) {
        self.push(Callback::CidrValue(cidr.to_string()));
    }

    fn on_ip_value(&mut self, ip: &str) {
        self.push(Callback::IpValue(ip.to_string()));
    }

    fn on_generic_value(&mut self, value: &str) {
        self.push(Callback::GenericValue(value.to_string()));
    }

    fn on_int_value(&mut self, value: &str) {
        self.push(Callback::IntValue(value.to_string()));
    }

    fn on_statement_end(&mut self) {
        self.push(Callback::StatementEnd);
    }
}

/// Single pass over a successful parse's records.
#[derive(Debug, Clone, Copy)]
pub struct Executor<'p> {
    buffer: &'p Buffer,
    tokens: &'p [Token],
}

impl<'p> Executor<'p> {
    pub fn new(buffer: &'p Buffer, tokens: &'p [Token]) -> Self {
        Self { buffer, tokens }
    }

    pub fn run<A: TemplateActions + ?Sized>(&self, actions: &mut A) {
        let mut text = "";
        let mut fired = 0usize;

        for token in self.tokens {
            match token.rule {
                Rule::Text => {
                    text = token.text(self.buffer);
                    continue;
                }
                Rule::DeclarationIdentifier => actions.on_declaration_identifier(text),
                Rule::ActionName => actions.on_action(text),
                Rule::EntityName => actions.on_entity(text),
                Rule::ParamKey => actions.on_param_key(text),
                Rule::HoleParam => actions.on_hole_value(text),
                Rule::AliasParam => actions.on_alias_value(text),
                Rule::RefParam => actions.on_ref_value(text),
                Rule::CidrParam => actions.on_cidr_value(text),
                Rule::IpParam => actions.on_ip_value(text),
                Rule::RangeParam | Rule::StringParam => actions.on_generic_value(text),
                Rule::IntParam => actions.on_int_value(text),
                Rule::ExprDone | Rule::CommentDone => actions.on_statement_end(),
                _ => continue,
            }
            fired += 1;
        }

        log::debug!("executed {} callbacks from {} records", fired, self.tokens.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_uses_the_latest_capture() {
        let buffer = Buffer::new("vpc subnet");
        let tokens = [
            Token::new(Rule::Text, 0, 3),
            Token::new(Rule::Entity, 0, 3),
            Token::new(Rule::Text, 4, 10),
            Token::new(Rule::EntityName, 10, 10),
            Token::new(Rule::ExprDone, 10, 10),
        ];
        let mut calls = Vec::new();
        Executor::new(&buffer, &tokens).run(&mut calls);
        assert_eq!(
            calls,
            vec![Callback::Entity("subnet".into()), Callback::StatementEnd]
        );
    }

    #[test]
    fn structural_records_fire_nothing() {
        let buffer = Buffer::new("x");
        let tokens = [Token::new(Rule::Identifier, 0, 1), Token::new(Rule::Script, 0, 1)];
        let mut calls = Vec::new();
        Executor::new(&buffer, &tokens).run(&mut calls);
        assert!(calls.is_empty());
    }

    #[test]
    fn callbacks_serialize_with_a_tag() {
        let json = serde_json::to_string(&Callback::CidrValue("10.0.0.0/16".into())).unwrap();
        assert_eq!(json, r#"{"callback":"cidr_value","text":"10.0.0.0/16"}"#);
    }
}
