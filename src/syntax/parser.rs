//! Parser facade over the matcher and grammar.
//!
//! A [`TemplateParser`] owns one parse session and can be reused: each call
//! to [`TemplateParser::parse`] resets position, records and the furthest
//! failure before matching. A successful parse borrows the session as a
//! [`ParsedTemplate`], which is the only way to reach the executor and the
//! syntax tree, so neither can run over a failed record list.

use std::io;

use termcolor::{NoColor, WriteColor};

use super::matcher::Matcher;
use super::tokens::write_tokens;
use super::{grammar, Buffer, Failure, Rule, SyntaxError, SyntaxTree, Token, TokenRecorder};
use crate::config::Config;
use crate::errors::InfraError;
use crate::executor::{Executor, TemplateActions};

#[derive(Debug, Clone)]
pub struct TemplateParser {
    matcher: Matcher,
    pretty: bool,
}

impl TemplateParser {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            matcher: Matcher::new(Buffer::new(text), TokenRecorder::DEFAULT_CAPACITY),
            pretty: false,
        }
    }

    /// Parser sized and colored according to `config`.
    pub fn with_config(text: impl Into<String>, config: &Config) -> Self {
        Self {
            matcher: Matcher::new(Buffer::new(text), config.initial_token_capacity),
            pretty: config.pretty.unwrap_or(false),
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Replaces the text for the next parse.
    pub fn load(&mut self, text: impl Into<String>) {
        self.matcher.load(text);
    }

    pub fn reset(&mut self) {
        self.matcher.reset();
    }

    /// Matches the whole text as a `Script`.
    pub fn parse(&mut self) -> Result<ParsedTemplate<'_>, SyntaxError> {
        if self.matcher.run(grammar::script) {
            return Ok(self.parsed());
        }
        let error = SyntaxError::new(self.matcher.failure(), self.matcher.buffer());
        log::debug!("{}", error);
        Err(error)
    }

    /// Matches a single production from the start of the text. Unlike
    /// [`TemplateParser::parse`], trailing input is allowed; see
    /// [`ParsedTemplate::consumed`].
    pub fn parse_rule(&mut self, rule: Rule) -> Result<ParsedTemplate<'_>, InfraError> {
        let start = grammar::parselet(rule).ok_or_else(|| InfraError::InvalidRule(rule.to_string()))?;
        if self.matcher.run(start) {
            return Ok(self.parsed());
        }
        Err(SyntaxError::new(self.matcher.failure(), self.matcher.buffer()).into())
    }

    fn parsed(&self) -> ParsedTemplate<'_> {
        ParsedTemplate {
            buffer: self.matcher.buffer(),
            tokens: self.matcher.tokens(),
            consumed: self.matcher.position(),
            pretty: self.pretty,
        }
    }

    /// Records of the last parse. Only meaningful after a success.
    pub fn tokens(&self) -> &[Token] {
        self.matcher.tokens()
    }

    pub fn buffer(&self) -> &Buffer {
        self.matcher.buffer()
    }

    /// The deepest failure of the last parse, `(Script, 0, 0)` if none.
    pub fn failure(&self) -> Failure {
        self.matcher.failure()
    }
}

/// The records of a successful parse together with the text they index.
#[derive(Debug, Clone, Copy)]
pub struct ParsedTemplate<'p> {
    buffer: &'p Buffer,
    tokens: &'p [Token],
    consumed: usize,
    pretty: bool,
}

impl<'p> ParsedTemplate<'p> {
    pub fn tokens(&self) -> &'p [Token] {
        self.tokens
    }

    pub fn buffer(&self) -> &'p Buffer {
        self.buffer
    }

    pub fn text(&self) -> &'p str {
        self.buffer.text()
    }

    /// Code points matched by the start rule.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn syntax_tree(&self) -> Option<SyntaxTree> {
        SyntaxTree::build(self.tokens)
    }

    /// Replays the records into `actions`.
    pub fn execute<A: TemplateActions + ?Sized>(&self, actions: &mut A) {
        Executor::new(self.buffer, self.tokens).run(actions);
    }

    pub fn print_tokens(&self, out: &mut impl WriteColor) -> io::Result<()> {
        if self.pretty {
            write_tokens(out, self.tokens)
        } else {
            write_tokens(&mut NoColor::new(out), self.tokens)
        }
    }

    /// Writes the syntax tree, colored only if the parser is pretty.
    pub fn print_syntax_tree(&self, out: &mut impl WriteColor) -> io::Result<()> {
        if self.pretty {
            self.pretty_print_syntax_tree(out)
        } else {
            self.pretty_print_syntax_tree(&mut NoColor::new(out))
        }
    }

    /// Writes the syntax tree with colors whenever `out` supports them.
    pub fn pretty_print_syntax_tree(&self, out: &mut impl WriteColor) -> io::Result<()> {
        match self.syntax_tree() {
            Some(tree) => tree.write_to(out, self.buffer),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_records_to_the_match() {
        let mut parser = TemplateParser::new("create vpc\n");
        let parsed = parser.parse().unwrap();
        let last = parsed.tokens().last().copied().unwrap();
        assert_eq!(last, Token::new(Rule::Script, 0, 11));
        assert_eq!(parsed.consumed(), 11);
    }

    #[test]
    fn reuse_after_failure_starts_clean() {
        let mut parser = TemplateParser::new("create unknownentity");
        assert!(parser.parse().is_err());
        assert_eq!(parser.failure().rule, Rule::Entity);

        parser.load("create vpc");
        assert!(parser.parse().is_ok());
        assert_eq!(parser.failure(), Failure::default());
    }

    #[test]
    fn parse_rule_allows_trailing_input() {
        let mut parser = TemplateParser::new("10.0.0.0/16 rest");
        let parsed = parser.parse_rule(Rule::Value).unwrap();
        assert_eq!(parsed.consumed(), 11);
    }

    #[test]
    fn parse_rule_rejects_markers() {
        let mut parser = TemplateParser::new("x");
        let error = parser.parse_rule(Rule::ExprDone).unwrap_err();
        assert!(matches!(error, InfraError::InvalidRule(name) if name == "ExprDone"));
    }

    #[test]
    fn plain_tree_has_no_escape_codes() {
        let mut parser = TemplateParser::new("create vpc");
        let parsed = parser.parse().unwrap();
        let mut out = NoColor::new(Vec::new());
        parsed.print_syntax_tree(&mut out).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("Script \"create vpc\"\n"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn parsers_move_across_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<TemplateParser>();

        let handle = std::thread::spawn(|| {
            let mut parser = TemplateParser::new("create vpc");
            parser.parse().map(|parsed| parsed.consumed()).ok()
        });
        assert_eq!(handle.join().unwrap(), Some(10));
    }
}
