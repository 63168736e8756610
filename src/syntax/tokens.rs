//! Flat token records produced by successful rule matches.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use termcolor::{Color, ColorSpec, WriteColor};

use super::{Buffer, Rule, Span};

/// A matched rule over the half-open code point range `begin..end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Token {
    pub rule: Rule,
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub fn new(rule: Rule, begin: usize, end: usize) -> Self {
        Self { rule, begin, end }
    }

    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn text<'b>(&self, buffer: &'b Buffer) -> &'b str {
        buffer.slice(self.span())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.rule, self.begin, self.end)
    }
}

/// Growable record store indexed by the matcher's token index.
///
/// Slots past the current index may hold records from abandoned
/// alternatives; they are overwritten on the next write and dropped by
/// [`TokenRecorder::trim`].
#[derive(Debug, Clone)]
pub struct TokenRecorder {
    tree: Vec<Token>,
}

impl TokenRecorder {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: vec![Token::default(); capacity.max(1)],
        }
    }

    /// Writes a record at `index`, doubling the store when it is full.
    pub fn add(&mut self, rule: Rule, begin: usize, end: usize, index: usize) {
        if index >= self.tree.len() {
            let expanded = (self.tree.len() * 2).max(index + 1);
            log::trace!("token store grows {} -> {}", self.tree.len(), expanded);
            self.tree.resize(expanded, Token::default());
        }
        self.tree[index] = Token::new(rule, begin, end);
    }

    /// Keeps exactly the first `length` records.
    pub fn trim(&mut self, length: usize) {
        self.tree.truncate(length);
    }

    /// Restores the pre-allocated size after a trim so the store can be
    /// reused for another parse.
    pub fn reserve_slots(&mut self, capacity: usize) {
        if self.tree.len() < capacity {
            self.tree.resize(capacity, Token::default());
        }
    }

    pub fn capacity(&self) -> usize {
        self.tree.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tree
    }
}

impl Default for TokenRecorder {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

/// Writes one record per line as `Rule begin end`, the rule name in blue
/// when the writer supports color.
pub fn write_tokens(out: &mut impl WriteColor, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(out, "{}", token.rule)?;
        out.reset()?;
        writeln!(out, " {} {}", token.begin, token.end)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_when_index_reaches_capacity() {
        let mut recorder = TokenRecorder::with_capacity(2);
        recorder.add(Rule::Identifier, 0, 1, 0);
        recorder.add(Rule::Identifier, 1, 2, 1);
        assert_eq!(recorder.capacity(), 2);
        recorder.add(Rule::Value, 2, 3, 2);
        assert_eq!(recorder.capacity(), 4);
        recorder.add(Rule::Value, 3, 4, 4);
        assert_eq!(recorder.capacity(), 8);
        assert_eq!(recorder.tokens()[2], Token::new(Rule::Value, 2, 3));
    }

    #[test]
    fn rewound_index_overwrites_stale_records() {
        let mut recorder = TokenRecorder::with_capacity(4);
        recorder.add(Rule::IntValue, 0, 2, 0);
        recorder.add(Rule::Text, 0, 2, 1);
        recorder.add(Rule::StringValue, 0, 3, 0);
        recorder.trim(1);
        assert_eq!(recorder.tokens(), &[Token::new(Rule::StringValue, 0, 3)]);
    }

    #[test]
    fn reserve_slots_refills_after_trim() {
        let mut recorder = TokenRecorder::with_capacity(8);
        recorder.trim(0);
        recorder.reserve_slots(8);
        assert_eq!(recorder.capacity(), 8);
    }

    #[test]
    fn token_display_matches_listing_format() {
        assert_eq!(Token::new(Rule::Entity, 7, 10).to_string(), "Entity 7 10");
    }

    #[test]
    fn plain_listing_has_no_escape_codes() {
        let mut out = termcolor::NoColor::new(Vec::new());
        write_tokens(&mut out, &[Token::new(Rule::Action, 0, 6)]).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "Action 0 6\n");
    }
}
