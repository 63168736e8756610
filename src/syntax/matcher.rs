//! Backtracking matcher primitives.
//!
//! Every primitive returns whether it matched and leaves the parser state
//! untouched when it did not. Composite matchers save a [`Checkpoint`] before
//! each attempt and restore it verbatim on failure, so an abandoned
//! alternative leaves no trace: its position is rewound and any records it
//! wrote sit past the token index, where the next write overwrites them.

use super::buffer::END_SYMBOL;
use super::error::Failure;
use super::{Buffer, Rule, Token, TokenRecorder};

/// A matcher body that can be stored in ordered-choice tables.
pub type Parselet = fn(&mut Matcher) -> bool;

/// Inclusive character ranges; a single character is `(c, c)`.
pub type CharClass = [(char, char)];

/// Parser state saved before an attempt and restored if it fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Checkpoint {
    pub position: usize,
    pub token_index: usize,
}

/// Owns one parse session: the buffer, the record store, the position and
/// record count, and the furthest failure.
#[derive(Debug, Clone)]
pub struct Matcher {
    buffer: Buffer,
    tokens: TokenRecorder,
    capacity: usize,
    position: usize,
    token_index: usize,
    // furthest offset reached inside the innermost active rule attempt
    reach: usize,
    failure: Failure,
}

impl Matcher {
    pub fn new(buffer: Buffer, capacity: usize) -> Self {
        Self {
            buffer,
            tokens: TokenRecorder::with_capacity(capacity),
            capacity,
            position: 0,
            token_index: 0,
            reach: 0,
            failure: Failure::default(),
        }
    }

    /// Clears position, record count and furthest failure, and refills the
    /// record store to its initial size.
    pub fn reset(&mut self) {
        self.position = 0;
        self.token_index = 0;
        self.reach = 0;
        self.failure = Failure::default();
        self.buffer.normalize();
        self.tokens.reserve_slots(self.capacity);
    }

    /// Replaces the input text and resets.
    pub fn load(&mut self, text: impl Into<String>) {
        self.buffer.load(text);
        self.reset();
    }

    /// Runs `start` from offset zero. On success the record store is trimmed
    /// to exactly the records the match produced.
    pub fn run(&mut self, start: Parselet) -> bool {
        self.reset();
        let matched = start(self);
        if matched {
            self.tokens.trim(self.token_index);
        }
        log::debug!(
            "match {} at offset {} with {} records",
            if matched { "succeeded" } else { "failed" },
            self.position,
            self.token_index
        );
        matched
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Records written so far; after a successful [`Matcher::run`] this is
    /// exactly the match output.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens.tokens()[..self.token_index.min(self.tokens.capacity())]
    }

    pub fn failure(&self) -> Failure {
        self.failure
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn token_index(&self) -> usize {
        self.token_index
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            token_index: self.token_index,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.token_index = checkpoint.token_index;
    }

    /// The character under the cursor, `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.buffer.char_at(self.position)
    }

    #[inline]
    fn advance(&mut self) {
        self.position += 1;
        if self.position > self.reach {
            self.reach = self.position;
        }
    }

    fn add(&mut self, rule: Rule, begin: usize) {
        self.tokens.add(rule, begin, self.position, self.token_index);
        self.token_index += 1;
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Consumes `expected` or nothing.
    pub fn literal(&mut self, expected: char) -> bool {
        if self.buffer.at(self.position) == expected as u32 {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes one character inside any of the ranges.
    pub fn class(&mut self, class: &CharClass) -> bool {
        let c = self.buffer.at(self.position);
        if class
            .iter()
            .any(|&(low, high)| low as u32 <= c && c <= high as u32)
        {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes any character except the end-of-input sentinel.
    pub fn any(&mut self) -> bool {
        if self.buffer.at(self.position) != END_SYMBOL {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes `word` exactly, or nothing.
    pub fn keyword(&mut self, word: &str) -> bool {
        self.sequence(|m| word.chars().all(|c| m.literal(c)))
    }

    /// Ordered choice over literal words; the first full match wins.
    pub fn keywords(&mut self, words: &[&str]) -> bool {
        words.iter().any(|word| self.keyword(word))
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Runs `body` as one unit: either all of it matches or the state is
    /// restored to where it began.
    pub fn sequence(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        if body(self) {
            return true;
        }
        self.restore(checkpoint);
        false
    }

    /// Tries each alternative in order from the same checkpoint.
    pub fn choice(&mut self, alternatives: &[Parselet]) -> bool {
        let checkpoint = self.checkpoint();
        for alternative in alternatives {
            if alternative(self) {
                return true;
            }
            self.restore(checkpoint);
        }
        false
    }

    /// Applies `body` until it fails or stops making progress.
    pub fn zero_or_more(&mut self, mut body: impl FnMut(&mut Self) -> bool) -> bool {
        loop {
            let checkpoint = self.checkpoint();
            if !body(self) {
                self.restore(checkpoint);
                return true;
            }
            if self.position == checkpoint.position {
                return true;
            }
        }
    }

    pub fn one_or_more(&mut self, mut body: impl FnMut(&mut Self) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        if !body(self) {
            self.restore(checkpoint);
            return false;
        }
        self.zero_or_more(body)
    }

    pub fn optional(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        if !body(self) {
            self.restore(checkpoint);
        }
        true
    }

    /// Negative lookahead: matches, consuming nothing, iff `body` fails.
    pub fn not(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let checkpoint = self.checkpoint();
        let matched = body(self);
        self.restore(checkpoint);
        !matched
    }

    // ------------------------------------------------------------------
    // Rules and markers
    // ------------------------------------------------------------------

    /// Runs a named rule. A match appends `(rule, begin, position)`. A miss
    /// restores state and, if the attempt consumed anything and reached
    /// further than the recorded failure, becomes the new furthest failure.
    pub fn rule(&mut self, rule: Rule, body: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.checkpoint();
        let outer_reach = self.reach;
        self.reach = start.position;

        let matched = body(self);

        let reached = self.reach;
        self.reach = outer_reach.max(reached);
        if matched {
            self.add(rule, start.position);
            return true;
        }

        self.restore(start);
        if reached > start.position && reached > self.failure.end {
            log::trace!("furthest failure: {} {}..{}", rule, start.position, reached);
            self.failure = Failure {
                rule,
                begin: start.position,
                end: reached,
            };
        }
        false
    }

    /// Records the text matched by `body` for the marker that follows.
    pub fn capture(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        self.rule(Rule::Text, body)
    }

    /// Appends a zero-width semantic marker. Always matches.
    pub fn mark(&mut self, marker: Rule) -> bool {
        self.add(marker, self.position);
        true
    }
}
