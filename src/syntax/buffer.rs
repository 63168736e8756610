//! Code point buffer the matcher runs over.

use std::ops::Range;

use super::Span;

/// End-of-input marker. One past the last Unicode scalar value, so no input
/// character can ever compare equal to it.
pub const END_SYMBOL: u32 = 0x11_0000;

/// Input text as an indexable code point sequence terminated by
/// [`END_SYMBOL`].
#[derive(Debug, Clone)]
pub struct Buffer {
    text: String,
    points: Vec<u32>,
    // byte offset of every code point, plus one entry for the end of text
    byte_offsets: Vec<usize>,
}

impl Buffer {
    pub fn new(text: impl Into<String>) -> Self {
        let mut buffer = Self {
            text: text.into(),
            points: Vec::new(),
            byte_offsets: Vec::new(),
        };
        buffer.normalize();
        buffer
    }

    /// Rebuilds the code point sequence from the text. Running it again on
    /// the same text leaves the buffer unchanged.
    pub fn normalize(&mut self) {
        self.points.clear();
        self.byte_offsets.clear();
        for (offset, ch) in self.text.char_indices() {
            self.points.push(ch as u32);
            self.byte_offsets.push(offset);
        }
        self.byte_offsets.push(self.text.len());
        if self.points.last() != Some(&END_SYMBOL) {
            self.points.push(END_SYMBOL);
        }
    }

    /// Replaces the text and renormalizes.
    pub fn load(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.normalize();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of code points, not counting the sentinel.
    pub fn len(&self) -> usize {
        self.points.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The code point at `position`; [`END_SYMBOL`] at or past the end.
    #[inline]
    pub fn at(&self, position: usize) -> u32 {
        self.points.get(position).copied().unwrap_or(END_SYMBOL)
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        char::from_u32(self.at(position))
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn byte_offset(&self, position: usize) -> usize {
        self.byte_offsets[position.min(self.len())]
    }

    pub fn byte_range(&self, span: Span) -> Range<usize> {
        self.byte_offset(span.start)..self.byte_offset(span.end.max(span.start))
    }

    /// The source text covered by a code point span.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[self.byte_range(span)]
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_a_single_sentinel() {
        let mut buffer = Buffer::new("ab");
        assert_eq!(buffer.points(), &['a' as u32, 'b' as u32, END_SYMBOL]);
        buffer.normalize();
        buffer.normalize();
        assert_eq!(buffer.points().len(), 3);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn empty_text_is_just_the_sentinel() {
        let buffer = Buffer::default();
        assert!(buffer.is_empty());
        assert_eq!(buffer.at(0), END_SYMBOL);
        assert_eq!(buffer.at(42), END_SYMBOL);
        assert_eq!(buffer.char_at(0), None);
    }

    #[test]
    fn slices_by_code_point_not_byte() {
        let buffer = Buffer::new("tag name=héllo");
        assert_eq!(buffer.slice(Span::new(9, 14)), "héllo");
        assert_eq!(buffer.byte_range(Span::new(9, 14)), 9..15);
        assert_eq!(buffer.char_at(10), Some('é'));
    }

    #[test]
    fn load_replaces_previous_text() {
        let mut buffer = Buffer::new("first");
        buffer.load("2nd");
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.slice(Span::new(0, 3)), "2nd");
    }
}
