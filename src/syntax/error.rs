//! Syntax errors and the furthest-failure bookkeeping behind them.
//!
//! A parse reports at most one error: the rule attempt that reached deepest
//! into the input before failing. Offsets are translated to 1-based
//! line/column pairs in a single forward scan of the buffer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Buffer, Rule, Span};

/// Source name used until a caller attaches a file name.
pub const DEFAULT_SOURCE_NAME: &str = "<template>";

/// The deepest failed rule attempt seen during a parse.
///
/// `end` is the furthest offset the attempt reached, not where it started
/// failing to match, so the span covers what the rule managed to consume.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub rule: Rule,
    pub begin: usize,
    pub end: usize,
}

impl Failure {
    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }
}

impl Default for Failure {
    fn default() -> Self {
        Self {
            rule: Rule::Script,
            begin: 0,
            end: 0,
        }
    }
}

/// 1-based line and column of a code point offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} symbol {}", self.line, self.column)
    }
}

/// Maps each offset to its line and column in one pass over the buffer.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. Offsets past the end of the
/// text are clamped to it.
pub fn translate_positions(buffer: &Buffer, positions: &[usize]) -> BTreeMap<usize, TextPosition> {
    let mut wanted: Vec<usize> = positions.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let mut translations = BTreeMap::new();
    let mut pending = wanted.into_iter().peekable();
    let (mut line, mut line_start) = (1, 0);

    for offset in 0..=buffer.len() {
        while let Some(&target) = pending.peek() {
            if target.min(buffer.len()) != offset {
                break;
            }
            let position = TextPosition {
                line,
                column: offset - line_start + 1,
            };
            translations.insert(target, position);
            pending.next();
        }
        if pending.peek().is_none() {
            break;
        }
        let c = buffer.at(offset);
        if c == '\n' as u32 || (c == '\r' as u32 && buffer.at(offset + 1) != '\n' as u32) {
            line += 1;
            line_start = offset + 1;
        }
    }

    translations
}

/// The single error a failed parse produces.
#[derive(Debug, Clone, Error)]
#[error(
    "parse error near {rule} (line {} symbol {} - line {} symbol {}):\n{excerpt:?}",
    .begin.line, .begin.column, .end.line, .end.column
)]
pub struct SyntaxError {
    pub rule: Rule,
    pub span: Span,
    pub begin: TextPosition,
    pub end: TextPosition,
    pub excerpt: String,
    source_name: String,
    source_text: String,
    named_source: Arc<NamedSource<String>>,
    byte_span: SourceSpan,
}

impl SyntaxError {
    pub fn new(failure: Failure, buffer: &Buffer) -> Self {
        let span = Span::new(failure.begin.min(buffer.len()), failure.end.min(buffer.len()));
        let translations = translate_positions(buffer, &[span.start, span.end]);
        let at = |offset: usize| {
            translations
                .get(&offset)
                .copied()
                .unwrap_or(TextPosition { line: 1, column: 1 })
        };
        let bytes = buffer.byte_range(span);

        Self {
            rule: failure.rule,
            span,
            begin: at(span.start),
            end: at(span.end),
            excerpt: buffer.slice(span).to_string(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            source_text: buffer.text().to_string(),
            named_source: Arc::new(NamedSource::new(DEFAULT_SOURCE_NAME, buffer.text().to_string())),
            byte_span: SourceSpan::from(bytes.start..bytes.end),
        }
    }

    /// Attaches the name shown in rendered diagnostics, usually a file path.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self.named_source = Arc::new(NamedSource::new(
            self.source_name.clone(),
            self.source_text.clone(),
        ));
        self
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn failure(&self) -> Failure {
        Failure {
            rule: self.rule,
            begin: self.span.start,
            end: self.span.end,
        }
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("infrascript::syntax"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "the input stops matching the template grammar while reading {}",
            self.rule
        )))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.named_source.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(format!("{} fails here", self.rule)), self.byte_span);
        Some(Box::new(std::iter::once(label)))
    }
}
