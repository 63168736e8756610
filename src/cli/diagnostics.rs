//! Terminal presentation of syntax errors.
//!
//! A [`SyntaxDiagnostic`] prints the error message followed by a numbered
//! source snippet with a pointer under the failing span. Columns count code
//! points, matching the positions inside [`SyntaxError`].

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::syntax::{SyntaxError, TextPosition};

/// Context lines around the error when no config overrides it.
pub const SNIPPET_CONTEXT_LINES: usize = 2;

pub struct SyntaxDiagnostic<'a> {
    error: &'a SyntaxError,
    context_lines: usize,
}

impl<'a> SyntaxDiagnostic<'a> {
    pub fn new(error: &'a SyntaxError) -> Self {
        Self {
            error,
            context_lines: SNIPPET_CONTEXT_LINES,
        }
    }

    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    fn location(&self) -> String {
        format!(
            "{} [at line {}, symbol {} to line {}, symbol {}]",
            self.error.source_name(),
            self.error.begin.line,
            self.error.begin.column,
            self.error.end.line,
            self.error.end.column
        )
    }

    fn snippet(&self) -> Vec<SnippetLine<'a>> {
        code_snippet(
            self.error.source_text(),
            self.error.begin,
            self.error.end,
            self.context_lines,
        )
    }
}

impl Display for SyntaxDiagnostic<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Error in {}:", self.location())?;
        writeln!(f, "{}", self.error)?;
        let snippet = self.snippet();
        if !snippet.is_empty() {
            writeln!(f)?;
        }
        for line in &snippet {
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// One numbered source line plus, when it holds part of the error, the
/// pointer underneath it.
struct SnippetLine<'a> {
    number: usize,
    width: usize,
    text: &'a str,
    pointer: Option<String>,
}

impl Display for SnippetLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "{:width$} | {}", self.number, self.text, width = self.width)?;
        if let Some(pointer) = &self.pointer {
            writeln!(f, "{:width$} | {}", "", pointer, width = self.width)?;
        }
        Ok(())
    }
}

/// Splits on `\r\n`, `\n` and a lone `\r`, the same terminators the
/// position translation counts.
fn split_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = source;
    while let Some(index) = rest.find(|c: char| c == '\n' || c == '\r') {
        lines.push(&rest[..index]);
        let skip = if rest[index..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[index + skip..];
    }
    lines.push(rest);
    lines
}

fn code_snippet<'a>(source: &'a str, begin: TextPosition, end: TextPosition, context: usize) -> Vec<SnippetLine<'a>> {
    let lines = split_lines(source);
    let first = begin.line.saturating_sub(context).max(1);
    let last = (end.line + context).min(lines.len());
    let width = last.to_string().len();

    (first..=last)
        .map(|number| {
            let text = lines[number - 1];
            let pointer = (begin.line..=end.line)
                .contains(&number)
                .then(|| pointer_line(number, begin, end, text.chars().count()));
            SnippetLine {
                number,
                width,
                text,
                pointer,
            }
        })
        .collect()
}

fn pointer_segment(s: &mut String, start: usize, end: usize, caret_at: usize) {
    for i in start..=end {
        s.push(if i == caret_at { '^' } else { '-' });
    }
}

// `end.column` is one past the last failing symbol.
fn pointer_line(number: usize, begin: TextPosition, end: TextPosition, line_len: usize) -> String {
    let starts_here = number == begin.line;
    let ends_here = number == end.line;
    let pointer_start = if starts_here { begin.column } else { 1 };
    let pointer_start = pointer_start.clamp(1, line_len + 1);
    let pointer_end = if ends_here { end.column.saturating_sub(1) } else { line_len };
    let pointer_end = pointer_end.min(line_len + 1).max(pointer_start);

    let mut s = " ".repeat(pointer_start - 1);
    match (starts_here, ends_here) {
        (true, true) => {
            pointer_segment(&mut s, pointer_start, pointer_end, pointer_start);
            s.push_str(" err");
        }
        (true, false) => {
            pointer_segment(&mut s, pointer_start, pointer_end, pointer_start);
            s.push_str(" err begins");
        }
        (false, true) => {
            pointer_segment(&mut s, 1, pointer_end, 1);
            s.push_str(" err ends");
        }
        (false, false) => s.push('|'),
    }
    s
}

/// Writes the diagnostic with the header and pointers colored.
pub fn print_diagnostic(writer: &mut impl WriteColor, diagnostic: &SyntaxDiagnostic) -> io::Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "Error")?;
    writer.reset()?;
    writeln!(writer, " in {}:", diagnostic.location())?;
    writeln!(writer, "{}", diagnostic.error)?;

    let snippet = diagnostic.snippet();
    if !snippet.is_empty() {
        writeln!(writer)?;
    }
    for line in &snippet {
        writeln!(writer, "{:width$} | {}", line.number, line.text, width = line.width)?;
        if let Some(pointer) = &line.pointer {
            write!(writer, "{:width$} | ", "", width = line.width)?;
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(writer, "{}", pointer)?;
            writer.reset()?;
        }
    }
    Ok(())
}

pub fn print_diagnostic_to_stderr(diagnostic: &SyntaxDiagnostic, color: ColorChoice) {
    let mut stderr = StandardStream::stderr(color);
    if print_diagnostic(&mut stderr, diagnostic).is_err() {
        eprintln!("{}", diagnostic);
    }
}
