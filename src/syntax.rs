//! Syntax layer for infrascript templates.
//!
//! Text is normalized by [`buffer::Buffer`], matched by the hand-written PEG
//! rules in [`grammar`] on top of the [`matcher::Matcher`] combinators, and
//! recorded as flat [`tokens::Token`]s in completion order. Nesting is only
//! rebuilt on demand by [`tree::SyntaxTree`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod buffer;
pub mod error;
pub mod grammar;
pub mod matcher;
pub mod parser;
pub mod tokens;
pub mod tree;

pub use buffer::Buffer;
pub use error::{Failure, SyntaxError, TextPosition};
pub use parser::{ParsedTemplate, TemplateParser};
pub use tokens::{Token, TokenRecorder};
pub use tree::{CstNode, NodeId, SyntaxTree};

/// A half-open span of code point offsets.
///
/// # Examples
///
/// ```rust
/// use infrascript::syntax::Span;
/// let outer = Span::new(0, 10);
/// assert!(outer.contains(&Span::new(2, 5)));
/// assert_eq!(outer.len(), 10);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Every production of the template grammar, the text capture marker, and
/// one semantic marker per callback site.
///
/// The set is closed: extending the language means adding a member here and
/// the matching rule in [`grammar`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Rule {
    /// Placeholder for record slots that were allocated but never written.
    #[default]
    Unknown,
    Script,
    Statement,
    Action,
    Entity,
    Declaration,
    Expr,
    Params,
    Param,
    Identifier,
    Value,
    StringValue,
    CidrValue,
    IpValue,
    IntValue,
    IntRangeValue,
    RefValue,
    AliasValue,
    HoleValue,
    Comment,
    Spacing,
    WhiteSpacing,
    MustWhiteSpacing,
    Equal,
    Space,
    Whitespace,
    EndOfLine,
    EndOfFile,
    /// Captured text for the marker that immediately follows it.
    Text,
    DeclarationIdentifier,
    ActionName,
    EntityName,
    ExprDone,
    ParamKey,
    HoleParam,
    AliasParam,
    RefParam,
    CidrParam,
    IpParam,
    RangeParam,
    IntParam,
    StringParam,
    CommentDone,
}

impl Rule {
    /// The grammar productions, in declaration order.
    pub const PRODUCTIONS: [Rule; 27] = [
        Rule::Script,
        Rule::Statement,
        Rule::Action,
        Rule::Entity,
        Rule::Declaration,
        Rule::Expr,
        Rule::Params,
        Rule::Param,
        Rule::Identifier,
        Rule::Value,
        Rule::StringValue,
        Rule::CidrValue,
        Rule::IpValue,
        Rule::IntValue,
        Rule::IntRangeValue,
        Rule::RefValue,
        Rule::AliasValue,
        Rule::HoleValue,
        Rule::Comment,
        Rule::Spacing,
        Rule::WhiteSpacing,
        Rule::MustWhiteSpacing,
        Rule::Equal,
        Rule::Space,
        Rule::Whitespace,
        Rule::EndOfLine,
        Rule::EndOfFile,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Rule::Unknown => "Unknown",
            Rule::Script => "Script",
            Rule::Statement => "Statement",
            Rule::Action => "Action",
            Rule::Entity => "Entity",
            Rule::Declaration => "Declaration",
            Rule::Expr => "Expr",
            Rule::Params => "Params",
            Rule::Param => "Param",
            Rule::Identifier => "Identifier",
            Rule::Value => "Value",
            Rule::StringValue => "StringValue",
            Rule::CidrValue => "CidrValue",
            Rule::IpValue => "IpValue",
            Rule::IntValue => "IntValue",
            Rule::IntRangeValue => "IntRangeValue",
            Rule::RefValue => "RefValue",
            Rule::AliasValue => "AliasValue",
            Rule::HoleValue => "HoleValue",
            Rule::Comment => "Comment",
            Rule::Spacing => "Spacing",
            Rule::WhiteSpacing => "WhiteSpacing",
            Rule::MustWhiteSpacing => "MustWhiteSpacing",
            Rule::Equal => "Equal",
            Rule::Space => "Space",
            Rule::Whitespace => "Whitespace",
            Rule::EndOfLine => "EndOfLine",
            Rule::EndOfFile => "EndOfFile",
            Rule::Text => "Text",
            Rule::DeclarationIdentifier => "DeclarationIdentifier",
            Rule::ActionName => "ActionName",
            Rule::EntityName => "EntityName",
            Rule::ExprDone => "ExprDone",
            Rule::ParamKey => "ParamKey",
            Rule::HoleParam => "HoleParam",
            Rule::AliasParam => "AliasParam",
            Rule::RefParam => "RefParam",
            Rule::CidrParam => "CidrParam",
            Rule::IpParam => "IpParam",
            Rule::RangeParam => "RangeParam",
            Rule::IntParam => "IntParam",
            Rule::StringParam => "StringParam",
            Rule::CommentDone => "CommentDone",
        }
    }

    /// Semantic markers are zero-width records replayed by the executor.
    pub const fn is_marker(&self) -> bool {
        matches!(
            self,
            Rule::DeclarationIdentifier
                | Rule::ActionName
                | Rule::EntityName
                | Rule::ExprDone
                | Rule::ParamKey
                | Rule::HoleParam
                | Rule::AliasParam
                | Rule::RefParam
                | Rule::CidrParam
                | Rule::IpParam
                | Rule::RangeParam
                | Rule::IntParam
                | Rule::StringParam
                | Rule::CommentDone
        )
    }

    pub fn is_production(&self) -> bool {
        Self::PRODUCTIONS.contains(self)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a production name, e.g. `"Value"`. Markers are not selectable.
impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRODUCTIONS
            .iter()
            .copied()
            .find(|rule| rule.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown grammar rule '{}'", s))
    }
}
