//! The template grammar.
//!
//! ```text
//! Script        <- Spacing Statement+ EndOfFile
//! Statement     <- Spacing (Expr / Declaration / Comment) Spacing EndOfLine*
//! Action        <- "create" / "delete" / "start" / "stop" / "update" / "check"
//!                / "attach" / "detach"
//! Entity        <- "vpc" / "subnet" / "instance" / "tag" / "role" / "securitygroup"
//!                / "routetable" / "storageobject" / "queue" / "topic" / "subscription"
//!                / "bucket" / "route" / "internetgateway" / "keypair" / "policy"
//!                / "group" / "user" / "volume"
//! Declaration   <- <Identifier> Equal Expr
//! Expr          <- <Action> MustWhiteSpacing <Entity> (MustWhiteSpacing Params)?
//! Params        <- Param+
//! Param         <- <Identifier> Equal Value WhiteSpacing
//! Identifier    <- [a-zA-Z._-]+
//! Value         <- <CidrValue> / <IpValue> / <IntRangeValue> / <IntValue>
//!                / RefValue / AliasValue / HoleValue / <StringValue>
//! StringValue   <- [a-zA-Z0-9/:_.-]+
//! CidrValue     <- [0-9]+ . [0-9]+ . [0-9]+ . [0-9]+ '/' [0-9]+
//! IpValue       <- [0-9]+ . [0-9]+ . [0-9]+ . [0-9]+
//! IntRangeValue <- [0-9]+ '-' [0-9]+
//! IntValue      <- [0-9]+
//! RefValue      <- '$' <Identifier>
//! AliasValue    <- '@' <Identifier>
//! HoleValue     <- '{' WhiteSpacing <Identifier> WhiteSpacing '}'
//! Comment       <- '#' (!EndOfLine .)* / "//" (!EndOfLine .)*
//! Spacing       <- Space*
//! WhiteSpacing  <- Whitespace*
//! MustWhiteSpacing <- Whitespace+
//! Equal         <- Spacing '=' Spacing
//! Space         <- Whitespace / EndOfLine
//! Whitespace    <- ' ' / '\t'
//! EndOfLine     <- "\r\n" / '\n' / '\r'
//! EndOfFile     <- !.
//! ```
//!
//! `<X>` records a [`Rule::Text`] capture around `X`; the semantic marker
//! for that capture is recorded right after it. The `.` separators in
//! `CidrValue` and `IpValue` match any character, not only a period.
//!
//! Alternative order matters. Keyword lists put longer words before their
//! prefixes (`routetable` before `route`), and `Value` tries the longest
//! numeric shapes first because `CidrValue`, `IpValue`, `IntRangeValue` and
//! `IntValue` all begin with the same digit run.

use super::matcher::{CharClass, Matcher, Parselet};
use super::Rule;

pub const ACTIONS: &[&str] = &[
    "create", "delete", "start", "stop", "update", "check", "attach", "detach",
];

pub const ENTITIES: &[&str] = &[
    "vpc",
    "subnet",
    "instance",
    "tag",
    "role",
    "securitygroup",
    "routetable",
    "storageobject",
    "queue",
    "topic",
    "subscription",
    "bucket",
    "route",
    "internetgateway",
    "keypair",
    "policy",
    "group",
    "user",
    "volume",
];

const DIGITS: &CharClass = &[('0', '9')];
const IDENTIFIER_CHARS: &CharClass = &[('a', 'z'), ('A', 'Z'), ('-', '-'), ('_', '_'), ('.', '.')];
const STRING_CHARS: &CharClass = &[
    ('a', 'z'),
    ('A', 'Z'),
    ('0', '9'),
    ('/', '/'),
    (':', ':'),
    ('_', '_'),
    ('.', '.'),
    ('-', '-'),
];

/// The matcher for a production, `None` for captures and markers.
pub fn parselet(rule: Rule) -> Option<Parselet> {
    let parselet: Parselet = match rule {
        Rule::Script => script,
        Rule::Statement => statement,
        Rule::Action => action,
        Rule::Entity => entity,
        Rule::Declaration => declaration,
        Rule::Expr => expr,
        Rule::Params => params,
        Rule::Param => param,
        Rule::Identifier => identifier,
        Rule::Value => value,
        Rule::StringValue => string_value,
        Rule::CidrValue => cidr_value,
        Rule::IpValue => ip_value,
        Rule::IntValue => int_value,
        Rule::IntRangeValue => int_range_value,
        Rule::RefValue => ref_value,
        Rule::AliasValue => alias_value,
        Rule::HoleValue => hole_value,
        Rule::Comment => comment,
        Rule::Spacing => spacing,
        Rule::WhiteSpacing => white_spacing,
        Rule::MustWhiteSpacing => must_white_spacing,
        Rule::Equal => equal,
        Rule::Space => space,
        Rule::Whitespace => whitespace,
        Rule::EndOfLine => end_of_line,
        Rule::EndOfFile => end_of_file,
        _ => return None,
    };
    Some(parselet)
}

pub fn script(m: &mut Matcher) -> bool {
    m.rule(Rule::Script, |m| {
        spacing(m) && m.one_or_more(statement) && end_of_file(m)
    })
}

pub fn statement(m: &mut Matcher) -> bool {
    m.rule(Rule::Statement, |m| {
        spacing(m)
            && m.choice(&[expr, declaration, comment])
            && spacing(m)
            && m.zero_or_more(end_of_line)
    })
}

pub fn action(m: &mut Matcher) -> bool {
    m.rule(Rule::Action, |m| m.keywords(ACTIONS))
}

pub fn entity(m: &mut Matcher) -> bool {
    m.rule(Rule::Entity, |m| m.keywords(ENTITIES))
}

pub fn declaration(m: &mut Matcher) -> bool {
    m.rule(Rule::Declaration, |m| {
        m.capture(identifier) && m.mark(Rule::DeclarationIdentifier) && equal(m) && expr(m)
    })
}

pub fn expr(m: &mut Matcher) -> bool {
    m.rule(Rule::Expr, |m| {
        m.capture(action)
            && m.mark(Rule::ActionName)
            && must_white_spacing(m)
            && m.capture(entity)
            && m.mark(Rule::EntityName)
            && m.optional(|m| must_white_spacing(m) && params(m))
            && m.mark(Rule::ExprDone)
    })
}

pub fn params(m: &mut Matcher) -> bool {
    m.rule(Rule::Params, |m| m.one_or_more(param))
}

pub fn param(m: &mut Matcher) -> bool {
    m.rule(Rule::Param, |m| {
        m.capture(identifier)
            && m.mark(Rule::ParamKey)
            && equal(m)
            && value(m)
            && white_spacing(m)
    })
}

pub fn identifier(m: &mut Matcher) -> bool {
    m.rule(Rule::Identifier, |m| m.one_or_more(|m| m.class(IDENTIFIER_CHARS)))
}

pub fn value(m: &mut Matcher) -> bool {
    m.rule(Rule::Value, |m| {
        m.choice(&[cidr_param, ip_param, range_param, int_param, prefixed_param])
    })
}

fn cidr_param(m: &mut Matcher) -> bool {
    m.capture(cidr_value) && m.mark(Rule::CidrParam)
}

fn ip_param(m: &mut Matcher) -> bool {
    m.capture(ip_value) && m.mark(Rule::IpParam)
}

fn range_param(m: &mut Matcher) -> bool {
    m.capture(int_range_value) && m.mark(Rule::RangeParam)
}

fn int_param(m: &mut Matcher) -> bool {
    m.capture(int_value) && m.mark(Rule::IntParam)
}

// The remaining shapes are told apart by their first character.
fn prefixed_param(m: &mut Matcher) -> bool {
    match m.peek() {
        Some('$') => ref_value(m) && m.mark(Rule::RefParam),
        Some('@') => alias_value(m) && m.mark(Rule::AliasParam),
        Some('{') => hole_value(m) && m.mark(Rule::HoleParam),
        _ => m.capture(string_value) && m.mark(Rule::StringParam),
    }
}

pub fn string_value(m: &mut Matcher) -> bool {
    m.rule(Rule::StringValue, |m| m.one_or_more(|m| m.class(STRING_CHARS)))
}

fn digits(m: &mut Matcher) -> bool {
    m.one_or_more(|m| m.class(DIGITS))
}

fn dotted_quad(m: &mut Matcher) -> bool {
    digits(m) && m.any() && digits(m) && m.any() && digits(m) && m.any() && digits(m)
}

pub fn cidr_value(m: &mut Matcher) -> bool {
    m.rule(Rule::CidrValue, |m| dotted_quad(m) && m.literal('/') && digits(m))
}

pub fn ip_value(m: &mut Matcher) -> bool {
    m.rule(Rule::IpValue, dotted_quad)
}

pub fn int_value(m: &mut Matcher) -> bool {
    m.rule(Rule::IntValue, digits)
}

pub fn int_range_value(m: &mut Matcher) -> bool {
    m.rule(Rule::IntRangeValue, |m| digits(m) && m.literal('-') && digits(m))
}

pub fn ref_value(m: &mut Matcher) -> bool {
    m.rule(Rule::RefValue, |m| m.literal('$') && m.capture(identifier))
}

pub fn alias_value(m: &mut Matcher) -> bool {
    m.rule(Rule::AliasValue, |m| m.literal('@') && m.capture(identifier))
}

pub fn hole_value(m: &mut Matcher) -> bool {
    m.rule(Rule::HoleValue, |m| {
        m.literal('{')
            && white_spacing(m)
            && m.capture(identifier)
            && white_spacing(m)
            && m.literal('}')
    })
}

pub fn comment(m: &mut Matcher) -> bool {
    m.rule(Rule::Comment, |m| m.choice(&[hash_comment, slash_comment]))
}

fn rest_of_line(m: &mut Matcher) -> bool {
    m.zero_or_more(|m| m.not(end_of_line) && m.any())
}

fn hash_comment(m: &mut Matcher) -> bool {
    m.literal('#') && rest_of_line(m)
}

// Only this form closes the line for the executor.
fn slash_comment(m: &mut Matcher) -> bool {
    m.literal('/') && m.literal('/') && rest_of_line(m) && m.mark(Rule::CommentDone)
}

pub fn spacing(m: &mut Matcher) -> bool {
    m.rule(Rule::Spacing, |m| m.zero_or_more(space))
}

pub fn white_spacing(m: &mut Matcher) -> bool {
    m.rule(Rule::WhiteSpacing, |m| m.zero_or_more(whitespace))
}

pub fn must_white_spacing(m: &mut Matcher) -> bool {
    m.rule(Rule::MustWhiteSpacing, |m| m.one_or_more(whitespace))
}

pub fn equal(m: &mut Matcher) -> bool {
    m.rule(Rule::Equal, |m| spacing(m) && m.literal('=') && spacing(m))
}

pub fn space(m: &mut Matcher) -> bool {
    m.rule(Rule::Space, |m| m.choice(&[whitespace, end_of_line]))
}

pub fn whitespace(m: &mut Matcher) -> bool {
    m.rule(Rule::Whitespace, |m| m.literal(' ') || m.literal('\t'))
}

pub fn end_of_line(m: &mut Matcher) -> bool {
    m.rule(Rule::EndOfLine, |m| {
        m.keyword("\r\n") || m.literal('\n') || m.literal('\r')
    })
}

pub fn end_of_file(m: &mut Matcher) -> bool {
    m.rule(Rule::EndOfFile, |m| m.not(|m| m.any()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Buffer, Token};

    fn run(start: Parselet, text: &str) -> Matcher {
        let mut m = Matcher::new(Buffer::new(text), 16);
        assert!(m.run(start), "expected {:?} to match", text);
        m
    }

    fn rules(m: &Matcher) -> Vec<Rule> {
        m.tokens().iter().map(|t| t.rule).collect()
    }

    fn fully_matches(start: Parselet, text: &str) -> bool {
        let mut m = Matcher::new(Buffer::new(text), 16);
        m.run(start) && m.position() == m.buffer().len()
    }

    #[test]
    fn longer_keywords_win_over_their_prefixes() {
        let m = run(entity, "routetable");
        assert_eq!(m.tokens(), &[Token::new(Rule::Entity, 0, 10)]);
        let m = run(entity, "route");
        assert_eq!(m.tokens(), &[Token::new(Rule::Entity, 0, 5)]);
    }

    #[test]
    fn every_keyword_is_recognized() {
        for word in ACTIONS {
            assert!(fully_matches(action, word), "action {}", word);
        }
        for word in ENTITIES {
            assert!(fully_matches(entity, word), "entity {}", word);
        }
        assert!(!fully_matches(action, "destroy"));
        assert!(!fully_matches(entity, "database"));
    }

    #[test]
    fn identifiers_exclude_digits() {
        assert!(!fully_matches(identifier, "my-var_1.x"));
        assert!(fully_matches(identifier, "my-var_.X"));
        let m = run(identifier, "i-12345");
        assert_eq!(m.position(), 2);
    }

    #[test]
    fn value_shapes_follow_declaration_order() {
        assert_eq!(rules(&run(value, "10.0.0.0/16"))[1..], [Rule::Text, Rule::CidrParam, Rule::Value]);
        assert_eq!(rules(&run(value, "10.0.0.0"))[1..], [Rule::Text, Rule::IpParam, Rule::Value]);
        assert_eq!(rules(&run(value, "5-10"))[1..], [Rule::Text, Rule::RangeParam, Rule::Value]);
        assert_eq!(rules(&run(value, "42"))[1..], [Rule::Text, Rule::IntParam, Rule::Value]);
        assert_eq!(rules(&run(value, "ami-42"))[1..], [Rule::Text, Rule::StringParam, Rule::Value]);
    }

    #[test]
    fn separators_in_addresses_match_any_character() {
        let m = run(value, "1x2x3x4/5");
        assert_eq!(m.tokens()[0], Token::new(Rule::CidrValue, 0, 9));
        assert_eq!(m.tokens()[2].rule, Rule::CidrParam);
    }

    #[test]
    fn prefixed_values_capture_the_bare_identifier() {
        let m = run(value, "$vpcid");
        assert_eq!(
            rules(&m),
            [Rule::Identifier, Rule::Text, Rule::RefValue, Rule::RefParam, Rule::Value]
        );
        assert_eq!(m.tokens()[1], Token::new(Rule::Text, 1, 6));

        let m = run(value, "{ name }");
        assert_eq!(m.tokens().iter().find(|t| t.rule == Rule::Text), Some(&Token::new(Rule::Text, 2, 6)));
        assert!(rules(&m).contains(&Rule::HoleParam));

        let m = run(value, "@prod");
        assert!(rules(&m).contains(&Rule::AliasParam));
    }

    #[test]
    fn a_dangling_prefix_is_not_a_string() {
        let mut m = Matcher::new(Buffer::new("$"), 16);
        assert!(!m.run(value));
    }

    #[test]
    fn comments_stop_before_the_line_end() {
        let m = run(comment, "# note\nnext");
        assert_eq!(m.tokens().last(), Some(&Token::new(Rule::Comment, 0, 6)));
        let m = run(comment, "// note\r\n");
        let tail: Vec<Rule> = rules(&m).into_iter().rev().take(2).collect();
        assert_eq!(tail, [Rule::Comment, Rule::CommentDone]);
    }

    #[test]
    fn end_of_line_prefers_crlf() {
        let m = run(end_of_line, "\r\n");
        assert_eq!(m.tokens(), &[Token::new(Rule::EndOfLine, 0, 2)]);
    }

    #[test]
    fn parselet_covers_exactly_the_productions() {
        for rule in Rule::PRODUCTIONS {
            assert!(parselet(rule).is_some(), "{} has no matcher", rule);
        }
        assert!(parselet(Rule::Text).is_none());
        assert!(parselet(Rule::ExprDone).is_none());
        assert!(parselet(Rule::Unknown).is_none());
    }
}
