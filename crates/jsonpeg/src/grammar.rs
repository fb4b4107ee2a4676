//! The JSON rules and the [`JsonParser`] driving them.
//!
//! Every rule goes through the packrat engine, so each `(rule, position)`
//! pair is evaluated at most once per parse. Whitespace is the `-` rule:
//! spaces and tabs only, unless [`ParserOptions::allow_newlines`] is set.
use core::{convert::Infallible, fmt};
use std::iter;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    diagnostics::{Location, locate},
    engine::{Grammar, Parser},
    error::{ErrorKind, ParseError},
    escape::process_escapes,
    failure::FailureState,
    node::{Members, Node, Shared},
    number,
    options::{EscapeSyntax, ParserOptions},
    value::{Number, Value},
};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("grammar patterns are valid")
}

static QUOTE_OR_BACKSLASH: Lazy<Regex> = Lazy::new(|| pattern(r#"^["\\]"#));
static LEGACY_SIMPLE_ESCAPE: Lazy<Regex> = Lazy::new(|| pattern(r#"^[/"bfnrt]"#));
static STANDARD_SIMPLE_ESCAPE: Lazy<Regex> = Lazy::new(|| pattern(r#"^[/"\\bfnrt]"#));
static DECIMAL_CODE_UNIT: Lazy<Regex> = Lazy::new(|| pattern("^[0-9]{4}"));
static HEX_CODE_UNIT: Lazy<Regex> = Lazy::new(|| pattern("^[0-9A-Fa-f]{4}"));
static WHOLE: Lazy<Regex> = Lazy::new(|| pattern("^-?(?:0|[1-9][0-9]*)"));
static FRACTION: Lazy<Regex> = Lazy::new(|| pattern(r"^\.[0-9]+"));
static EXPONENT_DIGITS: Lazy<Regex> = Lazy::new(|| pattern("^[+-]?[0-9]+"));
static BLANKS: Lazy<Regex> = Lazy::new(|| pattern("^[ \t]*"));
static BLANKS_AND_NEWLINES: Lazy<Regex> = Lazy::new(|| pattern("^[ \t\r\n]*"));

/// The rules of the JSON grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    Root,
    StrictRoot,
    Value,
    Object,
    ObjectBody,
    ObjectPair,
    Array,
    ArrayBody,
    String,
    StringChar,
    StringCharEscape,
    Number,
    NumberBase,
    NumberBaseWhole,
    NumberBaseFrac,
    NumberExponent,
    Whitespace,
    Eof,
}

impl Rule {
    pub const ALL: [Rule; 18] = [
        Rule::Root,
        Rule::StrictRoot,
        Rule::Value,
        Rule::Object,
        Rule::ObjectBody,
        Rule::ObjectPair,
        Rule::Array,
        Rule::ArrayBody,
        Rule::String,
        Rule::StringChar,
        Rule::StringCharEscape,
        Rule::Number,
        Rule::NumberBase,
        Rule::NumberBaseWhole,
        Rule::NumberBaseFrac,
        Rule::NumberExponent,
        Rule::Whitespace,
        Rule::Eof,
    ];

    /// The name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Rule::Root => "root",
            Rule::StrictRoot => "strict-root",
            Rule::Value => "value",
            Rule::Object => "object",
            Rule::ObjectBody => "object-body",
            Rule::ObjectPair => "object-pair",
            Rule::Array => "array",
            Rule::ArrayBody => "array-body",
            Rule::String => "string",
            Rule::StringChar => "string-char",
            Rule::StringCharEscape => "string-char-escape",
            Rule::Number => "number",
            Rule::NumberBase => "number-base",
            Rule::NumberBaseWhole => "number-base-whole",
            Rule::NumberBaseFrac => "number-base-frac",
            Rule::NumberExponent => "number-exponent",
            Rule::Whitespace => "-",
            Rule::Eof => "eof",
        }
    }

    /// The rule's definition in PEG notation under the default options.
    /// `-` is optional whitespace, `< >` marks captured text and `/ /` a
    /// character-class pattern.
    #[must_use]
    pub fn definition(self) -> &'static str {
        self.definition_with(&ParserOptions::default())
    }

    /// The definition the parser actually runs with `options`: the escape
    /// syntax changes `string-char-escape` and `allow_newlines` widens `-`.
    #[must_use]
    pub fn definition_with(self, options: &ParserOptions) -> &'static str {
        match self {
            Rule::Root => "- (strict-root | value) - eof",
            Rule::StrictRoot => "object | array",
            Rule::Value => r#"object | array | string | number | "true" | "false" | "null""#,
            Rule::Object => r#""{" - "}" | "{" - object-body - "}""#,
            Rule::ObjectBody => r#"object-pair (- "," - object-pair)*"#,
            Rule::ObjectPair => r#"string - ":" - value"#,
            Rule::Array => r#""[" - "]" | "[" - array-body - "]""#,
            Rule::ArrayBody => r#"value (- "," - value)*"#,
            Rule::String => r#""\"" < string-char+ > "\"""#,
            Rule::StringChar => r#"!/["\\]/ . | "\\" string-char-escape"#,
            Rule::StringCharEscape => match options.escape_syntax {
                EscapeSyntax::Legacy => r#"/[\/"bfnrt]/ | "u" /[0-9]{4}/"#,
                EscapeSyntax::Standard => r#"/[\/"\\bfnrt]/ | "u" /[0-9A-Fa-f]{4}/"#,
            },
            Rule::Number => "number-base number-exponent | number-base",
            Rule::NumberBase => "< number-base-whole number-base-frac > | < number-base-whole >",
            Rule::NumberBaseWhole => "/-?(0|[1-9][0-9]*)/",
            Rule::NumberBaseFrac => r"/\.[0-9]+/",
            Rule::NumberExponent => r#"("E" | "e") /[+-]?[0-9]+/"#,
            Rule::Whitespace if options.allow_newlines => r"/[ \t\r\n]*/",
            Rule::Whitespace => r"/[ \t]*/",
            Rule::Eof => "!.",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a rule produced.
///
/// Values are [`Shared`] nodes, so the memo table and the containers built
/// from it point at one copy of each subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// The rule matched but carries no value (whitespace, string characters,
    /// number fragments).
    Matched,
    Value(Shared),
    /// An object member: the key's string node and the value.
    Pair(Shared, Shared),
    Exponent(i64),
}

impl Capture {
    #[must_use]
    pub fn node(&self) -> Option<&Shared> {
        match self {
            Capture::Value(node) => Some(node),
            _ => None,
        }
    }

    /// The captured value as an owned [`Value`], for value captures.
    #[must_use]
    pub fn to_value(&self) -> Option<Value> {
        self.node().map(|node| node.to_value())
    }

    fn into_node(self) -> Option<Shared> {
        match self {
            Capture::Value(node) => Some(node),
            _ => None,
        }
    }

    fn into_pair(self) -> Option<(Shared, Shared)> {
        match self {
            Capture::Pair(key, value) => Some((key, value)),
            _ => None,
        }
    }

    fn into_number(self) -> Option<Number> {
        match &*self.into_node()? {
            Node::Scalar(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }

    fn into_exponent(self) -> Option<i64> {
        match self {
            Capture::Exponent(exp) => Some(exp),
            _ => None,
        }
    }

    fn scalar(value: Value) -> Self {
        Capture::Value(Node::Scalar(value).shared())
    }

    fn number(number: Number) -> Self {
        Self::scalar(Value::Number(number))
    }
}

/// The JSON grammar, configured by its options.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGrammar {
    pub options: ParserOptions,
}

type Engine<'src> = Parser<'src, JsonGrammar>;

impl Grammar for JsonGrammar {
    type Rule = Rule;
    type Arg = Infallible;
    type Value = Capture;

    fn body(p: &mut Engine<'_>, rule: Rule, _args: &[Infallible]) -> Option<Capture> {
        match rule {
            Rule::Root => root(p),
            Rule::StrictRoot => strict_root(p),
            Rule::Value => value(p),
            Rule::Object => object(p),
            Rule::ObjectBody => object_body(p),
            Rule::ObjectPair => object_pair(p),
            Rule::Array => array(p),
            Rule::ArrayBody => array_body(p),
            Rule::String => string(p),
            Rule::StringChar => string_char(p),
            Rule::StringCharEscape => string_char_escape(p),
            Rule::Number => number(p),
            Rule::NumberBase => number_base(p),
            Rule::NumberBaseWhole => p.pattern(&WHOLE).map(|_| Capture::Matched),
            Rule::NumberBaseFrac => p.pattern(&FRACTION).map(|_| Capture::Matched),
            Rule::NumberExponent => number_exponent(p),
            Rule::Whitespace => whitespace(p),
            Rule::Eof => p.at_end().map(|()| Capture::Matched),
        }
    }
}

fn root(p: &mut Engine<'_>) -> Option<Capture> {
    p.apply(Rule::Whitespace)?;
    let top = if p.grammar().options.strict {
        Rule::StrictRoot
    } else {
        Rule::Value
    };
    let value = p.apply(top)?;
    p.apply(Rule::Whitespace)?;
    p.apply(Rule::Eof)?;
    Some(value)
}

fn strict_root(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[|p| p.apply(Rule::Object), |p| p.apply(Rule::Array)])
}

fn value(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| p.apply(Rule::Object),
        |p| p.apply(Rule::Array),
        |p| p.apply(Rule::String),
        |p| p.apply(Rule::Number),
        |p| p.literal("true").map(|_| Capture::scalar(Value::Boolean(true))),
        |p| p.literal("false").map(|_| Capture::scalar(Value::Boolean(false))),
        |p| p.literal("null").map(|_| Capture::scalar(Value::Null)),
    ])
}

fn object(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            p.literal("{")?;
            p.apply(Rule::Whitespace)?;
            p.literal("}")?;
            Some(Capture::Value(Node::Object(Members::new()).shared()))
        },
        |p| {
            p.literal("{")?;
            p.apply(Rule::Whitespace)?;
            let body = p.apply(Rule::ObjectBody)?;
            p.apply(Rule::Whitespace)?;
            p.literal("}")?;
            Some(body)
        },
    ])
}

fn object_body(p: &mut Engine<'_>) -> Option<Capture> {
    let first = p.apply(Rule::ObjectPair)?.into_pair()?;
    let rest = p.repeat(|p| {
        p.apply(Rule::Whitespace)?;
        p.literal(",")?;
        p.apply(Rule::Whitespace)?;
        p.apply(Rule::ObjectPair)?.into_pair()
    });

    // Duplicate keys keep their first position and their last value.
    let mut members = Members::with_capacity(rest.len() + 1);
    for (key, value) in iter::once(first).chain(rest) {
        members.insert(key.as_str()?.to_owned(), value);
    }
    Some(Capture::Value(Node::Object(members).shared()))
}

fn object_pair(p: &mut Engine<'_>) -> Option<Capture> {
    let key = p.apply(Rule::String)?.into_node()?;
    p.apply(Rule::Whitespace)?;
    p.literal(":")?;
    p.apply(Rule::Whitespace)?;
    let value = p.apply(Rule::Value)?.into_node()?;
    Some(Capture::Pair(key, value))
}

fn array(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            p.literal("[")?;
            p.apply(Rule::Whitespace)?;
            p.literal("]")?;
            Some(Capture::Value(Node::Array(Vec::new()).shared()))
        },
        |p| {
            p.literal("[")?;
            p.apply(Rule::Whitespace)?;
            let body = p.apply(Rule::ArrayBody)?;
            p.apply(Rule::Whitespace)?;
            p.literal("]")?;
            Some(body)
        },
    ])
}

fn array_body(p: &mut Engine<'_>) -> Option<Capture> {
    let first = p.apply(Rule::Value)?.into_node()?;
    let rest = p.repeat(|p| {
        p.apply(Rule::Whitespace)?;
        p.literal(",")?;
        p.apply(Rule::Whitespace)?;
        p.apply(Rule::Value)?.into_node()
    });
    Some(Capture::Value(Node::Array(iter::once(first).chain(rest).collect()).shared()))
}

fn string(p: &mut Engine<'_>) -> Option<Capture> {
    p.literal("\"")?;
    let start = p.pos();
    p.apply(Rule::StringChar)?;
    while p.apply(Rule::StringChar).is_some() {}
    let raw = p.text_since(start);
    p.literal("\"")?;

    let content = process_escapes(raw, p.grammar().options.escape_syntax);
    Some(Capture::scalar(Value::String(content.into_owned())))
}

fn string_char(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            p.not_ahead(|p| p.pattern(&QUOTE_OR_BACKSLASH))?;
            p.any()?;
            Some(Capture::Matched)
        },
        |p| {
            p.literal("\\")?;
            p.apply(Rule::StringCharEscape)
        },
    ])
}

fn string_char_escape(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            let simple: &Regex = match p.grammar().options.escape_syntax {
                EscapeSyntax::Legacy => &*LEGACY_SIMPLE_ESCAPE,
                EscapeSyntax::Standard => &*STANDARD_SIMPLE_ESCAPE,
            };
            p.pattern(simple).map(|_| Capture::Matched)
        },
        |p| {
            let digits: &Regex = match p.grammar().options.escape_syntax {
                EscapeSyntax::Legacy => &*DECIMAL_CODE_UNIT,
                EscapeSyntax::Standard => &*HEX_CODE_UNIT,
            };
            p.literal("u")?;
            p.pattern(digits).map(|_| Capture::Matched)
        },
    ])
}

fn number(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            let start = p.pos();
            let base = p.apply(Rule::NumberBase)?.into_number()?;
            let exp = p.apply(Rule::NumberExponent)?.into_exponent()?;
            number::scale(base, exp, p.text_since(start)).map(Capture::number)
        },
        |p| p.apply(Rule::NumberBase),
    ])
}

fn number_base(p: &mut Engine<'_>) -> Option<Capture> {
    p.choice(&[
        |p| {
            let start = p.pos();
            p.apply(Rule::NumberBaseWhole)?;
            p.apply(Rule::NumberBaseFrac)?;
            number::float(p.text_since(start)).map(Capture::number)
        },
        |p| {
            let start = p.pos();
            p.apply(Rule::NumberBaseWhole)?;
            number::integer(p.text_since(start)).map(Capture::number)
        },
    ])
}

fn number_exponent(p: &mut Engine<'_>) -> Option<Capture> {
    p.literal("E").or_else(|| p.literal("e"))?;
    let digits = p.pattern(&EXPONENT_DIGITS)?;
    number::exponent(digits).map(Capture::Exponent)
}

fn whitespace(p: &mut Engine<'_>) -> Option<Capture> {
    let blanks: &Regex = if p.grammar().options.allow_newlines {
        &*BLANKS_AND_NEWLINES
    } else {
        &*BLANKS
    };
    p.pattern(blanks).map(|_| Capture::Matched)
}

/// Parses one JSON document.
///
/// A parser is tied to one input. Its memo table survives between calls, so
/// applying several rules to the same text reuses earlier work.
///
/// # Examples
///
/// ```rust
/// use jsonpeg::{JsonParser, ParserOptions, Rule};
///
/// let mut parser = JsonParser::new(r#"{"a": [1, 2]}"#, ParserOptions::default());
/// let value = parser.parse().unwrap();
/// assert_eq!(value.to_string(), r#"{"a":[1,2]}"#);
///
/// let err = JsonParser::new("[1,", ParserOptions::default()).parse().unwrap_err();
/// assert_eq!(err.rule(), Some(Rule::Object));
/// assert_eq!(err.position, 3);
/// ```
pub struct JsonParser<'src> {
    engine: Engine<'src>,
}

impl<'src> JsonParser<'src> {
    #[must_use]
    pub fn new(input: &'src str, options: ParserOptions) -> Self {
        let engine = Parser::new(JsonGrammar { options }, input).with_max_depth(options.max_depth);
        Self { engine }
    }

    /// Parses the whole input as a document.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] located at the furthest position any rule
    /// failed at when the input is not a document.
    pub fn parse(&mut self) -> Result<Value, ParseError> {
        let capture = self.parse_rule(Rule::Root)?;
        capture.to_value().ok_or_else(|| self.error())
    }

    /// Applies a single rule at the start of the input. Unlike
    /// [`parse`](Self::parse) this does not require the rule to consume the
    /// whole input; see [`furthest`](Self::furthest) for how far it got.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the rule does not match.
    pub fn parse_rule(&mut self, rule: Rule) -> Result<Capture, ParseError> {
        self.engine.rewind();
        match self.engine.apply(rule) {
            Some(capture) if !self.engine.is_halted() => Ok(capture),
            _ => Err(self.error()),
        }
    }

    /// Where the last successful [`parse_rule`](Self::parse_rule) stopped.
    #[must_use]
    pub fn furthest(&self) -> usize {
        self.engine.pos()
    }

    #[must_use]
    pub fn input(&self) -> &'src str {
        self.engine.cursor().input()
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.engine.grammar().options
    }

    /// The furthest failure seen so far.
    #[must_use]
    pub fn failure(&self) -> &FailureState<Rule> {
        self.engine.failure()
    }

    /// The input between two byte offsets, or `None` when the range is out
    /// of bounds or splits a character.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Option<&'src str> {
        self.engine.slice(start, end)
    }

    /// Number of memoized `(rule, position)` results.
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.engine.memo().len()
    }

    fn error(&self) -> ParseError {
        let input = self.input();
        let (kind, position) = match self.engine.halted_at() {
            Some(position) => (ErrorKind::DepthLimitExceeded(self.engine.max_depth()), position),
            None => {
                let failure = self.failure();
                let position = failure.position().unwrap_or(0);
                let kind = ErrorKind::Syntax {
                    rule: failure.rule().unwrap_or(Rule::Root),
                    found: input.get(position..).and_then(|rest| rest.chars().next()),
                };
                (kind, position)
            }
        };
        let Location { line, column } = locate(input, position);
        debug!(%kind, position, line, column, "parse failed");
        ParseError {
            kind,
            position,
            line,
            column,
        }
    }
}

impl fmt::Debug for JsonParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonParser")
            .field("options", self.options())
            .field("pos", &self.engine.pos())
            .field("memo_len", &self.memo_len())
            .finish_non_exhaustive()
    }
}
