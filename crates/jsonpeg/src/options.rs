use crate::engine::DEFAULT_MAX_DEPTH;

/// Which escape sequences the string rule accepts and how `\u` digits are
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeSyntax {
    /// `\/ \" \b \f \n \r \t`, and `\u` followed by four *decimal* digits
    /// naming a code point in decimal. `\\` is not accepted, and neither are
    /// hex digits `a-f` after `\u`.
    #[default]
    Legacy,
    /// RFC 8259 escapes: adds `\\`, and `\u` takes four hex digits with
    /// surrogate pairs combined.
    Standard,
}

/// Configuration options for the JSON parser.
///
/// # Examples
///
/// ```rust
/// use jsonpeg::{EscapeSyntax, ParserOptions, Value, parse_with_options};
///
/// let options = ParserOptions {
///     escape_syntax: EscapeSyntax::Standard,
///     allow_newlines: true,
///     ..Default::default()
/// };
/// let value = parse_with_options("[\n  \"a\\\\b\"\n]", options).unwrap();
/// assert_eq!(value, Value::Array(vec![Value::from("a\\b")]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Only accept an object or an array at the top level.
    ///
    /// # Default
    ///
    /// `false`
    pub strict: bool,

    /// Escape sequences accepted inside strings.
    ///
    /// # Default
    ///
    /// [`EscapeSyntax::Legacy`]
    pub escape_syntax: EscapeSyntax,

    /// Whether carriage returns and line feeds count as whitespace.
    ///
    /// By default only spaces and horizontal tabs separate tokens, so a
    /// document must sit on one line.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_newlines: bool,

    /// How deeply rule invocations may nest before the parse is abandoned.
    /// Each level of array nesting costs three invocations and each level of
    /// object nesting four, and the innermost value needs up to four more.
    ///
    /// # Default
    ///
    /// `512`
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict: false,
            escape_syntax: EscapeSyntax::default(),
            allow_newlines: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    /// Default options with `strict` set.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}
