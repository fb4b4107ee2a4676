//! Turns the raw text between string delimiters into its final content.
//!
//! The raw text is scanned once, left to right. Each backslash consumes the
//! character after it (and, for `\u`, the digits that follow); substituted
//! output is never looked at again, so `\\n` yields a backslash followed by
//! `n` rather than a newline.
use std::borrow::Cow;

use crate::options::EscapeSyntax;

const REPLACEMENT: char = '\u{FFFD}';

/// Resolves every escape sequence in `raw`.
///
/// Returns the input unchanged, without allocating, when it contains no
/// backslash. A sequence the grammar would not produce (`\x`) yields the
/// escaped character with the backslash dropped.
#[must_use]
pub fn process_escapes(raw: &str, syntax: EscapeSyntax) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let mut chars = rest[idx + 1..].chars();
        let Some(code) = chars.next() else {
            // A trailing lone backslash has nothing to escape.
            out.push('\\');
            rest = "";
            break;
        };
        rest = chars.as_str();
        match code {
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => match unicode_escape(rest, syntax) {
                Some((ch, used)) => {
                    out.push(ch);
                    rest = &rest[used..];
                }
                None => out.push('u'),
            },
            other => out.push(other),
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the digits following `\u`, returning the character and how many
/// bytes of `rest` it used.
fn unicode_escape(rest: &str, syntax: EscapeSyntax) -> Option<(char, usize)> {
    let code = four_digits(rest, syntax)?;
    match syntax {
        // At most 9999, which is always a scalar value.
        EscapeSyntax::Legacy => char::from_u32(code).map(|ch| (ch, 4)),
        EscapeSyntax::Standard => Some(match code {
            0xD800..=0xDBFF => {
                let low = rest[4..]
                    .strip_prefix("\\u")
                    .and_then(|tail| four_digits(tail, syntax))
                    .filter(|low| (0xDC00..=0xDFFF).contains(low));
                match low {
                    Some(low) => {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        (char::from_u32(combined).unwrap_or(REPLACEMENT), 10)
                    }
                    None => (REPLACEMENT, 4),
                }
            }
            _ => (char::from_u32(code).unwrap_or(REPLACEMENT), 4),
        }),
    }
}

/// Reads exactly four digits in the radix `syntax` uses for `\u` escapes.
fn four_digits(text: &str, syntax: EscapeSyntax) -> Option<u32> {
    let digits = text.get(..4)?;
    let radix = match syntax {
        EscapeSyntax::Legacy => 10,
        EscapeSyntax::Standard => 16,
    };
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
