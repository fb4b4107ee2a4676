use quickcheck::QuickCheck;

use super::arbitrary::Document;
use crate::{EscapeSyntax, ParserOptions, escape::process_escapes, parse_with_options};

fn test_count() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: writing a value and parsing the text back yields the same value.
#[test]
fn writer_output_parses_back_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document) -> bool {
        let text = doc.value.to_string();
        let options = ParserOptions {
            escape_syntax: doc.syntax,
            ..Default::default()
        };
        parse_with_options(&text, options).is_ok_and(|parsed| parsed == doc.value)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document) -> bool);
}

/// Property: the escape processor leaves backslash-free text alone, and text
/// the writer escaped comes back as it was.
#[test]
fn escapes_undo_the_writer_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        let plain = text.replace('\\', "");
        let mut escaped = String::new();
        crate::value::write_escaped_string(&text, &mut escaped).unwrap();
        process_escapes(&plain, EscapeSyntax::Legacy) == plain.as_str()
            && process_escapes(&escaped, EscapeSyntax::Standard) == text.as_str()
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String) -> bool);
}
