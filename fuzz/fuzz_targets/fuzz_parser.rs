#![no_main]
use arbitrary::Arbitrary;
use jsonpeg::{EscapeSyntax, JsonParser, Number, ParserOptions, Rule, Value, diagnostics};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    strict: bool,
    standard_escapes: bool,
    allow_newlines: bool,
    max_depth: u16,
    text: String,
}

fn all_finite(value: &Value) -> bool {
    match value {
        Value::Number(Number::Float(x)) => x.is_finite(),
        Value::Array(items) => items.iter().all(all_finite),
        Value::Object(members) => members.values().all(all_finite),
        _ => true,
    }
}

fn check(input: &Input) {
    let options = ParserOptions {
        strict: input.strict,
        escape_syntax: if input.standard_escapes {
            EscapeSyntax::Standard
        } else {
            EscapeSyntax::Legacy
        },
        allow_newlines: input.allow_newlines,
        max_depth: usize::from(input.max_depth % 1024),
    };

    let mut parser = JsonParser::new(&input.text, options);
    let result = parser.parse();

    // At most one memo entry per rule and position.
    assert!(parser.memo_len() <= Rule::ALL.len() * (input.text.len() + 1));

    match result {
        // Legacy `\u0092` decodes to a backslash the legacy grammar cannot read
        // back, and infinities are written as `null`.
        Ok(value) if options.escape_syntax == EscapeSyntax::Standard && all_finite(&value) => {
            let written = value.to_string();
            let reparsed = jsonpeg::parse_with_options(&written, options);
            assert_eq!(reparsed.as_ref(), Ok(&value), "canonical text {written:?}");
        }
        Ok(_) => {}
        Err(err) => {
            assert!(err.position <= input.text.len());
            let _ = diagnostics::render_with(&input.text, &err, &options);
        }
    }
}

fuzz_target!(|input: Input| check(&input));
