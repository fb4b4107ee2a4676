#![expect(missing_docs)]

mod common;

use jsonpeg::{EscapeSyntax, ParserOptions, Rule, diagnostics, parse_with_options};

fn report(text: &str, options: ParserOptions) -> String {
    let err = parse_with_options(text, options).expect_err("document should not parse");
    diagnostics::render_with(text, &err, &options)
}

fn message(text: &str, options: ParserOptions) -> String {
    parse_with_options(text, options)
        .expect_err("document should not parse")
        .to_string()
}

#[test]
fn snapshot_error_messages() {
    let default = ParserOptions::default();
    insta::assert_snapshot!(message(r#"{"a": }"#, default), @"failed rule 'object', got '}' at 1:7");
    insta::assert_snapshot!(message("42", ParserOptions::strict()), @"failed rule 'object', got '4' at 1:1");
    insta::assert_snapshot!(message("{} x", default), @"failed rule 'eof', got 'x' at 1:4");
    insta::assert_snapshot!(message("[1,", default), @"failed rule 'object', got end of input at 1:4");
}

#[test]
fn snapshot_render_missing_value() {
    insta::assert_snapshot!(report(r#"{"a": }"#, ParserOptions::default()), @r#"
    On line 1, column 7:
    Failed to match '"{" - "}" | "{" - object-body - "}"' (rule 'object')
    Got: '}'
    => {"a": }
             ^
    "#);
}

#[test]
fn snapshot_render_trailing_content() {
    insta::assert_snapshot!(report("{} x", ParserOptions::default()), @r"
    On line 1, column 4:
    Failed to match '!.' (rule 'eof')
    Got: 'x'
    => {} x
          ^
    ");
}

#[test]
fn snapshot_render_on_later_line() {
    insta::assert_snapshot!(report("[\n  1,\n  tru\n]", common::relaxed()), @r#"
    On line 3, column 3:
    Failed to match '"{" - "}" | "{" - object-body - "}"' (rule 'object')
    Got: 't'
    =>   tru
         ^
    "#);
}

#[test]
fn snapshot_render_standard_escape() {
    let options = ParserOptions {
        escape_syntax: EscapeSyntax::Standard,
        ..Default::default()
    };
    insta::assert_snapshot!(report(r#""\u12g4""#, options), @r#"
    On line 1, column 3:
    Failed to match '/[\/"\\bfnrt]/ | "u" /[0-9A-Fa-f]{4}/' (rule 'string-char-escape')
    Got: 'u'
    => "\u12g4"
         ^
    "#);
}

#[test]
fn truncated_document_fails_at_end() {
    let truncated = &common::ORIGINAL[..common::ORIGINAL.find("\"snippets\"").unwrap()];
    let err = parse_with_options(truncated, common::relaxed()).unwrap_err();
    assert_eq!(err.position, truncated.len());
    assert_eq!(err.rule(), Some(Rule::String));
    assert_eq!((err.line, err.column), (21, 5));
}

#[test]
fn snapshot_render_depth_limit() {
    let options = ParserOptions {
        max_depth: 8,
        ..Default::default()
    };
    insta::assert_snapshot!(report("[[[[1]]]]", options), @r"
    On line 1, column 3:
    Nesting exceeded the limit of 8 rule invocations
    => [[[[1]]]]
         ^
    ");
}
