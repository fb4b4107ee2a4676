#![allow(missing_docs, dead_code)]
#![allow(clippy::needless_raw_string_hashes)]

use jsonpeg::{EscapeSyntax, ParserOptions};

/// Options that accept pretty-printed RFC 8259 documents.
pub fn relaxed() -> ParserOptions {
    ParserOptions {
        escape_syntax: EscapeSyntax::Standard,
        allow_newlines: true,
        ..Default::default()
    }
}

pub const ORIGINAL: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null,
        "score": 0.125
    },
    "request": {
        "filename": "C:\\work\\example.rs",
        "language": "rust",
        "url": "https:\/\/example.com\/crates",
        "options": {
            "opt_level": 2,
            "features": [
                "serde",
                "tokio"
            ],
            "debug": false
        }
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")",
        "line one\nline two\ttabbed"
    ],
    "numbers": [0, 17, -250, 1.5, -3.25e-2, 6.02E23, 12345678901234567890],
    "matrix": [
        [
            "a"
        ],
        [],
        {}
    ],
    "unicode": "caf\u00e9 \ud83d\ude00 na\u00efve",
    "trailing": {
        "status": "ok",
        "done": true
    }
}
"#;
