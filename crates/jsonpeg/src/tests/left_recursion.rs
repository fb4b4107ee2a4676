use once_cell::sync::Lazy;
use regex::Regex;

use super::init_tracing;
use crate::{
    Grammar, Parser,
    memo::{MemoKey, Outcome},
};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new("^[0-9]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Expr {
    Sum,
    Num,
    List,
    Wrapped,
    Head,
    Via,
}

/// Arithmetic with left-recursive rules. Results are the parenthesized
/// grouping the parse produced.
struct Arithmetic;

impl Grammar for Arithmetic {
    type Rule = Expr;
    type Arg = char;
    type Value = String;

    fn body(p: &mut Parser<'_, Self>, rule: Expr, args: &[char]) -> Option<String> {
        match rule {
            Expr::Num => p.pattern(&DIGITS).map(str::to_owned),
            // sum = sum "+" num | sum "-" num | num
            Expr::Sum => p.choice(&[
                |p| {
                    let lhs = p.apply(Expr::Sum)?;
                    p.literal("+")?;
                    let rhs = p.apply(Expr::Num)?;
                    Some(format!("({lhs}+{rhs})"))
                },
                |p| {
                    let lhs = p.apply(Expr::Sum)?;
                    p.literal("-")?;
                    let rhs = p.apply(Expr::Num)?;
                    Some(format!("({lhs}-{rhs})"))
                },
                |p| p.apply(Expr::Num),
            ]),
            // list(sep) = list(sep) sep num | num
            Expr::List => {
                let sep = *args.first()?;
                let mut buf = [0; 4];
                let sep_text: &str = sep.encode_utf8(&mut buf);
                let grown = p.attempt(|p| {
                    let head = p.apply_with_args(Expr::List, &[sep])?;
                    p.literal(sep_text)?;
                    let item = p.apply(Expr::Num)?;
                    Some(format!("[{head}{sep}{item}]"))
                });
                grown.or_else(|| p.apply(Expr::Num))
            }
            // wrapped = "(" sum ")"
            Expr::Wrapped => {
                p.literal("(")?;
                let inner = p.apply(Expr::Sum)?;
                p.literal(")")?;
                Some(inner)
            }
            // head = via "x" | "y"
            Expr::Head => p.choice(&[
                |p| {
                    let lhs = p.apply(Expr::Via)?;
                    p.literal("x")?;
                    Some(format!("({lhs}x)"))
                },
                |p| p.literal("y").map(str::to_owned),
            ]),
            // via = head
            Expr::Via => p.apply(Expr::Head),
        }
    }
}

fn parse(rule: Expr, input: &str) -> (Option<String>, usize) {
    init_tracing();
    let mut parser = Parser::new(Arithmetic, input);
    let result = parser.apply(rule);
    (result, parser.pos())
}

#[test]
fn sum_consumes_whole_chain() {
    assert_eq!(parse(Expr::Sum, "1+2+3"), (Some("((1+2)+3)".to_owned()), 5));
}

#[test]
fn sum_groups_to_the_left() {
    assert_eq!(parse(Expr::Sum, "10-4-3"), (Some("((10-4)-3)".to_owned()), 6));
    assert_eq!(parse(Expr::Sum, "1-2+3"), (Some("((1-2)+3)".to_owned()), 5));
}

#[test]
fn seed_alone_when_nothing_follows() {
    assert_eq!(parse(Expr::Sum, "7"), (Some("7".to_owned()), 1));
}

#[test]
fn growth_stops_before_incomplete_step() {
    assert_eq!(parse(Expr::Sum, "1+2+"), (Some("(1+2)".to_owned()), 3));
}

#[test]
fn left_recursive_rule_without_seed_fails() {
    init_tracing();
    let mut parser = Parser::new(Arithmetic, "+1");
    assert_eq!(parser.apply(Expr::Sum), None);
    assert_eq!(parser.pos(), 0);
    assert_eq!(parser.failure().rule(), Some(Expr::Num));
}

#[test]
fn grown_result_is_memoized() {
    init_tracing();
    let mut parser = Parser::new(Arithmetic, "1+2+3");
    parser.apply(Expr::Sum);

    let entry = parser.memo().lookup(&MemoKey::new(Expr::Sum, &[], 0)).unwrap();
    assert_eq!(
        entry.outcome(),
        &Outcome::Succeeded {
            end: 5,
            value: "((1+2)+3)".to_owned()
        }
    );
}

#[test]
fn left_recursion_nested_inside_other_rules() {
    assert_eq!(parse(Expr::Wrapped, "(1+2+3)"), (Some("((1+2)+3)".to_owned()), 7));
}

#[test]
fn arguments_are_part_of_the_memo_key() {
    init_tracing();
    let mut parser = Parser::new(Arithmetic, "1,2,3");
    assert_eq!(
        parser.apply_with_args(Expr::List, &[',']).as_deref(),
        Some("[[1,2],3]")
    );
    assert_eq!(parser.pos(), 5);

    parser.rewind();
    assert_eq!(parser.apply_with_args(Expr::List, &[';']).as_deref(), Some("1"));
    assert_eq!(parser.pos(), 1);

    let comma = parser.memo().lookup(&MemoKey::new(Expr::List, &[','], 0));
    let semicolon = parser.memo().lookup(&MemoKey::new(Expr::List, &[';'], 0));
    assert!(matches!(comma.map(|e| e.outcome()), Some(Outcome::Succeeded { end: 5, .. })));
    assert!(matches!(semicolon.map(|e| e.outcome()), Some(Outcome::Succeeded { end: 1, .. })));
}

#[test]
fn list_without_arguments_fails() {
    assert_eq!(parse(Expr::List, "1,2"), (None, 0));
}

#[test]
fn indirect_left_recursion_yields_only_the_seed() {
    init_tracing();
    let mut parser = Parser::new(Arithmetic, "yxx");
    assert_eq!(parser.apply(Expr::Head).as_deref(), Some("y"));
    assert_eq!(parser.pos(), 1);

    // `via` failed while `head` was still in progress, and that failure stays
    // memoized, so growing `head` never gets past its seed.
    let via = parser.memo().lookup(&MemoKey::new(Expr::Via, &[], 0));
    assert!(matches!(via.map(|e| e.outcome()), Some(Outcome::Failed)));
}
