//! Semantic actions for number literals.
//!
//! Integers stay exact in `i64` whenever the literal allows it. Everything
//! else is read with `str::parse::<f64>` from the literal text itself, which
//! gives the correctly rounded `f64` for `base × 10^exp` rather than
//! compounding the rounding of a multiplication.
use crate::value::Number;

/// Value of a literal matched without a fraction, e.g. `-12`.
///
/// Literals outside `i64` fall back to a float.
#[must_use]
pub fn integer(text: &str) -> Option<Number> {
    match text.parse::<i64>() {
        Ok(i) => Some(Number::Integer(i)),
        Err(_) => float(text),
    }
}

/// Value of a literal with a fraction and/or exponent, e.g. `1.5` or `1.5e2`.
#[must_use]
pub fn float(text: &str) -> Option<Number> {
    text.parse::<f64>().ok().map(Number::Float)
}

/// Value of the digits after `e`/`E`, saturating at the `i64` range.
#[must_use]
pub fn exponent(text: &str) -> Option<i64> {
    let digits = text.trim_start_matches(['+', '-']);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.parse::<i64>().unwrap_or(if text.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Combines a base with its exponent. `literal` is the full matched text of
/// both.
///
/// An integer base with a non-negative exponent stays an integer as long as
/// the product fits.
#[must_use]
pub fn scale(base: Number, exp: i64, literal: &str) -> Option<Number> {
    match base {
        Number::Integer(0) => Some(Number::Integer(0)),
        Number::Integer(i) if exp >= 0 => u32::try_from(exp)
            .ok()
            .and_then(|e| 10_i64.checked_pow(e))
            .and_then(|m| i.checked_mul(m))
            .map(Number::Integer)
            .or_else(|| float(literal)),
        _ => float(literal),
    }
}
