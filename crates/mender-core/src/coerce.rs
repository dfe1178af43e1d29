//! Best-effort scalar coercion.
//!
//! LLMs routinely send `"5"` where `5` was meant, or `"True"` for a flag.
//! [`coerce`] maps such values to their most likely intended type. It is a
//! total function: anything it cannot improve is returned as-is.
//!
//! | Input              | Output                        |
//! |--------------------|-------------------------------|
//! | `" TRUE "`         | `Bool(true)`                  |
//! | `"3"`              | `Int(3)`                      |
//! | `"3.5"`            | `Float(3.5)`                  |
//! | `" abc "`          | `String("abc")`               |
//! | `Float(4.0)`       | `Int(4)`                      |
//! | arrays / objects   | unchanged, never recursed     |

use crate::value::{Arguments, Value};

/// Lower bound (inclusive) of floats that convert to `i64` without overflow.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
/// Upper bound (exclusive): `i64::MAX` is not representable, `2^63` is.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Coerce one top-level argument value.
#[must_use]
pub fn coerce(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => coerce_str(&s),
        Value::Float(f) => integral(f).map_or(Value::Float(f), Value::Int),
        v @ (Value::Int(_) | Value::Bool(_) | Value::Array(_) | Value::Object(_)) => v,
    }
}

/// Coerce every top-level value of `args`; nested values are left alone.
#[must_use]
pub fn coerce_arguments(args: Arguments) -> Arguments {
    args.into_iter().map(|(k, v)| (k, coerce(v))).collect()
}

fn coerce_str(raw: &str) -> Value {
    let s = raw.trim();

    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(n) = s.parse::<i64>() {
        return Value::Int(n);
    }
    // "inf" / "NaN" parse as floats but have no JSON encoding.
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&f)).then(|| f as i64)
}
