//! Argument value model.
//!
//! Raw tool-call arguments are decoded into [`Value`], an explicit tagged
//! union that keeps integers and floats apart. Integer literals that fit an
//! `i64` decode to [`Value::Int`] so large ids survive unchanged; every other
//! number decodes to [`Value::Float`]. String-to-number conversion is left to
//! [`crate::coerce`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Top-level tool arguments.
///
/// Sorted by key so that re-encoding is byte-stable across runs.
pub type Arguments = BTreeMap<String, Value>;

/// A JSON leaf or container with distinct integer and float variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// Integral number (only produced by coercion)
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// JSON string
    String(String),
    /// JSON array (opaque to coercion)
    Array(Vec<Value>),
    /// JSON object (opaque to coercion)
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Short lowercase name of the variant, used in validation messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Borrow the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for [`Value::Int`] and [`Value::Float`].
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            other => match serde_json::to_string(other) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

/// Parse `raw` strictly as a JSON object.
///
/// Anything other than an object (including valid non-object JSON such as
/// `[1, 2]` or `"text"`) is rejected.
pub fn parse_arguments(raw: &str) -> serde_json::Result<Arguments> {
    serde_json::from_str(raw)
}

/// Compact canonical encoding of `args` (sorted keys, no whitespace).
pub fn encode_arguments(args: &Arguments) -> serde_json::Result<String> {
    serde_json::to_string(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literals_decode_as_ints() {
        let args = parse_arguments(r#"{"a": 1, "b": 2.5, "c": 2.0, "d": -7}"#).unwrap();
        assert_eq!(args["a"], Value::Int(1));
        assert_eq!(args["b"], Value::Float(2.5));
        assert_eq!(args["c"], Value::Float(2.0));
        assert_eq!(args["d"], Value::Int(-7));
    }

    #[test]
    fn integers_beyond_f64_precision_survive_decoding() {
        let raw = r#"{"id":9007199254740993}"#;
        let args = parse_arguments(raw).unwrap();
        assert_eq!(args["id"], Value::Int(9_007_199_254_740_993));
        assert_eq!(encode_arguments(&args).unwrap(), raw);
    }

    #[test]
    fn integers_beyond_i64_fall_back_to_float() {
        let args = parse_arguments(r#"{"big": 18446744073709551615}"#).unwrap();
        assert!(matches!(args["big"], Value::Float(_)));
    }

    #[test]
    fn nested_containers_are_preserved() {
        let args = parse_arguments(r#"{"list": [1, "x"], "obj": {"k": null}}"#).unwrap();
        assert_eq!(
            args["list"],
            Value::Array(vec![Value::Int(1), Value::from("x")])
        );
        let Value::Object(obj) = &args["obj"] else {
            panic!("expected object");
        };
        assert_eq!(obj["k"], Value::Null);
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(parse_arguments("[1, 2]").is_err());
        assert!(parse_arguments(r#""text""#).is_err());
        assert!(parse_arguments("42").is_err());
    }

    #[test]
    fn encoding_sorts_keys_and_keeps_int_float_split() {
        let mut args = Arguments::new();
        args.insert("y".to_string(), Value::Float(2.5));
        args.insert("x".to_string(), Value::Int(3));
        args.insert("op".to_string(), Value::from("add"));
        assert_eq!(
            encode_arguments(&args).unwrap(),
            r#"{"op":"add","x":3,"y":2.5}"#
        );
    }

    #[test]
    fn display_renders_strings_bare_and_others_as_json() {
        assert_eq!(Value::from("pow").to_string(), "pow");
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
