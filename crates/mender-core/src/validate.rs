//! Per-tool argument validation.
//!
//! Validators are looked up by exact function name in a [`ValidatorRegistry`].
//! Tools without a registered validator are accepted unchanged.
//!
//! Most tools are covered by a declarative [`ValidationRule`]; anything more
//! involved can implement [`ArgumentValidator`] directly and be registered
//! alongside the rules.
//!
//! # Check order
//!
//! A rule stops at the first violation, checking:
//!
//! 1. **Required keys** in declared order.
//! 2. **Enum membership** for string values, in ascending key order.
//!    Non-string values are left to the type checks.
//! 3. **Type constraints** for present keys, in ascending key order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{Arguments, Value};

/// Name of the built-in calculator rule.
pub const CALCULATOR: &str = "calculator";
/// Name of the built-in model-listing rule.
pub const AVAILABLE_MODEL: &str = "available_model";

/// Why a set of arguments was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key is absent
    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// A string value is not one of the allowed options
    ///
    /// The rejected value is escaped so the message stays on one line.
    #[error("invalid value '{}' for parameter '{param}'", .value.escape_debug())]
    InvalidEnumValue {
        /// Offending key
        param: String,
        /// Rejected value
        value: String,
    },

    /// A value has the wrong type
    #[error("parameter '{param}' must be {expected}")]
    InvalidParameterType {
        /// Offending key
        param: String,
        /// Expected type
        expected: ParamType,
    },
}

impl ValidationError {
    /// Key the violation refers to.
    #[must_use]
    pub fn param(&self) -> &str {
        match self {
            Self::MissingRequiredParameter(param)
            | Self::InvalidEnumValue { param, .. }
            | Self::InvalidParameterType { param, .. } => param,
        }
    }
}

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Integer or float
    Number,
    /// Integer only
    Integer,
    /// Float only
    Float,
    /// Boolean
    Boolean,
    /// String
    String,
    /// Array
    Array,
    /// Object
    Object,
    /// Null
    Null,
}

impl ParamType {
    /// Whether `value` satisfies this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::Integer => matches!(value, Value::Int(_)),
            Self::Float => matches!(value, Value::Float(_)),
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::String => matches!(value, Value::String(_)),
            Self::Array => matches!(value, Value::Array(_)),
            Self::Object => matches!(value, Value::Object(_)),
            Self::Null => matches!(value, Value::Null),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::Float => "a float",
            Self::Boolean => "a boolean",
            Self::String => "a string",
            Self::Array => "an array",
            Self::Object => "an object",
            Self::Null => "null",
        })
    }
}

/// A per-tool validation capability.
pub trait ArgumentValidator: Send + Sync {
    /// Function name this validator is registered under.
    fn name(&self) -> &str;

    /// Accept (returning the arguments to use) or reject `args`.
    ///
    /// Implementations must not change values; coercion has already run.
    fn validate(&self, args: &Arguments) -> Result<Arguments, ValidationError>;
}

/// Declarative validation rule for one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRule {
    /// Function name the rule applies to
    pub name: String,
    /// Keys that must be present, checked in this order
    pub required: Vec<String>,
    /// Allowed string values per key
    pub enums: BTreeMap<String, Vec<String>>,
    /// Type constraint per key
    pub types: BTreeMap<String, ParamType>,
}

impl ValidationRule {
    /// Rule with no constraints (accepts everything).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add required keys.
    #[must_use]
    pub fn require<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Restrict `key` to one of `options` when it holds a string.
    #[must_use]
    pub fn one_of<I, S>(mut self, key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums
            .insert(key.into(), options.into_iter().map(Into::into).collect());
        self
    }

    /// Constrain the type of `key`.
    #[must_use]
    pub fn typed(mut self, key: impl Into<String>, ty: ParamType) -> Self {
        self.types.insert(key.into(), ty);
        self
    }

    /// Built-in rule for the `calculator` tool.
    #[must_use]
    pub fn calculator() -> Self {
        Self::new(CALCULATOR)
            .require(["operation", "x", "y"])
            .one_of("operation", ["add", "subtract", "multiply", "divide"])
            .typed("x", ParamType::Number)
            .typed("y", ParamType::Number)
    }

    /// Built-in rule for the `available_model` tool; accepts any input.
    #[must_use]
    pub fn available_model() -> Self {
        Self::new(AVAILABLE_MODEL)
    }

    fn check(&self, args: &Arguments) -> Result<(), ValidationError> {
        if let Some(missing) = self.required.iter().find(|k| !args.contains_key(*k)) {
            return Err(ValidationError::MissingRequiredParameter(missing.clone()));
        }

        for (key, options) in &self.enums {
            if let Some(s) = args.get(key).and_then(Value::as_str) {
                if !options.iter().any(|o| o == s) {
                    return Err(ValidationError::InvalidEnumValue {
                        param: key.clone(),
                        value: s.to_string(),
                    });
                }
            }
        }

        for (key, ty) in &self.types {
            if let Some(value) = args.get(key) {
                if !ty.accepts(value) {
                    return Err(ValidationError::InvalidParameterType {
                        param: key.clone(),
                        expected: *ty,
                    });
                }
            }
        }

        Ok(())
    }
}

impl ArgumentValidator for ValidationRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, args: &Arguments) -> Result<Arguments, ValidationError> {
        self.check(args)?;
        Ok(args.clone())
    }
}

/// Function-name keyed set of validators.
pub struct ValidatorRegistry {
    validators: HashMap<String, Box<dyn ArgumentValidator>>,
}

impl ValidatorRegistry {
    /// Registry with no validators; every tool passes through.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Registry holding the built-in `calculator` and `available_model` rules.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(ValidationRule::calculator());
        registry.register(ValidationRule::available_model());
        registry
    }

    /// Register `validator`, replacing any previous one with the same name.
    ///
    /// Returns `true` when an existing validator was replaced.
    pub fn register<V: ArgumentValidator + 'static>(&mut self, validator: V) -> bool {
        self.validators
            .insert(validator.name().to_string(), Box::new(validator))
            .is_some()
    }

    /// Validator registered for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ArgumentValidator> {
        let validator = self.validators.get(name)?;
        Some(validator.as_ref())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// `true` if no validators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validate `args` for the tool `name`. Unknown tools pass through.
    pub fn validate(&self, name: &str, args: &Arguments) -> Result<Arguments, ValidationError> {
        match self.get(name) {
            Some(validator) => validator.validate(args),
            None => Ok(args.clone()),
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}
