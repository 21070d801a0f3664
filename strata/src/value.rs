//! Configuration values exchanged between sources and the resolver.
//!
//! Sources speak a small closed vocabulary ([`Value`]) so that any number of
//! them can sit behind one trait object. Keys pin the Rust type they resolve
//! to through [`ConfigValue`], which also advertises the [`ValueType`] a
//! source should produce for that key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single configuration value as produced by a source.
///
/// # Examples
///
/// ```
/// use strata::{Value, ValueType};
///
/// let value = Value::from(8080);
/// assert_eq!(value.value_type(), ValueType::Int);
/// assert_eq!(value.to_string(), "8080");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A text value.
    Str(String),
}

impl Value {
    /// Returns the type tag of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Str(_) => ValueType::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// The type a key expects its values to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Expects [`Value::Bool`].
    Bool,
    /// Expects [`Value::Int`].
    Int,
    /// Expects [`Value::Float`] (integers are accepted too).
    Float,
    /// Expects [`Value::Str`].
    Str,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "string"),
        }
    }
}

impl ValueType {
    /// Converts a raw value read from text into a value of this type.
    ///
    /// Strings are parsed for the non-text types, and any scalar is rendered
    /// as text for [`ValueType::Str`]. Returns `None` when the raw value has
    /// no sensible reading as this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::{Value, ValueType};
    ///
    /// assert_eq!(ValueType::Int.coerce(&Value::from("42")), Some(Value::Int(42)));
    /// assert_eq!(ValueType::Str.coerce(&Value::Bool(true)), Some(Value::from("true")));
    /// assert_eq!(ValueType::Bool.coerce(&Value::from("maybe")), None);
    /// ```
    #[must_use]
    pub fn coerce(self, raw: &Value) -> Option<Value> {
        match (self, raw) {
            (Self::Str, Value::Str(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_)) => Some(raw.clone()),
            (Self::Str, other) => Some(Value::Str(other.to_string())),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (Self::Bool, Value::Str(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (Self::Int, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),
            (Self::Float, Value::Str(s)) => s.trim().parse().ok().map(Value::Float),
            _ => None,
        }
    }
}

/// A Rust type that configuration keys can resolve to.
pub trait ConfigValue: Sized + PartialEq {
    /// The value type sources should produce for keys of this type.
    const VALUE_TYPE: ValueType;

    /// Reads a source value as this type, or `None` if it does not fit.
    fn from_value(value: &Value) -> Option<Self>;

    /// Whether two values count as the same list entry.
    ///
    /// List resolution removes and deduplicates entries with this. It must be
    /// reflexive, which `==` is not for every type. Defaults to `==`.
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl ConfigValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl ConfigValue for String {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl ConfigValue for PathBuf {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }
}

impl ConfigValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Compares bit patterns, with every NaN equal to every other NaN.
    /// `0.0` and `-0.0` are distinct entries.
    fn same_value(&self, other: &Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
    }
}

impl ConfigValue for i64 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

macro_rules! integer_config_value {
    ($($ty:ty),*) => {
        $(
            impl ConfigValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::Int;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(*i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_config_value!(i32, u16, u32, u64, usize);
