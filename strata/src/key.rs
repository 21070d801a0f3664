//! Typed configuration keys.
//!
//! A key's Rust type fixes both its shape and its value type: a
//! [`ScalarKey<T>`] always resolves to `Option<T>` and a [`ListKey<T>`] always
//! resolves to `Vec<T>`. Sources never see the Rust type; they receive a
//! [`KeyDescriptor`] carrying the name, the [`KeyKind`] and the expected
//! [`ValueType`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::resolver::ConfigurationResolver;
use crate::value::{ConfigValue, ValueType};

/// The reserved key a source answers to halt bubbling toward broader scopes.
///
/// See [`ConfigurationSource::stop_bubbling`](crate::ConfigurationSource::stop_bubbling).
pub const STOP_BUBBLING: ScalarKey<bool> = ScalarKey::new("stop-bubbling");

/// Whether a key holds a single value or an edited list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Resolves to at most one value.
    Scalar,
    /// Resolves to a list assembled from list modifications.
    List,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::List => write!(f, "list"),
        }
    }
}

/// The untyped view of a key handed to sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDescriptor {
    /// The key name, e.g. `editor.tab-width`.
    pub name: &'static str,
    /// Scalar or list.
    pub kind: KeyKind,
    /// The value type the resolver will accept for this key.
    pub value_type: ValueType,
}

impl KeyDescriptor {
    /// Returns true if this descriptor names a list key.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.kind, KeyKind::List)
    }
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.kind, self.value_type)
    }
}

/// A key the resolver knows how to resolve.
///
/// Implemented by [`ScalarKey`] and [`ListKey`]; the associated `Output` is
/// what [`ConfigurationResolver::resolve`] returns for the key.
pub trait ConfigurationKey {
    /// The resolved form of this key.
    type Output;

    /// Describes this key to sources.
    fn descriptor(&self) -> KeyDescriptor;

    /// Dispatches to the resolver entry point matching this key's kind.
    fn resolve_with<R: ConfigurationResolver + ?Sized>(&self, resolver: &R) -> Self::Output;
}

/// A key resolving to a single value of type `T`.
///
/// # Examples
///
/// ```
/// use strata::{ConfigurationKey, KeyKind, ScalarKey, ValueType};
///
/// const TAB_WIDTH: ScalarKey<u32> = ScalarKey::new("editor.tab-width");
///
/// let descriptor = TAB_WIDTH.descriptor();
/// assert_eq!(descriptor.name, "editor.tab-width");
/// assert_eq!(descriptor.kind, KeyKind::Scalar);
/// assert_eq!(descriptor.value_type, ValueType::Int);
/// ```
pub struct ScalarKey<T> {
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> ScalarKey<T> {
    /// Creates a scalar key.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid key name (see [`validate_key_name`]).
    /// For keys declared as `const` this is a compile error instead.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        assert!(is_valid_key_name(name), "invalid configuration key name");
        Self {
            name,
            marker: PhantomData,
        }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ConfigValue> ConfigurationKey for ScalarKey<T> {
    type Output = Option<T>;

    fn descriptor(&self) -> KeyDescriptor {
        KeyDescriptor {
            name: self.name,
            kind: KeyKind::Scalar,
            value_type: T::VALUE_TYPE,
        }
    }

    fn resolve_with<R: ConfigurationResolver + ?Sized>(&self, resolver: &R) -> Option<T> {
        resolver.resolve_scalar(self)
    }
}

/// A key resolving to a list of values of type `T`.
///
/// Sources contribute to list keys through list modifications rather than
/// whole lists.
///
/// # Examples
///
/// ```
/// use strata::{ConfigurationKey, ListKey};
///
/// const EXCLUDE: ListKey<String> = ListKey::new("lint.exclude");
/// assert!(EXCLUDE.descriptor().is_list());
/// ```
pub struct ListKey<T> {
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> ListKey<T> {
    /// Creates a list key.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid key name (see [`validate_key_name`]).
    /// For keys declared as `const` this is a compile error instead.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        assert!(is_valid_key_name(name), "invalid configuration key name");
        Self {
            name,
            marker: PhantomData,
        }
    }

    /// Returns the key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ConfigValue> ConfigurationKey for ListKey<T> {
    type Output = Vec<T>;

    fn descriptor(&self) -> KeyDescriptor {
        KeyDescriptor {
            name: self.name,
            kind: KeyKind::List,
            value_type: T::VALUE_TYPE,
        }
    }

    fn resolve_with<R: ConfigurationResolver + ?Sized>(&self, resolver: &R) -> Vec<T> {
        resolver.resolve_list(self)
    }
}

// Keys are compared and hashed by name only; the phantom type must not add
// bounds to these impls, so they are written out instead of derived.
macro_rules! key_impls {
    ($key:ident) => {
        impl<T> Clone for $key<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $key<T> {}

        impl<T> PartialEq for $key<T> {
            fn eq(&self, other: &Self) -> bool {
                self.name == other.name
            }
        }

        impl<T> Eq for $key<T> {}

        impl<T> Hash for $key<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.name.hash(state);
            }
        }

        impl<T> fmt::Debug for $key<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($key)).field(&self.name).finish()
            }
        }
    };
}

key_impls!(ScalarKey);
key_impls!(ListKey);

const fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'-'
}

const fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.'
}

const fn is_valid_key_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() || !is_name_start(bytes[0]) {
        return false;
    }
    let mut i = 1;
    while i < bytes.len() {
        if !is_name_char(bytes[i]) {
            return false;
        }
        i += 1;
    }
    let last = bytes[bytes.len() - 1];
    last != b'-' && last != b'.'
}

/// Checks that `name` is usable as a configuration key.
///
/// Names start with an ASCII letter, `_` or `-`, continue with ASCII
/// alphanumerics, `_`, `-` or `.`, and do not end with `-` or `.`.
///
/// # Errors
///
/// Returns [`Error::InvalidKeyName`] describing the first violated rule.
///
/// # Examples
///
/// ```
/// use strata::key::validate_key_name;
///
/// assert!(validate_key_name("editor.tab-width").is_ok());
/// assert!(validate_key_name("editor.").is_err());
/// assert!(validate_key_name("1st").is_err());
/// ```
pub fn validate_key_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidKeyName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let bytes = name.as_bytes();
    let Some(&first) = bytes.first() else {
        return Err(invalid("must not be empty"));
    };
    if !is_name_start(first) {
        return Err(invalid("must start with a letter, '_' or '-'"));
    }
    if let Some(bad) = name.chars().find(|c| !u8::try_from(*c).is_ok_and(is_name_char)) {
        return Err(invalid(&format!("contains illegal character '{bad}'")));
    }
    if matches!(bytes.last(), Some(b'-' | b'.')) {
        return Err(invalid("must not end with '-' or '.'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_valid_names() {
        for name in ["a", "_x", "-flag", "editor.tab-width", "a.b.c_d-9", "stop-bubbling"] {
            assert!(validate_key_name(name).is_ok(), "{name} should be valid");
            assert!(is_valid_key_name(name));
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "9", ".a", "a.", "a-", "-", "a b", "a/b", "é"] {
            assert!(validate_key_name(name).is_err(), "{name} should be invalid");
            assert!(!is_valid_key_name(name));
        }
    }

    #[test]
    fn test_invalid_name_reason() {
        let err = validate_key_name("bad name").unwrap_err();
        assert!(format!("{err}").contains("illegal character ' '"));
    }

    #[test]
    #[should_panic(expected = "invalid configuration key name")]
    fn test_new_rejects_invalid_name() {
        let name = String::from("oops.");
        let leaked: &'static str = Box::leak(name.into_boxed_str());
        let _ = ScalarKey::<bool>::new(leaked);
    }

    #[test]
    fn test_descriptors() {
        let scalar: ScalarKey<String> = ScalarKey::new("user.name");
        let list: ListKey<i64> = ListKey::new("ports.excluded");

        assert_eq!(
            scalar.descriptor(),
            KeyDescriptor {
                name: "user.name",
                kind: KeyKind::Scalar,
                value_type: ValueType::Str,
            }
        );
        assert!(list.descriptor().is_list());
        assert_eq!(list.descriptor().value_type, ValueType::Int);
    }

    #[test]
    fn test_keys_compare_by_name() {
        let a: ScalarKey<bool> = ScalarKey::new("feature.on");
        let b: ScalarKey<bool> = ScalarKey::new("feature.on");
        let c: ScalarKey<bool> = ScalarKey::new("feature.off");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_stop_bubbling_key() {
        let descriptor = STOP_BUBBLING.descriptor();
        assert_eq!(descriptor.name, "stop-bubbling");
        assert_eq!(descriptor.kind, KeyKind::Scalar);
        assert_eq!(descriptor.value_type, ValueType::Bool);
    }

    #[test]
    fn test_descriptor_display() {
        let key: ListKey<String> = ListKey::new("lint.exclude");
        assert_eq!(key.descriptor().to_string(), "lint.exclude (list string)");
    }
}
