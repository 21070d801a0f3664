//! Configuration sources and the results they hand to the resolver.
//!
//! A source is one scope in the chain (a directory's settings file, the
//! user profile, built-in defaults). The resolver asks each source about one
//! key at a time and merges the answers; sources never see each other.
//!
//! Two reference sources ship with the crate:
//!
//! - [`MemorySource`]: built programmatically, mostly for tests and defaults
//! - [`DocumentSource`]: parsed from a YAML or JSON settings document

pub mod document;
pub mod memory;

pub use document::{Document, DocumentSource, Entry, ListEdit};
pub use memory::MemorySource;

use crate::key::{ConfigurationKey, KeyDescriptor, STOP_BUBBLING};
use crate::value::Value;

/// One edit to a list-valued setting.
///
/// # Examples
///
/// ```
/// use strata::ListModification;
///
/// let add: ListModification = ListModification::added("target");
/// assert!(add.is_added());
///
/// let remove: ListModification = ListModification::removed("target");
/// assert!(!remove.is_added());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListModification<V = Value> {
    value: V,
    added: bool,
}

impl<V> ListModification<V> {
    /// Creates a modification adding `value`.
    pub fn added(value: impl Into<V>) -> Self {
        Self {
            value: value.into(),
            added: true,
        }
    }

    /// Creates a modification removing `value`.
    pub fn removed(value: impl Into<V>) -> Self {
        Self {
            value: value.into(),
            added: false,
        }
    }

    /// The value being added or removed.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// True for an addition, false for a removal.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        self.added
    }

    /// Consumes the modification, returning its value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Converts the value, keeping the direction. Returns `None` if the
    /// conversion does.
    pub fn try_map<U>(&self, convert: impl FnOnce(&V) -> Option<U>) -> Option<ListModification<U>> {
        convert(&self.value).map(|value| ListModification {
            value,
            added: self.added,
        })
    }
}

/// What a source contributes for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    /// A scalar answer. `None` is an explicit clear.
    Scalar(Option<Value>),
    /// List edits, in the order the source declares them.
    List(Vec<ListModification>),
}

/// A source's answer for one key.
///
/// # Examples
///
/// ```
/// use strata::{Contribution, SourceResult, Value};
///
/// let result = SourceResult::set(4);
/// assert!(result.is_authoritative());
/// assert_eq!(result.contribution(), &Contribution::Scalar(Some(Value::Int(4))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResult {
    contribution: Contribution,
    authoritative: bool,
}

impl SourceResult {
    /// An authoritative scalar value.
    pub fn set(value: impl Into<Value>) -> Self {
        Self::scalar(value, true)
    }

    /// A scalar value with explicit authority.
    ///
    /// A non-authoritative scalar never wins resolution; it only lets the
    /// source take part in the stop-bubbling check.
    pub fn scalar(value: impl Into<Value>, authoritative: bool) -> Self {
        Self {
            contribution: Contribution::Scalar(Some(value.into())),
            authoritative,
        }
    }

    /// An authoritative clear: the scalar resolves to absence.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            contribution: Contribution::Scalar(None),
            authoritative: true,
        }
    }

    /// List edits for a list key.
    #[must_use]
    pub const fn list(modifications: Vec<ListModification>, authoritative: bool) -> Self {
        Self {
            contribution: Contribution::List(modifications),
            authoritative,
        }
    }

    /// The contributed scalar or list edits.
    #[must_use]
    pub const fn contribution(&self) -> &Contribution {
        &self.contribution
    }

    /// Consumes the result, returning its contribution.
    #[must_use]
    pub fn into_contribution(self) -> Contribution {
        self.contribution
    }

    /// Whether this answer overrides broader scopes.
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        self.authoritative
    }
}

/// One scope in a configuration chain.
///
/// Implementations must be safe for concurrent reads and must answer
/// consistently for a fixed snapshot of their underlying configuration.
pub trait ConfigurationSource: Send + Sync {
    /// Answers `key`, or returns `None` if this scope says nothing about it.
    fn resolve(&self, key: &KeyDescriptor) -> Option<SourceResult>;

    /// Whether traversal should stop after this source.
    ///
    /// The default asks [`resolve`](Self::resolve) for [`STOP_BUBBLING`] and
    /// returns true only for a `true` boolean answer.
    fn stop_bubbling(&self) -> bool {
        matches!(
            self.resolve(&STOP_BUBBLING.descriptor())
                .map(SourceResult::into_contribution),
            Some(Contribution::Scalar(Some(Value::Bool(true))))
        )
    }

    /// A short label for log output.
    fn name(&self) -> &str {
        "<unnamed>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Option<SourceResult>);

    impl ConfigurationSource for FixedSource {
        fn resolve(&self, _key: &KeyDescriptor) -> Option<SourceResult> {
            self.0.clone()
        }
    }

    #[test]
    fn test_stop_bubbling_true() {
        let source = FixedSource(Some(SourceResult::scalar(true, false)));
        assert!(source.stop_bubbling());
    }

    #[test]
    fn test_stop_bubbling_false_or_missing() {
        assert!(!FixedSource(Some(SourceResult::scalar(false, false))).stop_bubbling());
        assert!(!FixedSource(None).stop_bubbling());
        assert!(!FixedSource(Some(SourceResult::cleared())).stop_bubbling());
    }

    #[test]
    fn test_stop_bubbling_ignores_non_bool() {
        let source = FixedSource(Some(SourceResult::scalar("true", false)));
        assert!(!source.stop_bubbling());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(FixedSource(None).name(), "<unnamed>");
    }

    #[test]
    fn test_try_map_keeps_direction() {
        let removal: ListModification = ListModification::removed(7_i64);
        let mapped = removal.try_map(|v| match v {
            Value::Int(i) => Some(*i * 2),
            _ => None,
        });
        assert_eq!(mapped, Some(ListModification::<i64>::removed(14)));

        let failed = removal.try_map(|_| None::<i64>);
        assert!(failed.is_none());
    }

    #[test]
    fn test_cleared_is_authoritative_absence() {
        let result = SourceResult::cleared();
        assert!(result.is_authoritative());
        assert_eq!(result.into_contribution(), Contribution::Scalar(None));
    }
}
