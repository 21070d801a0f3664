//! An in-memory configuration source.

use std::collections::BTreeMap;

use crate::key::{validate_key_name, KeyDescriptor, STOP_BUBBLING};
use crate::source::{ConfigurationSource, Contribution, ListModification, SourceResult};
use crate::value::Value;

/// A source whose answers are set up in code.
///
/// Useful for built-in defaults, command-line overrides and tests. The source
/// answers by key name alone and does not check answers against the key's
/// kind or type; the resolver discards answers that do not fit.
///
/// Key names must pass [`validate_key_name`], as document setting names do.
/// Debug builds panic on a malformed name.
///
/// # Examples
///
/// ```
/// use strata::{ConfigurationKey, ConfigurationSource, ListKey, MemorySource};
///
/// let source = MemorySource::new("defaults")
///     .set("editor.tab-width", 4)
///     .add("lint.exclude", "target")
///     .with_stop_bubbling(true);
///
/// let exclude: ListKey<String> = ListKey::new("lint.exclude");
/// let answer = source.resolve(&exclude.descriptor()).unwrap();
/// assert!(!answer.is_authoritative());
/// assert!(source.stop_bubbling());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    entries: BTreeMap<String, SourceResult>,
}

impl MemorySource {
    /// Creates an empty source labelled `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Sets an authoritative scalar value.
    #[must_use]
    pub fn set(self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, SourceResult::set(value))
    }

    /// Offers a non-authoritative scalar value.
    ///
    /// The resolver never picks such a value; it only makes the source count
    /// as having answered, so its stop-bubbling signal is consulted.
    #[must_use]
    pub fn suggest(self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, SourceResult::scalar(value, false))
    }

    /// Clears a scalar key: it resolves to nothing, whatever broader scopes say.
    #[must_use]
    pub fn clear(self, key: &str) -> Self {
        self.insert(key, SourceResult::cleared())
    }

    /// Appends an addition to the list edits for `key`.
    #[must_use]
    pub fn add(self, key: &str, value: impl Into<Value>) -> Self {
        self.edit(key, ListModification::added(value))
    }

    /// Appends a removal to the list edits for `key`.
    #[must_use]
    pub fn remove(self, key: &str, value: impl Into<Value>) -> Self {
        self.edit(key, ListModification::removed(value))
    }

    /// Makes the list edits for `key` authoritative, so broader scopes are
    /// not consulted for it.
    #[must_use]
    pub fn reset(mut self, key: &str) -> Self {
        let modifications = match self.entries.remove(key).map(SourceResult::into_contribution) {
            Some(Contribution::List(modifications)) => modifications,
            _ => Vec::new(),
        };
        self.insert(key, SourceResult::list(modifications, true))
    }

    /// Answers the stop-bubbling marker with `flag`.
    #[must_use]
    pub fn with_stop_bubbling(self, flag: bool) -> Self {
        self.suggest(STOP_BUBBLING.name(), flag)
    }

    /// Number of keys this source answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this source answers no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(mut self, key: &str, result: SourceResult) -> Self {
        debug_assert!(
            validate_key_name(key).is_ok(),
            "invalid key name '{key}' for source {}",
            self.name
        );
        self.entries.insert(key.to_string(), result);
        self
    }

    fn edit(mut self, key: &str, modification: ListModification) -> Self {
        let (mut modifications, authoritative) = match self.entries.remove(key) {
            Some(existing) => {
                let authoritative = existing.is_authoritative();
                match existing.into_contribution() {
                    Contribution::List(modifications) => (modifications, authoritative),
                    Contribution::Scalar(_) => (Vec::new(), false),
                }
            }
            None => (Vec::new(), false),
        };
        modifications.push(modification);
        self.insert(key, SourceResult::list(modifications, authoritative))
    }
}

impl ConfigurationSource for MemorySource {
    fn resolve(&self, key: &KeyDescriptor) -> Option<SourceResult> {
        self.entries.get(key.name).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
