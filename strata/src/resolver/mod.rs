//! Resolving keys against a chain of sources.
//!
//! The [`BubblingResolver`] walks its sources from the narrowest scope to
//! the broadest:
//!
//! - a scalar key takes the first authoritative answer
//! - a list key collects list modifications from every source it visits and
//!   folds them together, farther scopes first
//! - an authoritative list answer, or a source raising stop-bubbling, ends the
//!   walk early
//!
//! # Examples
//!
//! ```
//! use strata::{BubblingResolver, ConfigurationResolver, ListKey, MemorySource, ScalarKey};
//!
//! const TAB_WIDTH: ScalarKey<u32> = ScalarKey::new("editor.tab-width");
//! const EXCLUDE: ListKey<String> = ListKey::new("lint.exclude");
//!
//! let resolver = BubblingResolver::builder()
//!     .with_source(MemorySource::new("project").add("lint.exclude", "generated"))
//!     .with_source(
//!         MemorySource::new("user")
//!             .set("editor.tab-width", 2)
//!             .add("lint.exclude", "target"),
//!     )
//!     .build();
//!
//! assert_eq!(resolver.resolve(&TAB_WIDTH), Some(2));
//! assert_eq!(resolver.resolve(&EXCLUDE), vec!["target", "generated"]);
//! ```

mod fold;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use fold::{fold_modifications, fold_modifications_by};

use std::fmt;
use std::sync::Arc;

use crate::key::{ConfigurationKey, ListKey, ScalarKey};
use crate::source::{ConfigurationSource, Contribution, ListModification};
use crate::value::ConfigValue;

/// Resolves typed keys to final values.
pub trait ConfigurationResolver {
    /// Resolves a scalar key; `None` means no scope set it.
    fn resolve_scalar<T: ConfigValue>(&self, key: &ScalarKey<T>) -> Option<T>;

    /// Resolves a list key; the result may be empty but is never absent.
    fn resolve_list<T: ConfigValue>(&self, key: &ListKey<T>) -> Vec<T>;

    /// Resolves any key to the output its kind calls for.
    fn resolve<K: ConfigurationKey>(&self, key: &K) -> K::Output {
        key.resolve_with(self)
    }
}

/// A resolver over an ordered chain of sources, nearest scope first.
///
/// The chain is fixed at construction. Resolution keeps no state between
/// calls, so a resolver can be shared across threads.
pub struct BubblingResolver {
    sources: Vec<Arc<dyn ConfigurationSource>>,
}

impl BubblingResolver {
    /// Creates a resolver over `sources`, which must be ordered nearest
    /// scope first. The order is used as given.
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ConfigurationSource>>,
    {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    /// Starts building a resolver one source at a time.
    #[must_use]
    pub fn builder() -> BubblingResolverBuilder {
        BubblingResolverBuilder::default()
    }

    /// The source chain, nearest scope first.
    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn ConfigurationSource>] {
        &self.sources
    }

    /// Number of sources in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the chain has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for BubblingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BubblingResolver")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ConfigurationResolver for BubblingResolver {
    fn resolve_scalar<T: ConfigValue>(&self, key: &ScalarKey<T>) -> Option<T> {
        let descriptor = key.descriptor();

        for source in &self.sources {
            let Some(result) = source.resolve(&descriptor) else {
                continue;
            };
            log::trace!("{} answered {}", source.name(), descriptor.name);

            let authoritative = result.is_authoritative();
            let value = match result.into_contribution() {
                Contribution::Scalar(None) => None,
                Contribution::Scalar(Some(raw)) => {
                    if let Some(value) = T::from_value(&raw) {
                        Some(value)
                    } else {
                        log::warn!(
                            "ignoring {}: value {raw:?} does not fit {descriptor}",
                            source.name()
                        );
                        continue;
                    }
                }
                Contribution::List(_) => {
                    log::warn!(
                        "ignoring {}: list edits given for {descriptor}",
                        source.name()
                    );
                    continue;
                }
            };

            if authoritative {
                log::debug!("{} resolved by {}", descriptor.name, source.name());
                return value;
            }

            if source.stop_bubbling() {
                log::debug!(
                    "{} stopped bubbling while resolving {}",
                    source.name(),
                    descriptor.name
                );
                break;
            }
        }

        None
    }

    fn resolve_list<T: ConfigValue>(&self, key: &ListKey<T>) -> Vec<T> {
        let descriptor = key.descriptor();
        // One batch per answering source, nearest first.
        let mut batches: Vec<Vec<ListModification<T>>> = Vec::new();

        for source in &self.sources {
            let Some(result) = source.resolve(&descriptor) else {
                continue;
            };
            log::trace!("{} answered {}", source.name(), descriptor.name);

            let authoritative = result.is_authoritative();
            let Contribution::List(modifications) = result.into_contribution() else {
                log::warn!(
                    "ignoring {}: scalar given for {descriptor}",
                    source.name()
                );
                continue;
            };

            let typed: Option<Vec<_>> = modifications
                .iter()
                .map(|m| m.try_map(T::from_value))
                .collect();
            let Some(typed) = typed else {
                log::warn!(
                    "ignoring {}: list edits do not fit {descriptor}",
                    source.name()
                );
                continue;
            };
            batches.push(typed);

            if authoritative {
                log::debug!("{} reset by {}", descriptor.name, source.name());
                break;
            }

            if source.stop_bubbling() {
                log::debug!(
                    "{} stopped bubbling while resolving {}",
                    source.name(),
                    descriptor.name
                );
                break;
            }
        }

        // Farther scopes apply first so that nearer edits land last.
        fold_modifications(batches.into_iter().rev().flatten())
    }
}

/// Builder for [`BubblingResolver`].
///
/// Sources are added nearest scope first.
#[derive(Default)]
pub struct BubblingResolverBuilder {
    sources: Vec<Arc<dyn ConfigurationSource>>,
}

impl BubblingResolverBuilder {
    /// Appends an owned source to the chain.
    #[must_use]
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: ConfigurationSource + 'static,
    {
        self.sources.push(Arc::new(source));
        self
    }

    /// Appends a source shared with other resolvers.
    #[must_use]
    pub fn with_shared_source(mut self, source: Arc<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Finishes the chain.
    #[must_use]
    pub fn build(self) -> BubblingResolver {
        BubblingResolver {
            sources: self.sources,
        }
    }
}
