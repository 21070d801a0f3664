#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # strata
//!
//! Layered configuration resolution.
//!
//! A setting is resolved by asking an ordered chain of configuration sources,
//! nearest scope first (a directory, then the project, then the user profile,
//! then built-in defaults), and merging their partial answers. Scalar settings
//! take the nearest authoritative answer. List settings are assembled from
//! incremental edits contributed by every scope, until a scope resets the list
//! or tells the resolver to stop looking further out.
//!
//! ## Core Types
//!
//! - [`ScalarKey`] and [`ListKey`]: typed configuration keys
//! - [`ConfigurationSource`], [`SourceResult`] and [`ListModification`]: what
//!   a scope contributes
//! - [`BubblingResolver`]: the merge over a chain of sources
//! - [`MemorySource`] and [`DocumentSource`]: ready-made sources
//! - [`Error`] and [`Result`]: errors from loading documents
//!
//! ## Examples
//!
//! ```
//! use strata::{BubblingResolver, ConfigurationResolver, ListKey, MemorySource, ScalarKey};
//!
//! const FORMAT_ON_SAVE: ScalarKey<bool> = ScalarKey::new("editor.format-on-save");
//! const EXCLUDE: ListKey<String> = ListKey::new("lint.exclude");
//!
//! let resolver = BubblingResolver::builder()
//!     .with_source(MemorySource::new("directory").remove("lint.exclude", "vendor"))
//!     .with_source(MemorySource::new("project").add("lint.exclude", "generated"))
//!     .with_source(
//!         MemorySource::new("defaults")
//!             .set("editor.format-on-save", false)
//!             .add("lint.exclude", "vendor")
//!             .add("lint.exclude", "target"),
//!     )
//!     .build();
//!
//! assert_eq!(resolver.resolve(&FORMAT_ON_SAVE), Some(false));
//! assert_eq!(resolver.resolve(&EXCLUDE), vec!["target", "generated"]);
//! ```

pub mod error;
pub mod key;
pub mod resolver;
pub mod source;
pub mod value;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use key::{ConfigurationKey, KeyDescriptor, KeyKind, ListKey, ScalarKey, STOP_BUBBLING};
pub use resolver::{BubblingResolver, BubblingResolverBuilder, ConfigurationResolver};
pub use source::{
    ConfigurationSource, Contribution, Document, DocumentSource, Entry, ListEdit,
    ListModification, MemorySource, SourceResult,
};
pub use value::{ConfigValue, Value, ValueType};
