//! Common test utilities for integration tests.
//!
//! Hand-written sources that observe how the resolver walks a chain.

use std::sync::{Arc, Mutex};

use strata::{ConfigurationSource, KeyDescriptor, MemorySource, SourceResult};

/// A source that fails the test if the resolver ever asks it anything.
#[allow(dead_code)]
pub struct PanickingSource;

impl ConfigurationSource for PanickingSource {
    fn resolve(&self, key: &KeyDescriptor) -> Option<SourceResult> {
        panic!("source beyond the end of bubbling was queried for {}", key.name);
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Wraps a [`MemorySource`] and records every key name it is asked for.
#[allow(dead_code)]
pub struct RecordingSource {
    inner: MemorySource,
    queries: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingSource {
    /// Creates the wrapper and returns the shared query log alongside it.
    pub fn new(inner: MemorySource) -> (Self, Arc<Mutex<Vec<String>>>) {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let source = Self {
            inner,
            queries: Arc::clone(&queries),
        };
        (source, queries)
    }
}

impl ConfigurationSource for RecordingSource {
    fn resolve(&self, key: &KeyDescriptor) -> Option<SourceResult> {
        self.queries.lock().unwrap().push(key.name.to_string());
        self.inner.resolve(key)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
