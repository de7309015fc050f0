//! Identity cache for named database objects.
//!
//! The cache hands out one canonical wrapper per object name, so two
//! lookups of the same table return the same `Arc`:
//!
//! ```ignore
//! let a = schema.get_table("people")?;
//! let b = schema.get_table("people")?;
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! The cache never asks the server anything. Callers run the existence
//! check and pass the answer to [`IdentityCache::get_or_create`]; a negative
//! answer evicts any stale entry.

use crate::config::NameCase;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use xcrud_core::{NotFoundError, ObjectCategory, Result};

/// Per-category map from object name to its wrapper.
pub struct IdentityCache<W> {
    category: ObjectCategory,
    name_case: NameCase,
    entries: Mutex<HashMap<String, Arc<W>>>,
}

impl<W> IdentityCache<W> {
    pub fn new(category: ObjectCategory, name_case: NameCase) -> Self {
        Self {
            category,
            name_case,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn category(&self) -> ObjectCategory {
        self.category
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<W>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve `name` given the result of an existence check.
    ///
    /// A missing object is evicted and reported as [`NotFoundError`]. An
    /// existing object is returned from the cache, or built by `factory` and
    /// cached on first use.
    #[tracing::instrument(level = "debug", skip(self, factory), fields(category = %self.category))]
    pub fn get_or_create(
        &self,
        name: &str,
        exists: bool,
        factory: impl FnOnce(&str) -> W,
    ) -> Result<Arc<W>> {
        let key = self.name_case.key(name);
        let mut entries = self.entries();
        if !exists {
            if entries.remove(&key).is_some() {
                tracing::debug!("evicted object that no longer exists");
            }
            return Err(NotFoundError::new(self.category, name).into());
        }
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        tracing::trace!("caching new wrapper");
        let wrapper = Arc::new(factory(name));
        entries.insert(key, Arc::clone(&wrapper));
        Ok(wrapper)
    }

    pub fn get(&self, name: &str) -> Option<Arc<W>> {
        self.entries().get(&self.name_case.key(name)).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries().contains_key(&self.name_case.key(name))
    }

    /// Drop the entry for `name`. Returns whether one was present.
    #[tracing::instrument(level = "debug", skip(self), fields(category = %self.category))]
    pub fn invalidate(&self, name: &str) -> bool {
        self.entries().remove(&self.name_case.key(name)).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Cached names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<W> fmt::Debug for IdentityCache<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("category", &self.category)
            .field("name_case", &self.name_case)
            .field("names", &self.names())
            .finish()
    }
}
