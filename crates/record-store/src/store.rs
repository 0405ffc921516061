//! Generic keyed store with two indices per collection (spec §4.1): a
//! primary id and one secondary unique key. Reads are lock-free via
//! `dashmap`; writes are serialized behind a single `parking_lot::Mutex`
//! so cross-index updates (id index + secondary index) stay consistent —
//! the single-writer discipline spec §5 and §9 call for.

use crate::filter::{self, ParsedFilter};
use dashmap::DashMap;
use identity_core::error::{IdentityError, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Extracts the primary id and the normalized secondary key from a record.
/// Normalization (e.g. lower-casing userName) is the store's job so the
/// uniqueness check and the secondary lookup always agree.
pub trait KeyExtractor<T> {
    fn id(record: &T) -> String;
    fn secondary_key(record: &T) -> String;
    /// The SCIM attribute name this store's secondary key corresponds to,
    /// for filter matching (e.g. `"userName"`, `"displayName"`).
    fn filterable_attribute() -> &'static str;
    /// Normalizes a raw filter literal the same way `secondary_key` does,
    /// so `userName eq "JDoe"` matches a record stored as `"jdoe"`.
    fn normalize(literal: &str) -> String;
}

pub struct KeyedStore<T, K: KeyExtractor<T>> {
    by_id: DashMap<String, Arc<T>>,
    by_secondary: DashMap<String, String>,
    write_lock: Mutex<()>,
    _extractor: std::marker::PhantomData<K>,
}

impl<T, K: KeyExtractor<T>> Default for KeyedStore<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: KeyExtractor<T>> KeyedStore<T, K> {
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
            by_secondary: DashMap::new(),
            write_lock: Mutex::new(()),
            _extractor: std::marker::PhantomData,
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.by_id.get(id).map(|entry| entry.value().clone())
    }

    pub fn find_by_secondary(&self, normalized_key: &str) -> Option<Arc<T>> {
        self.by_secondary
            .get(normalized_key)
            .and_then(|id| self.get(id.value()))
    }

    pub fn list_all(&self) -> Vec<Arc<T>> {
        self.by_id.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn list(&self, filter: Option<&str>) -> Result<Vec<Arc<T>>> {
        let Some(raw) = filter else {
            return Ok(self.list_all());
        };
        let ParsedFilter { attribute, literal } = filter::parse(raw)?;
        if attribute != K::filterable_attribute() {
            return Err(IdentityError::BadFilter {
                filter: raw.to_string(),
            });
        }
        let key = K::normalize(&literal);
        Ok(self.find_by_secondary(&key).into_iter().collect())
    }

    /// Inserts a brand-new record, failing with `on_conflict` if its
    /// secondary key is already taken. Holds the write lock for the
    /// duration of the check-then-insert so uniqueness is never raced.
    pub fn insert_new(&self, record: T, on_conflict: impl FnOnce() -> IdentityError) -> Result<Arc<T>> {
        let _guard = self.write_lock.lock();
        let id = K::id(&record);
        let secondary = K::secondary_key(&record);
        if self.by_secondary.contains_key(&secondary) {
            return Err(on_conflict());
        }
        let arc = Arc::new(record);
        self.by_id.insert(id.clone(), arc.clone());
        self.by_secondary.insert(secondary, id);
        Ok(arc)
    }

    /// Replaces an existing record in place (used by PATCH). The secondary
    /// key is assumed stable across patches in this system (userName and
    /// displayName are not patchable fields per spec §4.6); this still
    /// re-derives it defensively so a future patchable field cannot
    /// silently desync the index.
    pub fn replace(&self, record: T) -> Arc<T> {
        let _guard = self.write_lock.lock();
        let id = K::id(&record);
        let secondary = K::secondary_key(&record);
        let arc = Arc::new(record);
        self.by_id.insert(id.clone(), arc.clone());
        self.by_secondary.insert(secondary, id);
        arc
    }

    pub fn delete(&self, id: &str) -> Option<Arc<T>> {
        let _guard = self.write_lock.lock();
        let removed = self.by_id.remove(id).map(|(_, v)| v);
        if removed.is_some() {
            self.by_secondary.retain(|_, v| v != id);
        }
        removed
    }
}
