//! Shared Store
//!
//! A `Store` behind a single mutex, for callers that need to reach one
//! table from several threads.
//!
//! ## Concurrency
//! - One `parking_lot::Mutex` guards the whole table
//! - Every operation holds the lock for its full duration, so each call
//!   is atomic with respect to the others
//! - Cloning is cheap and yields another handle to the same table

use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::store::Store;

/// Thread-safe handle to a `Store`
pub struct SharedStore<C: Clock> {
    inner: Arc<Mutex<Store<C>>>,
}

impl<C: Clock> Clone for SharedStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedStore<C> {
    /// Wrap an existing store
    pub fn new(store: Store<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// See `Store::set`
    pub fn set(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, ttl: u32) {
        self.inner.lock().set(key, value, ttl);
    }

    /// See `Store::remove`
    pub fn remove(&self, key: &[u8]) -> bool {
        self.inner.lock().remove(key)
    }

    /// See `Store::get`
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.lock().get(key)
    }

    /// See `Store::get_many_sorted`
    pub fn get_many_sorted(&self, from: &[u8], count: u32) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.inner.lock().get_many_sorted(from, count)
    }

    /// See `Store::remove_one_expired_entry`
    pub fn remove_one_expired_entry(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.inner.lock().remove_one_expired_entry()
    }

    /// See `Store::purge_expired`
    pub fn purge_expired(&self, limit: usize) -> usize {
        self.inner.lock().purge_expired(limit)
    }

    /// Number of entries physically held
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the table holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Run `f` with exclusive access to the underlying store
    ///
    /// Use this to make several operations atomic as a group.
    pub fn with<R>(&self, f: impl FnOnce(&mut Store<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
