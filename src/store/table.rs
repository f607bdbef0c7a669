//! Store implementation
//!
//! BTreeMap-based table with a secondary expiry index.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use crate::clock::{Clock, Instant};
use super::Entry;

/// In-memory key-value table with per-key TTL
///
/// ## Ownership
/// The store owns its clock and only ever calls `Clock::now` on it. To
/// steer time from outside, pass a shared handle such as a cloned
/// `ManualClock` or an `Arc<C>`.
///
/// ## Two-phase expiration
/// - **Logical**: `get`, `contains_key` and `get_many_sorted` skip expired
///   entries without touching the table
/// - **Physical**: only `remove` and `remove_one_expired_entry` delete;
///   `len` counts everything still held
///
/// Not synchronized. Wrap in `SharedStore` for concurrent callers.
pub struct Store<C: Clock> {
    /// Primary table, ordered by key bytes
    entries: BTreeMap<Vec<u8>, Entry>,

    /// Entries with a deadline, ordered by (deadline, key)
    expiry: BTreeSet<(Instant, Vec<u8>)>,

    /// Time source, read on every TTL-sensitive operation
    clock: C,
}

impl<C: Clock> Store<C> {
    /// Create a store preloaded with `(key, value, ttl)` triples
    ///
    /// All deadlines are computed from a single `now()` reading taken
    /// before the first entry is loaded. Duplicate keys keep the last value.
    ///
    /// One pass over the input, but each insert into the ordered table is
    /// `O(log n)`, so loading is `O(n log n)` rather than linear.
    pub fn new<I, K, V>(entries: I, clock: C) -> Self
    where
        I: IntoIterator<Item = (K, V, u32)>,
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        let now = clock.now();
        let mut store = Self::empty(clock);

        let mut loaded = 0usize;
        for (key, value, ttl) in entries {
            store.insert(key.into(), Entry::with_ttl(value.into(), ttl, now));
            loaded += 1;
        }

        tracing::debug!(
            loaded,
            distinct = store.entries.len(),
            now = %now,
            "Store constructed"
        );
        store
    }

    /// Create an empty store
    pub fn empty(clock: C) -> Self {
        Self {
            entries: BTreeMap::new(),
            expiry: BTreeSet::new(),
            clock,
        }
    }

    /// Insert or overwrite `key`
    ///
    /// `ttl == 0` stores the value forever; otherwise it expires `ttl`
    /// seconds after the current clock reading. Any previous TTL is dropped.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, ttl: u32) {
        let key = key.into();
        let entry = Entry::with_ttl(value.into(), ttl, self.clock.now());

        tracing::trace!(
            key = %String::from_utf8_lossy(&key),
            ttl,
            expires_at = ?entry.expires_at,
            "set"
        );

        self.insert(key, entry);
    }

    /// Delete `key`, expired or not
    ///
    /// Returns `true` if the key was held by the store.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match self.detach(key) {
            Some(entry) => {
                tracing::trace!(
                    key = %String::from_utf8_lossy(key),
                    expires_at = ?entry.expires_at,
                    "remove: entry deleted"
                );
                true
            }
            None => {
                tracing::trace!(key = %String::from_utf8_lossy(key), "remove: key not found");
                false
            }
        }
    }

    /// Get the live value for `key`
    ///
    /// An expired entry reads as `None` but is left in place.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let Some(entry) = self.entries.get(key) else {
            tracing::trace!(key = %String::from_utf8_lossy(key), "get: key not found");
            return None;
        };

        if entry.is_expired_at(self.clock.now()) {
            tracing::trace!(key = %String::from_utf8_lossy(key), "get: entry expired");
            return None;
        }

        Some(entry.value.clone())
    }

    /// Whether `key` currently holds a live value
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(self.clock.now()))
    }

    /// Up to `count` live entries with keys strictly greater than `from`
    ///
    /// Results are in ascending byte-wise key order. `from` does not need
    /// to exist. A short (or empty) result just means the table ran out.
    pub fn get_many_sorted(&self, from: &[u8], count: u32) -> Vec<(Vec<u8>, Vec<u8>)> {
        if count == 0 {
            return Vec::new();
        }

        let now = self.clock.now();
        let limit = usize::try_from(count).unwrap_or(usize::MAX);

        let result: Vec<(Vec<u8>, Vec<u8>)> = self
            .entries
            .range::<[u8], _>((Bound::Excluded(from), Bound::Unbounded))
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .take(limit)
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();

        tracing::trace!(
            from = %String::from_utf8_lossy(from),
            count,
            returned = result.len(),
            "get_many_sorted"
        );
        result
    }

    /// Physically delete one expired entry and return it
    ///
    /// Picks the entry with the earliest deadline (smallest key on ties).
    /// Returns `None` and leaves the table untouched if nothing has expired.
    pub fn remove_one_expired_entry(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        let now = self.clock.now();

        let key = match self.expiry.first() {
            Some((deadline, key)) if *deadline < now => key.clone(),
            _ => {
                tracing::trace!(now = %now, "remove_one_expired_entry: nothing expired");
                return None;
            }
        };

        let entry = self.detach(&key)?;

        tracing::debug!(
            key = %String::from_utf8_lossy(&key),
            expires_at = ?entry.expires_at,
            now = %now,
            "Reclaimed expired entry"
        );
        Some((key, entry.value))
    }

    /// Reclaim up to `limit` expired entries, returning how many went
    pub fn purge_expired(&mut self, limit: usize) -> usize {
        let mut reclaimed = 0;
        while reclaimed < limit && self.remove_one_expired_entry().is_some() {
            reclaimed += 1;
        }

        if reclaimed > 0 {
            tracing::debug!(reclaimed, remaining = self.entries.len(), "Purged expired entries");
        }
        reclaimed
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of entries physically held, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of held entries that carry a deadline
    pub fn expiring_len(&self) -> usize {
        self.expiry.len()
    }

    /// The store's clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Insert `entry`, keeping the expiry index in step
    fn insert(&mut self, key: Vec<u8>, entry: Entry) {
        let deadline = entry.expires_at;
        let previous = self
            .entries
            .insert(key.clone(), entry)
            .and_then(|previous| previous.expires_at);

        match (previous, deadline) {
            (Some(old), Some(new)) if old == new => {}
            (previous, deadline) => {
                let mut slot = (Instant::default(), key);
                if let Some(old) = previous {
                    slot.0 = old;
                    self.expiry.remove(&slot);
                }
                if let Some(new) = deadline {
                    slot.0 = new;
                    self.expiry.insert(slot);
                }
            }
        }
    }

    /// Shared deletion path for `remove` and reclamation
    fn detach(&mut self, key: &[u8]) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        if let Some(deadline) = entry.expires_at {
            self.expiry.remove(&(deadline, key.to_vec()));
        }
        Some(entry)
    }
}
