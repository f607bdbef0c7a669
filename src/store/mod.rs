//! Store Module
//!
//! In-memory key-value table with per-key time-to-live.
//!
//! ## Responsibilities
//! - Point reads and writes keyed by opaque byte strings
//! - Lazy expiration: expired entries read as absent but stay in memory
//! - Ordered range scans with an exclusive lower bound
//! - Caller-driven reclamation of expired entries
//!
//! ## Data Structure Choice
//! Using two ordered structures:
//! - `BTreeMap<key, Entry>` keeps keys in byte-wise order for scans
//! - `BTreeSet<(expires_at, key)>` finds the oldest expired entry without
//!   walking the whole table
//!
//! ## Expiry Rule
//! An entry with `expires_at = T` is still live at `now == T` and gone once
//! `now > T`. Entries without a deadline never expire.

mod table;

pub use table::Store;

use crate::clock::Instant;

/// Entry stored in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    /// Stored value
    pub value: Vec<u8>,

    /// Instant after which the entry reads as absent (`None` = never)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Create an entry whose deadline is `ttl` seconds after `now`
    ///
    /// A TTL of zero means the entry lives forever.
    pub fn with_ttl(value: Vec<u8>, ttl: u32, now: Instant) -> Self {
        let expires_at = (ttl != 0).then(|| now.saturating_add_secs(ttl));
        Self { value, expires_at }
    }

    /// Whether the entry must be treated as absent at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_never_expires() {
        let entry = Entry::with_ttl(b"v".to_vec(), 0, Instant::from_secs(10));

        assert_eq!(entry.expires_at, None);
        assert!(!entry.is_expired_at(Instant::from_secs(i64::MAX)));
    }

    #[test]
    fn test_expiry_is_strict() {
        let entry = Entry::with_ttl(b"v".to_vec(), 5, Instant::from_secs(100));

        assert_eq!(entry.expires_at, Some(Instant::from_secs(105)));
        assert!(!entry.is_expired_at(Instant::from_secs(105)));
        assert!(entry.is_expired_at(Instant::from_secs(106)));
    }
}
