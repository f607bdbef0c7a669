//! # ttlkv
//!
//! An embeddable in-memory key-value store with:
//! - Per-key time-to-live, checked against an injectable clock
//! - Lazy expiration (expired entries read as absent until reclaimed)
//! - Ordered range scans over byte-string keys
//! - Explicit, caller-driven reclamation of expired entries
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Shell (ttlkv-shell binary)                   │
//! │             line commands → Store operations                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          SharedStore (optional, one Mutex)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Store    │ ───────▶ │    Clock    │
//!   │ (BTreeMap + │   now()  │ (System /   │
//!   │ expiry idx) │          │  Manual)    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ttlkv::{Instant, ManualClock, Store};
//!
//! let clock = ManualClock::new(Instant::from_secs(0));
//! let mut store = Store::new(vec![("a", "val1", 0u32)], clock.clone());
//!
//! store.set("b", "val2", 5);
//! clock.advance(6);
//!
//! assert_eq!(store.get(b"a"), Some(b"val1".to_vec()));
//! assert_eq!(store.get(b"b"), None);
//! assert_eq!(store.remove_one_expired_entry(), Some((b"b".to_vec(), b"val2".to_vec())));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod clock;
pub mod store;
pub mod shared;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use clock::{Clock, Instant, ManualClock, SystemClock};
pub use store::Store;
pub use shared::SharedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ttlkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
