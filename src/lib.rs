//! chained-table: a fixed-bucket hash table built from an array of
//! buckets and owned, singly-linked chains.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an associative store whose whole mechanism is visible: digest
//!   the key, pick a bucket, walk that bucket's chain.
//! - Layers:
//!   - Digester<Q>: hash adapter turning a key into a digest below
//!     `10^length`. `HashDigester` uses `Hash` with a deterministic
//!     hasher; `DisplayDigester` falls back to the key's string form.
//!   - Chain<K, V>: append-only list of owned entries for one bucket;
//!     overwrites happen in place so insertion order is stable.
//!   - Table<K, V, D>: fixed array of optional chains plus a digest to
//!     bucket index; public API.
//!
//! Constraints
//! - Bucket count is fixed at construction; there is no rehashing.
//! - Chains are created lazily on the first write to their bucket.
//! - Digests are not unique; distinct keys with equal digests share a
//!   bucket and are told apart by `Eq`.
//! - No removal: entries live until the table is dropped.
//! - Single-threaded: `!Send`/`!Sync`. `set` updates the digest index and
//!   a chain as one step and must not be observed half done.
//!
//! Digest index
//! - Maps every digest written so far to its bucket and always equals
//!   `digest % bucket_count`. Lookups of a digest that was never written
//!   answer "not found" without touching the buckets.
//!
//! Lookups
//! - `get` returns `Ok(None)` on a miss. `get_many` drops misses and
//!   returns the hits in request order, collapsed to a single value when
//!   exactly one key was found (see [`Lookup`]).
//! - Only an undigestable key is an error (`TableError::UnhashableKey`).
//!
//! Reentrancy policy
//! - Public table methods enter a debug-only busy flag. User code called
//!   from inside (`Hash`, `Display`, `Eq`) that reaches back into the same
//!   table panics in debug builds instead of seeing a partial update.

pub mod chain;
pub mod config;
pub mod digest;
mod error;
mod reentrancy;
mod table;
mod table_proptest;

// Public surface
pub use chain::{Chain, Entry};
pub use config::{TableConfig, DEFAULT_BUCKET_COUNT};
pub use digest::{
    digest_bound, Digester, DisplayDigester, HashDigester, StableBuildHasher,
    DEFAULT_DIGEST_LENGTH,
};
pub use error::TableError;
pub use table::{Iter, Keys, Lookup, Table};
