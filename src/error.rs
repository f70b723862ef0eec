//! Error taxonomy shared by the table and its hash adapters.

use thiserror::Error;

/// Failures surfaced by [`Table`](crate::Table) and the [`Digester`](crate::Digester)s.
///
/// Lookup misses are not errors; they come back as `Ok(None)` or
/// [`Lookup::Missing`](crate::Lookup::Missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A write was attempted without a key. `Table::set_opt` recovers
    /// this locally and reports it as a no-op.
    #[error("no key supplied")]
    InvalidKey,
    /// The key could not be digested, not even through its string form.
    #[error("key cannot be digested")]
    UnhashableKey,
    /// Tables need at least one bucket.
    #[error("bucket count must be positive")]
    ZeroBuckets,
    /// `10^length` must fit in a `u64`, so valid lengths are `1..=19`.
    #[error("digest length {0} out of range, expected 1..=19")]
    InvalidDigestLength(u32),
}
