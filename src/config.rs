//! Construction-time settings for a [`Table`](crate::Table).

use crate::digest::{digest_bound, DEFAULT_DIGEST_LENGTH};
use crate::error::TableError;

/// Bucket count used by `Table::new`.
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// Fixed shape of a table. Neither value changes after construction;
/// there is no growth or rehashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Number of buckets, must be positive.
    pub bucket_count: usize,
    /// Digests stay below `10^digest_length`.
    pub digest_length: u32,
}

impl TableConfig {
    pub fn with_bucket_count(self, bucket_count: usize) -> Self {
        Self {
            bucket_count,
            ..self
        }
    }

    pub fn with_digest_length(self, digest_length: u32) -> Self {
        Self {
            digest_length,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.bucket_count == 0 {
            return Err(TableError::ZeroBuckets);
        }
        digest_bound(self.digest_length).map(|_| ())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            digest_length: DEFAULT_DIGEST_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = TableConfig::default();
        assert_eq!(c.bucket_count, 100);
        assert_eq!(c.digest_length, 10);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_buckets_and_bad_lengths() {
        let c = TableConfig::default();
        assert_eq!(
            c.with_bucket_count(0).validate(),
            Err(TableError::ZeroBuckets)
        );
        assert_eq!(
            c.with_digest_length(0).validate(),
            Err(TableError::InvalidDigestLength(0))
        );
        assert_eq!(
            c.with_digest_length(20).validate(),
            Err(TableError::InvalidDigestLength(20))
        );
        assert_eq!(c.with_bucket_count(1).with_digest_length(19).validate(), Ok(()));
    }
}
