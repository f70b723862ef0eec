//! Hash adapters: turn a key into a bounded, non-negative digest.
//!
//! A digest is a pure function of the key's value and is always below
//! `10^length`. Digests are not unique; the table's chains absorb
//! collisions, so nothing downstream may assume otherwise.

use crate::error::TableError;
use core::fmt::{self, Display, Write as _};
use core::hash::{BuildHasher, BuildHasherDefault, Hash};
use zwohash::ZwoHasher;

/// Number of decimal digits a digest may have unless configured otherwise.
pub const DEFAULT_DIGEST_LENGTH: u32 = 10;

/// Deterministic hasher used by the default adapters. Unlike `RandomState`
/// it yields the same digest for the same key across tables and processes.
pub type StableBuildHasher = BuildHasherDefault<ZwoHasher>;

/// Maps keys of type `Q` to digests.
pub trait Digester<Q: ?Sized> {
    /// Digest of `key`, strictly below `10^length`.
    fn digest(&self, key: &Q) -> Result<u64, TableError>;
}

/// Returns `10^length`, the exclusive upper bound of a digest.
pub fn digest_bound(length: u32) -> Result<u64, TableError> {
    if length == 0 {
        return Err(TableError::InvalidDigestLength(length));
    }
    10u64
        .checked_pow(length)
        .ok_or(TableError::InvalidDigestLength(length))
}

/// Shared state of both adapters: a hasher plus the digest bound.
#[derive(Clone)]
struct Bounded<S> {
    build: S,
    length: u32,
    bound: u64,
}

impl<S> Bounded<S> {
    fn new(build: S, length: u32) -> Result<Self, TableError> {
        Ok(Self {
            build,
            length,
            bound: digest_bound(length)?,
        })
    }
}

impl<S: BuildHasher> Bounded<S> {
    #[inline]
    fn reduce<T: ?Sized + Hash>(&self, value: &T) -> u64 {
        self.build.hash_one(value) % self.bound
    }
}

impl<S> fmt::Debug for Bounded<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digest")
            .field("length", &self.length)
            .finish()
    }
}

/// Digests keys through their `Hash` implementation. Never fails.
#[derive(Clone, Debug)]
pub struct HashDigester<S = StableBuildHasher> {
    inner: Bounded<S>,
}

impl<S: Default> HashDigester<S> {
    pub fn with_length(length: u32) -> Result<Self, TableError> {
        Self::with_hasher(S::default(), length)
    }
}

impl<S> HashDigester<S> {
    pub fn with_hasher(build: S, length: u32) -> Result<Self, TableError> {
        Ok(Self {
            inner: Bounded::new(build, length)?,
        })
    }

    pub fn length(&self) -> u32 {
        self.inner.length
    }
}

impl<S: Default> Default for HashDigester<S> {
    fn default() -> Self {
        Self {
            inner: Bounded {
                build: S::default(),
                length: DEFAULT_DIGEST_LENGTH,
                bound: 10u64.pow(DEFAULT_DIGEST_LENGTH),
            },
        }
    }
}

impl<Q, S> Digester<Q> for HashDigester<S>
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn digest(&self, key: &Q) -> Result<u64, TableError> {
        Ok(self.inner.reduce(key))
    }
}

/// Digests keys through their canonical string form, for key types that
/// are printable but not `Hash`.
///
/// A `Display` impl that reports an error makes the key unhashable.
#[derive(Clone, Debug)]
pub struct DisplayDigester<S = StableBuildHasher> {
    inner: Bounded<S>,
}

impl<S: Default> DisplayDigester<S> {
    pub fn with_length(length: u32) -> Result<Self, TableError> {
        Self::with_hasher(S::default(), length)
    }
}

impl<S> DisplayDigester<S> {
    pub fn with_hasher(build: S, length: u32) -> Result<Self, TableError> {
        Ok(Self {
            inner: Bounded::new(build, length)?,
        })
    }

    pub fn length(&self) -> u32 {
        self.inner.length
    }
}

impl<S: Default> Default for DisplayDigester<S> {
    fn default() -> Self {
        Self {
            inner: Bounded {
                build: S::default(),
                length: DEFAULT_DIGEST_LENGTH,
                bound: 10u64.pow(DEFAULT_DIGEST_LENGTH),
            },
        }
    }
}

impl<Q, S> Digester<Q> for DisplayDigester<S>
where
    Q: ?Sized + Display,
    S: BuildHasher,
{
    fn digest(&self, key: &Q) -> Result<u64, TableError> {
        let mut repr = String::new();
        write!(repr, "{key}").map_err(|_| TableError::UnhashableKey)?;
        Ok(self.inner.reduce(repr.as_str()))
    }
}
