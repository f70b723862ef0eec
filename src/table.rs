//! Table: fixed bucket array of lazily created chains plus a digest index.

use crate::chain::{self, Chain, Entry};
use crate::config::{TableConfig, DEFAULT_BUCKET_COUNT};
use crate::digest::{Digester, HashDigester, StableBuildHasher};
use crate::error::TableError;
use crate::reentrancy::BusyFlag;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use hashbrown::HashMap;
use log::{debug, trace};

/// Associative store over `bucket_count` buckets, each holding zero or
/// one [`Chain`].
///
/// Every operation digests the key, maps the digest to a bucket and
/// delegates to that bucket's chain. `digest_index` caches the bucket of
/// every digest seen so far and always agrees with
/// `digest % bucket_count`.
pub struct Table<K, V, D = HashDigester> {
    buckets: Box<[Option<Chain<K, V>>]>,
    digest_index: HashMap<u64, usize, StableBuildHasher>,
    digester: D,
    busy: BusyFlag,
}

/// Result of [`Table::get_many`]: the hits in request order, collapsed
/// to a bare value when there is exactly one.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a, V> {
    Missing,
    One(&'a V),
    Many(Vec<&'a V>),
}

impl<'a, V> Lookup<'a, V> {
    fn from_hits(hits: Vec<&'a V>) -> Self {
        match hits.len() {
            0 => Lookup::Missing,
            1 => Lookup::One(hits[0]),
            _ => Lookup::Many(hits),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    /// Number of keys that were found.
    pub fn len(&self) -> usize {
        match self {
            Lookup::Missing => 0,
            Lookup::One(_) => 1,
            Lookup::Many(hits) => hits.len(),
        }
    }

    pub fn into_vec(self) -> Vec<&'a V> {
        match self {
            Lookup::Missing => Vec::new(),
            Lookup::One(v) => vec![v],
            Lookup::Many(hits) => hits,
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash,
{
    /// Table with 100 buckets and 10-digit digests.
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_BUCKET_COUNT, HashDigester::default())
    }

    pub fn with_buckets(bucket_count: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::default().with_bucket_count(bucket_count))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let digester = HashDigester::with_length(config.digest_length)?;
        Ok(Self::from_parts(config.bucket_count, digester))
    }
}

impl<K, V> Default for Table<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, D> Table<K, V, D> {
    /// Table using a custom hash adapter; the adapter decides the digest
    /// length.
    pub fn with_digester(bucket_count: usize, digester: D) -> Result<Self, TableError> {
        if bucket_count == 0 {
            return Err(TableError::ZeroBuckets);
        }
        Ok(Self::from_parts(bucket_count, digester))
    }

    fn from_parts(bucket_count: usize, digester: D) -> Self {
        Self {
            buckets: core::iter::repeat_with(|| None).take(bucket_count).collect(),
            digest_index: HashMap::default(),
            digester,
            busy: BusyFlag::new(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn digester(&self) -> &D {
        &self.digester
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.buckets.iter().flatten().map(Chain::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().flatten().all(Chain::is_empty)
    }

    /// Entries in bucket `index`; 0 for empty or out-of-range buckets.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets
            .get(index)
            .and_then(Option::as_ref)
            .map_or(0, Chain::len)
    }

    /// Entries ordered by bucket index, then by insertion within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            entries: None,
        }
    }

    /// Stored keys, in the same order as [`Table::iter`].
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }
}

impl<K, V, D> Table<K, V, D>
where
    K: Eq,
    D: Digester<K>,
{
    /// Stores `value` under `key`, overwriting any previous value in
    /// place. Fails only if the key cannot be digested, in which case
    /// nothing is modified.
    pub fn set(&mut self, key: K, value: V) -> Result<&mut Entry<K, V>, TableError> {
        let _busy = self.busy.enter("set");
        let digest = self.digester.digest(&key)?;

        let bucket_count = self.buckets.len();
        let index = *self.digest_index.entry(digest).or_insert_with(|| {
            let index = (digest % bucket_count as u64) as usize;
            trace!("digest {digest} assigned to bucket {index}");
            index
        });

        let chain = self.buckets[index].get_or_insert_with(|| {
            debug!("creating chain for bucket {index}");
            Chain::new()
        });
        Ok(chain.upsert(key, value))
    }

    /// Like [`Table::set`], but tolerates an absent key: `None` is a
    /// no-op reported as `Ok(None)`.
    pub fn set_opt(
        &mut self,
        key: Option<K>,
        value: V,
    ) -> Result<Option<&mut Entry<K, V>>, TableError> {
        match key.ok_or(TableError::InvalidKey) {
            Ok(key) => self.set(key, value).map(Some),
            Err(e) => {
                debug!("ignoring set: {e}");
                Ok(None)
            }
        }
    }
}

impl<K, V, D> Table<K, V, D>
where
    K: Eq,
{
    fn lookup<Q>(&self, key: &Q) -> Result<Option<&Entry<K, V>>, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        D: Digester<Q>,
    {
        let digest = self.digester.digest(key)?;
        let Some(&index) = self.digest_index.get(&digest) else {
            return Ok(None);
        };
        Ok(self.buckets[index]
            .as_ref()
            .and_then(|chain| chain.find(key)))
    }

    /// Value stored under `key`, or `None` if absent. Never mutates.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        D: Digester<Q>,
    {
        let _busy = self.busy.enter("get");
        Ok(self.lookup(key)?.map(Entry::value))
    }

    /// Looks up several keys at once. Misses are dropped rather than
    /// left as holes; see [`Lookup`] for how the hits are returned.
    pub fn get_many<'q, Q, I>(&self, keys: I) -> Result<Lookup<'_, V>, TableError>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: ?Sized + Eq + 'q,
        D: Digester<Q>,
    {
        let _busy = self.busy.enter("get_many");
        let mut hits = Vec::new();
        for key in keys {
            if let Some(entry) = self.lookup(key)? {
                hits.push(entry.value());
            }
        }
        Ok(Lookup::from_hits(hits))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool, TableError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
        D: Digester<Q>,
    {
        let _busy = self.busy.enter("contains_key");
        Ok(self.lookup(key)?.is_some())
    }

    /// Bucket assigned to the digest of `key`, if that digest has been
    /// written before. A colliding digest of another key counts.
    pub fn bucket_of<Q>(&self, key: &Q) -> Result<Option<usize>, TableError>
    where
        Q: ?Sized,
        D: Digester<Q>,
    {
        let _busy = self.busy.enter("bucket_of");
        let digest = self.digester.digest(key)?;
        Ok(self.digest_index.get(&digest).copied())
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self)
    where
        D: Digester<K>,
    {
        let n = self.buckets.len() as u64;
        for (&digest, &index) in &self.digest_index {
            assert_eq!(digest % n, index as u64, "digest index disagrees with modulo");
        }
        for (index, chain) in self.buckets.iter().enumerate() {
            let Some(chain) = chain else { continue };
            assert!(!chain.is_empty(), "chains are only created for a write");
            assert_eq!(chain.iter().count(), chain.len());
            let entries: Vec<_> = chain.iter().collect();
            for (i, e) in entries.iter().enumerate() {
                let digest = self.digester.digest(e.key()).expect("stored keys digest");
                assert_eq!(self.digest_index.get(&digest), Some(&index));
                assert!(
                    entries[i + 1..].iter().all(|other| other.key() != e.key()),
                    "duplicate key in bucket {index}"
                );
            }
        }
    }
}

impl<K, V, D> fmt::Display for Table<K, V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hashtable <{} key/val pairs>", self.len())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, D> fmt::Debug for Table<K, V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, value)` pairs of a [`Table`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<Chain<K, V>>>,
    entries: Option<chain::Iter<'a, K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.entries.as_mut().and_then(Iterator::next) {
                return Some((e.key(), e.value()));
            }
            self.entries = self.buckets.next()?.as_ref().map(Chain::iter);
        }
    }
}

/// Iterator over the keys of a [`Table`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<'a, K, V, D> IntoIterator for &'a Table<K, V, D> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
