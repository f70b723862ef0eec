//! Chain: the owned, singly-linked entry list behind one bucket.
//!
//! Each chain owns its head entry and each entry owns its successor, so
//! there are no back-references and no cycles by construction. Chains
//! only ever grow at the tail; an existing key is overwritten in place,
//! which keeps insertion order stable across overwrites.

use core::borrow::Borrow;
use core::fmt;

type Link<K, V> = Option<Box<Entry<K, V>>>;

/// One stored key/value association.
pub struct Entry<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

impl<K, V> Entry<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            next: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// The entry after this one in its chain, if any.
    pub fn next(&self) -> Option<&Entry<K, V>> {
        self.next.as_deref()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry {{{}: {}}}", self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Sequence of entries sharing one bucket, in insertion order.
pub struct Chain<K, V> {
    head: Link<K, V>,
    len: usize,
}

impl<K, V> Chain<K, V> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// First entry of the chain; follow [`Entry::next`] from here.
    pub fn head(&self) -> Option<&Entry<K, V>> {
        self.head.as_deref()
    }

    /// Entries from head to tail.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cur: self.head.as_deref(),
            remaining: self.len,
        }
    }
}

impl<K: Eq, V> Chain<K, V> {
    /// The entry whose key equals `key`, if any. O(chain length).
    pub fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.iter().find(|e| e.key.borrow() == key)
    }

    /// Mutable counterpart of [`Chain::find`].
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.head.as_deref_mut();
        while let Some(entry) = cur {
            if entry.key.borrow() == key {
                return Some(entry);
            }
            cur = entry.next.as_deref_mut();
        }
        None
    }

    /// Overwrites the value of an existing `key` in place, or appends a
    /// new terminal entry. Returns the affected entry either way.
    pub fn upsert(&mut self, key: K, value: V) -> &mut Entry<K, V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|e| e.key != key) {
            if let Some(entry) = link {
                link = &mut entry.next;
            }
        }
        // `link` is either the matching entry or the empty tail. Taking the
        // entry out keeps its successors attached, so putting it back
        // restores the chain unchanged.
        let entry = match link.take() {
            Some(mut entry) => {
                entry.value = value;
                entry
            }
            None => {
                self.len += 1;
                Box::new(Entry::new(key, value))
            }
        };
        &mut **link.insert(entry)
    }
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Chain<K, V> {
    fn drop(&mut self) {
        // Unlink one entry at a time; the default recursive drop could
        // exhaust the stack on a long chain.
        let mut cur = self.head.take();
        while let Some(mut entry) = cur {
            cur = entry.next.take();
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Chain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the entries of a [`Chain`], head to tail.
pub struct Iter<'a, K, V> {
    cur: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cur?;
        self.cur = entry.next.as_deref();
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Chain<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
