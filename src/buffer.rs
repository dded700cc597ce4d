//! Buffer: dense positional storage, cached hashes and the hash index.
//!
//! A `Buffer` is always reached through an `OrderedSet` handle. Positional
//! preconditions (indices and ranges within bounds) are checked by the
//! handle; the buffer only debug-asserts them.

use crate::hash_index::HashIndex;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Range;
use tracing::trace;

/// Capacity of a buffer created without an explicit request.
pub const MIN_CAPACITY: usize = 2;

/// Rounds a requested capacity to the slot count actually allocated.
fn capacity_for(requested: usize) -> usize {
    requested.max(MIN_CAPACITY).next_power_of_two()
}

pub(crate) struct Buffer<T, S> {
    hasher: S,
    capacity: usize,
    elements: Vec<T>,
    // hashes[i] is the hash of elements[i], computed once on entry.
    hashes: Vec<u64>,
    index: HashIndex,
}

impl<T, S> Buffer<T, S> {
    pub(crate) fn with_capacity_and_hasher(minimum_capacity: usize, hasher: S) -> Self {
        let capacity = capacity_for(minimum_capacity);
        Self {
            hasher,
            capacity,
            elements: Vec::with_capacity(capacity),
            hashes: Vec::with_capacity(capacity),
            index: HashIndex::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn into_elements(self) -> Vec<T> {
        self.elements
    }

    /// Grows to at least `minimum` slots and rehashes every live element
    /// in positional order. No-op when the buffer is already large enough.
    pub(crate) fn ensure_capacity(&mut self, minimum: usize) {
        if minimum <= self.capacity {
            return;
        }
        let from = self.capacity;
        let to = capacity_for(minimum).max(from.saturating_mul(2));
        self.elements
            .reserve_exact(to.saturating_sub(self.elements.len()));
        self.hashes.reserve_exact(to.saturating_sub(self.hashes.len()));
        self.index.rebuild(to, &self.hashes);
        self.capacity = to;
        trace!(from, to, len = self.elements.len(), "ordered set buffer grew");
    }

    /// Empties the buffer, keeping its allocation or dropping back to
    /// `MIN_CAPACITY`.
    pub(crate) fn remove_all(&mut self, keep_capacity: bool) {
        if keep_capacity {
            self.elements.clear();
            self.hashes.clear();
            self.index.clear();
            return;
        }
        let from = self.capacity;
        self.capacity = capacity_for(MIN_CAPACITY);
        self.elements = Vec::with_capacity(self.capacity);
        self.hashes = Vec::with_capacity(self.capacity);
        self.index = HashIndex::with_capacity(self.capacity);
        trace!(from, to = self.capacity, "ordered set buffer capacity reset");
    }

    /// Removes the element at `index`, closing the gap.
    pub(crate) fn remove_at(&mut self, index: usize) -> T {
        debug_assert!(index < self.elements.len());
        let hash = self.hashes.remove(index);
        self.index.remove_record(hash, index);
        let value = self.elements.remove(index);
        let len = self.elements.len();
        self.index.shift(index + 1..len + 1, -1, &self.hashes);
        value
    }

    /// Keeps the elements for which `keep` returns true. The element at
    /// `first_rejected` is known to be dropped and is not offered to `keep`;
    /// every later element is offered exactly once, in order.
    pub(crate) fn retain_from(&mut self, first_rejected: usize, mut keep: impl FnMut(&T) -> bool) {
        let len = self.elements.len();
        debug_assert!(first_rejected < len);
        let mut write = first_rejected;
        for read in first_rejected + 1..len {
            if keep(&self.elements[read]) {
                self.elements.swap(write, read);
                self.hashes.swap(write, read);
                write += 1;
            }
        }
        self.elements.truncate(write);
        self.hashes.truncate(write);
        self.index.rebuild(self.capacity, &self.hashes);
    }
}

impl<T, S> Buffer<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn hash_of<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_hashed<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let elements = &self.elements;
        self.index.find(hash, |p| elements[p].borrow() == q)
    }

    pub(crate) fn position_of<Q>(&self, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.elements.is_empty() {
            return None;
        }
        self.find_hashed(self.hash_of(q), q)
    }

    fn push_hashed(&mut self, hash: u64, value: T) {
        self.ensure_capacity(self.elements.len() + 1);
        let position = self.elements.len();
        self.elements.push(value);
        self.hashes.push(hash);
        self.index.insert_record(hash, position, &self.hashes);
    }

    /// Appends `value` unless an equal element is present.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_of(&value);
        if self.find_hashed(hash, &value).is_some() {
            return false;
        }
        self.push_hashed(hash, value);
        true
    }

    /// Places `value` at `index`. A present equal element is removed first
    /// and `index` is clamped to the shortened length.
    pub(crate) fn insert_at(&mut self, index: usize, value: T) {
        debug_assert!(index <= self.elements.len());
        let hash = self.hash_of(&value);
        let mut index = index;
        if let Some(existing) = self.find_hashed(hash, &value) {
            if existing == index {
                return;
            }
            self.remove_at(existing);
            index = index.min(self.elements.len());
        }
        self.ensure_capacity(self.elements.len() + 1);
        self.elements.insert(index, value);
        self.hashes.insert(index, hash);
        let len = self.elements.len();
        self.index.shift(index..len - 1, 1, &self.hashes);
        self.index.insert_record(hash, index, &self.hashes);
    }

    pub(crate) fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let (lower, _) = values.size_hint();
        self.ensure_capacity(self.elements.len() + lower);
        for value in values {
            self.insert(value);
        }
    }

    /// Overwrites the element at `index`, returning the previous one.
    /// Fails with the other position when `value` lives elsewhere.
    pub(crate) fn replace_at(&mut self, index: usize, value: T) -> Result<T, usize> {
        debug_assert!(index < self.elements.len());
        let hash = self.hash_of(&value);
        match self.find_hashed(hash, &value) {
            Some(p) if p == index => Ok(mem::replace(&mut self.elements[index], value)),
            Some(p) => Err(p),
            None => {
                self.index.remove_record(self.hashes[index], index);
                self.hashes[index] = hash;
                let previous = mem::replace(&mut self.elements[index], value);
                self.index.insert_record(hash, index, &self.hashes);
                Ok(previous)
            }
        }
    }

    /// Replaces the elements in `range` with the distinct, not otherwise
    /// present elements of `values`, shifting the tail once. Returns how
    /// many elements were inserted.
    pub(crate) fn replace_range<I>(&mut self, range: Range<usize>, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        debug_assert!(range.start <= range.end && range.end <= self.elements.len());
        // Unlink the replaced records first: incoming values equal to them
        // are accepted, and lookups below never resolve into the range.
        for p in range.clone() {
            self.index.remove_record(self.hashes[p], p);
        }

        let values = values.into_iter();
        let (lower, _) = values.size_hint();
        let mut fresh: Vec<T> = Vec::with_capacity(lower);
        let mut fresh_hashes: Vec<u64> = Vec::with_capacity(lower);
        let mut seen = HashIndex::with_capacity(lower);
        for value in values {
            let hash = self.hash_of(&value);
            if self.find_hashed(hash, &value).is_some()
                || seen.find(hash, |k| fresh[k] == value).is_some()
            {
                continue;
            }
            fresh_hashes.push(hash);
            fresh.push(value);
            seen.insert_record(hash, fresh.len() - 1, &fresh_hashes);
        }

        let old_len = self.elements.len();
        let removed = range.len();
        let added = fresh.len();
        let new_len = old_len - removed + added;
        drop(self.elements.splice(range.clone(), fresh));
        drop(self.hashes.splice(range.clone(), fresh_hashes));

        if new_len > self.capacity {
            // Growing rehashes every position, the fresh ones included.
            self.ensure_capacity(new_len);
        } else {
            let delta = added as isize - removed as isize;
            self.index.shift(range.end..old_len, delta, &self.hashes);
            for p in range.start..range.start + added {
                self.index.insert_record(self.hashes[p], p, &self.hashes);
            }
        }
        added
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.capacity >= self.elements.len(), "capacity below len");
        assert_eq!(self.elements.len(), self.hashes.len());
        assert_eq!(self.index.len(), self.elements.len(), "one record per element");
        for (i, value) in self.elements.iter().enumerate() {
            assert_eq!(self.hashes[i], self.hash_of(value), "stale cached hash at {i}");
            assert_eq!(self.find_hashed(self.hashes[i], value), Some(i), "index record for {i}");
        }
    }
}

impl<T, S> Buffer<T, S>
where
    T: Clone,
    S: Clone,
{
    /// Deep copy of the live region with room for at least
    /// `minimum_capacity` elements.
    pub(crate) fn duplicate(&self, minimum_capacity: usize) -> Self {
        let capacity = if minimum_capacity > self.capacity {
            capacity_for(minimum_capacity)
        } else {
            self.capacity
        };
        let mut elements = Vec::with_capacity(capacity);
        elements.extend(self.elements.iter().cloned());
        let mut hashes = Vec::with_capacity(capacity);
        hashes.extend_from_slice(&self.hashes);
        let index = if capacity == self.capacity {
            self.index.clone()
        } else {
            let mut index = HashIndex::with_capacity(capacity);
            index.rebuild(capacity, &hashes);
            index
        };
        Self {
            hasher: self.hasher.clone(),
            capacity,
            elements,
            hashes,
            index,
        }
    }

    /// Copies the elements in `range` into a new buffer sharing this
    /// buffer's hasher. Cached hashes are reused.
    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        let capacity = capacity_for(range.len());
        let mut elements = Vec::with_capacity(capacity);
        elements.extend(self.elements[range.clone()].iter().cloned());
        let mut hashes = Vec::with_capacity(capacity);
        hashes.extend_from_slice(&self.hashes[range]);
        let mut index = HashIndex::with_capacity(capacity);
        index.rebuild(capacity, &hashes);
        Self {
            hasher: self.hasher.clone(),
            capacity,
            elements,
            hashes,
            index,
        }
    }
}
