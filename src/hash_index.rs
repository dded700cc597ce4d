//! HashIndex: hash -> position records for the dense element array.
//!
//! The index never owns elements. Each record is the position of one live
//! element; lookups probe by the element's cached hash and let the caller
//! resolve candidate positions against the element array. Records are moved
//! (re-threaded) whenever the array shifts, so a record always names a valid
//! slot and no dead slots are left behind.

use core::ops::Range;
use hashbrown::HashTable;

#[derive(Clone, Debug, Default)]
pub(crate) struct HashIndex {
    table: HashTable<usize>,
}

impl HashIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns a recorded position for which `eq` holds, probing from
    /// `hash`.
    ///
    /// The table only pre-filters candidates by a few bits of the hash, so
    /// `eq` may be offered records stored under other hashes and must fully
    /// identify the record it wants.
    pub(crate) fn find(&self, hash: u64, mut eq: impl FnMut(usize) -> bool) -> Option<usize> {
        self.table.find(hash, |&p| eq(p)).copied()
    }

    /// Records that the element hashed to `hash` now lives at `position`.
    ///
    /// `hashes` must be laid out by current positions; it is consulted if
    /// the table has to grow.
    pub(crate) fn insert_record(&mut self, hash: u64, position: usize, hashes: &[u64]) {
        self.table.insert_unique(hash, position, |&p| hashes[p]);
    }

    pub(crate) fn remove_record(&mut self, hash: u64, position: usize) {
        self.table
            .find_entry(hash, |&p| p == position)
            .expect("every live position has exactly one index record")
            .remove();
    }

    /// Moves the records of the `old` positions by `delta`.
    ///
    /// `hashes` must already be laid out by the new positions. Short runs
    /// are relocated record by record; a run covering more than half of the
    /// records is handled by one pass over the table instead.
    pub(crate) fn shift(&mut self, old: Range<usize>, delta: isize, hashes: &[u64]) {
        if delta == 0 || old.is_empty() {
            return;
        }
        if old.len() > self.table.len() / 2 {
            for p in self.table.iter_mut() {
                if old.contains(p) {
                    *p = offset(*p, delta);
                }
            }
        } else if delta > 0 {
            // Walk backwards so a destination is always vacated first.
            for p in old.rev() {
                self.relocate(p, offset(p, delta), hashes);
            }
        } else {
            for p in old {
                self.relocate(p, offset(p, delta), hashes);
            }
        }
    }

    fn relocate(&mut self, from: usize, to: usize, hashes: &[u64]) {
        let slot = self
            .table
            .find_mut(hashes[to], |&p| p == from)
            .expect("shifted position has an index record");
        *slot = to;
    }

    /// Drops every record and reinserts positions `0..hashes.len()` in
    /// positional order, sizing the table for at least `capacity` records.
    pub(crate) fn rebuild(&mut self, capacity: usize, hashes: &[u64]) {
        let capacity = capacity.max(hashes.len());
        if capacity <= self.table.capacity() {
            self.table.clear();
        } else {
            self.table = HashTable::with_capacity(capacity);
        }
        for (position, &hash) in hashes.iter().enumerate() {
            self.table.insert_unique(hash, position, |&p| hashes[p]);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }

    #[cfg(test)]
    pub(crate) fn positions(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self.table.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

fn offset(position: usize, delta: isize) -> usize {
    position
        .checked_add_signed(delta)
        .expect("shifted position stays within the element array")
}
