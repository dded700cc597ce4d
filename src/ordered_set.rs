//! OrderedSet: the public copy-on-write handle over a shared `Buffer`.

use crate::buffer::{Buffer, MIN_CAPACITY};
use crate::error::PositionError;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, Index, Range, RangeBounds};
use core::slice::SliceIndex;
use std::collections::hash_map::RandomState;
use std::rc::Rc;
use tracing::trace;

/// An insertion-ordered set with array-like positional access and
/// copy-on-write value semantics.
///
/// Cloning an `OrderedSet` is O(1): both handles share one buffer until
/// either of them is mutated, at which point the mutating handle takes a
/// private copy. Mutating methods therefore require `T: Clone` and
/// `S: Clone`.
///
/// Equality is order-sensitive: two sets are equal when they hold equal
/// elements at every position.
///
/// Elements must uphold the usual `Hash`/`Eq` contract (equal elements
/// hash equally). Violations are not detected and leave lookups
/// unspecified.
///
/// ```
/// use ordered_cow_set::OrderedSet;
///
/// let mut a = OrderedSet::from([1, 2, 3, 4, 5]);
/// a.insert_at(2, 6);
/// assert_eq!(a, [1, 2, 6, 3, 4, 5]);
///
/// let b = a.clone();
/// a.remove(&6);
/// assert_eq!(b, [1, 2, 6, 3, 4, 5]);
/// assert_eq!(a, [1, 2, 3, 4, 5]);
/// ```
pub struct OrderedSet<T, S = RandomState> {
    buffer: Rc<Buffer<T, S>>,
}

impl<T> OrderedSet<T> {
    /// Creates an empty set with the default (small) capacity.
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    /// Creates an empty set with room for at least `minimum_capacity`
    /// elements.
    pub fn with_capacity(minimum_capacity: usize) -> Self {
        Self::with_capacity_and_hasher(minimum_capacity, RandomState::new())
    }
}

impl<T, S> OrderedSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(MIN_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(minimum_capacity: usize, hasher: S) -> Self {
        Self {
            buffer: Rc::new(Buffer::with_capacity_and_hasher(minimum_capacity, hasher)),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Number of elements the current buffer holds before it must grow.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn hasher(&self) -> &S {
        self.buffer.hasher()
    }

    /// The elements in positional order.
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            it: self.buffer.as_slice().iter(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns true while `self` and `other` still alias one buffer, i.e.
    /// neither has been mutated since one was cloned from the other.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.buffer.position_of(value).is_some()
    }

    /// Position of `value`, if present.
    pub fn get_index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.buffer.position_of(value)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.buffer.check_invariants();
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Ensures this handle owns its buffer, copying the shared buffer with
    /// room for at least `minimum_capacity` elements when it does not.
    fn make_unique(&mut self, minimum_capacity: usize) -> &mut Buffer<T, S> {
        if Rc::get_mut(&mut self.buffer).is_none() {
            let copy = self.buffer.duplicate(minimum_capacity);
            trace!(
                len = copy.len(),
                capacity = copy.capacity(),
                "ordered set copied on write"
            );
            self.buffer = Rc::new(copy);
        }
        Rc::get_mut(&mut self.buffer).expect("buffer is uniquely owned after copy-on-write")
    }

    fn is_shared(&mut self) -> bool {
        Rc::get_mut(&mut self.buffer).is_none()
    }

    /// Appends `value`. Returns false, leaving the set unchanged, when an
    /// equal element is already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.is_shared() && self.contains(&value) {
            return false;
        }
        let len = self.len();
        self.make_unique(len + 1).insert(value)
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// If an equal element is already present it is removed first and
    /// `value` lands at `index`, or at the end when `index` is past the
    /// shortened set.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_at(&mut self, index: usize, value: T) {
        self.try_insert_at(index, value)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), PositionError> {
        let len = self.len();
        if index > len {
            return Err(PositionError::OutOfBounds { index, len });
        }
        if self.get_index_of(&value) == Some(index) {
            return Ok(());
        }
        self.make_unique(len + 1).insert_at(index, value);
        Ok(())
    }

    /// Appends every element of `values` not already present, in order.
    pub fn append_contents<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return;
        }
        let (lower, _) = values.size_hint();
        let len = self.len();
        self.make_unique(len + lower).extend(values);
    }

    /// Inserts the elements of `values` not already present as a
    /// contiguous run starting at `index`, preserving their order.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_contents_at<I>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.try_replace_range(index..index, values)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Removes and returns the element equal to `value`; absent values are
    /// a no-op.
    pub fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let position = self.get_index_of(value)?;
        Some(self.make_unique(0).remove_at(position))
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> T {
        self.try_remove_at(index)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_remove_at(&mut self, index: usize) -> Result<T, PositionError> {
        let len = self.len();
        if index >= len {
            return Err(PositionError::OutOfBounds { index, len });
        }
        Ok(self.make_unique(0).remove_at(index))
    }

    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn remove_first(&mut self) -> T {
        match self.pop_first() {
            Some(value) => value,
            None => panic!("cannot remove the first element of an empty ordered set"),
        }
    }

    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn remove_last(&mut self) -> T {
        match self.pop_last() {
            Some(value) => value,
            None => panic!("cannot remove the last element of an empty ordered set"),
        }
    }

    pub fn pop_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.make_unique(0).remove_at(0))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        Some(self.make_unique(0).remove_at(len - 1))
    }

    /// Removes the first `n` elements.
    ///
    /// # Panics
    ///
    /// Panics if `n > len`.
    pub fn remove_first_n(&mut self, n: usize) {
        let len = self.len();
        assert!(
            n <= len,
            "cannot remove {n} elements from an ordered set of length {len}"
        );
        self.remove_range(..n);
    }

    /// Removes the last `n` elements.
    ///
    /// # Panics
    ///
    /// Panics if `n > len`.
    pub fn remove_last_n(&mut self, n: usize) {
        let len = self.len();
        assert!(
            n <= len,
            "cannot remove {n} elements from an ordered set of length {len}"
        );
        self.remove_range(len - n..);
    }

    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn remove_range<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        self.try_replace_range(range, core::iter::empty())
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Replaces the elements in `range` with `values`, in one splice.
    ///
    /// Behaves like `remove_range(range)` followed by
    /// `insert_contents_at(range.start, values)`: incoming elements equal
    /// to ones being replaced are kept, while those present outside the
    /// range or repeated in `values` are skipped.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn replace_range<R, I>(&mut self, range: R, values: I)
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
    {
        self.try_replace_range(range, values)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_replace_range<R, I>(&mut self, range: R, values: I) -> Result<(), PositionError>
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        let range = resolve_range(range, len)?;
        let mut values = values.into_iter().peekable();
        if range.is_empty() && values.peek().is_none() {
            return Ok(());
        }
        let (lower, _) = values.size_hint();
        self.make_unique(len + lower).replace_range(range, values);
        Ok(())
    }

    /// Overwrites the element at `index` and returns the one it held.
    ///
    /// Writing a value that is already present leaves the set unchanged:
    /// at another position the result is `None`, and at `index` itself the
    /// value passed in is handed back.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn replace_at(&mut self, index: usize, value: T) -> Option<T> {
        match self.try_replace_at(index, value) {
            Ok(previous) => Some(previous),
            Err(PositionError::DuplicateValue { .. }) => None,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`OrderedSet::replace_at`], but reports an out-of-range index
    /// or a value present at another position as an error.
    pub fn try_replace_at(&mut self, index: usize, value: T) -> Result<T, PositionError> {
        let len = self.len();
        if index >= len {
            return Err(PositionError::OutOfBounds { index, len });
        }
        match self.get_index_of(&value) {
            Some(other) if other == index => return Ok(value),
            Some(other) => return Err(PositionError::DuplicateValue { index: other }),
            None => {}
        }
        self.make_unique(len)
            .replace_at(index, value)
            .map_err(|other| PositionError::DuplicateValue { index: other })
    }

    /// Copies the elements in `range` into a new, independent set that
    /// shares this set's hasher.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn slice<R>(&self, range: R) -> Self
    where
        R: RangeBounds<usize>,
    {
        let range = resolve_range(range, self.len()).unwrap_or_else(|e| panic!("{e}"));
        Self {
            buffer: Rc::new(self.buffer.slice(range)),
        }
    }

    /// Writes `slice` back over `range`; see [`OrderedSet::replace_range`].
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds or decreasing.
    pub fn set_slice<R, S2>(&mut self, range: R, slice: &OrderedSet<T, S2>)
    where
        R: RangeBounds<usize>,
    {
        self.replace_range(range, slice.iter().cloned())
    }

    /// Keeps only the elements for which `keep` returns true, preserving
    /// their order. A shared buffer is not copied when nothing is removed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let Some(first) = self.iter().position(|v| !keep(v)) else {
            return;
        };
        self.make_unique(0).retain_from(first, keep);
    }

    /// Removes every element. With `keep_capacity` the current capacity is
    /// retained; otherwise it drops back to the default.
    pub fn remove_all(&mut self, keep_capacity: bool) {
        match Rc::get_mut(&mut self.buffer) {
            Some(buffer) => buffer.remove_all(keep_capacity),
            None => {
                let capacity = if keep_capacity {
                    self.capacity()
                } else {
                    MIN_CAPACITY
                };
                let hasher = self.hasher().clone();
                self.buffer = Rc::new(Buffer::with_capacity_and_hasher(capacity, hasher));
            }
        }
    }

    /// Makes room for at least `minimum_capacity` elements. Never removes
    /// or reorders elements; smaller requests are ignored.
    pub fn reserve_capacity(&mut self, minimum_capacity: usize) {
        if minimum_capacity <= self.capacity() {
            return;
        }
        self.make_unique(minimum_capacity)
            .ensure_capacity(minimum_capacity);
    }
}

/// Resolves `range` against `len`, rejecting decreasing or out-of-bounds
/// ranges.
fn resolve_range<R>(range: R, len: usize) -> Result<Range<usize>, PositionError>
where
    R: RangeBounds<usize>,
{
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if start > end || end > len {
        return Err(PositionError::RangeOutOfBounds { start, end, len });
    }
    Ok(start..end)
}

impl<T, S> Clone for OrderedSet<T, S> {
    /// Shares the buffer; the copy happens on the first mutation.
    fn clone(&self) -> Self {
        Self {
            buffer: Rc::clone(&self.buffer),
        }
    }
}

impl<T, S> Default for OrderedSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> fmt::Debug for OrderedSet<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S, S2> PartialEq<OrderedSet<T, S2>> for OrderedSet<T, S>
where
    T: PartialEq,
{
    fn eq(&self, other: &OrderedSet<T, S2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, S> Eq for OrderedSet<T, S> {}

impl<T: PartialEq, S> PartialEq<[T]> for OrderedSet<T, S> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, S> PartialEq<&[T]> for OrderedSet<T, S> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq, S, const N: usize> PartialEq<[T; N]> for OrderedSet<T, S> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, S> PartialEq<Vec<T>> for OrderedSet<T, S> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash, S> Hash for OrderedSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, S, I> Index<I> for OrderedSet<T, S>
where
    I: SliceIndex<[T]>,
{
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, S> FromIterator<T> for OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut set = Self::with_capacity_and_hasher(lower, S::default());
        set.append_contents(iter);
        set
    }
}

impl<T, S> Extend<T> for OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_contents(iter);
    }
}

impl<'a, T, S> Extend<&'a T> for OrderedSet<T, S>
where
    T: Hash + Eq + Copy + 'a,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.append_contents(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for OrderedSet<T>
where
    T: Hash + Eq + Clone,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> From<Vec<T>> for OrderedSet<T>
where
    T: Hash + Eq + Clone,
{
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

/// Borrowing iterator over an `OrderedSet` in positional order.
pub struct Iter<'a, T> {
    it: core::slice::Iter<'a, T>,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            it: self.it.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Owning iterator over an `OrderedSet` in positional order.
pub struct IntoIter<T> {
    it: std::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T, S> IntoIterator for &'a OrderedSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, S> IntoIterator for OrderedSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Moves the elements out when this is the last handle; clones them
    /// otherwise.
    fn into_iter(self) -> Self::IntoIter {
        let elements = match Rc::try_unwrap(self.buffer) {
            Ok(buffer) => buffer.into_elements(),
            Err(shared) => shared.as_slice().to_vec(),
        };
        IntoIter {
            it: elements.into_iter(),
        }
    }
}
