//! ordered-cow-set: an insertion-ordered set with array-like positional
//! access and copy-on-write value semantics.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an ordered collection of unique elements that supports O(1)
//!   average membership tests, O(1) positional reads, and cheap copies.
//! - Layers:
//!   - HashIndex: a hash table of positions into the element array. It
//!     owns no elements; callers resolve candidate positions against the
//!     array.
//!   - Buffer<T, S>: dense element storage, a parallel array of cached
//!     hashes, and the HashIndex over them. All structural invariants live
//!     here.
//!   - OrderedSet<T, S>: public handle holding an `Rc<Buffer>`. Clones
//!     share the buffer; a mutating handle copies it first unless it is the
//!     only owner.
//!   - algebra: union/intersect/subtract/exclusive-or and the subset
//!     predicates, written against the public handle.
//!
//! Constraints
//! - Single-threaded: the buffer is shared through `Rc`, so `OrderedSet` is
//!   `!Send`/`!Sync`.
//! - Every live element has exactly one index record naming its position,
//!   and no record names a position past `len`.
//! - Capacity is a power of two no smaller than `MIN_CAPACITY`. It grows by
//!   at least doubling and only shrinks on an explicit `remove_all(false)`.
//! - Positional operations outside `0..=len` panic; each has a `try_`
//!   variant returning `PositionError` that leaves the set untouched.
//!
//! Copy-on-write
//! - Uniqueness is decided by `Rc::get_mut`. A shared buffer is duplicated
//!   with room for the pending mutation, so a copy is never followed by a
//!   second growth.
//! - Mutations that turn out to be no-ops (inserting a present value,
//!   writing a value already present at another or the same position,
//!   removing an absent one, retaining everything) return before copying.
//!
//! Hasher and rehashing invariants
//! - Each element's `u64` hash is computed once, on insertion, and stored
//!   beside it. Growth, shifting, and copying reuse the stored hashes;
//!   `T: Hash` is only invoked for incoming values and lookups.
//! - Shifting elements re-threads their index records by position rather
//!   than rehashing. Long runs are re-threaded with one pass over the table.
//!
//! Notes and non-goals
//! - Equality is order-sensitive; `Hash` agrees with it.
//! - No thread-safe variant, no serialization, no sorting or reordering
//!   operations beyond positional insert and remove.
//! - Elements that break the `Hash`/`Eq` contract leave lookups
//!   unspecified but never cause memory unsafety.

mod algebra;
mod buffer;
mod error;
mod hash_index;
mod ordered_set;
mod ordered_set_proptest;

// Public surface
pub use buffer::MIN_CAPACITY;
pub use error::PositionError;
pub use ordered_set::{IntoIter, Iter, OrderedSet};

/// Builds an [`OrderedSet`] from a list of values, skipping duplicates.
///
/// ```
/// use ordered_cow_set::ordered_set;
///
/// let s = ordered_set![3, 1, 3, 2];
/// assert_eq!(s, [3, 1, 2]);
/// ```
#[macro_export]
macro_rules! ordered_set {
    () => {
        <$crate::OrderedSet<_>>::new()
    };
    ($($value:expr),+ $(,)?) => {
        <$crate::OrderedSet<_>>::from([$($value),+])
    };
}
