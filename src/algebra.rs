//! Set algebra over `OrderedSet`.
//!
//! Everything here is written against the public `OrderedSet` API. Results
//! keep the receiver's elements in their original order and append new
//! elements in the other operand's order, so every result is
//! deterministic. The other operand may use a different hasher.

use crate::ordered_set::OrderedSet;
use core::hash::{BuildHasher, Hash};
use core::ops::{BitAnd, BitOr, BitXor, Sub};

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// True when every element of `self` is in `other`.
    pub fn is_subset<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// True when `self` is a subset of `other` and `other` is larger.
    pub fn is_strict_subset<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    pub fn is_superset<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> bool {
        other.is_subset(self)
    }

    pub fn is_strict_superset<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> bool {
        other.is_strict_subset(self)
    }

    /// True when no element of `self` is in `other`.
    pub fn is_disjoint<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> bool {
        // Probe the larger set with the smaller one.
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// `self`'s elements, then `other`'s elements not in `self`.
    pub fn union<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> Self {
        let mut result = self.clone();
        result.union_in_place(other);
        result
    }

    pub fn union_in_place<S2: BuildHasher>(&mut self, other: &OrderedSet<T, S2>) {
        let missing: Vec<T> = other
            .iter()
            .filter(|v| !self.contains(*v))
            .cloned()
            .collect();
        self.append_contents(missing);
    }

    /// `self`'s elements that are also in `other`.
    pub fn intersect<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> Self {
        let mut result = self.clone();
        result.intersect_in_place(other);
        result
    }

    pub fn intersect_in_place<S2: BuildHasher>(&mut self, other: &OrderedSet<T, S2>) {
        self.retain(|v| other.contains(v));
    }

    /// `self`'s elements that are not in `other`.
    pub fn subtract<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> Self {
        let mut result = self.clone();
        result.subtract_in_place(other);
        result
    }

    pub fn subtract_in_place<S2: BuildHasher>(&mut self, other: &OrderedSet<T, S2>) {
        self.retain(|v| !other.contains(v));
    }

    /// `self`'s elements not in `other`, then `other`'s elements not in
    /// `self`.
    pub fn exclusive_or<S2: BuildHasher>(&self, other: &OrderedSet<T, S2>) -> Self {
        let mut result = self.clone();
        result.exclusive_or_in_place(other);
        result
    }

    pub fn exclusive_or_in_place<S2: BuildHasher>(&mut self, other: &OrderedSet<T, S2>) {
        let missing: Vec<T> = other
            .iter()
            .filter(|v| !self.contains(*v))
            .cloned()
            .collect();
        self.subtract_in_place(other);
        self.append_contents(missing);
    }
}

// Sequence forms. Any iterable works as the other operand; it is collected
// into a lookup set sharing `self`'s hasher when membership tests on it are
// needed.
impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Clone,
{
    fn lookup_set<'a, I>(&self, other: I) -> OrderedSet<&'a T, S>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut set = OrderedSet::with_hasher(self.hasher().clone());
        set.append_contents(other);
        set
    }

    pub fn is_subset_iter<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other = self.lookup_set(other);
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    pub fn is_strict_subset_iter<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other = self.lookup_set(other);
        self.len() < other.len() && self.iter().all(|v| other.contains(v))
    }

    pub fn is_superset_iter<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        other.into_iter().all(|v| self.contains(v))
    }

    pub fn is_strict_superset_iter<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let other = self.lookup_set(other);
        other.len() < self.len() && other.iter().all(|v| self.contains(*v))
    }

    pub fn is_disjoint_iter<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        other.into_iter().all(|v| !self.contains(v))
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn owned_set<I>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::with_hasher(self.hasher().clone());
        set.append_contents(other);
        set
    }

    pub fn union_in_place_iter<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.owned_set(other);
        self.union_in_place(&other);
    }

    pub fn intersect_in_place_iter<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.owned_set(other);
        self.intersect_in_place(&other);
    }

    pub fn subtract_in_place_iter<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.owned_set(other);
        self.subtract_in_place(&other);
    }

    pub fn exclusive_or_in_place_iter<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = T>,
    {
        let other = self.owned_set(other);
        self.exclusive_or_in_place(&other);
    }
}

impl<T, S, S2> BitOr<&OrderedSet<T, S2>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
    S2: BuildHasher,
{
    type Output = OrderedSet<T, S>;

    fn bitor(self, rhs: &OrderedSet<T, S2>) -> Self::Output {
        self.union(rhs)
    }
}

impl<T, S, S2> BitAnd<&OrderedSet<T, S2>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
    S2: BuildHasher,
{
    type Output = OrderedSet<T, S>;

    fn bitand(self, rhs: &OrderedSet<T, S2>) -> Self::Output {
        self.intersect(rhs)
    }
}

impl<T, S, S2> Sub<&OrderedSet<T, S2>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
    S2: BuildHasher,
{
    type Output = OrderedSet<T, S>;

    fn sub(self, rhs: &OrderedSet<T, S2>) -> Self::Output {
        self.subtract(rhs)
    }
}

impl<T, S, S2> BitXor<&OrderedSet<T, S2>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
    S2: BuildHasher,
{
    type Output = OrderedSet<T, S>;

    fn bitxor(self, rhs: &OrderedSet<T, S2>) -> Self::Output {
        self.exclusive_or(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_keep_receiver_order_then_other_order() {
        let a = OrderedSet::from([5, 1, 4, 2]);
        let b = OrderedSet::from([9, 2, 7, 5]);

        assert_eq!(a.union(&b), [5, 1, 4, 2, 9, 7]);
        assert_eq!(a.intersect(&b), [5, 2]);
        assert_eq!(a.subtract(&b), [1, 4]);
        assert_eq!(a.exclusive_or(&b), [1, 4, 9, 7]);

        // Operands are untouched.
        assert_eq!(a, [5, 1, 4, 2]);
        assert_eq!(b, [9, 2, 7, 5]);
    }

    #[test]
    fn operators_match_named_methods() {
        let a = OrderedSet::from([1, 2, 3]);
        let b = OrderedSet::from([3, 4]);
        assert_eq!(&a | &b, a.union(&b));
        assert_eq!(&a & &b, a.intersect(&b));
        assert_eq!(&a - &b, a.subtract(&b));
        assert_eq!(&a ^ &b, a.exclusive_or(&b));
    }

    #[test]
    fn sequence_operands_match_set_operands() {
        let s = OrderedSet::from([1, 2, 3]);
        assert!(s.is_subset_iter(&[3, 2, 1]));
        assert!(!s.is_strict_subset_iter(&[3, 2, 1, 1]));
        assert!(s.is_strict_subset_iter(&[1, 2, 3, 4]));
        assert!(s.is_superset_iter(&[1, 2]));
        assert!(s.is_strict_superset_iter(&[2, 2, 1]));
        assert!(s.is_disjoint_iter(&[4, 5]));
        assert!(!s.is_disjoint_iter(&[1, 4, 5]));

        let mut u = s.clone();
        u.union_in_place_iter([4, 1, 5, 4]);
        assert_eq!(u, [1, 2, 3, 4, 5]);
        let mut i = s.clone();
        i.intersect_in_place_iter(vec![3, 1]);
        assert_eq!(i, [1, 3]);
        let mut d = s.clone();
        d.subtract_in_place_iter([2]);
        assert_eq!(d, [1, 3]);
        let mut x = s.clone();
        x.exclusive_or_in_place_iter([3, 4, 4]);
        assert_eq!(x, [1, 2, 4]);
        assert_eq!(s, [1, 2, 3]);
    }

    /// Invariant: an in-place operation that changes nothing leaves a
    /// shared buffer shared.
    #[test]
    fn unchanged_results_do_not_copy() {
        let a = OrderedSet::from([1, 2, 3]);
        let mut b = a.clone();
        b.union_in_place(&OrderedSet::from([3, 2]));
        b.intersect_in_place(&OrderedSet::from([1, 2, 3, 4]));
        b.subtract_in_place(&OrderedSet::from([7]));
        assert!(a.shares_storage_with(&b));
    }
}
