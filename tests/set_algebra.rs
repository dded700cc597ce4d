// Set-algebra suite: relational predicates and the four combining
// operations, checked on small hand-written tables.
use ordered_cow_set::OrderedSet;
use rstest::rstest;

fn set(values: &[i32]) -> OrderedSet<i32> {
    values.iter().copied().collect()
}

#[rstest]
#[case(&[1, 2, 3], &[1, 2, 3], true)]
#[case(&[1, 2, 3], &[3, 2, 1, 4], true)]
#[case(&[1, 2, 3], &[1, 2], false)]
#[case(&[], &[1], true)]
#[case(&[], &[], true)]
fn is_subset(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: bool) {
    assert_eq!(set(a).is_subset(&set(b)), expected);
    assert_eq!(set(b).is_superset(&set(a)), expected);
}

#[rstest]
#[case(&[1, 2, 3], &[1, 2, 3], false)]
#[case(&[1, 2, 3], &[1, 2, 3, 4], true)]
#[case(&[1, 2, 3], &[1, 2, 4, 5], false)]
#[case(&[], &[7], true)]
fn is_strict_subset(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: bool) {
    assert_eq!(set(a).is_strict_subset(&set(b)), expected);
    assert_eq!(set(b).is_strict_superset(&set(a)), expected);
}

#[rstest]
#[case(&[1, 2, 3], &[1, 2], true)]
#[case(&[1, 2, 3], &[1, 2, 3], true)]
#[case(&[1, 2, 3], &[4], false)]
fn is_superset(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: bool) {
    assert_eq!(set(a).is_superset(&set(b)), expected);
}

#[rstest]
#[case(&[1, 2, 3], &[4, 5], true)]
#[case(&[1, 2, 3], &[1, 4, 5], false)]
#[case(&[1, 2, 3, 4, 5, 6], &[6], false)]
#[case(&[], &[1], true)]
fn is_disjoint(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: bool) {
    assert_eq!(set(a).is_disjoint(&set(b)), expected);
    assert_eq!(set(b).is_disjoint(&set(a)), expected);
}

#[rstest]
#[case(&[1, 2, 3], &[3, 4, 1, 5], &[1, 2, 3, 4, 5])]
#[case(&[], &[2, 1], &[2, 1])]
#[case(&[4, 3], &[], &[4, 3])]
fn union(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: &[i32]) {
    assert_eq!(set(a).union(&set(b)), expected);
    let mut in_place = set(a);
    in_place.union_in_place(&set(b));
    assert_eq!(in_place, expected);
}

#[rstest]
#[case(&[5, 1, 4, 2], &[2, 5, 9], &[5, 2])]
#[case(&[1, 2], &[3], &[])]
fn intersect(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: &[i32]) {
    assert_eq!(set(a).intersect(&set(b)), expected);
    let mut in_place = set(a);
    in_place.intersect_in_place(&set(b));
    assert_eq!(in_place, expected);
}

#[rstest]
#[case(&[5, 1, 4, 2], &[2, 5, 9], &[1, 4])]
#[case(&[1, 2], &[1, 2], &[])]
fn subtract(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: &[i32]) {
    assert_eq!(set(a).subtract(&set(b)), expected);
    let mut in_place = set(a);
    in_place.subtract_in_place(&set(b));
    assert_eq!(in_place, expected);
}

#[rstest]
#[case(&[5, 1, 4, 2], &[9, 2, 7, 5], &[1, 4, 9, 7])]
#[case(&[1, 2], &[1, 2], &[])]
#[case(&[1], &[2], &[1, 2])]
fn exclusive_or(#[case] a: &[i32], #[case] b: &[i32], #[case] expected: &[i32]) {
    assert_eq!(set(a).exclusive_or(&set(b)), expected);
    let mut in_place = set(a);
    in_place.exclusive_or_in_place(&set(b));
    assert_eq!(in_place, expected);
}

// Test: in-place algebra on a clone leaves the original value intact.
#[test]
fn in_place_algebra_copies_shared_operand() {
    let a = set(&[1, 2, 3]);
    let mut b = a.clone();
    b.exclusive_or_in_place(&set(&[3, 4]));
    assert_eq!(b, [1, 2, 4]);
    assert_eq!(a, [1, 2, 3]);
    assert!(!a.shares_storage_with(&b));
}

#[test]
fn operators_on_references() {
    let a = set(&[1, 2, 3]);
    let b = set(&[2, 3, 4]);
    assert_eq!(&a | &b, [1, 2, 3, 4]);
    assert_eq!(&a & &b, [2, 3]);
    assert_eq!(&a - &b, [1]);
    assert_eq!(&a ^ &b, [1, 4]);
}

// Test: the other operand may use a different hasher.
#[test]
fn mixed_hashers() {
    use std::collections::hash_map::{DefaultHasher, RandomState};
    use std::hash::BuildHasherDefault;

    let a: OrderedSet<i32, RandomState> = set(&[1, 2, 3]);
    let b: OrderedSet<i32, BuildHasherDefault<DefaultHasher>> = [3, 4].into_iter().collect();
    assert_eq!(a.union(&b), [1, 2, 3, 4]);
    assert!(b.is_subset(&a.union(&b)));
    assert_eq!(a, set(&[1, 2, 3]));
}
