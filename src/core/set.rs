//! Growable set of small non-negative integers stored as a dense bitset.
//!
//! Membership of value `i` is bit `i` of a contiguous byte buffer, most
//! significant bit of each byte first. The buffer only grows: inserting a
//! value beyond the current capacity extends it to the smallest multiple of 8
//! bits that can hold the value, while removal never shrinks it.
//!
//! # Examples
//!
//! ```
//! use bitgraph::core::BitSet;
//!
//! let mut set = BitSet::singleton(10);
//! set.insert(3);
//!
//! assert!(set.contains(10));
//! assert!(!set.contains(9));
//! assert_eq!(set.capacity(), 16);
//! assert_eq!(set.values(), vec![3, 10]);
//! ```

use std::{
    fmt,
    iter::FusedIterator,
    ops::{BitAnd, BitOr, Sub},
};

use bitvec::{order::Msb0, slice::BitSlice};
use fastrand::Rng;
use tracing::{trace, warn};

use super::error::{AllocError, EmptySetError};

const MIN_CAPACITY: usize = 8;

#[derive(Clone)]
pub struct BitSet {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSet {
    /// Creates an empty set with capacity for values `0..8`.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated. See
    /// [`try_new`](BitSet::try_new) for the fallible version.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(set) => set,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_new() -> Result<Self, AllocError> {
        let mut set = Self {
            bytes: Vec::new(),
            len: 0,
        };
        set.grow(MIN_CAPACITY / 8)?;
        Ok(set)
    }

    /// Creates a set with `value` as its only member.
    pub fn singleton(value: usize) -> Self {
        match Self::try_singleton(value) {
            Ok(set) => set,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_singleton(value: usize) -> Result<Self, AllocError> {
        let mut set = Self::try_new()?;
        set.try_insert(value)?;
        Ok(set)
    }

    /// Number of values representable without growing. Always a multiple of
    /// 8.
    pub fn capacity(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values at or beyond the capacity are never members.
    pub fn contains(&self, value: usize) -> bool {
        value < self.capacity() && self.bits()[value]
    }

    /// Inserts `value` and returns whether it was not present before.
    ///
    /// # Panics
    ///
    /// Panics if growing the storage fails. See
    /// [`try_insert`](BitSet::try_insert) for the fallible version.
    pub fn insert(&mut self, value: usize) -> bool {
        match self.try_insert(value) {
            Ok(inserted) => inserted,
            Err(error) => panic!("{error}"),
        }
    }

    pub fn try_insert(&mut self, value: usize) -> Result<bool, AllocError> {
        if self.contains(value) {
            return Ok(false);
        }

        if value >= self.capacity() {
            self.grow(value / 8 + 1)?;
        }

        self.bits_mut().set(value, true);
        self.len += 1;

        Ok(true)
    }

    /// Removes `value` and returns whether it was present. The capacity is
    /// kept.
    pub fn remove(&mut self, value: usize) -> bool {
        if !self.contains(value) {
            return false;
        }

        self.bits_mut().set(value, false);
        self.len -= 1;

        true
    }

    /// Removes all members, keeping the capacity.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.len = 0;
    }

    /// Removes `value` and moves every greater member one position down, so
    /// that `value + 1` becomes `value` and so on.
    pub(crate) fn remove_and_close_gap(&mut self, value: usize) {
        self.remove(value);

        if value < self.capacity() {
            // The bit at `value` is clear now, so the shift does not change
            // the member count.
            self.bits_mut()[value..].shift_start(1);
        }
    }

    pub fn min(&self) -> Option<usize> {
        self.iter().next()
    }

    pub fn max(&self) -> Option<usize> {
        let index = self.bytes.iter().rposition(|byte| *byte != 0)?;
        Some(index * 8 + 7 - self.bytes[index].trailing_zeros() as usize)
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: &self.bytes,
            front: 0,
            back: self.capacity(),
            remaining: self.len,
        }
    }

    /// Returns the members in ascending order as a newly allocated vector.
    pub fn values(&self) -> Vec<usize> {
        let mut values = Vec::with_capacity(self.len);
        values.extend(self.iter());
        values
    }

    pub fn union(&self, other: &BitSet) -> BitSet {
        self.iter().chain(other.iter()).collect()
    }

    pub fn intersection(&self, other: &BitSet) -> BitSet {
        self.iter().filter(|value| other.contains(*value)).collect()
    }

    /// Members of `self` that are not members of `other`.
    pub fn difference(&self, other: &BitSet) -> BitSet {
        self.iter().filter(|value| !other.contains(*value)).collect()
    }

    /// Membership equality. Capacity does not matter.
    pub fn is_equal(&self, other: &BitSet) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }

    pub fn is_subset(&self, other: &BitSet) -> bool {
        self.len <= other.len && self.iter().all(|value| other.contains(value))
    }

    /// Picks a member uniformly at random using a freshly seeded generator.
    pub fn choose(&self) -> Result<usize, EmptySetError> {
        self.choose_with(&mut Rng::new())
    }

    /// Picks a member uniformly at random by rejection sampling over the
    /// whole capacity.
    pub fn choose_with(&self, rng: &mut Rng) -> Result<usize, EmptySetError> {
        if self.is_empty() {
            warn!("choose called on an empty set");
            return Err(EmptySetError);
        }

        loop {
            let candidate = rng.usize(..self.capacity());
            if self.bits()[candidate] {
                return Ok(candidate);
            }
        }
    }

    /// The raw storage, `capacity() / 8` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn bits(&self) -> &BitSlice<u8, Msb0> {
        BitSlice::from_slice(&self.bytes)
    }

    fn bits_mut(&mut self) -> &mut BitSlice<u8, Msb0> {
        BitSlice::from_slice_mut(&mut self.bytes)
    }

    fn grow(&mut self, byte_len: usize) -> Result<(), AllocError> {
        debug_assert!(byte_len > self.bytes.len());

        let additional = byte_len - self.bytes.len();
        if self.bytes.try_reserve_exact(additional).is_err() {
            warn!(bytes = byte_len, "bitset storage allocation failed");
            return Err(AllocError::bytes(byte_len));
        }

        trace!(
            from = self.capacity(),
            to = byte_len * 8,
            "growing bitset capacity"
        );

        // New bytes are zeroed so that they represent absent values.
        self.bytes.resize(byte_len, 0);
        Ok(())
    }
}

impl Default for BitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BitSet {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for BitSet {}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = BitSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for BitSet {
    fn extend<T: IntoIterator<Item = usize>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl BitOr<&BitSet> for &BitSet {
    type Output = BitSet;

    fn bitor(self, rhs: &BitSet) -> BitSet {
        self.union(rhs)
    }
}

impl BitAnd<&BitSet> for &BitSet {
    type Output = BitSet;

    fn bitand(self, rhs: &BitSet) -> BitSet {
        self.intersection(rhs)
    }
}

impl Sub<&BitSet> for &BitSet {
    type Output = BitSet;

    fn sub(self, rhs: &BitSet) -> BitSet {
        self.difference(rhs)
    }
}

/// Iterator over the members of a [`BitSet`], returned from
/// [`BitSet::iter`].
///
/// Scans the storage a byte at a time from both ends. All members not yet
/// yielded lie in `front..back`.
pub struct Iter<'a> {
    bytes: &'a [u8],
    front: usize,
    back: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let mut index = self.front / 8;
        // Drop the bits before `front` in its byte, most significant first.
        let mut byte = self.bytes[index] & (0xff >> (self.front % 8));

        while byte == 0 {
            index += 1;
            byte = self.bytes[index];
        }

        let value = index * 8 + byte.leading_zeros() as usize;
        self.front = value + 1;
        self.remaining -= 1;

        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let last = self.back - 1;
        let mut index = last / 8;
        // Drop the bits after `last` in its byte.
        let mut byte = self.bytes[index] & (0xff << (7 - last % 8));

        while byte == 0 {
            index -= 1;
            byte = self.bytes[index];
        }

        let value = index * 8 + 7 - byte.trailing_zeros() as usize;
        self.back = value;
        self.remaining -= 1;

        Some(value)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use fastrand::Rng;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty() {
        let set = BitSet::new();

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.as_bytes(), &[0]);
        assert_eq!(set.values(), Vec::<usize>::new());
    }

    #[test]
    fn singleton() {
        let set = BitSet::singleton(10);

        assert!(set.contains(10));
        assert!(!set.contains(9));
        assert_eq!(set.len(), 1);
        assert_eq!(set.capacity(), 16);
    }

    #[test]
    fn insert_and_contains() {
        let mut set = BitSet::new();

        assert!(set.insert(5));
        assert!(set.insert(10));

        assert!(set.contains(5));
        assert!(set.contains(10));
        assert!(!set.contains(3));
        assert!(!set.contains(1000));
    }

    #[test]
    fn most_significant_bit_first() {
        let mut set = BitSet::singleton(0);
        set.insert(9);

        assert_eq!(set.as_bytes(), &[0b1000_0000, 0b0100_0000]);
    }

    #[test]
    fn growth_rounds_to_next_multiple_of_eight() {
        let mut set = BitSet::new();

        set.insert(7);
        assert_eq!(set.capacity(), 8);

        set.insert(8);
        assert_eq!(set.capacity(), 16);

        set.insert(63);
        assert_eq!(set.capacity(), 64);

        set.insert(64);
        assert_eq!(set.capacity(), 72);
        assert_eq!(set.as_bytes().len(), 9);
    }

    #[test]
    fn growth_preserves_members() {
        let mut set = BitSet::new();

        set.insert(1);
        set.insert(6);
        set.insert(200);
        set.insert(13);

        assert_eq!(set.values(), vec![1, 6, 13, 200]);
        assert!(!set.contains(100));
    }

    #[test]
    fn insert_idempotent() {
        let mut set = BitSet::singleton(4);

        assert!(!set.insert(4));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove() {
        let mut set = BitSet::singleton(1);
        set.insert(2);

        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(!set.remove(300));

        assert!(!set.contains(1));
        assert!(set.contains(2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_keeps_capacity() {
        let mut set = BitSet::singleton(40);
        set.remove(40);

        assert!(set.is_empty());
        assert_eq!(set.capacity(), 48);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut set: BitSet = [1, 17, 33].into_iter().collect();
        set.clear();

        assert!(set.is_empty());
        assert!(!set.contains(17));
        assert_eq!(set.capacity(), 40);
    }

    #[test]
    fn min_max() {
        let set: BitSet = [12, 4, 30].into_iter().collect();

        assert_eq!(set.min(), Some(4));
        assert_eq!(set.max(), Some(30));
        assert_eq!(BitSet::new().max(), None);
        assert_eq!(BitSet::new().min(), None);

        let mut set = BitSet::singleton(30);
        assert_eq!(set.max(), Some(30));

        set.remove(30);
        assert_eq!(set.max(), None);
        assert_eq!(set.capacity(), 32);
    }

    #[test]
    fn iter_rev() {
        let set: BitSet = [1, 2, 9].into_iter().collect();
        assert_eq!(set.iter().rev().collect::<Vec<_>>(), vec![9, 2, 1]);

        let set: BitSet = [0, 7, 8, 15, 16, 63].into_iter().collect();
        assert_eq!(
            set.iter().rev().collect::<Vec<_>>(),
            vec![63, 16, 15, 8, 7, 0]
        );

        assert_eq!(BitSet::new().iter().rev().next(), None);
    }

    #[test]
    fn iter_both_ends() {
        let set: BitSet = [0, 3, 8, 9, 20].into_iter().collect();
        let mut iter = set.iter();

        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(20));
        assert_eq!(iter.next_back(), Some(9));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(3));
        assert_eq!(iter.next(), Some(8));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn remove_and_close_gap() {
        let mut set: BitSet = [0, 2, 3, 7, 8, 15].into_iter().collect();
        set.remove_and_close_gap(3);

        assert_eq!(set.values(), vec![0, 2, 6, 7, 14]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.capacity(), 16);
    }

    #[test]
    fn remove_and_close_gap_absent() {
        let mut set: BitSet = [1, 9].into_iter().collect();
        set.remove_and_close_gap(4);
        assert_eq!(set.values(), vec![1, 8]);

        set.remove_and_close_gap(100);
        assert_eq!(set.values(), vec![1, 8]);
    }

    #[test]
    fn union() {
        let s1 = BitSet::singleton(1);
        let s2 = BitSet::singleton(2);
        let u = s1.union(&s2);

        assert!(u.contains(1));
        assert!(u.contains(2));
        assert_eq!(u.len(), 2);
    }

    #[test]
    fn union_capacity_follows_insertion() {
        let s1 = BitSet::singleton(1);
        let mut s2 = BitSet::singleton(100);
        s2.remove(100);
        s2.insert(20);

        let u = &s1 | &s2;

        assert_eq!(s2.capacity(), 104);
        assert_eq!(u.capacity(), 24);
        assert_eq!(u.values(), vec![1, 20]);
    }

    #[test]
    fn intersection() {
        let mut s1 = BitSet::singleton(1);
        s1.insert(2);
        let s2 = BitSet::singleton(2);
        let i = s1.intersection(&s2);

        assert!(!i.contains(1));
        assert!(i.contains(2));
        assert_eq!(&s1 & &s2, i);
    }

    #[test]
    fn difference() {
        let mut s1 = BitSet::singleton(1);
        s1.insert(2);
        let s2 = BitSet::singleton(1);
        let d = s1.difference(&s2);

        assert!(!d.contains(1));
        assert!(d.contains(2));
        assert_eq!(&s1 - &s2, d);
        assert!((&s2 - &s1).is_empty());
    }

    #[test]
    fn equal_and_subset() {
        let s1 = BitSet::singleton(1);
        let s2 = BitSet::singleton(1);

        assert!(s1.is_equal(&s2));
        assert!(s1.is_subset(&s2));
    }

    #[test]
    fn equal_ignores_capacity() {
        let small = BitSet::singleton(3);
        let mut large = BitSet::singleton(3);
        large.insert(500);
        large.remove(500);

        assert_ne!(small.capacity(), large.capacity());
        assert_eq!(small, large);
    }

    #[test]
    fn subset_not_equal() {
        let small: BitSet = [1, 5].into_iter().collect();
        let large: BitSet = [1, 5, 30].into_iter().collect();

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert_ne!(small, large);
        assert!(BitSet::new().is_subset(&small));
    }

    #[test]
    fn choose_returns_member() {
        let set: BitSet = [3, 17, 42].into_iter().collect();
        let mut rng = Rng::with_seed(42);

        for _ in 0..100 {
            let value = set.choose_with(&mut rng).unwrap();
            assert!(set.contains(value));
        }

        assert!(set.contains(set.choose().unwrap()));
    }

    #[test]
    fn choose_covers_all_members() {
        let set: BitSet = [0, 9, 15].into_iter().collect();
        let mut rng = Rng::with_seed(7);

        let chosen = (0..200)
            .map(|_| set.choose_with(&mut rng).unwrap())
            .collect::<BitSet>();

        assert_eq!(chosen, set);
    }

    #[test]
    fn choose_empty() {
        crate::infra::testing::init_tracing();
        assert_matches!(BitSet::new().choose(), Err(EmptySetError));
    }

    #[test]
    fn iter_exact_size() {
        let set: BitSet = [2, 4, 8, 16].into_iter().collect();
        let mut iter = set.iter();

        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<_>>(), vec![4, 8, 16]);
    }

    #[test]
    fn display() {
        let set: BitSet = [3, 1, 2].into_iter().collect();

        assert_eq!(set.to_string(), "{1, 2, 3}");
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
        assert_eq!(BitSet::new().to_string(), "{}");
    }

    fn small_values() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(0..256usize, 0..32)
    }

    proptest! {
        #[test]
        fn growth_preserves_membership(values in small_values(), removed in small_values()) {
            let mut set = BitSet::new();
            let mut model = std::collections::BTreeSet::new();

            for value in values {
                set.insert(value);
                model.insert(value);
                prop_assert_eq!(set.capacity() % 8, 0);
            }

            for value in removed {
                prop_assert_eq!(set.remove(value), model.remove(&value));
            }

            prop_assert_eq!(set.len(), model.len());
            prop_assert_eq!(set.values(), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn algebra_laws(lhs in small_values(), rhs in small_values()) {
            let s1: BitSet = lhs.into_iter().collect();
            let s2: BitSet = rhs.into_iter().collect();

            let union = &s1 | &s2;
            let intersection = &s1 & &s2;
            let difference = &s1 - &s2;

            for x in 0..s1.capacity().max(s2.capacity()) {
                prop_assert_eq!(union.contains(x), s1.contains(x) || s2.contains(x));
                prop_assert_eq!(intersection.contains(x), s1.contains(x) && s2.contains(x));
                prop_assert_eq!(difference.contains(x), s1.contains(x) && !s2.contains(x));
            }

            prop_assert!(intersection.is_subset(&s1));
            prop_assert!(s1.is_subset(&union));
        }

        #[test]
        fn equal_subset_consistency(lhs in small_values(), rhs in small_values()) {
            let s1: BitSet = lhs.into_iter().collect();
            let s2: BitSet = rhs.into_iter().collect();

            prop_assert!(s1.is_equal(&s1));
            prop_assert!(s1.is_subset(&s1));

            if s1 == s2 {
                prop_assert!(s1.is_subset(&s2) && s2.is_subset(&s1));
            }

            if s1.is_subset(&s2) && s2.is_subset(&s1) {
                prop_assert_eq!(&s1, &s2);
            }
        }
    }
}
