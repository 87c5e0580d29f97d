use std::fmt;
use std::iter::FromIterator;

use crate::data::Loc;
use crate::utils::Biterator;

const NODESET_WORDS: usize = 2;

/// Number of distinct nodes a `NodeSet` can hold.
pub const NODESET_CAPACITY: usize = NODESET_WORDS * 128;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct NodeSet([u128; NODESET_WORDS]);

impl NodeSet {
  pub fn new() -> Self {
    return Self([0u128; NODESET_WORDS]);
  }

  /// The set `{0, 1, ..., n-1}`.
  pub fn full(n: usize) -> Self {
    debug_assert!(n <= NODESET_CAPACITY);
    let mut words = [0u128; NODESET_WORDS];
    for (k, w) in words.iter_mut().enumerate() {
      let bits = n.saturating_sub(k * 128);
      *w = if bits >= 128 { u128::MAX } else { (1u128 << bits) - 1 };
    }
    return Self(words);
  }

  /// Members in increasing order.
  pub fn iter(&self) -> impl Iterator<Item=Loc> + '_ {
    self.0.iter()
      .enumerate()
      .flat_map(|(k, &word)| Biterator::new(word).map(move |b| k * 128 + b as Loc))
  }

  pub fn to_vec(&self) -> Vec<Loc> {
    self.iter().collect()
  }

  /// Word holding node `i`, and the mask selecting it.
  #[inline]
  fn locate(i: Loc) -> (usize, u128) {
    debug_assert!(i < NODESET_CAPACITY, "node {} does not fit in a NodeSet", i);
    (i / 128, 1u128 << (i % 128))
  }

  #[inline]
  pub fn insert(&mut self, i: Loc) {
    let (w, mask) = Self::locate(i);
    self.0[w] |= mask;
  }

  #[inline]
  pub fn contains(&self, i: Loc) -> bool {
    let (w, mask) = Self::locate(i);
    self.0[w] & mask != 0
  }

  /// Number of members.
  #[inline]
  pub fn len(&self) -> u32 {
    self.0.iter().map(|w| w.count_ones()).sum()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.0.iter().all(|&w| w == 0)
  }

  /// Stops at the first word with a member missing from `other`.
  #[inline]
  pub fn is_subset(&self, other: &Self) -> bool {
    self.0.iter().zip(other.0.iter()).all(|(x, y)| x & !y == 0)
  }

  pub fn is_disjoint(&self, other: &Self) -> bool {
    (0..NODESET_WORDS).all(|w| self.0[w] & other.0[w] == 0)
  }

  pub fn union(&self, other: &Self) -> Self {
    let mut words = self.0;
    for w in 0..NODESET_WORDS {
      words[w] |= other.0[w];
    }
    NodeSet(words)
  }

  pub fn union_inplace(&mut self, other: &Self) {
    *self = self.union(other);
  }
}


impl fmt::Debug for NodeSet {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl FromIterator<Loc> for NodeSet {
  fn from_iter<I: IntoIterator<Item=Loc>>(iter: I) -> Self {
    let mut set = NodeSet::new();
    iter.into_iter().for_each(|i| set.insert(i));
    set
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn insert() {
    let mut nodes = NodeSet::new();
    assert!(nodes.is_empty());
    nodes.insert(0);
    nodes.insert(200);
    assert_eq!(nodes.to_vec(), vec![0, 200]);
    assert!(nodes.contains(200));
    assert!(!nodes.contains(72));
    assert_eq!(nodes.len(), 2);
  }

  #[test]
  fn from_iter() {
    fn check(vec: Vec<Loc>) {
      let nodes: NodeSet = vec.iter().cloned().collect();
      assert_eq!(vec, nodes.to_vec())
    }
    check(vec![0]);
    check(vec![0, 9, 89, 99]);
    check(vec![0, 1, 2, 3, 5, 128, 255]);
  }

  #[test]
  fn full() {
    assert!(NodeSet::full(0).is_empty());
    assert_eq!(NodeSet::full(5).to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(NodeSet::full(128).len(), 128);
    assert_eq!(NodeSet::full(130).len(), 130);
    assert!(NodeSet::full(130).contains(129));
    assert!(!NodeSet::full(130).contains(130));
    assert_eq!(NodeSet::full(NODESET_CAPACITY).len() as usize, NODESET_CAPACITY);
  }

  #[test]
  fn debug_fmt() {
    let nodes: NodeSet = vec![3, 1].into_iter().collect();
    assert_eq!(format!("{:?}", nodes), "{1, 3}");
  }

  proptest! {
    #[test]
    fn subset_agrees_with_members(
      a in prop::collection::btree_set(0..NODESET_CAPACITY, 0..20),
      b in prop::collection::btree_set(0..NODESET_CAPACITY, 0..20),
    ) {
      let sa: NodeSet = a.iter().cloned().collect();
      let sb: NodeSet = b.iter().cloned().collect();
      prop_assert_eq!(sa.is_subset(&sb), a.is_subset(&b));
      prop_assert_eq!(sa.is_disjoint(&sb), a.is_disjoint(&b));
      let u = sa.union(&sb);
      prop_assert_eq!(u.to_vec(), a.union(&b).cloned().collect::<Vec<_>>());
      prop_assert_eq!(u.len() as usize, a.union(&b).count());
      prop_assert!(sa.is_subset(&u) && sb.is_subset(&u));
    }
  }
}
