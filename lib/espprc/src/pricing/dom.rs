use tracing::*;

use super::label::{Label, LabelArena, LabelId};

/// Outcome of merging a batch of candidates into a node's label set.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Merge {
  pub changed: bool,
  pub inserted: usize,
  /// Candidates rejected because an existing label or another candidate dominates them.
  pub discarded: usize,
  /// Existing labels removed because a candidate dominates them.
  pub removed: usize,
}

/// `existing` is kept over `candidate` when they tie, and extensions of the same label are
/// duplicates.
#[inline]
fn existing_wins(existing: &Label, candidate: &Label) -> bool {
  (existing.predecessor.is_some() && existing.predecessor == candidate.predecessor)
    || existing.dominates(candidate)
}

fn insert_by_cost(arena: &LabelArena, set: &mut Vec<LabelId>, id: LabelId) {
  let cost = arena[id].cost();
  let pos = set.partition_point(|&s| arena[s].cost() <= cost);
  set.insert(pos, id);
}

/// Merge `candidates` into the non-dominated `set`, which stays sorted by ascending cost.
pub fn merge_efficient(arena: &mut LabelArena, set: &mut Vec<LabelId>, candidates: Vec<LabelId>) -> Merge {
  let mut merge = Merge::default();
  if candidates.is_empty() {
    return merge;
  }

  // 1. candidates against the current set
  let mut removed = vec![false; set.len()];
  let mut survivors = Vec::with_capacity(candidates.len());
  for c in candidates {
    let lc = &arena[c];
    let mut dominated = false;
    for (k, &s) in set.iter().enumerate() {
      if removed[k] { continue; }
      let ls = &arena[s];
      if existing_wins(ls, lc) {
        trace!(existing=s.index(), candidate=c.index(), "candidate dominated");
        dominated = true;
        break;
      } else if lc.dominates(ls) {
        trace!(existing=s.index(), candidate=c.index(), "existing dominated");
        removed[k] = true;
      }
    }
    if dominated {
      arena.mark_dominated(c);
      merge.discarded += 1;
    } else {
      survivors.push(c);
    }
  }

  // 2. candidates against each other; earlier candidates win ties
  let mut alive = vec![true; survivors.len()];
  for a in 0..survivors.len() {
    if !alive[a] { continue; }
    for b in (a + 1)..survivors.len() {
      if !alive[b] { continue; }
      let (la, lb) = (&arena[survivors[a]], &arena[survivors[b]]);
      if la.dominates(lb) {
        alive[b] = false;
      } else if lb.dominates(la) {
        alive[a] = false;
        break;
      }
    }
  }

  // 3. drop dominated labels, then insert survivors in cost order
  if removed.iter().any(|&r| r) {
    let mut k = 0;
    set.retain(|&s| {
      let keep = !removed[k];
      k += 1;
      if !keep {
        arena.mark_dominated(s);
        merge.removed += 1;
      }
      keep
    });
  }

  for (c, alive) in survivors.into_iter().zip(alive) {
    if alive {
      insert_by_cost(arena, set, c);
      merge.inserted += 1;
    } else {
      arena.mark_dominated(c);
      merge.discarded += 1;
    }
  }

  merge.changed = merge.removed > 0 || merge.inserted > 0;
  merge
}

/// Add every candidate without dominance checks, keeping `set` sorted by cost.
pub fn admit_all(arena: &LabelArena, set: &mut Vec<LabelId>, candidates: Vec<LabelId>) -> Merge {
  let inserted = candidates.len();
  for c in candidates {
    insert_by_cost(arena, set, c);
  }
  Merge { changed: inserted > 0, inserted, ..Merge::default() }
}

/// Keep the `limit` cheapest labels of `set`.  Returns how many were dropped.
pub fn truncate(set: &mut Vec<LabelId>, limit: usize) -> usize {
  let dropped = set.len().saturating_sub(limit);
  set.truncate(limit);
  dropped
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::*;
  use crate::data::fixtures::*;
  use proptest::prelude::*;

  fn is_sorted(arena: &LabelArena, set: &[LabelId]) -> bool {
    set.windows(2).all(|w| arena[w[0]].cost() <= arena[w[1]].cost())
  }

  fn non_dominated(arena: &LabelArena, set: &[LabelId]) -> bool {
    set.iter().enumerate().all(|(a, &la)|
      set.iter().enumerate().all(|(b, &lb)| a == b || !arena[la].dominates(&arena[lb]))
    )
  }

  #[test]
  fn empty_batch_is_a_no_op() {
    let data = line_instance();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    let a = arena.extend(&data, o, 1);
    let mut set = vec![a];
    let merge = merge_efficient(&mut arena, &mut set, vec![]);
    assert!(!merge.changed);
    assert_eq!(set, vec![a]);
  }

  #[test]
  fn dominance_and_ties() {
    let data = line_instance();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    // 0 -> 1 -> 2 is dominated by 0 -> 2
    let via1 = arena.extend(&data, o, 1);
    let slow = arena.extend(&data, via1, 2);
    let direct = arena.extend(&data, o, 2);

    let mut set = vec![];
    let merge = merge_efficient(&mut arena, &mut set, vec![slow]);
    assert_eq!(merge, Merge { changed: true, inserted: 1, discarded: 0, removed: 0 });

    let merge = merge_efficient(&mut arena, &mut set, vec![direct]);
    assert_eq!(merge, Merge { changed: true, inserted: 1, discarded: 0, removed: 1 });
    assert_eq!(set, vec![direct]);
    assert!(arena[slow].is_dominated());

    // an identical label from another origin label ties and loses
    let o2 = arena.origin(&data);
    let twin = arena.extend(&data, o2, 2);
    let merge = merge_efficient(&mut arena, &mut set, vec![twin]);
    assert!(!merge.changed);
    assert_eq!(merge.discarded, 1);
    assert_eq!(set, vec![direct]);
    assert!(arena[twin].is_dominated() && !arena[direct].is_dominated());
  }

  #[test]
  fn same_predecessor_is_a_duplicate() {
    let data = line_instance();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    let first = arena.extend(&data, o, 3);
    let again = arena.extend(&data, o, 3);
    let mut set = vec![first];
    let merge = merge_efficient(&mut arena, &mut set, vec![again]);
    assert_eq!(merge.discarded, 1);
    assert_eq!(set, vec![first]);
  }

  #[test]
  fn candidates_compared_pairwise() {
    let data = line_instance();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    let via1 = arena.extend(&data, o, 1);
    let slow = arena.extend(&data, via1, 2);
    let direct = arena.extend(&data, o, 2);
    let mut set = vec![];
    let merge = merge_efficient(&mut arena, &mut set, vec![slow, direct]);
    assert_eq!(set, vec![direct]);
    assert_eq!(merge.discarded, 1);
    assert!(arena[slow].is_dominated());
  }

  #[test]
  fn sink_admits_everything() {
    let data = line_instance();
    let sink = data.sink().unwrap();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    let a = arena.extend(&data, o, 3);
    let a = arena.extend(&data, a, sink);
    let b = arena.extend(&data, o, 1);
    let b = arena.extend(&data, b, sink);
    let mut set = vec![];
    let merge = admit_all(&arena, &mut set, vec![a, b]);
    assert_eq!(merge.inserted, 2);
    assert_eq!(set, vec![b, a]);
    assert!(!admit_all(&arena, &mut set, vec![]).changed);
  }

  #[test]
  fn truncate_keeps_cheapest() {
    let mut set: Vec<_> = vec![];
    assert_eq!(truncate(&mut set, 3), 0);
    let data = line_instance();
    let mut arena = LabelArena::new();
    let o = arena.origin(&data);
    let ids: Vec<_> = (1..4).map(|i| arena.extend(&data, o, i)).collect();
    set = ids.clone();
    assert_eq!(truncate(&mut set, 2), 1);
    assert_eq!(set, &ids[..2]);
  }

  proptest! {
    #[test]
    fn merge_keeps_efficient_sorted_sets(seed in any::<u64>(), batches in prop::collection::vec(prop::collection::vec(0usize..64, 1..6), 1..6)) {
      let mut data = grid_instance(6, 8.0);
      data.randomize_costs(seed, 15);
      let mut arena = LabelArena::new();

      // random elementary partial paths ending at `target`, built from fresh origin labels
      let target = 3;
      let mut set = vec![];
      for batch in batches {
        let mut candidates = vec![];
        for pick in batch {
          let mut id = arena.origin(&data);
          let mut at = ORIGIN;
          for step in 0..3 {
            let options: Vec<_> = data.successors(at).iter().copied()
              .filter(|&j| j != target && arena[id].is_reachable(j) && Some(j) != data.sink())
              .collect();
            if options.is_empty() || (pick >> step) & 1 == 0 { break; }
            let next = options[(pick >> 2) % options.len()];
            id = arena.extend(&data, id, next);
            at = next;
          }
          if arena[id].is_reachable(target) && data.successors(at).contains(&target) {
            candidates.push(arena.extend(&data, id, target));
          }
        }
        let before = set.clone();
        let merge = merge_efficient(&mut arena, &mut set, candidates.clone());
        prop_assert!(is_sorted(&arena, &set));
        prop_assert!(non_dominated(&arena, &set));
        prop_assert_eq!(merge.changed, set != before);
        for &c in &candidates {
          prop_assert_eq!(arena[c].is_dominated(), !set.contains(&c));
          prop_assert!(set.iter().any(|&s| arena[s].dominates(&arena[c])));
        }
        for &b in &before {
          prop_assert_eq!(arena[b].is_dominated(), !set.contains(&b));
        }
        prop_assert!(!merge_efficient(&mut arena, &mut set, vec![]).changed);
      }
    }
  }
}
