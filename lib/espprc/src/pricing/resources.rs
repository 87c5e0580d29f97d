use crate::data::*;
use super::nodeset::NodeSet;

/// Resources accumulated along a partial path.  Once attached to a label they never change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resources {
  /// Reduced cost, may be negative.
  pub cost: Cost,
  /// Earliest service start at the current node.
  pub time: Time,
  pub demand: f64,
  pub visited: NodeSet,
  pub n_visited: u32,
  /// Nodes which can no longer be appended, either because they were visited or because time or
  /// capacity rules them out.
  pub unreachable: NodeSet,
  pub n_unreachable: u32,
}

impl Resources {
  pub fn origin(data: &EspprcInstance) -> Self {
    let origin = data.node(ORIGIN);
    let mut visited = NodeSet::new();
    visited.insert(ORIGIN);
    let time = origin.tw_start;
    let demand = origin.demand as f64;
    let mut unreachable = visited;
    mark_unreachable(data, ORIGIN, time, demand, &mut unreachable);
    Resources {
      cost: 0.0,
      time,
      demand,
      visited,
      n_visited: 1,
      unreachable,
      n_unreachable: unreachable.len(),
    }
  }

  /// Resource extension along the arc `(from, to)`.
  pub fn extend(&self, data: &EspprcInstance, from: Loc, to: Loc) -> Resources {
    let i = data.node(from);
    let j = data.node(to);
    let cost = self.cost + data.cost(from, to);
    let time = (self.time + i.service_time + data.distance(from, to)).max(j.tw_start);
    let demand = self.demand + j.demand as f64;

    let mut visited = self.visited;
    let mut n_visited = self.n_visited;
    if to != ORIGIN {
      visited.insert(to);
      n_visited += 1;
    }

    let unreachable = if j.is_depot {
      NodeSet::full(data.len())
    } else {
      let mut unreachable = self.unreachable.union(&visited);
      mark_unreachable(data, to, time, demand, &mut unreachable);
      unreachable
    };

    Resources {
      cost,
      time,
      demand,
      visited,
      n_visited,
      unreachable,
      n_unreachable: unreachable.len(),
    }
  }

  #[inline]
  pub fn is_reachable(&self, k: Loc) -> bool {
    !self.unreachable.contains(k)
  }

  /// Weak dominance: no worse in every resource.  Equal resources dominate each other.
  #[inline]
  pub fn dominates(&self, other: &Resources) -> bool {
    self.cost <= other.cost
      && self.time <= other.time
      && self.demand <= other.demand
      && self.n_unreachable <= other.n_unreachable
      && self.unreachable.is_subset(&other.unreachable)
  }
}


/// Add every node which can no longer be served in time, or would overload the vehicle, after
/// service starts at `at` at `time` with `demand` on board.
fn mark_unreachable(data: &EspprcInstance, at: Loc, time: Time, demand: f64, unreachable: &mut NodeSet) {
  let departure = time + data.node(at).service_time;
  for (k, nk) in data.nodes.iter().enumerate() {
    if unreachable.contains(k) { continue; }
    if nk.tw_end < departure + data.distance(at, k) || demand + nk.demand as f64 > data.capacity {
      unreachable.insert(k);
    }
  }
}
