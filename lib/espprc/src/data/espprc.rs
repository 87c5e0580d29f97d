use std::fmt;
use tracing::*;
use rand::prelude::*;
use instances::dataset::vrptw::{Customer, VrptwInstance};
use instances::raw::metrics::{dist_matrix, Euclidean};
use crate::pricing::nodeset::NODESET_CAPACITY;

pub use instances::dataset::vrptw::{Time, Demand};

pub type Loc = usize;
pub type Cost = f64;

/// Index of the route origin.
pub const ORIGIN: Loc = 0;

/// Largest node count (origin, customers and sink) an instance may have.
pub const MAX_NODES: usize = NODESET_CAPACITY;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub id: Loc,
  pub x: f64,
  pub y: f64,
  pub demand: Demand,
  pub tw_start: Time,
  pub tw_end: Time,
  pub service_time: Time,
  /// Only the duplicated sink carries this flag.
  pub is_depot: bool,
}

impl Node {
  fn from_customer(c: &Customer, id: Loc, is_depot: bool) -> Self {
    Node {
      id,
      x: c.x,
      y: c.y,
      demand: c.demand,
      tw_start: c.tw_start,
      tw_end: c.tw_end,
      service_time: c.service_time,
      is_depot,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
  Empty,
  TooManyNodes { nodes: usize, max: usize },
  NodeIdMismatch { index: usize, id: Loc },
  MisplacedDepot { index: usize },
}

impl fmt::Display for InstanceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl std::error::Error for InstanceError {}

/// The pricing graph.  Node 0 is the origin; if the depot is duplicated, the last node is the sink.
#[derive(Debug, Clone)]
pub struct EspprcInstance {
  pub id: String,
  pub nodes: Vec<Node>,
  pub capacity: f64,
  pub num_vehicles: usize,
  duplicate_origin: bool,
  distance: Vec<f64>,
  cost: Vec<Cost>,
  successors: Vec<Vec<Loc>>,
}

impl EspprcInstance {
  /// Build the graph from an explicit node list.  The last node is treated as the sink iff its
  /// `is_depot` flag is set.
  pub fn new(id: impl Into<String>, nodes: Vec<Node>, num_vehicles: usize, capacity: f64) -> Result<Self, InstanceError> {
    if nodes.is_empty() {
      return Err(InstanceError::Empty);
    }
    if nodes.len() > MAX_NODES {
      return Err(InstanceError::TooManyNodes { nodes: nodes.len(), max: MAX_NODES });
    }
    if let Some((index, node)) = nodes.iter().enumerate().find(|(k, n)| n.id != *k) {
      return Err(InstanceError::NodeIdMismatch { index, id: node.id });
    }
    let last = nodes.len() - 1;
    if let Some(index) = nodes.iter().position(|n| n.is_depot).filter(|&k| k != last || k == ORIGIN) {
      return Err(InstanceError::MisplacedDepot { index });
    }
    let duplicate_origin = nodes[last].is_depot;

    let coords: Vec<_> = nodes.iter().map(|n| (n.x, n.y)).collect();
    let distance = dist_matrix(Euclidean(), &coords);

    let mut data = EspprcInstance {
      id: id.into(),
      nodes,
      capacity,
      num_vehicles,
      duplicate_origin,
      cost: distance.clone(),
      distance,
      successors: Vec::new(),
    };
    data.reset_costs();
    data.build_successors();
    Ok(data)
  }

  /// Build the graph of a VRPTW instance, appending a copy of the depot as the sink when
  /// `duplicate_origin` is set.
  #[instrument(level="debug", skip(vrptw), fields(id=%vrptw.id))]
  pub fn build(vrptw: &VrptwInstance, duplicate_origin: bool) -> anyhow::Result<Self> {
    let mut nodes: Vec<Node> = vrptw.customers.iter()
      .enumerate()
      .map(|(k, c)| Node::from_customer(c, k, false))
      .collect();

    if duplicate_origin {
      let depot = vrptw.customers.first().ok_or(InstanceError::Empty)?;
      nodes.push(Node::from_customer(depot, nodes.len(), true));
    }

    let data = EspprcInstance::new(vrptw.id.clone(), nodes, vrptw.num_vehicles, vrptw.capacity as f64)?;
    debug!(nodes=data.len(), arcs=data.num_arcs(), "built pricing graph");
    Ok(data)
  }

  #[inline(always)]
  fn idx(&self, i: Loc, j: Loc) -> usize { i * self.nodes.len() + j }

  #[inline]
  pub fn len(&self) -> usize { self.nodes.len() }

  #[inline]
  pub fn node(&self, i: Loc) -> &Node { &self.nodes[i] }

  #[inline]
  pub fn cost(&self, i: Loc, j: Loc) -> Cost { self.cost[self.idx(i, j)] }

  #[inline]
  pub fn distance(&self, i: Loc, j: Loc) -> f64 { self.distance[self.idx(i, j)] }

  #[inline]
  pub fn successors(&self, i: Loc) -> &[Loc] { &self.successors[i] }

  #[inline]
  pub fn duplicate_origin(&self) -> bool { self.duplicate_origin }

  #[inline]
  pub fn sink(&self) -> Option<Loc> {
    if self.duplicate_origin { Some(self.nodes.len() - 1) } else { None }
  }

  /// Customer locations, excluding the origin and the sink.
  pub fn customers(&self) -> std::ops::Range<Loc> {
    let end = self.sink().unwrap_or(self.nodes.len());
    1.min(end)..end
  }

  pub fn num_arcs(&self) -> usize {
    self.successors.iter().map(Vec::len).sum()
  }

  /// Set every arc cost back to the physical distance.
  pub fn reset_costs(&mut self) {
    self.cost.copy_from_slice(&self.distance);
    if let Some(sink) = self.sink() {
      for j in 0..self.len() {
        let k = self.idx(sink, j);
        self.cost[k] = 0.0;
      }
      let k = self.idx(ORIGIN, sink);
      self.cost[k] = 0.0;
    }
  }

  /// `j` is a successor of `i` iff `i != j` and `j` can be served when leaving `i` as early as
  /// possible.  The origin is never a target, the sink has no successors and the empty route
  /// (origin straight to sink) is excluded.
  pub fn build_successors(&mut self) {
    let n = self.len();
    let sink = self.sink();
    let mut successors = vec![Vec::new(); n];
    for i in 0..n {
      if Some(i) == sink {
        continue;
      }
      let ni = &self.nodes[i];
      let departure = ni.tw_start + ni.service_time;
      successors[i] = (1..n)
        .filter(|&j| j != i)
        .filter(|&j| !(i == ORIGIN && Some(j) == sink))
        .filter(|&j| self.nodes[j].tw_end >= departure + self.distance(i, j))
        .collect();
    }
    self.successors = successors;
  }

  /// Drop every arc `(i, j)` for which `keep(i, j)` is false.  Returns the number of arcs removed.
  pub fn retain_arcs(&mut self, mut keep: impl FnMut(Loc, Loc) -> bool) -> usize {
    let mut removed = 0;
    for (i, succ) in self.successors.iter_mut().enumerate() {
      let before = succ.len();
      succ.retain(|&j| keep(i, j));
      removed += before - succ.len();
    }
    removed
  }

  /// Reprice every arc from the master problem's duals: `cost(i, j) = distance(i, j) - node_duals[i]
  /// - capacity_dual` on every row except the sink's.  Diagonal entries are left alone.
  ///
  /// # Panics
  /// If `node_duals` does not have one entry per node.
  pub fn update_dual_values(&mut self, node_duals: &[f64], capacity_dual: f64) {
    let n = self.len();
    assert_eq!(node_duals.len(), n, "expected one dual value per node");
    let sink = self.sink();
    for i in (0..n).filter(|&i| Some(i) != sink) {
      for j in (0..n).filter(|&j| j != i) {
        let k = self.idx(i, j);
        self.cost[k] = self.distance[k] - node_duals[i] - capacity_dual;
      }
    }
    trace!(?node_duals, capacity_dual, "repriced arcs");
  }

  /// Replace every arc cost by its distance minus a uniform random integer discount in
  /// `[0, max_discount]`.  Deterministic for a given seed.
  pub fn randomize_costs(&mut self, seed: u64, max_discount: u32) {
    let mut rng = StdRng::seed_from_u64(seed);
    self.reset_costs();
    let n = self.len();
    let sink = self.sink();
    for i in (0..n).filter(|&i| Some(i) != sink) {
      for j in (0..n).filter(|&j| j != i) {
        if i == ORIGIN && Some(j) == sink {
          continue;
        }
        let k = self.idx(i, j);
        self.cost[k] = self.distance[k] - rng.gen_range(0, max_discount + 1) as f64;
      }
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::fixtures::*;

  #[test]
  fn rejects_malformed_node_lists() {
    assert_eq!(EspprcInstance::new("e", vec![], 1, 10.0).unwrap_err(), InstanceError::Empty);

    let mut nodes = vec![node(0, 0.0, 0.0, 0, 0.0, 100.0), node(2, 1.0, 0.0, 1, 0.0, 100.0)];
    assert_eq!(
      EspprcInstance::new("e", nodes.clone(), 1, 10.0).unwrap_err(),
      InstanceError::NodeIdMismatch { index: 1, id: 2 }
    );

    nodes[1].id = 1;
    nodes[0].is_depot = true;
    assert_eq!(
      EspprcInstance::new("e", nodes.clone(), 1, 10.0).unwrap_err(),
      InstanceError::MisplacedDepot { index: 0 }
    );

    let many: Vec<_> = (0..MAX_NODES + 1).map(|k| node(k, k as f64, 0.0, 0, 0.0, 1e6)).collect();
    assert_eq!(
      EspprcInstance::new("e", many, 1, 10.0).unwrap_err(),
      InstanceError::TooManyNodes { nodes: MAX_NODES + 1, max: MAX_NODES }
    );
  }

  #[test]
  fn initial_costs() {
    let data = line_instance();
    let sink = data.sink().unwrap();
    assert_eq!(sink, 4);
    assert_eq!(data.customers(), 1..4);
    assert_eq!(data.cost(0, 1), 1.0);
    assert_eq!(data.cost(1, 3), 2.0);
    assert_eq!(data.cost(3, sink), 3.0);
    assert_eq!(data.cost(0, sink), 0.0);
    assert_eq!(data.cost(sink, 2), 0.0);
    assert_eq!(data.distance(sink, 2), 2.0);
  }

  #[test]
  fn successors() {
    let data = line_instance();
    let sink = data.sink().unwrap();
    assert_eq!(data.successors(0), &[1, 2, 3]);
    assert_eq!(data.successors(2), &[1, 3, sink]);
    assert!(data.successors(sink).is_empty());
    for i in 0..data.len() {
      assert!(!data.successors(i).contains(&ORIGIN));
      assert!(!data.successors(i).contains(&i));
    }

    // customer 1 closes before customer 2 opens
    let data = ordered_windows_instance();
    assert!(data.successors(1).contains(&2));
    assert!(!data.successors(2).contains(&1));
  }

  #[test]
  fn build_from_vrptw() {
    let vrptw = VrptwInstance {
      id: "tiny".into(),
      name: "TINY".into(),
      customers: vec![
        Customer { id: 0, x: 0.0, y: 0.0, demand: 0, tw_start: 0.0, tw_end: 100.0, service_time: 0.0 },
        Customer { id: 1, x: 3.0, y: 4.0, demand: 5, tw_start: 0.0, tw_end: 50.0, service_time: 10.0 },
      ],
      num_vehicles: 2,
      capacity: 20,
    };
    let data = EspprcInstance::build(&vrptw, true).unwrap();
    assert_eq!(data.len(), 3);
    assert!(data.node(2).is_depot);
    assert!(!data.node(0).is_depot);
    assert_eq!(data.capacity, 20.0);
    assert_eq!(data.successors(0), &[1]);
    assert_eq!(data.successors(1), &[2]);
    assert_eq!(data.distance(1, 2), 5.0);

    let open = EspprcInstance::build(&vrptw, false).unwrap();
    assert_eq!(open.sink(), None);
    assert_eq!(open.customers(), 1..2);
  }

  #[test]
  fn update_dual_values() {
    let mut data = line_instance();
    let sink = data.sink().unwrap();
    let duals = [0.5, 10.0, 0.0, 0.0, 7.0];
    data.update_dual_values(&duals, 1.0);
    assert_eq!(data.cost(1, 2), 1.0 - 10.0 - 1.0);
    assert_eq!(data.cost(0, 3), 3.0 - 0.5 - 1.0);
    assert_eq!(data.cost(2, sink), 2.0 - 0.0 - 1.0);
    assert_eq!(data.cost(2, 2), 0.0);
    assert_eq!(data.cost(sink, 1), 0.0);
  }

  #[test]
  #[should_panic]
  fn update_dual_values_length_mismatch() {
    let mut data = line_instance();
    data.update_dual_values(&[0.0; 3], 0.0);
  }

  #[test]
  fn randomize_costs() {
    let mut a = line_instance();
    let mut b = line_instance();
    a.randomize_costs(42, 5);
    b.randomize_costs(42, 5);
    let sink = a.sink().unwrap();
    for i in 0..a.len() {
      for j in 0..a.len() {
        assert_eq!(a.cost(i, j), b.cost(i, j));
        if i != j && i != sink && !(i == ORIGIN && j == sink) {
          let discount = a.distance(i, j) - a.cost(i, j);
          assert!(0.0 <= discount && discount <= 5.0 && discount.fract() == 0.0);
        } else {
          assert_eq!(a.cost(i, j), 0.0);
        }
      }
    }
  }

  #[test]
  fn retain_arcs() {
    let mut data = line_instance();
    let before = data.num_arcs();
    let removed = data.retain_arcs(|i, j| j == i + 1);
    assert_eq!(data.num_arcs(), 4);
    assert_eq!(before - removed, 4);
    assert_eq!(data.successors(0), &[1]);
    assert_eq!(data.successors(3), &[4]);
  }
}
