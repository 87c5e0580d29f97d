use std::cmp::Ordering;
use itertools::Itertools;
use tracing::*;

use crate::data::*;
use super::label::{LabelArena, LabelId, Route};
use super::labelling::NodeLabels;

/// A route ready to be added to the master problem.  `coefficients[i]` is 1 iff the route visits
/// node `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
  pub route: Route,
  pub coefficients: Vec<u8>,
}

impl Column {
  pub fn from_label(data: &EspprcInstance, arena: &LabelArena, id: LabelId) -> Self {
    let label = &arena[id];
    let coefficients = (0..data.len()).map(|i| label.is_visited(i) as u8).collect();
    Column { route: arena.route(data, id), coefficients }
  }

  #[inline]
  pub fn cost(&self) -> Cost { self.route.cost }
}

/// Completed routes with negative reduced cost, cheapest first.
#[instrument(level="debug", skip(data, labels))]
pub fn negative_cost_columns(data: &EspprcInstance, labels: &NodeLabels) -> Vec<Column> {
  let columns: Vec<_> = labels.sink_ids().iter()
    .filter(|&&id| labels.label(id).cost() < 0.0)
    .sorted_by(|&&a, &&b| {
      labels.label(a).cost().partial_cmp(&labels.label(b).cost()).unwrap_or(Ordering::Equal)
    })
    .map(|&id| Column::from_label(data, labels.arena(), id))
    .collect();
  debug!(count=columns.len(), "negative reduced cost columns");
  columns
}

/// One route per customer: origin, customer, sink.  Customers which cannot be served that way are
/// skipped.
pub fn default_columns(data: &EspprcInstance) -> Vec<Column> {
  let sink = match data.sink() {
    Some(s) => s,
    None => return Vec::new(),
  };
  let mut arena = LabelArena::new();
  let origin = arena.origin(data);
  data.customers()
    .filter(|&i| arena[origin].is_reachable(i) && data.successors(ORIGIN).contains(&i))
    .collect_vec()
    .into_iter()
    .filter_map(|i| {
      let l = arena.extend(data, origin, i);
      if !arena[l].is_reachable(sink) { return None; }
      let l = arena.extend(data, l, sink);
      Some(Column::from_label(data, &arena, l))
    })
    .collect()
}

/// Greedy covering: repeatedly start a route at the uncovered customer with the earliest ready
/// time and keep appending the uncovered successor with the earliest ready time.  A customer is
/// only appended if the route can still return to the sink afterwards, so every started route is
/// closed and every customer marked covered ends up in a column.
#[instrument(level="debug", skip(data), fields(id=%data.id))]
pub fn initial_columns(data: &EspprcInstance) -> Vec<Column> {
  let sink = match data.sink() {
    Some(s) => s,
    None => return Vec::new(),
  };
  let ready = |i: &Loc| data.node(*i).tw_start;
  let by_ready = |a: &Loc, b: &Loc| ready(a).partial_cmp(&ready(b)).unwrap_or(Ordering::Equal);

  // Extends `from` to `j`, keeping the result only if the sink is still within reach.
  let extend_closable = |arena: &mut LabelArena, from: LabelId, j: Loc| -> Option<LabelId> {
    let l = arena.extend(data, from, j);
    if arena[l].is_reachable(sink) && data.successors(j).contains(&sink) { Some(l) } else { None }
  };

  let mut covered = vec![false; data.len()];
  let mut arena = LabelArena::new();
  let mut columns = Vec::new();

  loop {
    let mut label = arena.origin(data);
    let mut at = ORIGIN;

    loop {
      let candidates = data.successors(at).iter().copied()
        .filter(|&j| j != sink && !covered[j] && arena[label].is_reachable(j))
        .sorted_by(by_ready)
        .collect_vec();
      match candidates.into_iter().find_map(|j| extend_closable(&mut arena, label, j).map(|l| (j, l))) {
        Some((j, l)) => {
          covered[j] = true;
          label = l;
          at = j;
        },
        None => break,
      }
    }

    if at == ORIGIN {
      break;
    }
    label = arena.extend(data, label, sink);
    trace!(path=?arena.path(label), "greedy route");
    columns.push(Column::from_label(data, &arena, label));
  }

  let uncovered = data.customers().filter(|&i| !covered[i]).count();
  if uncovered > 0 {
    warn!(uncovered, "some customers cannot be served by any route");
  }
  debug!(count=columns.len(), uncovered);
  columns
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::fixtures::*;
  use crate::pricing::LabellingSolver;

  #[test]
  fn negative_columns_sorted() {
    let mut data = grid_instance(6, 20.0);
    let mut duals = vec![0.0; data.len()];
    duals[2] = 40.0;
    duals[5] = 25.0;
    data.update_dual_values(&duals, 0.0);
    let labels = LabellingSolver::new(&data).gen_feasible_routes(0, 0);
    let columns = negative_cost_columns(&data, &labels);

    assert!(!columns.is_empty());
    assert!(columns.windows(2).all(|w| w[0].cost() <= w[1].cost()));
    assert_eq!(columns.len(), labels.sink_ids().iter().filter(|&&id| labels.label(id).cost() < 0.0).count());
    for c in &columns {
      assert!(c.cost() < 0.0);
      assert!(c.coefficients[2] == 1 || c.coefficients[5] == 1);
      assert_eq!(c.coefficients.len(), data.len());
      for (i, &a) in c.coefficients.iter().enumerate() {
        assert_eq!(a == 1, c.route.path.contains(&i));
      }
    }
  }

  #[test]
  fn no_negative_columns_at_distance_costs() {
    let data = grid_instance(4, 20.0);
    let labels = LabellingSolver::new(&data).gen_feasible_routes(0, 0);
    assert!(negative_cost_columns(&data, &labels).is_empty());
  }

  #[test]
  fn default_columns_visit_one_customer() {
    let data = line_instance();
    let columns = default_columns(&data);
    assert_eq!(columns.len(), 3);
    for (c, i) in columns.iter().zip(1..) {
      assert_eq!(c.route.path, vec![0, i, 4]);
      assert_eq!(c.cost(), 2.0 * i as f64);
      assert_eq!(c.route.to_string(), format!("Start, {}, Depot", i));
    }
  }

  #[test]
  fn initial_columns_cover_all_customers() {
    let data = grid_instance(8, 5.0);
    let columns = initial_columns(&data);
    let mut seen = vec![0; data.len()];
    for c in &columns {
      assert!(c.route.closed);
      for &i in c.route.customers() {
        seen[i] += 1;
      }
    }
    for i in data.customers() {
      assert_eq!(seen[i], 1, "customer {} covered {} times", i, seen[i]);
    }

    // windows force 1 before 2, so one route serves both
    let data = ordered_windows_instance();
    let columns = initial_columns(&data);
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].route.to_string(), "Start, 1, 2, Depot");
  }

  #[test]
  fn greedy_chain_stops_before_stranding() {
    // 0 -> 1 -> 2 is feasible but leaves the sink out of reach, so 2 gets its own route
    let nodes = vec![
      node(0, 0.0, 0.0, 0, 0.0, 35.0),
      node(1, 10.0, 0.0, 1, 0.0, 35.0),
      node(2, 0.0, 15.0, 1, 0.0, 35.0),
      sink(3, 35.0),
    ];
    let data = EspprcInstance::new("stranded", nodes, 1, 10.0).unwrap();
    let columns = initial_columns(&data);
    let routes: Vec<_> = columns.iter().map(|c| c.route.to_string()).collect();
    assert_eq!(routes, vec!["Start, 1, Depot", "Start, 2, Depot"]);

    let mut covered: Vec<_> = columns.iter().flat_map(|c| c.route.customers().iter().copied()).collect();
    covered.sort();
    assert_eq!(covered, vec![1, 2]);
    assert!(columns.iter().all(|c| c.route.closed));
  }
}
