use std::fmt;
use std::ops::Index;
use itertools::Itertools;

use crate::data::*;
use super::resources::Resources;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LabelId(u32);

impl LabelId {
  #[inline]
  pub fn index(self) -> usize { self.0 as usize }
}

/// A partial path from the origin to `node`.  Only the two status flags change after creation.
#[derive(Debug, Clone)]
pub struct Label {
  pub node: Loc,
  pub predecessor: Option<LabelId>,
  pub resources: Resources,
  dominated: bool,
  extended: bool,
}

impl Label {
  #[inline]
  pub fn cost(&self) -> Cost { self.resources.cost }

  #[inline]
  pub fn is_dominated(&self) -> bool { self.dominated }

  #[inline]
  pub fn is_extended(&self) -> bool { self.extended }

  #[inline]
  pub fn is_visited(&self, k: Loc) -> bool { self.resources.visited.contains(k) }

  #[inline]
  pub fn is_reachable(&self, k: Loc) -> bool { self.resources.is_reachable(k) }

  /// Only labels at the same node are comparable.
  #[inline]
  pub fn dominates(&self, other: &Label) -> bool {
    self.node == other.node && self.resources.dominates(&other.resources)
  }
}

/// Append-only store of every label created during a pricing run.  Labels refer to their
/// predecessor by index, so shared prefixes are stored once.
#[derive(Debug, Clone, Default)]
pub struct LabelArena {
  labels: Vec<Label>,
}

impl LabelArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    LabelArena { labels: Vec::with_capacity(capacity) }
  }

  fn push(&mut self, node: Loc, predecessor: Option<LabelId>, resources: Resources) -> LabelId {
    let id = LabelId(self.labels.len() as u32);
    self.labels.push(Label { node, predecessor, resources, dominated: false, extended: false });
    id
  }

  pub fn origin(&mut self, data: &EspprcInstance) -> LabelId {
    self.push(ORIGIN, None, Resources::origin(data))
  }

  /// Create the extension of `from` to node `to`.
  pub fn extend(&mut self, data: &EspprcInstance, from: LabelId, to: Loc) -> LabelId {
    let parent = &self[from];
    let resources = parent.resources.extend(data, parent.node, to);
    self.push(to, Some(from), resources)
  }

  #[inline]
  pub fn len(&self) -> usize { self.labels.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.labels.is_empty() }

  pub(crate) fn mark_dominated(&mut self, id: LabelId) {
    let label = &mut self.labels[id.index()];
    debug_assert!(!label.dominated);
    label.dominated = true;
  }

  pub(crate) fn mark_extended(&mut self, id: LabelId) {
    self.labels[id.index()].extended = true;
  }

  /// `id` and its predecessors, walking back to the origin.
  pub fn ancestors(&self, id: LabelId) -> impl Iterator<Item=&Label> + '_ {
    let mut next = Some(id);
    std::iter::from_fn(move || {
      let label = &self[next?];
      next = label.predecessor;
      Some(label)
    })
  }

  /// Node sequence from the origin to the label's node.
  pub fn path(&self, id: LabelId) -> Vec<Loc> {
    let mut path: Vec<Loc> = self.ancestors(id).map(|l| l.node).collect();
    path.reverse();
    path
  }

  pub fn route(&self, data: &EspprcInstance, id: LabelId) -> Route {
    Route::new(data, self.path(id), self[id].cost())
  }
}

impl Index<LabelId> for LabelArena {
  type Output = Label;

  #[inline]
  fn index(&self, id: LabelId) -> &Label {
    &self.labels[id.index()]
  }
}


/// A materialised path with its reduced cost and physical length.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
  pub path: Vec<Loc>,
  pub cost: Cost,
  pub distance: f64,
  pub closed: bool,
}

impl Route {
  pub fn new(data: &EspprcInstance, path: Vec<Loc>, cost: Cost) -> Self {
    let distance = path.iter().tuple_windows().map(|(&i, &j)| data.distance(i, j)).sum();
    let closed = path.last().map_or(false, |&i| data.node(i).is_depot);
    Route { path, cost, distance, closed }
  }

  /// Customers visited, in order.
  pub fn customers(&self) -> &[Loc] {
    let end = if self.closed { self.path.len() - 1 } else { self.path.len() };
    &self.path[1.min(end)..end]
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Start")?;
    for i in self.customers() {
      write!(f, ", {}", i)?;
    }
    if self.closed {
      f.write_str(", Depot")?;
    }
    Ok(())
  }
}
