use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::*;

use crate::data::*;
use super::dom::{admit_all, merge_efficient, truncate};
use super::label::{Label, LabelArena, LabelId, Route};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LabellingStats {
  pub created: usize,
  pub discarded: usize,
  pub dominated: usize,
  pub truncated: usize,
  pub iterations: usize,
  pub timed_out: bool,
  pub elapsed: Duration,
}

/// Non-dominated labels per node, sorted by ascending cost, together with the arena holding them
/// and all their ancestors.
#[derive(Debug, Clone)]
pub struct NodeLabels {
  arena: LabelArena,
  sets: Vec<Vec<LabelId>>,
  sink: Option<Loc>,
  pub stats: LabellingStats,
}

impl NodeLabels {
  pub fn arena(&self) -> &LabelArena { &self.arena }

  pub fn ids_at(&self, node: Loc) -> &[LabelId] { &self.sets[node] }

  pub fn labels_at(&self, node: Loc) -> impl Iterator<Item=&Label> + '_ {
    self.sets[node].iter().map(move |&id| &self.arena[id])
  }

  /// Completed routes; empty if the instance has no sink.
  pub fn sink_ids(&self) -> &[LabelId] {
    match self.sink {
      Some(sink) => &self.sets[sink],
      None => &[],
    }
  }

  pub fn label(&self, id: LabelId) -> &Label { &self.arena[id] }

  pub fn path(&self, id: LabelId) -> Vec<Loc> { self.arena.path(id) }

  pub fn route(&self, data: &EspprcInstance, id: LabelId) -> Route { self.arena.route(data, id) }

  pub fn num_nodes(&self) -> usize { self.sets.len() }
}


pub struct LabellingSolver<'a> {
  data: &'a EspprcInstance,
}

impl<'a> LabellingSolver<'a> {
  pub fn new(data: &'a EspprcInstance) -> Self {
    LabellingSolver { data }
  }

  /// Run the labelling algorithm to a fixed point.  `time_limit_secs == 0` means no time budget and
  /// `label_limit == 0` keeps every non-dominated label; otherwise each node except the sink keeps
  /// only its `label_limit` cheapest labels.
  pub fn gen_feasible_routes(&self, time_limit_secs: u64, label_limit: usize) -> NodeLabels {
    let time_limit = if time_limit_secs == 0 { None } else { Some(Duration::from_secs(time_limit_secs)) };
    let label_limit = if label_limit == 0 { None } else { Some(label_limit) };
    self.solve(time_limit, label_limit)
  }

  #[instrument(level="info", skip(self), fields(id=%self.data.id, nodes=self.data.len()))]
  pub fn solve(&self, time_limit: Option<Duration>, label_limit: Option<usize>) -> NodeLabels {
    let data = self.data;
    let n = data.len();
    let sink = data.sink();
    let start = Instant::now();
    let mut stats = LabellingStats::default();

    let mut arena = LabelArena::with_capacity(16 * n);
    let mut sets: Vec<Vec<LabelId>> = vec![Vec::new(); n];
    sets[ORIGIN].push(arena.origin(data));
    stats.created += 1;

    let mut queue = VecDeque::with_capacity(n);
    let mut queued = vec![false; n];
    queue.push_back(ORIGIN);
    queued[ORIGIN] = true;

    while !queue.is_empty() {
      if let Some(limit) = time_limit {
        if start.elapsed() >= limit {
          warn!(?limit, queued=queue.len(), "time limit reached, label sets are incomplete");
          stats.timed_out = true;
          break;
        }
      }
      let v = match queue.pop_front() {
        Some(v) => v,
        None => break,
      };
      queued[v] = false;
      stats.iterations += 1;

      for &w in data.successors(v) {
        let parents: Vec<LabelId> = sets[v].iter().copied()
          .filter(|&l| !arena[l].is_extended() && arena[l].is_reachable(w))
          .collect();
        if parents.is_empty() { continue; }

        let candidates: Vec<LabelId> = parents.into_iter()
          .map(|l| arena.extend(data, l, w))
          .collect();
        stats.created += candidates.len();

        let merge = if Some(w) == sink {
          admit_all(&arena, &mut sets[w], candidates)
        } else {
          merge_efficient(&mut arena, &mut sets[w], candidates)
        };
        stats.discarded += merge.discarded;
        stats.dominated += merge.removed;
        trace!(v, w, ?merge, size=sets[w].len(), "merge");

        if let Some(limit) = label_limit.filter(|_| Some(w) != sink) {
          let dropped = truncate(&mut sets[w], limit);
          if dropped > 0 {
            trace!(w, dropped, "truncated");
          }
          stats.truncated += dropped;
        }

        if merge.changed && !queued[w] {
          queue.push_back(w);
          queued[w] = true;
        }
      }

      for &l in &sets[v] {
        arena.mark_extended(l);
      }
    }

    stats.elapsed = start.elapsed();
    info!(
      created=stats.created,
      discarded=stats.discarded,
      dominated=stats.dominated,
      truncated=stats.truncated,
      iterations=stats.iterations,
      routes=sink.map_or(0, |s| sets[s].len()),
      elapsed=?stats.elapsed,
      "labelling finished"
    );

    NodeLabels { arena, sets, sink, stats }
  }
}
