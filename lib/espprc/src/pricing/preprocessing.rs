use tracing::*;

use crate::data::*;
use crate::Set;

/// Remove arcs which no feasible route can use: the arc overloads the vehicle on its own, or after
/// taking it as early as possible the route can no longer reach the sink in time.
fn remove_arcs(data: &mut EspprcInstance) -> usize {
  let parent_span = span!(Level::DEBUG, "remove_arcs");
  let _g = parent_span.enter();

  let sink = data.sink();
  let mut illegal_arcs: Set<(Loc, Loc)> = Set::default();
  for i in 0..data.len() {
    let ni = data.node(i);
    for &j in data.successors(i) {
      if Some(j) == sink { continue; }
      let nj = data.node(j);

      let overloaded = (ni.demand + nj.demand) as f64 > data.capacity;
      let stranded = match sink {
        Some(sink) => {
          let t = (ni.tw_start + ni.service_time + data.distance(i, j)).max(nj.tw_start);
          t + nj.service_time + data.distance(j, sink) > data.node(sink).tw_end
        },
        None => false,
      };

      if overloaded || stranded {
        trace!(i, j, overloaded, stranded, "removed");
        illegal_arcs.insert((i, j));
      }
    }
  }

  let num_arcs_initial = data.num_arcs();
  let removed = data.retain_arcs(|i, j| !illegal_arcs.contains(&(i, j)));
  debug!("Removed {} arcs, {} remaining", removed, num_arcs_initial - removed);
  removed
}


pub fn preprocess(data: &mut EspprcInstance) -> usize {
  let s = span!(Level::DEBUG, "preprocess", data_id=?data.id);
  let _g = s.enter();
  remove_arcs(data)
}
