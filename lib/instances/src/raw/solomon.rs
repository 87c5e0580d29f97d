pub type Time = f64;
pub type Demand = usize;

/// One instance in the Solomon VRPTW text format.  Row 0 is the depot.
#[derive(Debug, Clone, Default)]
pub struct Solomon {
  pub name: String,
  pub num_vehicles: usize,
  pub vehicle_capacity: usize,
  pub ids: Vec<usize>,
  pub coords: Vec<(f64, f64)>,
  pub demand: Vec<Demand>,
  pub tw_start: Vec<Time>,
  pub tw_end: Vec<Time>,
  pub service_time: Vec<Time>,
}
