use std::convert::TryFrom;
use super::*;
use crate::raw::solomon::Solomon;
use crate::raw::FromRaw;

pub type Time = f64;
pub type Demand = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
  pub id: usize,
  pub x: f64,
  pub y: f64,
  pub demand: Demand,
  pub tw_start: Time,
  pub tw_end: Time,
  pub service_time: Time,
}

/// A single-depot VRPTW instance.  `customers[0]` is the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct VrptwInstance {
  pub id: String,
  /// Name given in the instance file header.
  pub name: String,
  pub customers: Vec<Customer>,
  pub num_vehicles: usize,
  pub capacity: Demand,
}

impl VrptwInstance {
  /// Number of customers, excluding the depot.
  pub fn n(&self) -> usize {
    self.customers.len().saturating_sub(1)
  }

  /// Keep the depot and the first `n` customers.
  pub fn truncate(mut self, n: usize) -> Self {
    self.customers.truncate(n + 1);
    self
  }
}

fn to_demand(value: usize, what: &str) -> Result<Demand> {
  Demand::try_from(value).with_context(|| format!("{} {} does not fit in a demand", what, value))
}

impl FromRaw<Solomon> for VrptwInstance {
  fn from_raw(raw: Solomon, id: Cow<str>) -> Result<VrptwInstance> {
    let customers = (0..raw.ids.len())
      .map(|k| Ok(Customer {
        id: raw.ids[k],
        x: raw.coords[k].0,
        y: raw.coords[k].1,
        demand: to_demand(raw.demand[k], "customer demand")?,
        tw_start: raw.tw_start[k],
        tw_end: raw.tw_end[k],
        service_time: raw.service_time[k],
      }))
      .collect::<Result<Vec<_>>>()?;

    Ok(VrptwInstance {
      id: id.into_owned(),
      capacity: to_demand(raw.vehicle_capacity, "vehicle capacity")?,
      name: raw.name,
      customers,
      num_vehicles: raw.num_vehicles,
    })
  }
}
