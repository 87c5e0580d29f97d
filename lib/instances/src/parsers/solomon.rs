use std::path::Path;
use crate::Result;
use crate::raw::solomon::*;
use super::{
  ParseInstance,
  nom_prelude::*
};

/// A Solomon-format file on disk.
#[derive(Debug, Copy, Clone)]
pub struct SolomonFmt<P>(pub P);

/// Solomon-format text already held in memory.
#[derive(Debug, Copy, Clone)]
pub struct SolomonText<'a>(pub &'a str);

impl<P: AsRef<Path>> ParseInstance<SolomonFmt<P>> for Solomon {
  fn parse(path: SolomonFmt<P>) -> Result<Solomon> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path)?;
    Solomon::parse(SolomonText(&data))
  }
}

impl<'a> ParseInstance<SolomonText<'a>> for Solomon {
  fn parse(text: SolomonText<'a>) -> Result<Solomon> {
    let instance = match parsers::solomon(text.0).finish() {
      Ok((_, instance)) => instance,
      Err(e) => return Err(anyhow::Error::msg(e.to_string())),
    };
    for (k, &id) in instance.ids.iter().enumerate() {
      if id != k {
        anyhow::bail!("customer on row {} has id {}, ids must be consecutive from 0", k, id);
      }
    }
    Ok(instance)
  }
}


mod parsers {
  use super::*;
  use crate::parsers::common::*;

  struct Row {
    id: usize,
    x: f64,
    y: f64,
    demand: Demand,
    ready: Time,
    due: Time,
    service: Time,
  }

  //    1      45         68         10        912        967         90
  fn customer_row<'a, E>(input: &'a str) -> IResult<&'a str, Row, E>
    where
      E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>
  {
    let (input, (id, x, y, demand, ready, due, service)) = tuple((
      preceded(space0, usize_),
      preceded(space1, double),
      preceded(space1, double),
      preceded(space1, usize_),
      preceded(space1, double),
      preceded(space1, double),
      preceded(space1, double),
    ))(input)?;
    Ok((input, Row { id, x, y, demand, ready, due, service }))
  }

  pub fn solomon(input: &str) -> IResult<&str, Solomon, error::VerboseError<&str>> {
    let (input, name) = preceded(multispace0, not_line_ending)(input)?;
    let (input, _) = header_line("VEHICLE")(input)?;
    let (input, _) = header_line("NUMBER")(input)?;
    let (input, (num_vehicles, vehicle_capacity)) =
      preceded(multispace0, separated_pair(usize_, space1, usize_))(input)?;
    let (input, _) = header_line("CUSTOMER")(input)?;
    let (input, _) = header_line("CUST")(input)?;
    let (input, rows) = many1(preceded(multispace0, customer_row))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    let n = rows.len();
    let mut instance = Solomon {
      name: name.trim().to_string(),
      num_vehicles,
      vehicle_capacity,
      ids: Vec::with_capacity(n),
      coords: Vec::with_capacity(n),
      demand: Vec::with_capacity(n),
      tw_start: Vec::with_capacity(n),
      tw_end: Vec::with_capacity(n),
      service_time: Vec::with_capacity(n),
    };
    for row in rows {
      instance.ids.push(row.id);
      instance.coords.push((row.x, row.y));
      instance.demand.push(row.demand);
      instance.tw_start.push(row.ready);
      instance.tw_end.push(row.due);
      instance.service_time.push(row.service);
    }
    Ok((input, instance))
  }
}
