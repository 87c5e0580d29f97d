use std::fmt::Display;
use std::str::FromStr;
use std::path::PathBuf;
use std::io::Write;
use anyhow::Result;
use structopt::StructOpt;

/// Lower-bound check for numeric arguments.
pub fn at_least<T>(minval: T) -> impl Fn(String) -> Result<(), String>
    where
        T: FromStr + PartialOrd + Display + Copy,
        T::Err: Display
{
    move |val| match val.parse::<T>() {
        Ok(x) if x < minval => Err(format!("must be at least {}", minval)),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Clone, Debug, StructOpt)]
pub struct PricingOptions {
  /// Keep only the depot and the first N customers
  #[structopt(long, short="n", validator=at_least(1usize))]
  pub customers: Option<usize>,
  /// Wall-clock budget per instance in seconds, 0 for none
  #[structopt(long="time-limit", short="t", default_value="0")]
  pub time_limit: u64,
  /// Labels kept per node, 0 for all
  #[structopt(long="label-limit", short="l", default_value="0")]
  pub label_limit: usize,
  /// Replace arc costs by distances minus random integer discounts drawn with this seed
  #[structopt(long="random-costs")]
  pub random_costs: Option<u64>,
  /// Largest discount drawn by --random-costs
  #[structopt(long="max-discount", default_value="20")]
  pub max_discount: u32,
  #[structopt(long="no-preprocess", parse(from_flag=std::ops::Not::not))]
  pub preprocess: bool,
}

/// What each instance record contains.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Detail {
    /// Every route found, the negative-cost columns and the greedy initial columns
    Full,
    /// Counts, statistics and the best route
    Summary,
}

impl Detail {
    pub const NAMES: [&'static str; 2] = ["full", "summary"];
}

impl FromStr for Detail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Detail::Full),
            "summary" => Ok(Detail::Summary),
            other => Err(format!("unknown detail level `{}`", other)),
        }
    }
}

#[derive(Clone, Debug, StructOpt)]
pub struct OutputOptions {
  /// Amount of detail in each instance record
  #[structopt(long, short="d", default_value="summary", possible_values=&Detail::NAMES)]
  pub detail: Detail,
  /// Write the JSON records here instead of stdout
  #[structopt(long="output", short="o")]
  pub output: Option<PathBuf>,
  /// Newline-delimited JSON log file
  #[structopt(long="log-file")]
  pub log: Option<PathBuf>,
}

/// Results which can be rendered in either output format.
pub trait PricingOutput {
    fn to_json(&self) -> json::JsonValue;
    fn to_json_summary(&self) -> json::JsonValue;
}

pub fn write_output<'a, R: PricingOutput + 'a>(options: &OutputOptions, results: impl IntoIterator<Item=&'a R>) -> Result<()> {
  let records: Vec<json::JsonValue> = results.into_iter()
    .map(|r| if options.detail == Detail::Full { r.to_json() } else { r.to_json_summary() })
    .collect();
  let root = json::JsonValue::Array(records);

  if let Some(path) = &options.output {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    root.write_pretty(&mut file, 2)?;
    file.flush()?;
  } else {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    root.write_pretty(&mut out, 2)?;
    writeln!(out)?;
  }
  Ok(())
}
