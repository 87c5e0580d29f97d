use json::JsonValue;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use anyhow::{Context, Result};
use tracing::*;
use structopt::StructOpt;

use espprc::*;
use espprc::data::{get_solomon_instance_by_index, EspprcInstance};
use espprc::pricing::{self, Column, LabellingSolver, LabellingStats, Route};

mod common;
use common::*;

#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Solomon instance indices, in path order under $DATA_ROOT/solomon
    #[structopt(required=true)]
    indices: Vec<usize>,
    #[structopt(long, short="c", default_value="1", validator=at_least(1usize))]
    cpus: usize,
    #[structopt(flatten)]
    pricing: PricingOptions,
    #[structopt(flatten)]
    output: OutputOptions,
}


struct InstanceResult {
    id: String,
    nodes: usize,
    arcs: usize,
    arcs_removed: usize,
    routes: Vec<Route>,
    columns: Vec<Column>,
    initial_columns: Vec<Column>,
    stats: LabellingStats,
}

fn route_record(r: &Route) -> JsonValue {
    return json::object! {
        route: r.to_string(),
        path: JsonValue::from(r.path.clone()),
        cost: r.cost,
        distance: r.distance,
    }
}

fn column_record(c: &Column) -> JsonValue {
    let mut record = route_record(&c.route);
    record["coefficients"] = JsonValue::from(c.coefficients.clone());
    return record;
}

impl PricingOutput for InstanceResult {
    fn to_json(&self) -> JsonValue {
        let mut root = self.to_json_summary();
        root["routes"] = self.routes.iter().map(route_record).collect::<Vec<_>>().into();
        root["columns"] = self.columns.iter().map(column_record).collect::<Vec<_>>().into();
        root["initial_columns"] = self.initial_columns.iter().map(column_record).collect::<Vec<_>>().into();
        return root;
    }

    fn to_json_summary(&self) -> JsonValue {
        return json::object! {
            id: self.id.as_str(),
            nodes: self.nodes,
            arcs: self.arcs,
            arcs_removed: self.arcs_removed,
            routes_found: self.routes.len(),
            negative_routes: self.columns.len(),
            best: self.routes.first().map(route_record),
            labels_created: self.stats.created,
            labels_discarded: self.stats.discarded,
            labels_dominated: self.stats.dominated,
            labels_truncated: self.stats.truncated,
            iterations: self.stats.iterations,
            timed_out: self.stats.timed_out,
            time_ms: self.stats.elapsed.as_secs_f64() * 1000.0,
        }
    }
}


#[instrument(level="info", skip(opts))]
fn solve_instance(index: usize, opts: &PricingOptions) -> Result<InstanceResult> {
    let mut vrptw = get_solomon_instance_by_index(index)?;
    if let Some(n) = opts.customers {
        vrptw = vrptw.truncate(n);
    }
    let mut data = EspprcInstance::build(&vrptw, true)
        .with_context(|| format!("failed to build pricing graph for {}", vrptw.id))?;

    if let Some(seed) = opts.random_costs {
        data.randomize_costs(seed, opts.max_discount);
    }
    let arcs = data.num_arcs();
    let arcs_removed = if opts.preprocess { pricing::preprocess(&mut data) } else { 0 };
    let data = data;

    let labels = LabellingSolver::new(&data).gen_feasible_routes(opts.time_limit, opts.label_limit);
    let routes: Vec<_> = labels.sink_ids().iter().map(|&id| labels.route(&data, id)).collect();
    let columns = pricing::negative_cost_columns(&data, &labels);
    info!(id=%data.id, routes=routes.len(), negative=columns.len(), best=?routes.first().map(|r| r.cost));

    return Ok(InstanceResult {
        id: data.id.clone(),
        nodes: data.len(),
        arcs,
        arcs_removed,
        routes,
        columns,
        initial_columns: pricing::initial_columns(&data),
        stats: labels.stats,
    })
}


fn main() -> Result<()> {
    let args : ClArgs = StructOpt::from_args();
    let _g = init_logging(args.output.log.as_ref())?;
    debug!(?args);
    ThreadPoolBuilder::new().num_threads(args.cpus).build_global()?;

    let results = args.indices.par_iter()
        .map(|&idx| solve_instance(idx, &args.pricing))
        .collect::<Result<Vec<_>>>()?;

    write_output(&args.output, &results)
}
