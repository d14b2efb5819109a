use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use stackbot_theme::{Color, FilterParams, Solver};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveFilterArg {
    /// Target color, `#RRGGBB` or `#RGB`
    color: Color,
    /// Seed for the optimizer (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SolveFilterReport {
    target: String,
    seed: u64,
    values: FilterParams,
    loss: f64,
    filter: String,
    /// Color the filter actually produces from black.
    result: String,
}

pub(crate) fn run(arg: &SolveFilterArg) -> anyhow::Result<()> {
    let SolveFilterArg {
        color,
        seed,
        output,
    } = arg;

    let seed = util::resolve_seed(*seed);
    eprintln!("Solving filter for {} (seed {seed})...", color.to_hex());
    let solution = Solver::new(*color).solve(&mut Pcg32::seed_from_u64(seed));
    let produced = solution.values.apply(Color::BLACK);
    eprintln!("Loss: {:.3}", solution.loss);

    let report = SolveFilterReport {
        target: color.to_hex(),
        seed,
        values: solution.values,
        loss: solution.loss,
        filter: solution.filter(),
        result: produced.to_hex(),
    };
    Output::save_json(&report, output.as_deref())
}
