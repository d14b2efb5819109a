use std::path::PathBuf;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use stackbot_theme::Theme;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ThemeArg {
    /// Seed for the color and the solver (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ThemeReport {
    background: String,
    foreground: String,
    filter: String,
    loss: f64,
}

impl From<&Theme> for ThemeReport {
    fn from(theme: &Theme) -> Self {
        Self {
            background: theme.background.to_hex(),
            foreground: theme.foreground.to_hex(),
            filter: theme.filter(),
            loss: theme.solution.loss,
        }
    }
}

pub(crate) fn run(arg: &ThemeArg) -> anyhow::Result<()> {
    let ThemeArg { seed, output } = arg;

    let seed = util::resolve_seed(*seed);
    let theme = Theme::random(&mut Pcg32::seed_from_u64(seed));
    let report = ThemeReport::from(&theme);
    eprintln!(
        "Theme (seed {seed}): background {}, foreground {}, loss {:.3}",
        report.background, report.foreground, report.loss
    );

    Output::save_json(&report, output.as_deref())
}
