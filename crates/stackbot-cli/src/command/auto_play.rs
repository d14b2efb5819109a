use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::Serialize;
use stackbot_engine::{GameField, GameStats};
use stackbot_evaluator::{
    turn_evaluator::TurnEvaluator,
    weights::{WeightInput, Weights},
};
use stackbot_theme::Theme;

use crate::{
    command::theme::ThemeReport,
    util::{self, Output},
};

const PROGRESS_INTERVAL: usize = 100;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Seed for the piece sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of pieces to place
    #[arg(long, default_value_t = 1000)]
    turn_limit: usize,
    /// JSON file with evaluation weights (`height`, `lines`, `holes`, `bumpiness`)
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Aggregate height weight, overrides the weights file
    #[arg(long)]
    height: Option<f64>,
    /// Completed lines weight, overrides the weights file
    #[arg(long)]
    lines: Option<f64>,
    /// Holes weight, overrides the weights file
    #[arg(long)]
    holes: Option<f64>,
    /// Bumpiness weight, overrides the weights file
    #[arg(long)]
    bumpiness: Option<f64>,
    /// Choose placements without considering the next piece
    #[arg(long)]
    no_lookahead: bool,
    /// Generate a new color theme at every level change
    #[arg(long)]
    theme: bool,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct AutoPlayReport {
    played_at: DateTime<Utc>,
    seed: u64,
    lookahead: bool,
    weights: Weights,
    stats: GameStats,
    level: usize,
    game_over: Option<String>,
    board: Vec<String>,
    themes: Vec<LevelTheme>,
}

#[derive(Debug, Clone, Serialize)]
struct LevelTheme {
    level: usize,
    #[serde(flatten)]
    theme: ThemeReport,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let seed = util::resolve_seed(arg.seed);
    let weights = load_weights(arg)?;
    let lookahead = !arg.no_lookahead;

    eprintln!("Auto play (seed {seed}, lookahead {lookahead})");
    eprintln!("  Weights: {weights:?}");

    let evaluator = TurnEvaluator::with_weights(weights);
    let mut field = GameField::with_seed(seed);
    let mut stats = GameStats::new();
    let mut theme_rng = Pcg32::seed_from_u64(seed);
    let mut themes = vec![];
    let mut game_over = None;

    for turn in 1..=arg.turn_limit {
        let level = stats.level();
        let result = evaluator.play_turn(&mut field, &mut stats, lookahead);
        if stats.level() != level {
            eprintln!("Level {} reached after {turn} pieces", stats.level());
            if arg.theme {
                let theme = Theme::random(&mut theme_rng);
                eprintln!(
                    "  Theme: background {}, filter {}",
                    theme.background.to_hex(),
                    theme.filter()
                );
                themes.push(LevelTheme {
                    level: stats.level(),
                    theme: ThemeReport::from(&theme),
                });
            }
        }

        if let Err(e) = result {
            game_over = Some(e.to_string());
            break;
        }
        if turn % PROGRESS_INTERVAL == 0 {
            eprintln!("  {turn} pieces, {} lines", stats.score());
        }
    }

    eprintln!();
    match &game_over {
        Some(reason) => eprintln!("Game over: {reason}"),
        None => eprintln!("Turn limit reached"),
    }
    eprintln!("  Pieces: {}", stats.completed_pieces());
    eprintln!("  Lines:  {}", stats.score());
    eprintln!("  Level:  {}", stats.level());

    let report = AutoPlayReport {
        played_at: Utc::now(),
        seed,
        lookahead,
        weights,
        level: stats.level(),
        stats,
        game_over,
        board: field.board().to_string().lines().map(str::to_owned).collect(),
        themes,
    };
    Output::save_json(&report, arg.output.as_deref())
}

/// Weights file, then per-field flags, then validation. Rejected fields are reported
/// and replaced by defaults.
fn load_weights(arg: &AutoPlayArg) -> anyhow::Result<Weights> {
    let from_file = match &arg.weights {
        Some(path) => util::read_json_file::<WeightInput, _>("weights", path)?,
        None => WeightInput::default(),
    };
    let flags = WeightInput {
        height: arg.height,
        lines: arg.lines,
        holes: arg.holes,
        bumpiness: arg.bumpiness,
    };
    let weights = match Weights::from_input(&from_file.with_overrides(&flags)) {
        Ok(weights) => weights,
        Err(e) => {
            eprintln!("Warning: {e}");
            e.weights
        }
    };
    Ok(weights)
}
