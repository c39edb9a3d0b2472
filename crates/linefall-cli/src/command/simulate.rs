use std::path::PathBuf;

use linefall_engine::GameConfig;
use linefall_evaluator::{DecisionEngine, SearchPolicy, play_game};
use linefall_stats::DescriptiveStats;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::model;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum PolicyArg {
    Single,
    Two,
    #[default]
    Pruned,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Trained model file; uses the built-in weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Search policy: single, two, or pruned
    #[arg(long, default_value = "pruned")]
    policy: PolicyArg,
    /// Percentage of first placements expanded by the pruned search
    #[arg(long, default_value_t = SearchPolicy::DEFAULT_KEEP_PERCENT)]
    keep_percent: usize,
    /// Upper bound on turns per game
    #[arg(long, default_value_t = 10_000)]
    turn_limit: usize,
    /// Seed for the piece stream; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let model = model::load_linear_model(arg.model.as_deref())?;
    let policy = match arg.policy {
        PolicyArg::Single => SearchPolicy::SinglePly,
        PolicyArg::Two => SearchPolicy::TwoPly,
        PolicyArg::Pruned => SearchPolicy::PrunedTwoPly {
            keep_percent: arg.keep_percent,
        },
    };
    let engine = DecisionEngine::new(&model, policy);
    let config = GameConfig::default();

    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };

    let mut scores = Vec::with_capacity(arg.games);
    for game in 0..arg.games {
        #[expect(clippy::cast_precision_loss)]
        let score = play_game(&engine, &config, &mut rng, arg.turn_limit) as f64;
        eprintln!("Game #{game}: {score}");
        scores.push(score);
    }

    let Some(stats) = DescriptiveStats::new(scores) else {
        anyhow::bail!("no games played");
    };
    println!("Games:  {}", arg.games);
    println!("Min:    {:.1}", stats.min);
    println!("Max:    {:.1}", stats.max);
    println!("Mean:   {:.1}", stats.mean);
    println!("Median: {:.1}", stats.median);
    println!("Stddev: {:.1}", stats.std_dev);
    Ok(())
}
