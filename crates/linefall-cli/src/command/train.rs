use std::path::PathBuf;

use linefall_training::{CemConfig, CemTrainer};
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::{model::TrainedModel, util};

const ITERATIONS: usize = 50;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Output file path; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of sample/evaluate/refit cycles
    #[arg(long, default_value_t = ITERATIONS)]
    iterations: usize,
    /// Seed for sampling and game piece streams; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.iterations > 0, "at least one iteration is required");

    let mut trainer = CemTrainer::with_initial_distribution(CemConfig::default())?;
    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };

    let mut final_fitness = f64::NEG_INFINITY;
    for iteration in 0..arg.iterations {
        eprintln!("Iteration #{iteration}:");
        let report = trainer.run_iteration(&mut rng);

        if let Some(best) = report.best() {
            eprintln!("  Best: {:.3?} => {:.3}", best.weights(), best.fitness());
            final_fitness = best.fitness();
        }
        if let Some(stats) = report.fitness_stats() {
            eprintln!("  Fitness Stats:");
            eprintln!("    Min:  {:.3}", stats.min);
            eprintln!("    Max:  {:.3}", stats.max);
            eprintln!("    Mean: {:.3}", stats.mean);
        }
        eprintln!("  Mu:    {:.3?}", trainer.mu());
        eprintln!("  Sigma: {:.3?}", trainer.sigma());
    }

    eprintln!("Training completed.");

    let model = TrainedModel::new("cem", final_fitness, trainer.mu().to_vec());
    util::save_json(&model, arg.output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Weights: {} values", model.weights.len());

    Ok(())
}
