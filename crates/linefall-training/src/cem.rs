//! Cross-Entropy-Method search over the linear model's weight vector.
//!
//! The trainer keeps a per-dimension Gaussian (`mu`, `sigma`) over weight
//! vectors. Each iteration samples a population, measures every member by
//! playing full games, and refits the Gaussian to the elite slice. Fitness
//! evaluation is the only concurrent part of the system: members are
//! independent, so they are spread over a bounded pool of worker threads
//! and joined before the update step touches `mu`/`sigma`.

use std::{iter, num::NonZeroUsize, thread};

use linefall_engine::GameConfig;
use linefall_evaluator::{
    CORE_FEATURE_COUNT, DecisionEngine, DellacherieExtractor, LinearModel, SearchPolicy, play_game,
};
use linefall_stats::DescriptiveStats;
use rand::{Rng, SeedableRng as _};
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg64Mcg;

/// Starting mean for training runs, from an earlier hand-tuned model.
pub const INITIAL_MU: [f64; CORE_FEATURE_COUNT + 1] = [
    -16.4912, 6.4811, -8.5137, -18.9269, -14.3096, -12.1746, -1.1174, -29.9476, -0.5464,
];

/// Starting per-dimension standard deviation.
pub const INITIAL_SIGMA: f64 = 5.0;

/// Floor added to every refitted sigma so the distribution never collapses.
pub const SIGMA_EPSILON: f64 = 1e-6;

/// Workers per unit of hardware parallelism. Fitness tasks spend most of
/// their time in board simulation, so oversubscribing a little keeps cores
/// busy across uneven game lengths.
const WORKERS_PER_CPU: usize = 3;

/// Configuration rejected before any simulation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrainerSetupError {
    #[display("mu has length {mu_len} but sigma has length {sigma_len}")]
    DimensionMismatch { mu_len: usize, sigma_len: usize },
    #[display("distribution has {actual} dimensions, expected {expected} (feature count + bias)")]
    WrongDimensionCount { expected: usize, actual: usize },
    #[display("every sigma component must be positive and finite")]
    InvalidSigma,
    #[display("population size, games per member, and elite fraction must be positive")]
    InvalidPopulation,
}

/// Tuning knobs for one training run.
///
/// The iteration count is the caller's loop; everything per-iteration
/// lives here.
#[derive(Debug, Clone)]
pub struct CemConfig {
    pub population_size: usize,
    /// Fraction of the population refitted on, top-ranked first.
    pub elite_fraction: f64,
    /// Games played per member; fitness is their mean final score.
    pub games_per_member: usize,
    /// Upper bound on turns per game.
    pub turn_limit: usize,
    pub sigma_epsilon: f64,
    /// Search policy members play with. Greedy keeps evaluation cheap.
    pub policy: SearchPolicy,
    pub game: GameConfig,
}

impl Default for CemConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_fraction: 0.1,
            games_per_member: 8,
            turn_limit: 2000,
            sigma_epsilon: SIGMA_EPSILON,
            policy: SearchPolicy::SinglePly,
            game: GameConfig::default(),
        }
    }
}

/// One sampled weight vector and its measured fitness.
#[derive(Debug, Clone)]
pub struct PopulationMember {
    weights: Vec<f64>,
    fitness: f64,
}

impl PopulationMember {
    /// Feature weights followed by the bias term.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Mean final score over the member's games.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// What one iteration produced, for progress reporting.
#[derive(Debug)]
pub struct IterationReport {
    members: Vec<PopulationMember>,
    elite_count: usize,
}

impl IterationReport {
    /// All members, sorted by fitness descending.
    #[must_use]
    pub fn members(&self) -> &[PopulationMember] {
        &self.members
    }

    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    #[must_use]
    pub fn best(&self) -> Option<&PopulationMember> {
        self.members.first()
    }

    /// Summary of the population's fitness values.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.members.iter().map(PopulationMember::fitness))
    }
}

/// The trainer state: the weight distribution between iterations.
#[derive(Debug, Clone)]
pub struct CemTrainer {
    config: CemConfig,
    mu: Vec<f64>,
    sigma: Vec<f64>,
}

impl CemTrainer {
    pub fn new(
        config: CemConfig,
        mu: Vec<f64>,
        sigma: Vec<f64>,
    ) -> Result<Self, TrainerSetupError> {
        if config.population_size == 0
            || config.games_per_member == 0
            || config.elite_fraction <= 0.0
            || config.elite_fraction > 1.0
        {
            return Err(TrainerSetupError::InvalidPopulation);
        }
        if mu.len() != sigma.len() {
            return Err(TrainerSetupError::DimensionMismatch {
                mu_len: mu.len(),
                sigma_len: sigma.len(),
            });
        }
        let expected = CORE_FEATURE_COUNT + 1;
        if mu.len() != expected {
            return Err(TrainerSetupError::WrongDimensionCount {
                expected,
                actual: mu.len(),
            });
        }
        if sigma.iter().any(|s| !s.is_finite() || *s <= 0.0) || config.sigma_epsilon <= 0.0 {
            return Err(TrainerSetupError::InvalidSigma);
        }
        Ok(Self { config, mu, sigma })
    }

    /// Trainer seeded from the built-in starting model.
    pub fn with_initial_distribution(config: CemConfig) -> Result<Self, TrainerSetupError> {
        let sigma = vec![INITIAL_SIGMA; INITIAL_MU.len()];
        Self::new(config, INITIAL_MU.to_vec(), sigma)
    }

    #[must_use]
    pub fn config(&self) -> &CemConfig {
        &self.config
    }

    /// Current distribution mean; after the last iteration this is the
    /// trained model.
    #[must_use]
    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    #[must_use]
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// Runs one sample/evaluate/refit cycle.
    ///
    /// The passed generator drives sampling and hands every member a fresh
    /// seed; the members' own game randomness never touches it.
    pub fn run_iteration<R>(&mut self, rng: &mut R) -> IterationReport
    where
        R: Rng + ?Sized,
    {
        let population = self.sample_population(rng);
        let seeds: Vec<u64> = (0..population.len()).map(|_| rng.random()).collect();

        let mut members = evaluate_population(&self.config, population, &seeds);
        members.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let elite_count = elite_count(members.len(), self.config.elite_fraction);
        self.refit(&members[..elite_count]);

        IterationReport {
            members,
            elite_count,
        }
    }

    fn sample_population<R>(&self, rng: &mut R) -> Vec<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        (0..self.config.population_size)
            .map(|_| {
                iter::zip(&self.mu, &self.sigma)
                    .map(|(&mu, &sigma)| Normal::new(mu, sigma).unwrap().sample(rng))
                    .collect()
            })
            .collect()
    }

    /// Moves the distribution onto the elites: per-dimension mean, and
    /// population standard deviation plus the collapse floor.
    fn refit(&mut self, elites: &[PopulationMember]) {
        #[expect(clippy::cast_precision_loss)]
        let n = elites.len() as f64;
        for j in 0..self.mu.len() {
            let mean = elites.iter().map(|m| m.weights[j]).sum::<f64>() / n;
            let variance = elites
                .iter()
                .map(|m| (m.weights[j] - mean).powi(2))
                .sum::<f64>()
                / n;
            self.mu[j] = mean;
            self.sigma[j] = variance.sqrt() + self.config.sigma_epsilon;
        }
    }
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn elite_count(population: usize, elite_fraction: f64) -> usize {
    ((population as f64 * elite_fraction).ceil() as usize).clamp(1, population)
}

fn worker_count() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get) * WORKERS_PER_CPU
}

/// Fork-join fitness evaluation: the population is split into chunks over
/// the worker pool, every member owns its game state and RNG, and the
/// scope join is the only barrier.
fn evaluate_population(
    config: &CemConfig,
    population: Vec<Vec<f64>>,
    seeds: &[u64],
) -> Vec<PopulationMember> {
    let mut members: Vec<PopulationMember> = population
        .into_iter()
        .map(|weights| PopulationMember {
            weights,
            fitness: f64::NEG_INFINITY,
        })
        .collect();

    let chunk_size = members.len().div_ceil(worker_count()).max(1);
    thread::scope(|s| {
        for (chunk, seed_chunk) in members.chunks_mut(chunk_size).zip(seeds.chunks(chunk_size)) {
            s.spawn(move || {
                for (member, &seed) in chunk.iter_mut().zip(seed_chunk) {
                    member.fitness = evaluate_member(config, &member.weights, seed);
                }
            });
        }
    });
    members
}

#[expect(clippy::cast_precision_loss)]
fn evaluate_member(config: &CemConfig, weights: &[f64], seed: u64) -> f64 {
    let Ok(model) = LinearModel::new(Box::new(DellacherieExtractor), weights.to_vec()) else {
        return f64::NEG_INFINITY;
    };
    let engine = DecisionEngine::new(&model, config.policy);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let total: i64 = (0..config.games_per_member)
        .map(|_| play_game(&engine, &config.game, &mut rng, config.turn_limit))
        .sum();
    total as f64 / config.games_per_member as f64
}
