//! Weight training for the placement evaluator.
//!
//! The only method implemented is the noisy Cross-Entropy Method, which
//! needs nothing from the evaluator beyond the ability to play seeded
//! games with a candidate weight vector.

pub mod cem;

pub use cem::{
    CemConfig, CemTrainer, INITIAL_MU, INITIAL_SIGMA, IterationReport, PopulationMember,
    SIGMA_EPSILON, TrainerSetupError,
};
