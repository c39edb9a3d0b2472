//! Placement evaluation and search for the linefall engine.
//!
//! Three layers, bottom up:
//!
//! 1. [`outcome`] - commit a placement on a private board copy and record
//!    what happened (lines cleared, eroded cells, loss).
//! 2. [`features`] / [`model`] - turn an outcome into a fixed-order feature
//!    vector and score it with a linear model (weights + bias).
//! 3. [`decision`] - enumerate legal placements and pick the best under a
//!    single-ply, two-ply, or pruned two-ply search policy.
//!
//! [`session`] ties the layers to a [`GameState`](linefall_engine::GameState)
//! and plays whole games, which is what training measures.

pub use self::{decision::*, features::*, model::*, outcome::*, session::*};

pub mod decision;
pub mod features;
pub mod model;
pub mod outcome;
pub mod session;
