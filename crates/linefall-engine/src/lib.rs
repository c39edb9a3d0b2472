//! Board simulation engine for falling-block puzzle games.
//!
//! This crate owns the pieces of the system that must get the simulation
//! semantics exactly right:
//!
//! - [`PieceKind`] / [`Rotation`] - the immutable piece catalog
//! - [`Board`] - placement legality, hard-drop resolution, line clearing,
//!   and death detection
//! - [`GameState`] - one playthrough: board, score, upcoming pieces
//!
//! Everything here is synchronous and single-threaded; higher layers clone
//! boards or games freely when they need to simulate without committing.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
