//! Placement search over one or two pieces of lookahead.
//!
//! The engine enumerates every legal placement for the current piece,
//! scores each by simulating it on a board copy, and optionally pairs it
//! with the best response to the next piece. Pruned two-ply ranks first
//! placements greedily and only expands the strongest few, trading a little
//! quality for most of the two-ply cost.

use linefall_engine::{Board, PieceKind, Placement};

use crate::{model::LinearModel, outcome::PlacementOutcome};

/// How much lookahead the engine spends per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Greedy: the best single placement against the live board.
    SinglePly,
    /// Every first placement paired with the best response to the next
    /// piece on the simulated board.
    TwoPly,
    /// Two-ply restricted to the top `keep_percent` of first placements by
    /// single-ply rank (at least one is always kept).
    PrunedTwoPly { keep_percent: usize },
}

impl SearchPolicy {
    pub const DEFAULT_KEEP_PERCENT: usize = 10;
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self::PrunedTwoPly {
            keep_percent: Self::DEFAULT_KEEP_PERCENT,
        }
    }
}

/// A chosen placement and the score that selected it.
///
/// The score is single-ply or combined depending on the policy; callers
/// should only compare scores produced by the same policy.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub placement: Placement,
    pub score: f64,
}

/// Selects placements for a game using a linear model and a search policy.
#[derive(Debug)]
pub struct DecisionEngine<'a> {
    model: &'a LinearModel,
    policy: SearchPolicy,
}

impl<'a> DecisionEngine<'a> {
    #[must_use]
    pub fn new(model: &'a LinearModel, policy: SearchPolicy) -> Self {
        Self { model, policy }
    }

    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    /// Every placement of the piece with a legal hard drop, rotation index
    /// ascending, then horizontal offset ascending.
    #[must_use]
    pub fn enumerate(board: &Board, kind: PieceKind) -> Vec<Placement> {
        let mut candidates = Vec::new();
        for (rotation_index, rotation) in kind.rotations().iter().enumerate() {
            if rotation.size().width > board.width() {
                continue;
            }
            #[expect(clippy::cast_possible_wrap)]
            let max_x = (board.width() - rotation.size().width) as i32;
            for x_offset in 0..=max_x {
                if let Some(y_offset) = board.resolve_drop(*rotation, x_offset) {
                    candidates.push(Placement::new(kind, rotation_index, x_offset, y_offset));
                }
            }
        }
        candidates
    }

    /// Picks a placement for the current piece, or `None` when no legal,
    /// non-losing move exists (game over).
    ///
    /// Lookahead policies fall back to the greedy search when the next
    /// piece is unknown.
    #[must_use]
    pub fn select(
        &self,
        board: &Board,
        current: PieceKind,
        next: Option<PieceKind>,
    ) -> Option<Decision> {
        match (self.policy, next) {
            (SearchPolicy::SinglePly, _) | (_, None) => self.best_single(board, current),
            (SearchPolicy::TwoPly, Some(next)) => {
                let candidates = Self::enumerate(board, current);
                self.best_combined(board, &candidates, next)
            }
            (SearchPolicy::PrunedTwoPly { keep_percent }, Some(next)) => {
                let kept = self.prune(board, Self::enumerate(board, current), keep_percent);
                self.best_combined(board, &kept, next)
            }
        }
    }

    /// Greedy search. Ties go to the first candidate in enumeration order;
    /// candidates that lose outright never win.
    fn best_single(&self, board: &Board, kind: PieceKind) -> Option<Decision> {
        let mut best_score = f64::NEG_INFINITY;
        let mut best = None;
        for placement in Self::enumerate(board, kind) {
            let outcome = PlacementOutcome::simulate(board, &placement);
            let score = self.model.score(&outcome);
            if score > best_score {
                best_score = score;
                best = Some(Decision { placement, score });
            }
        }
        best
    }

    /// Two-ply search over the given first-piece candidates.
    ///
    /// When every surviving first placement leads to a lost game one move
    /// later, the best-scoring first move is still worth making; the first
    /// surviving candidate is kept as that fallback.
    fn best_combined(
        &self,
        board: &Board,
        candidates: &[Placement],
        next: PieceKind,
    ) -> Option<Decision> {
        let mut best_score = f64::NEG_INFINITY;
        let mut best = None;
        let mut fallback = None;
        for placement in candidates {
            let outcome = PlacementOutcome::simulate(board, placement);
            let first = self.model.score(&outcome);
            if !first.is_finite() {
                continue;
            }
            if fallback.is_none() {
                fallback = Some(Decision {
                    placement: *placement,
                    score: first,
                });
            }
            let combined = match self.best_single(outcome.board(), next) {
                Some(second) => first + second.score,
                None => f64::NEG_INFINITY,
            };
            if combined > best_score {
                best_score = combined;
                best = Some(Decision {
                    placement: *placement,
                    score: combined,
                });
            }
        }
        best.or(fallback)
    }

    /// Keeps the strongest `keep_percent` of the candidates by single-ply
    /// score, then restores enumeration order among the survivors so
    /// tie-breaking matches the unpruned search.
    fn prune(
        &self,
        board: &Board,
        candidates: Vec<Placement>,
        keep_percent: usize,
    ) -> Vec<Placement> {
        if candidates.is_empty() {
            return candidates;
        }
        let mut scored: Vec<(usize, Placement, f64)> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, placement)| {
                let outcome = PlacementOutcome::simulate(board, &placement);
                (index, placement, self.model.score(&outcome))
            })
            .collect();
        // Stable sort: equal scores keep enumeration order.
        scored.sort_by(|a, b| b.2.total_cmp(&a.2));
        let keep = (scored.len() * keep_percent)
            .div_ceil(100)
            .clamp(1, scored.len());
        scored.truncate(keep);
        scored.sort_by_key(|&(index, _, _)| index);
        scored
            .into_iter()
            .map(|(_, placement, _)| placement)
            .collect()
    }
}
