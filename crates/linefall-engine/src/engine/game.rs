use std::collections::VecDeque;

use crate::core::{Board, PieceKind, Placement, Size};

/// Score awarded per clear: index 0 is a single line, index 3 is four or
/// more.
pub const DEFAULT_LINE_AWARDS: [i64; 4] = [100, 300, 500, 800];

/// Static parameters of one playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub size: Size,
    pub line_awards: [i64; 4],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: Size::new(10, 16),
            line_awards: DEFAULT_LINE_AWARDS,
        }
    }
}

/// One playthrough: board, cumulative score, and the queue of upcoming
/// pieces.
///
/// The state is mutated turn by turn with the placement chosen for the
/// front piece of the queue, and becomes terminal either when a placement
/// leaves cells above the logical height after clearing or when the caller
/// reports that no legal move exists.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    score: i64,
    over: bool,
    queue: VecDeque<PieceKind>,
}

impl GameState {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let board = Board::new(config.size);
        Self {
            config,
            board,
            score: 0,
            over: false,
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Marks the game terminal; used when no legal move remains.
    pub fn set_over(&mut self) {
        self.over = true;
    }

    pub fn enqueue_piece(&mut self, kind: PieceKind) {
        self.queue.push_back(kind);
    }

    /// The piece the next placement must be chosen for.
    #[must_use]
    pub fn current_piece(&self) -> Option<PieceKind> {
        self.queue.front().copied()
    }

    /// The piece after the current one, for lookahead.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.queue.get(1).copied()
    }

    /// Applies a resolved placement for the current piece and pops it from
    /// the queue.
    ///
    /// Clears any completed lines, awards their score, and checks the
    /// ceiling afterward, so a clear can rescue a placement that briefly
    /// occupied buffer rows. Returns the number of lines cleared.
    pub fn apply(&mut self, placement: &Placement) -> usize {
        self.board.place(placement);
        let full = self.board.full_lines();
        let cleared = self.board.clear_lines(&full);
        if cleared > 0 {
            self.score += self.config.line_awards[(cleared - 1).min(3)];
        }
        if self.board.is_over_ceiling() {
            self.over = true;
        }
        self.queue.pop_front();
        cleared
    }
}
