use linefall_engine::{Board, Placement};

/// The result of committing a placement on a private copy of a board.
///
/// Simulation performs the full turn resolution: write the piece's cells,
/// record which lines that completes, clear them, and note whether anything
/// is left above the logical height. The caller's board is never touched.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    placement: Placement,
    board: Board,
    cleared_lines: usize,
    eroded_piece_cells: usize,
    over_ceiling: bool,
}

impl PlacementOutcome {
    #[must_use]
    pub fn simulate(board: &Board, placement: &Placement) -> Self {
        let mut board = board.clone();
        board.place(placement);

        let full = board.full_lines();
        let piece_cells_on_full = placement
            .cells()
            .filter(|&(_, y)| usize::try_from(y).is_ok_and(|y| full.contains(&y)))
            .count();
        let eroded_piece_cells = full.len() * piece_cells_on_full;

        let cleared_lines = board.clear_lines(&full);
        let over_ceiling = board.is_over_ceiling();

        Self {
            placement: *placement,
            board,
            cleared_lines,
            eroded_piece_cells,
            over_ceiling,
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Board state after the clear.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Lines completed multiplied by the piece's own cells on those lines.
    #[must_use]
    pub fn eroded_piece_cells(&self) -> usize {
        self.eroded_piece_cells
    }

    /// True when cells remain above the logical height after the clear,
    /// i.e. the placement loses the game.
    #[must_use]
    pub fn over_ceiling(&self) -> bool {
        self.over_ceiling
    }
}
