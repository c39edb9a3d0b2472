use super::{
    piece::{PieceKind, Rotation, Size},
    placement::Placement,
};

/// Rows kept above the logical height so a piece landing at the ceiling can
/// be represented before the game is declared over.
pub const BUFFER_ROWS: usize = 5;

/// A single board cell: empty, or filled by a piece of a known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// The playing field.
///
/// The grid spans `height + BUFFER_ROWS` rows of `width` cells each, with
/// `y = 0` at the bottom. The logical height bounds where pieces may come to
/// rest; the buffer rows only ever hold cells transiently, between a
/// placement and the line clear that may rescue it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: Size,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let rows = vec![vec![Cell::Empty; size.width]; size.height + BUFFER_ROWS];
        Self { size, rows }
    }

    /// Builds a board from ascii art, for tests.
    ///
    /// Lines are given top row first and anchored at the bottom of the
    /// board. `.` is an empty cell, a piece letter fills the cell with that
    /// kind, and `#` fills it with an unspecified kind.
    ///
    /// # Panics
    ///
    /// Panics if the art does not fit the given size or contains an unknown
    /// character.
    #[must_use]
    pub fn from_ascii(size: Size, art: &str) -> Self {
        let mut board = Self::new(size);
        let lines: Vec<&str> = art.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert!(
            lines.len() <= size.height + BUFFER_ROWS,
            "art has more rows than the board grid"
        );
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.len(), size.width, "art row {i} has the wrong width");
            let y = lines.len() - 1 - i;
            for (x, c) in line.chars().enumerate() {
                board.rows[y][x] = match c {
                    '.' => Cell::Empty,
                    '#' => Cell::Piece(PieceKind::I),
                    c => match PieceKind::from_char(c) {
                        Ok(kind) => Cell::Piece(kind),
                        Err(e) => panic!("bad art cell at ({x}, {y}): {e}"),
                    },
                };
            }
        }
        board
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Logical height, excluding the buffer rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[must_use]
    pub fn grid_height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Occupancy test tolerating coordinates outside the grid (treated as
    /// empty).
    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|cell| cell.is_occupied())
    }

    /// True if any cell of the rotation at the given offsets falls outside
    /// `[0, width)` horizontally, or below the floor / at-or-above the
    /// logical height vertically.
    #[must_use]
    pub fn is_out_of_bounds(&self, rotation: Rotation, x_offset: i32, y_offset: i32) -> bool {
        rotation.cells().iter().any(|&(dx, dy)| {
            let (x, y) = (x_offset + dx, y_offset + dy);
            x < 0 || x >= self.size.width as i32 || y < 0 || y >= self.size.height as i32
        })
    }

    /// True if any cell of the rotation, with `y_offset` substituted as the
    /// vertical offset, lands on an occupied board cell or leaves the grid
    /// horizontally or vertically.
    ///
    /// Only the exact target cell is tested, never cells below it; a piece
    /// may therefore come to rest underneath an overhang.
    #[must_use]
    pub fn collides_at(&self, rotation: Rotation, x_offset: i32, y_offset: i32) -> bool {
        rotation.cells().iter().any(|&(dx, dy)| {
            let (x, y) = (x_offset + dx, y_offset + dy);
            x < 0
                || x >= self.size.width as i32
                || y < 0
                || y >= self.grid_height() as i32
                || self.is_occupied(x, y)
        })
    }

    /// True if any cell of the rotation at `y_offset` would sit at or above
    /// the logical height, even though it may still fit inside the buffer.
    #[must_use]
    pub fn overflows_at(&self, rotation: Rotation, _x_offset: i32, y_offset: i32) -> bool {
        rotation
            .cells()
            .iter()
            .any(|&(_, dy)| y_offset + dy >= self.size.height as i32)
    }

    /// Hard-drop resolution: the lowest `y` at which the rotation neither
    /// collides nor overflows, or `None` when no such offset exists.
    #[must_use]
    pub fn resolve_drop(&self, rotation: Rotation, x_offset: i32) -> Option<i32> {
        (0..=self.size.height as i32).find(|&y| {
            !self.collides_at(rotation, x_offset, y) && !self.overflows_at(rotation, x_offset, y)
        })
    }

    /// Writes the placement's cells into the grid.
    ///
    /// Cells outside the grid are ignored; resolved placements never produce
    /// them.
    pub fn place(&mut self, placement: &Placement) {
        for (x, y) in placement.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Cell::Piece(placement.kind());
            }
        }
    }

    #[must_use]
    pub fn is_line_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| cell.is_occupied())
    }

    /// Row indices within the logical height that are completely filled,
    /// ascending.
    #[must_use]
    pub fn full_lines(&self) -> Vec<usize> {
        (0..self.size.height)
            .filter(|&y| self.is_line_full(y))
            .collect()
    }

    /// Removes the given rows and compacts everything above them downward.
    ///
    /// Compaction spans the entire grid, buffer rows included, since a piece
    /// may occupy buffer rows until the clear rescues it. Vacated top rows
    /// are left empty. Returns the number of rows removed.
    pub fn clear_lines(&mut self, lines: &[usize]) -> usize {
        if lines.is_empty() {
            return 0;
        }
        let mut write = 0;
        for read in 0..self.rows.len() {
            if lines.contains(&read) {
                continue;
            }
            if write != read {
                self.rows[write] = self.rows[read].clone();
            }
            write += 1;
        }
        for row in &mut self.rows[write..] {
            row.fill(Cell::Empty);
        }
        lines.len()
    }

    /// True if any buffer cell (at or above the logical height) is occupied.
    ///
    /// Meaningful only after [`clear_lines`](Self::clear_lines), since a
    /// clear may rescue an apparently dead position.
    #[must_use]
    pub fn is_over_ceiling(&self) -> bool {
        self.rows[self.size.height..]
            .iter()
            .any(|row| row.iter().any(|cell| cell.is_occupied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(kind: PieceKind, index: usize) -> Rotation {
        kind.rotations()[index]
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(Size::new(10, 14));
        assert_eq!(board.grid_height(), 14 + BUFFER_ROWS);
        for y in 0..board.grid_height() {
            for x in 0..board.width() {
                assert!(board.cell(x, y).is_empty());
            }
        }
    }

    #[test]
    fn test_from_ascii_anchors_at_bottom() {
        let board = Board::from_ascii(
            Size::new(4, 5),
            "
            #...
            ##.T
            ",
        );
        assert!(board.is_occupied(0, 0));
        assert!(board.is_occupied(1, 0));
        assert_eq!(board.cell(3, 0), Cell::Piece(PieceKind::T));
        assert!(board.is_occupied(0, 1));
        assert!(!board.is_occupied(1, 1));
        assert!(!board.is_occupied(2, 0));
    }

    #[test]
    fn test_resolve_drop_on_empty_board() {
        let board = Board::new(Size::new(10, 14));
        let rot = rotation(PieceKind::O, 0);
        assert_eq!(board.resolve_drop(rot, 4), Some(0));
    }

    #[test]
    fn test_resolve_drop_stacks_on_blocks() {
        let board = Board::from_ascii(
            Size::new(4, 6),
            "
            ####
            ####
            ",
        );
        let rot = rotation(PieceKind::O, 0);
        assert_eq!(board.resolve_drop(rot, 0), Some(2));
    }

    #[test]
    fn test_resolve_drop_allows_tuck_under_overhang() {
        // The target cells are free even though cells above are filled; the
        // single-cell collision test lets the piece rest underneath.
        let board = Board::from_ascii(
            Size::new(4, 6),
            "
            ##..
            ....
            ",
        );
        let rot = rotation(PieceKind::I, 1);
        assert_eq!(board.resolve_drop(rot, 0), Some(0));
    }

    #[test]
    fn test_resolve_drop_cannot_place() {
        let size = Size::new(4, 6);
        let art = "
            #...
            #...
            #...
            #...
            #...
            #...
        ";
        let board = Board::from_ascii(size, art);
        let rot = rotation(PieceKind::I, 0);
        // Column 0 is filled to the ceiling: every offset collides or
        // overflows.
        assert_eq!(board.resolve_drop(rot, 0), None);
        // Neighboring column is still open.
        assert_eq!(board.resolve_drop(rot, 1), Some(0));
    }

    #[test]
    fn test_resolve_drop_out_of_horizontal_bounds() {
        let board = Board::new(Size::new(10, 14));
        let rot = rotation(PieceKind::I, 1);
        assert_eq!(board.resolve_drop(rot, 7), None);
        assert_eq!(board.resolve_drop(rot, -1), None);
        assert_eq!(board.resolve_drop(rot, 6), Some(0));
    }

    #[test]
    fn test_overflow_blocks_rest_above_logical_height() {
        let size = Size::new(4, 4);
        let board = Board::from_ascii(
            size,
            "
            #...
            #...
            #...
            ",
        );
        let rot = rotation(PieceKind::I, 0);
        // Dropping the vertical I onto a 3-high stack would poke one cell
        // above the logical height.
        assert_eq!(board.resolve_drop(rot, 0), None);
    }

    #[test]
    fn test_full_lines_and_clear() {
        let mut board = Board::from_ascii(
            Size::new(4, 6),
            "
            #.##
            ####
            #.##
            ####
            ",
        );
        assert_eq!(board.full_lines(), vec![0, 2]);

        let cleared = board.clear_lines(&board.full_lines());
        assert_eq!(cleared, 2);
        // The two partial rows compact to the bottom.
        assert!(board.is_occupied(0, 0) && !board.is_occupied(1, 0));
        assert!(board.is_occupied(0, 1) && !board.is_occupied(1, 1));
        assert!(!board.is_occupied(0, 2));
    }

    #[test]
    fn test_clear_lines_is_idempotent() {
        let mut board = Board::from_ascii(
            Size::new(4, 6),
            "
            ##.#
            ####
            ",
        );
        assert_eq!(board.clear_lines(&board.full_lines()), 1);
        assert_eq!(board.clear_lines(&board.full_lines()), 0);
    }

    #[test]
    fn test_clear_lines_compacts_buffer_rows() {
        let size = Size::new(4, 2);
        let mut board = Board::new(size);
        // Fill the two logical rows and one buffer row.
        for y in 0..2 {
            for x in 0..4 {
                board.rows[y][x] = Cell::Piece(PieceKind::O);
            }
        }
        board.rows[2][0] = Cell::Piece(PieceKind::O);
        assert!(board.is_over_ceiling());

        assert_eq!(board.clear_lines(&board.full_lines()), 2);
        // The buffer cell fell to the bottom and the buffer is empty again.
        assert!(board.is_occupied(0, 0));
        assert!(!board.is_over_ceiling());
    }

    #[test]
    fn test_place_writes_piece_cells() {
        let mut board = Board::new(Size::new(10, 14));
        let placement = Placement::new(PieceKind::O, 0, 4, 0);
        board.place(&placement);
        assert_eq!(board.cell(4, 0), Cell::Piece(PieceKind::O));
        assert_eq!(board.cell(5, 1), Cell::Piece(PieceKind::O));
        assert!(board.cell(6, 0).is_empty());
    }

    #[test]
    fn test_placement_at_resolved_drop_touches_no_occupied_cell() {
        let board = Board::from_ascii(
            Size::new(6, 8),
            "
            ##..##
            ##.###
            ",
        );
        for kind in PieceKind::ALL {
            for (index, rot) in kind.rotations().iter().enumerate() {
                for x in 0..=(6 - rot.size().width as i32) {
                    let Some(y) = board.resolve_drop(*rot, x) else {
                        continue;
                    };
                    let placement = Placement::new(kind, index, x, y);
                    for (cx, cy) in placement.cells() {
                        assert!(!board.is_occupied(cx, cy), "{kind:?} at ({x}, {y})");
                        assert!(cy < board.height() as i32);
                    }
                }
            }
        }
    }

    #[test]
    fn test_is_out_of_bounds() {
        let board = Board::new(Size::new(10, 14));
        let rot = rotation(PieceKind::O, 0);
        assert!(!board.is_out_of_bounds(rot, 0, 0));
        assert!(board.is_out_of_bounds(rot, -1, 0));
        assert!(board.is_out_of_bounds(rot, 9, 0));
        assert!(board.is_out_of_bounds(rot, 0, -1));
        assert!(board.is_out_of_bounds(rot, 0, 13));
    }
}
