use super::piece::{PieceKind, Rotation};

/// A fully resolved action: a rotation of a piece at a horizontal offset,
/// with the vertical offset produced by the hard-drop resolution.
///
/// Placements are only constructed once a legal drop exists, so the offsets
/// always describe cells inside the board grid. Candidates for which no
/// legal drop exists are represented by [`resolve_drop`] returning `None`
/// and never become `Placement`s.
///
/// [`resolve_drop`]: super::board::Board::resolve_drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    kind: PieceKind,
    rotation_index: usize,
    x_offset: i32,
    y_offset: i32,
}

impl Placement {
    #[must_use]
    pub fn new(kind: PieceKind, rotation_index: usize, x_offset: i32, y_offset: i32) -> Self {
        Self {
            kind,
            rotation_index,
            x_offset,
            y_offset,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Index into [`PieceKind::rotations`], the identifier reported to the
    /// judge harness.
    #[must_use]
    pub fn rotation_index(&self) -> usize {
        self.rotation_index
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.kind.rotations()[self.rotation_index]
    }

    #[must_use]
    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    #[must_use]
    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    /// Absolute board coordinates of the piece's cells at the resolved offset.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rotation()
            .cells()
            .iter()
            .map(move |&(dx, dy)| (self.x_offset + dx, self.y_offset + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_apply_offsets() {
        let placement = Placement::new(PieceKind::O, 0, 4, 2);
        let mut cells: Vec<_> = placement.cells().collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![(4, 2), (4, 3), (5, 2), (5, 3)]);
    }

    #[test]
    fn test_rotation_lookup() {
        let placement = Placement::new(PieceKind::I, 1, 0, 0);
        assert_eq!(placement.rotation().size().width, 4);
        assert_eq!(placement.rotation().size().height, 1);
    }
}
