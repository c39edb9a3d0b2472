use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};

/// Width and height of a playable area or of a rotation's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// One orientation of a piece.
///
/// Cell offsets are relative to the bottom-left corner of the bounding box,
/// with `y` growing upward. All rotations are process-wide constants shared
/// by every piece of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    label: u16,
    size: Size,
    cells: &'static [(i32, i32)],
}

impl Rotation {
    const fn new(label: u16, width: usize, height: usize, cells: &'static [(i32, i32)]) -> Self {
        Self {
            label,
            size: Size::new(width, height),
            cells,
        }
    }

    /// Degree label of this orientation (0, 90, 180, 270).
    #[must_use]
    pub fn label(self) -> u16 {
        self.label
    }

    #[must_use]
    pub fn size(self) -> Size {
        self.size
    }

    /// Occupied cell offsets relative to the bounding box origin.
    #[must_use]
    pub fn cells(self) -> &'static [(i32, i32)] {
        self.cells
    }
}

const I_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 1, 4, &[(0, 0), (0, 1), (0, 2), (0, 3)]),
    Rotation::new(90, 4, 1, &[(0, 0), (1, 0), (2, 0), (3, 0)]),
];

const T_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 3, 2, &[(0, 0), (1, 0), (2, 0), (1, 1)]),
    Rotation::new(90, 2, 3, &[(0, 0), (0, 1), (1, 1), (0, 2)]),
    Rotation::new(180, 3, 2, &[(0, 1), (1, 1), (2, 1), (1, 0)]),
    Rotation::new(270, 2, 3, &[(0, 1), (1, 0), (1, 1), (1, 2)]),
];

const O_ROTATIONS: &[Rotation] = &[Rotation::new(0, 2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)])];

const J_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 3, 2, &[(0, 0), (1, 0), (2, 0), (0, 1)]),
    Rotation::new(90, 2, 3, &[(0, 0), (0, 1), (0, 2), (1, 2)]),
    Rotation::new(180, 3, 2, &[(0, 1), (1, 1), (2, 1), (2, 0)]),
    Rotation::new(270, 2, 3, &[(0, 0), (1, 0), (1, 1), (1, 2)]),
];

const L_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 3, 2, &[(0, 0), (1, 0), (2, 0), (2, 1)]),
    Rotation::new(90, 2, 3, &[(0, 0), (0, 1), (0, 2), (1, 0)]),
    Rotation::new(180, 3, 2, &[(0, 1), (1, 1), (2, 1), (0, 0)]),
    Rotation::new(270, 2, 3, &[(0, 2), (1, 0), (1, 1), (1, 2)]),
];

const S_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 3, 2, &[(0, 0), (1, 0), (1, 1), (2, 1)]),
    Rotation::new(90, 2, 3, &[(0, 1), (0, 2), (1, 0), (1, 1)]),
];

const Z_ROTATIONS: &[Rotation] = &[
    Rotation::new(0, 3, 2, &[(0, 1), (1, 1), (1, 0), (2, 0)]),
    Rotation::new(90, 2, 3, &[(0, 0), (0, 1), (1, 1), (1, 2)]),
];

/// Unknown character encountered while decoding a piece code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown piece code: {code:?}")]
pub struct UnknownPieceCodeError {
    pub code: char,
}

/// The seven tetromino types.
///
/// The rotation lists carry each orientation's bounding box and occupied
/// cells; their order defines the rotation index reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    T,
    O,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::T,
        Self::O,
        Self::J,
        Self::L,
        Self::S,
        Self::Z,
    ];

    /// All orientations of this piece, in rotation-index order.
    #[must_use]
    pub fn rotations(self) -> &'static [Rotation] {
        match self {
            Self::I => I_ROTATIONS,
            Self::T => T_ROTATIONS,
            Self::O => O_ROTATIONS,
            Self::J => J_ROTATIONS,
            Self::L => L_ROTATIONS,
            Self::S => S_ROTATIONS,
            Self::Z => Z_ROTATIONS,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::T => 'T',
            Self::O => 'O',
            Self::J => 'J',
            Self::L => 'L',
            Self::S => 'S',
            Self::Z => 'Z',
        }
    }

    pub fn from_char(code: char) -> Result<Self, UnknownPieceCodeError> {
        match code {
            'I' => Ok(Self::I),
            'T' => Ok(Self::T),
            'O' => Ok(Self::O),
            'J' => Ok(Self::J),
            'L' => Ok(Self::L),
            'S' => Ok(Self::S),
            'Z' => Ok(Self::Z),
            code => Err(UnknownPieceCodeError { code }),
        }
    }
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R>(&self, rng: &mut R) -> PieceKind
    where
        R: Rng + ?Sized,
    {
        PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_tables_are_well_formed() {
        for kind in PieceKind::ALL {
            let rotations = kind.rotations();
            assert!(!rotations.is_empty(), "{kind:?} has no rotations");
            for rotation in rotations {
                assert_eq!(rotation.cells().len(), 4, "{kind:?} is a tetromino");
                for &(dx, dy) in rotation.cells() {
                    assert!(dx >= 0 && (dx as usize) < rotation.size().width);
                    assert!(dy >= 0 && (dy as usize) < rotation.size().height);
                }
            }
        }
    }

    #[test]
    fn test_rotation_counts() {
        assert_eq!(PieceKind::I.rotations().len(), 2);
        assert_eq!(PieceKind::T.rotations().len(), 4);
        assert_eq!(PieceKind::O.rotations().len(), 1);
        assert_eq!(PieceKind::J.rotations().len(), 4);
        assert_eq!(PieceKind::L.rotations().len(), 4);
        assert_eq!(PieceKind::S.rotations().len(), 2);
        assert_eq!(PieceKind::Z.rotations().len(), 2);
    }

    #[test]
    fn test_char_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Ok(kind));
        }
        assert_eq!(
            PieceKind::from_char('X'),
            Err(UnknownPieceCodeError { code: 'X' })
        );
    }

    #[test]
    fn test_rotation_labels_follow_index_order() {
        for kind in PieceKind::ALL {
            for (index, rotation) in kind.rotations().iter().enumerate() {
                assert_eq!(rotation.label() as usize, index * 90);
            }
        }
    }

    #[test]
    fn test_uniform_sampling_covers_all_kinds() {
        use rand::SeedableRng as _;

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(rng.random::<PieceKind>());
        }
        assert_eq!(seen.len(), PieceKind::ALL.len());
    }
}
