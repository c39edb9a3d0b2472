//! Board-quality features extracted after a simulated placement.
//!
//! All metrics are computed on the post-clear board within the logical
//! height. The core set is the classic eight-feature Dellacherie vector;
//! the extended variant appends per-column height information.

use std::fmt;

use linefall_engine::Board;

use crate::outcome::PlacementOutcome;

pub const CORE_FEATURE_COUNT: usize = 8;

pub const CORE_FEATURE_NAMES: [&str; CORE_FEATURE_COUNT] = [
    "landing_height",
    "eroded_piece_cells",
    "row_transitions",
    "column_transitions",
    "holes",
    "board_wells",
    "hole_depth",
    "rows_with_holes",
];

/// Turns a simulated placement into a fixed-order numeric vector.
///
/// Implementations must be pure: same outcome, same vector. The decision
/// engine and trainer only ever see features through this interface, so an
/// extractor can be swapped without touching either.
pub trait FeatureExtractor: fmt::Debug + Send + Sync {
    /// Number of scalars [`extract`](Self::extract) produces.
    fn feature_count(&self) -> usize;

    /// Names aligned with the output order of [`extract`](Self::extract).
    fn feature_names(&self) -> Vec<String>;

    fn extract(&self, outcome: &PlacementOutcome) -> Vec<f64>;
}

/// The production extractor: the eight Dellacherie features, in the fixed
/// order of [`CORE_FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DellacherieExtractor;

impl FeatureExtractor for DellacherieExtractor {
    fn feature_count(&self) -> usize {
        CORE_FEATURE_COUNT
    }

    fn feature_names(&self) -> Vec<String> {
        CORE_FEATURE_NAMES.iter().map(ToString::to_string).collect()
    }

    fn extract(&self, outcome: &PlacementOutcome) -> Vec<f64> {
        core_features(outcome).to_vec()
    }
}

/// Core set plus per-column heights, adjacent height differences, and the
/// maximum column height.
///
/// The width is fixed at construction so the feature count is known before
/// any board exists.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedExtractor {
    width: usize,
}

impl ExtendedExtractor {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl FeatureExtractor for ExtendedExtractor {
    fn feature_count(&self) -> usize {
        CORE_FEATURE_COUNT + self.width + (self.width - 1) + 1
    }

    fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = CORE_FEATURE_NAMES.iter().map(ToString::to_string).collect();
        names.extend((0..self.width).map(|x| format!("column_height_{x}")));
        names.extend((0..self.width - 1).map(|x| format!("height_difference_{x}")));
        names.push("maximum_height".to_owned());
        names
    }

    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, outcome: &PlacementOutcome) -> Vec<f64> {
        let board = outcome.board();
        let heights = column_heights(board);
        let mut features = core_features(outcome).to_vec();
        features.extend(heights.iter().map(|&h| h as f64));
        features.extend(
            heights
                .windows(2)
                .map(|pair| (pair[0] as f64 - pair[1] as f64).abs()),
        );
        features.push(heights.iter().copied().max().unwrap_or(0) as f64);
        features
    }
}

#[expect(clippy::cast_precision_loss)]
fn core_features(outcome: &PlacementOutcome) -> [f64; CORE_FEATURE_COUNT] {
    let board = outcome.board();
    let landing_height = outcome.placement().y_offset() + 1;
    let hole_metrics = hole_metrics(board);
    [
        f64::from(landing_height),
        outcome.eroded_piece_cells() as f64,
        row_transitions(board) as f64,
        column_transitions(board) as f64,
        hole_metrics.holes as f64,
        board_wells(board) as f64,
        hole_metrics.depth_sum as f64,
        hole_metrics.rows_with_holes as f64,
    ]
}

/// Horizontally adjacent cell pairs with differing occupancy, per logical
/// row. No wrap-around and no wall bonus.
fn row_transitions(board: &Board) -> usize {
    let mut count = 0;
    for y in 0..board.height() {
        for x in 0..board.width() - 1 {
            if board.cell(x, y).is_occupied() != board.cell(x + 1, y).is_occupied() {
                count += 1;
            }
        }
    }
    count
}

/// Vertically adjacent cell pairs with differing occupancy, per column.
fn column_transitions(board: &Board) -> usize {
    let mut count = 0;
    for x in 0..board.width() {
        for y in 0..board.height() - 1 {
            if board.cell(x, y).is_occupied() != board.cell(x, y + 1).is_occupied() {
                count += 1;
            }
        }
    }
    count
}

struct HoleMetrics {
    holes: usize,
    depth_sum: usize,
    rows_with_holes: usize,
}

/// Scans every column top-down. Each empty cell below at least one filled
/// cell is a hole; its depth is the number of filled cells above it in the
/// column.
fn hole_metrics(board: &Board) -> HoleMetrics {
    let mut holes = 0;
    let mut depth_sum = 0;
    let mut row_has_hole = vec![false; board.height()];
    for x in 0..board.width() {
        let mut filled_above = 0;
        for y in (0..board.height()).rev() {
            if board.cell(x, y).is_occupied() {
                filled_above += 1;
            } else if filled_above > 0 {
                holes += 1;
                depth_sum += filled_above;
                row_has_hole[y] = true;
            }
        }
    }
    HoleMetrics {
        holes,
        depth_sum,
        rows_with_holes: row_has_hole.iter().filter(|&&h| h).count(),
    }
}

/// Triangular well penalty: for each maximal run of empty cells whose left
/// and right neighbors are filled (or a boundary), add `d * (d + 1) / 2`.
/// Runs ending at the floor count too.
fn board_wells(board: &Board) -> usize {
    let mut total = 0;
    for x in 0..board.width() {
        let mut run = 0;
        for y in (0..board.height()).rev() {
            let left_filled = x == 0 || board.cell(x - 1, y).is_occupied();
            let right_filled = x == board.width() - 1 || board.cell(x + 1, y).is_occupied();
            if board.cell(x, y).is_empty() && left_filled && right_filled {
                run += 1;
            } else {
                total += run * (run + 1) / 2;
                run = 0;
            }
        }
        total += run * (run + 1) / 2;
    }
    total
}

/// Highest occupied cell per column, one-indexed; 0 for an empty column.
fn column_heights(board: &Board) -> Vec<usize> {
    (0..board.width())
        .map(|x| {
            (0..board.height())
                .rev()
                .find(|&y| board.cell(x, y).is_occupied())
                .map_or(0, |y| y + 1)
        })
        .collect()
}
