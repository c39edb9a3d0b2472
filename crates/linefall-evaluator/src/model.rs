use std::iter;

use crate::{features::FeatureExtractor, outcome::PlacementOutcome};

/// Weights for the core extractor that play a solid deployed game without
/// any training run: eight feature weights followed by the bias term.
pub const DEFAULT_WEIGHTS: [f64; 9] = [
    -14.2970, -1.6659, -9.9349, -15.6773, -17.8268, -14.1545, -1.3156, -32.9234, -0.6702,
];

/// Weight vector length does not match the extractor.
///
/// This is a configuration mistake; it must abort setup before any
/// simulation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight vector has length {actual}, expected {expected} (feature count + bias)")]
pub struct WeightLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// Linear scoring model: a weight per feature plus a trailing bias, applied
/// to whatever the extractor produces.
#[derive(Debug)]
pub struct LinearModel {
    extractor: Box<dyn FeatureExtractor>,
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn new(
        extractor: Box<dyn FeatureExtractor>,
        weights: Vec<f64>,
    ) -> Result<Self, WeightLengthError> {
        let expected = extractor.feature_count() + 1;
        if weights.len() != expected {
            return Err(WeightLengthError {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self { extractor, weights })
    }

    #[must_use]
    pub fn extractor(&self) -> &dyn FeatureExtractor {
        &*self.extractor
    }

    /// Feature weights followed by the bias term.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Scores a simulated placement; higher is better.
    ///
    /// A losing outcome (cells above the ceiling after the clear) scores
    /// negative infinity so it can never beat a surviving placement.
    #[must_use]
    pub fn score(&self, outcome: &PlacementOutcome) -> f64 {
        if outcome.over_ceiling() {
            return f64::NEG_INFINITY;
        }
        let Some((bias, feature_weights)) = self.weights.split_last() else {
            return f64::NEG_INFINITY;
        };
        let features = self.extractor.extract(outcome);
        iter::zip(feature_weights, &features)
            .map(|(w, f)| w * f)
            .sum::<f64>()
            + bias
    }
}

#[cfg(test)]
mod tests {
    use linefall_engine::{Board, PieceKind, Placement, Size};

    use crate::features::DellacherieExtractor;

    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = LinearModel::new(Box::new(DellacherieExtractor), vec![1.0; 4]).unwrap_err();
        assert_eq!(
            err,
            WeightLengthError {
                expected: 9,
                actual: 4,
            }
        );
    }

    #[test]
    fn test_score_is_weighted_sum_plus_bias() {
        // Weight only the landing height, bias 0.5.
        let mut weights = vec![0.0; 9];
        weights[0] = 2.0;
        weights[8] = 0.5;
        let model = LinearModel::new(Box::new(DellacherieExtractor), weights).unwrap();

        let board = Board::new(Size::new(10, 14));
        let outcome = PlacementOutcome::simulate(&board, &Placement::new(PieceKind::O, 0, 4, 0));
        assert_eq!(model.score(&outcome), 2.0 * 1.0 + 0.5);
    }

    #[test]
    fn test_losing_outcome_scores_negative_infinity() {
        let model =
            LinearModel::new(Box::new(DellacherieExtractor), DEFAULT_WEIGHTS.to_vec()).unwrap();
        let board = Board::new(Size::new(4, 2));
        let outcome = PlacementOutcome::simulate(&board, &Placement::new(PieceKind::I, 0, 0, 0));
        assert_eq!(model.score(&outcome), f64::NEG_INFINITY);
    }
}
