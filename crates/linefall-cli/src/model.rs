use std::path::Path;

use chrono::{DateTime, Utc};
use linefall_evaluator::{CORE_FEATURE_NAMES, DEFAULT_WEIGHTS, DellacherieExtractor, LinearModel};
use serde::{Deserialize, Serialize};

use crate::util;

/// On-disk form of a trained evaluator.
///
/// Feature names are stored alongside the weights so a saved file stays
/// readable on its own; loading checks them against the current extractor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f64,
    /// Feature names in extractor order, without the bias.
    pub features: Vec<String>,
    /// One weight per feature, then the bias term.
    pub weights: Vec<f64>,
}

impl TrainedModel {
    pub fn new(name: impl Into<String>, final_fitness: f64, weights: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            trained_at: Utc::now(),
            final_fitness,
            features: CORE_FEATURE_NAMES.iter().map(|&n| n.to_owned()).collect(),
            weights,
        }
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        util::read_json_file("model", path)
    }

    /// Builds the scoring model, verifying the file matches the extractor.
    pub fn into_linear_model(self) -> anyhow::Result<LinearModel> {
        let expected: Vec<_> = CORE_FEATURE_NAMES.iter().map(|&n| n.to_owned()).collect();
        if self.features != expected {
            anyhow::bail!(
                "model {:?} was trained on features {:?}, expected {:?}",
                self.name,
                self.features,
                expected,
            );
        }
        let model = LinearModel::new(Box::new(DellacherieExtractor), self.weights)?;
        Ok(model)
    }
}

/// The scoring model from a file, or the built-in weights when no path is
/// given.
pub fn load_linear_model(path: Option<&Path>) -> anyhow::Result<LinearModel> {
    match path {
        Some(path) => TrainedModel::read(path)?.into_linear_model(),
        None => {
            let model =
                LinearModel::new(Box::new(DellacherieExtractor), DEFAULT_WEIGHTS.to_vec())?;
            Ok(model)
        }
    }
}

#[cfg(test)]
mod tests {
    use linefall_engine::{Board, PieceKind, Size};
    use linefall_evaluator::{CORE_FEATURE_COUNT, DecisionEngine, SearchPolicy};

    use super::*;

    #[test]
    fn test_json_round_trip_reproduces_decisions() {
        let model = TrainedModel::new("dellacherie", 1234.5, DEFAULT_WEIGHTS.to_vec());
        let json = serde_json::to_string_pretty(&model).unwrap();
        let restored: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.weights, model.weights);
        assert_eq!(restored.features.len(), CORE_FEATURE_COUNT);

        let original = model.into_linear_model().unwrap();
        let reloaded = restored.into_linear_model().unwrap();
        let board = Board::from_ascii(
            Size::new(10, 14),
            "
            ###....###
            ##.....###
            ",
        );
        for current in PieceKind::ALL {
            for next in PieceKind::ALL {
                let a = DecisionEngine::new(&original, SearchPolicy::default())
                    .select(&board, current, Some(next))
                    .map(|d| d.placement);
                let b = DecisionEngine::new(&reloaded, SearchPolicy::default())
                    .select(&board, current, Some(next))
                    .map(|d| d.placement);
                assert_eq!(a, b, "{current:?}/{next:?}");
            }
        }
    }

    #[test]
    fn test_mismatched_features_are_rejected() {
        let mut model = TrainedModel::new("dellacherie", 0.0, DEFAULT_WEIGHTS.to_vec());
        model.features[0] = "unknown_feature".to_owned();
        assert!(model.into_linear_model().is_err());
    }

    #[test]
    fn test_wrong_weight_count_is_rejected() {
        let model = TrainedModel::new("dellacherie", 0.0, vec![0.0; 3]);
        assert!(model.into_linear_model().is_err());
    }
}
