use linefall_engine::{GameConfig, GameState};
use rand::Rng;

use crate::decision::DecisionEngine;

/// Plays one game to its natural end, drawing pieces uniformly from the
/// given generator, and returns the final score.
///
/// The game ends when the engine reports no legal move, when a placement
/// leaves cells above the ceiling, or after `turn_limit` turns. The limit
/// keeps fitness evaluation bounded once weights get good enough to play
/// indefinitely.
pub fn play_game<R>(
    engine: &DecisionEngine<'_>,
    config: &GameConfig,
    rng: &mut R,
    turn_limit: usize,
) -> i64
where
    R: Rng + ?Sized,
{
    let mut game = GameState::new(config.clone());
    game.enqueue_piece(rng.random());
    game.enqueue_piece(rng.random());

    for _ in 0..turn_limit {
        if game.is_over() {
            break;
        }
        let Some(current) = game.current_piece() else {
            break;
        };
        let Some(decision) = engine.select(game.board(), current, game.next_piece()) else {
            game.set_over();
            break;
        };
        game.apply(&decision.placement);
        game.enqueue_piece(rng.random());
    }
    game.score()
}

#[cfg(test)]
mod tests {
    use linefall_engine::Size;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use crate::{
        decision::SearchPolicy,
        features::DellacherieExtractor,
        model::{DEFAULT_WEIGHTS, LinearModel},
    };

    use super::*;

    #[test]
    fn test_play_game_terminates_with_nonnegative_score() {
        let model =
            LinearModel::new(Box::new(DellacherieExtractor), DEFAULT_WEIGHTS.to_vec()).unwrap();
        let engine = DecisionEngine::new(&model, SearchPolicy::SinglePly);
        let config = GameConfig {
            size: Size::new(10, 14),
            ..GameConfig::default()
        };
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        let score = play_game(&engine, &config, &mut rng, 50);
        assert!(score >= 0);
    }

    #[test]
    fn test_play_game_is_deterministic_for_a_seed() {
        let model =
            LinearModel::new(Box::new(DellacherieExtractor), DEFAULT_WEIGHTS.to_vec()).unwrap();
        let engine = DecisionEngine::new(&model, SearchPolicy::default());
        let config = GameConfig::default();
        let a = play_game(&engine, &config, &mut Pcg64Mcg::seed_from_u64(7), 30);
        let b = play_game(&engine, &config, &mut Pcg64Mcg::seed_from_u64(7), 30);
        assert_eq!(a, b);
    }
}
