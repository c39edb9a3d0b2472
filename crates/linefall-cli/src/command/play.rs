use std::{
    io::{self, BufRead, Read as _, Write},
    path::PathBuf,
};

use linefall_engine::{GameConfig, GameState, PieceKind, Size};
use linefall_evaluator::{DecisionEngine, SearchPolicy};

use crate::model;

/// Piece code that ends the session.
const TERMINATION_CODE: char = 'E';

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Trained model file; uses the built-in weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Board width in cells
    #[arg(long, default_value_t = 10)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = 16)]
    height: usize,
    /// Percentage of first placements expanded by the lookahead search
    #[arg(long, default_value_t = SearchPolicy::DEFAULT_KEEP_PERCENT)]
    keep_percent: usize,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            model: None,
            width: 10,
            height: 16,
            keep_percent: SearchPolicy::DEFAULT_KEEP_PERCENT,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let model = model::load_linear_model(arg.model.as_deref())?;
    let engine = DecisionEngine::new(
        &model,
        SearchPolicy::PrunedTwoPly {
            keep_percent: arg.keep_percent,
        },
    );
    let config = GameConfig {
        size: Size::new(arg.width, arg.height),
        ..GameConfig::default()
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    run_session(&engine, &config, &mut input, &mut output)
}

/// Drives one game over the line-oriented exchange: two piece codes up
/// front, then one code per turn, answering each turn with the chosen
/// rotation index and horizontal offset followed by the cumulative score.
///
/// Ends on the termination code, end of input, or when the game is over.
fn run_session<R, W>(
    engine: &DecisionEngine<'_>,
    config: &GameConfig,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut game = GameState::new(config.clone());
    let (Some(first), Some(second)) = (read_piece_code(input)?, read_piece_code(input)?) else {
        return Ok(());
    };
    game.enqueue_piece(first);
    game.enqueue_piece(second);

    while let Some(current) = game.current_piece() {
        let Some(decision) = engine.select(game.board(), current, game.next_piece()) else {
            break;
        };
        game.apply(&decision.placement);
        writeln!(
            output,
            "{} {}",
            decision.placement.rotation_index(),
            decision.placement.x_offset()
        )?;
        writeln!(output, "{}", game.score())?;
        output.flush()?;

        if game.is_over() {
            break;
        }
        let Some(next) = read_piece_code(input)? else {
            break;
        };
        game.enqueue_piece(next);
    }
    Ok(())
}

/// Next piece code from the stream, skipping whitespace. `None` means the
/// session is done (termination code or end of input).
fn read_piece_code<R>(input: &mut R) -> anyhow::Result<Option<PieceKind>>
where
    R: BufRead,
{
    let mut byte = [0_u8; 1];
    loop {
        if input.read(&mut byte)? == 0 {
            return Ok(None);
        }
        let code = char::from(byte[0]);
        if code.is_ascii_whitespace() {
            continue;
        }
        if code == TERMINATION_CODE {
            return Ok(None);
        }
        return Ok(Some(PieceKind::from_char(code)?));
    }
}

#[cfg(test)]
mod tests {
    use linefall_evaluator::{DEFAULT_WEIGHTS, DellacherieExtractor, LinearModel};

    use super::*;

    fn engine_model() -> LinearModel {
        LinearModel::new(Box::new(DellacherieExtractor), DEFAULT_WEIGHTS.to_vec()).unwrap()
    }

    fn run_with_input(input: &[u8]) -> String {
        let model = engine_model();
        let engine = DecisionEngine::new(&model, SearchPolicy::default());
        let mut output = Vec::new();
        run_session(
            &engine,
            &GameConfig::default(),
            &mut io::Cursor::new(input),
            &mut output,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_session_answers_each_turn() {
        // Three pieces: two placed, the third still queued at termination.
        let output = run_with_input(b"I T\nO\nE\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);

        for pair in lines.chunks(2) {
            let decision: Vec<i32> = pair[0]
                .split_whitespace()
                .map(|v| v.parse().unwrap())
                .collect();
            assert_eq!(decision.len(), 2);
            assert!(decision[1] >= 0);
            let score: i64 = pair[1].parse().unwrap();
            assert!(score >= 0);
        }
    }

    #[test]
    fn test_immediate_termination_code_emits_nothing() {
        assert_eq!(run_with_input(b"E\n"), "");
    }

    #[test]
    fn test_unknown_piece_code_is_an_error() {
        let model = engine_model();
        let engine = DecisionEngine::new(&model, SearchPolicy::default());
        let mut output = Vec::new();
        let result = run_session(
            &engine,
            &GameConfig::default(),
            &mut io::Cursor::new(&b"I X\n"[..]),
            &mut output,
        );
        assert!(result.is_err());
    }
}
