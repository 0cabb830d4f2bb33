//! Prompt text and response parsing for LLM-backed policies.

use tracing::{debug, instrument};

use crate::games::tictactoe::{Board, Difficulty};
use crate::llm_client::LlmError;

/// User turn sent with every move request.
pub const USER_MESSAGE: &str = "Based on the board state, what is your next move?";

/// Builds the system instruction for `difficulty` on `board`.
#[instrument(skip(board), fields(board = %board))]
pub fn system_instruction(difficulty: Difficulty, board: &Board) -> String {
    let available: Vec<String> = board
        .empty_positions()
        .into_iter()
        .map(|pos| pos.to_index().to_string())
        .collect();

    if available.is_empty() {
        return "The game is over. There are no moves to make.".to_string();
    }

    let core = format!(
        "You are an expert Tic Tac Toe AI opponent. The current board is represented by a 9-character string: \"{board}\".\n\
         'X' is the human player, 'O' is you (the AI). The indices are 0-8 from top-left to bottom-right.\n\
         The available empty spots for your next move are at indices: [{moves}].\n\n\
         Your task is to return your next move as a JSON object with a single key \"move\".\n\
         The value for \"move\" MUST be an integer chosen from the list of available indices.\n",
        board = board,
        moves = available.join(", "),
    );

    let level = match difficulty {
        Difficulty::Easy => {
            "Your difficulty is Easy. Choose a random valid move from the available spots."
        }
        Difficulty::Medium => {
            "Your difficulty is Medium.\n\
             1. First, check if you can win on this turn. If so, take that winning move from the available spots.\n\
             2. Second, check if the player 'X' can win on their next turn. If so, you must block them by choosing the correct spot from the available list.\n\
             3. Otherwise, choose the best strategic move from the available spots (center is best, then corners)."
        }
        Difficulty::Hard => {
            "Your difficulty is Hard. You must play optimally to win or draw.\n\
             Analyze the available spots and choose the absolute best move using minimax principles. Never make a move that allows 'X' to win."
        }
    };

    debug!(moves = available.len(), "Built system instruction");
    format!("{} {}", core, level)
}

/// Sampling temperature: loose for Easy, tight otherwise.
pub fn temperature(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium | Difficulty::Hard => 0.2,
    }
}

/// Extracts the integer `move` from a model response.
///
/// Accepts bare JSON or JSON wrapped in prose or a code fence. Only the
/// first `{` to the last `}` is parsed.
///
/// # Errors
///
/// Returns [`LlmError`] if no JSON object is found or `move` is missing or
/// not an integral number (`4.0` counts, `4.5` and `"4"` do not). Range and
/// occupancy are checked by the caller.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_move(text: &str) -> Result<i64, LlmError> {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(LlmError::new(format!(
                "No JSON object in response: {}",
                text
            )));
        }
    };

    let value: serde_json::Value = serde_json::from_str(&text[start..=end])
        .map_err(|e| LlmError::new(format!("Invalid JSON in response: {}", e)))?;

    let integral = match &value["move"] {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    integral.ok_or_else(|| LlmError::new(format!("Missing integer \"move\" in {}", value)))
}
