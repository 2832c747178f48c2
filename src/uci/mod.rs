//! UCI protocol front end.
//!
//! Parses GUI commands into configuration and limits; replies through the
//! report sink. The search core never prints on its own.

pub mod command;
pub mod options;
pub mod report;

use crate::board::Board;

pub use command::{parse_go_params, parse_uci_command, GoParams, UciCommand};
pub use options::{OptionAction, UciOptions};
pub use report::{format_score, UciSink};

/// Error from a `position` command.
#[derive(Debug, Clone)]
pub enum UciError {
    InvalidFen(crate::board::FenError),
    InvalidMove {
        move_str: String,
        error: crate::board::MoveParseError,
    },
    MissingParts,
}

impl std::fmt::Display for UciError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "malformed position command"),
        }
    }
}

impl std::error::Error for UciError {}

/// Apply a `position` command: `position startpos | fen <fen> [moves ...]`.
pub fn parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;

    if i >= parts.len() {
        return Err(UciError::MissingParts);
    }

    if parts[i] == "startpos" {
        *board = Board::new();
        i += 1;
    } else if parts[i] == "fen" {
        let fen_end = parts
            .iter()
            .position(|p| *p == "moves")
            .unwrap_or(parts.len());
        if i + 1 >= fen_end {
            return Err(UciError::MissingParts);
        }
        let fen = parts[i + 1..fen_end].join(" ");
        *board = Board::try_from_fen(&fen).map_err(UciError::InvalidFen)?;
        i = fen_end;
    } else {
        return Err(UciError::MissingParts);
    }

    if i < parts.len() && parts[i] == "moves" {
        for move_str in &parts[i + 1..] {
            let mv = board
                .parse_move(move_str)
                .map_err(|error| UciError::InvalidMove {
                    move_str: (*move_str).to_string(),
                    error,
                })?;
            board.make_move(mv);
        }
    }

    Ok(())
}
