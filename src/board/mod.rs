//! Position model: bitboard state, move generation, make/unmake, FEN,
//! static exchange evaluation and the static evaluator.

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError};
pub use state::{Board, DrawState, NullMoveInfo, UnmakeInfo};
pub use types::{
    Bitboard, Color, Move, MoveList, Piece, ScoredMove, ScoredMoveList, Square, MAX_MOVES, MAX_PLY,
};

pub(crate) use movegen::GenKind;
pub(crate) use see::see_value;
