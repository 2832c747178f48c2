//! Error types for position and move parsing.

use std::fmt;

/// Error produced when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN has fewer than the four mandatory fields.
    TooFewParts { found: usize },
    /// More than eight ranks in the placement field.
    InvalidRank { rank: usize },
    /// A rank describes more than eight files.
    TooManyFiles { rank: usize, files: usize },
    /// Unknown piece character.
    InvalidPiece { ch: char },
    /// Side-to-move field is neither `w` nor `b`.
    InvalidSideToMove { found: String },
    /// Unknown castling character.
    InvalidCastling { ch: char },
    /// En-passant field is not `-` or a square.
    InvalidEnPassant { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "expected at least 4 FEN fields, found {found}")
            }
            FenError::InvalidRank { rank } => write!(f, "too many ranks (rank index {rank})"),
            FenError::TooManyFiles { rank, files } => {
                write!(f, "rank {rank} describes {files} files")
            }
            FenError::InvalidPiece { ch } => write!(f, "invalid piece character '{ch}'"),
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}'")
            }
            FenError::InvalidCastling { ch } => write!(f, "invalid castling character '{ch}'"),
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en passant square '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error produced when parsing a UCI move against a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Not 4 or 5 characters.
    InvalidLength { len: usize },
    /// Squares outside a1..h8.
    InvalidSquare { notation: String },
    /// Promotion suffix is not one of `nbrq`.
    InvalidPromotion { ch: char },
    /// Syntactically valid but not legal in the position.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "move must be 4 or 5 characters, got {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "invalid squares in move '{notation}'")
            }
            MoveParseError::InvalidPromotion { ch } => {
                write!(f, "invalid promotion piece '{ch}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "move '{notation}' is not legal here")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}
