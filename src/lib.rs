//! Basalt chess engine library.
//!
//! Provides a complete UCI chess engine with:
//! - Bitboard-based board representation
//! - Parallel principal-variation search with iterative deepening
//! - Lock-free transposition table shared across workers
//! - Syzygy endgame tablebase probing
//!
//! # Quick Start
//!
//! ```
//! use basalt::board::Board;
//! use basalt::search::{Limits, SearchPool};
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let mut pool = SearchPool::new(16, 1);
//! let result = pool.search_blocking(&mut board, Limits::depth(4));
//! assert!(result.best_move.is_some());
//! ```

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bitboard hex literals are clearer without separators (bit patterns visible)
#![allow(clippy::unreadable_literal)]
// Chess engines have intentionally similar names (mate_in/mated_in, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod engine;
pub mod search;
pub mod tt;
pub mod uci;
pub mod zobrist;
