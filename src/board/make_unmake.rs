//! Making and unmaking moves with incremental hash maintenance.

use crate::zobrist::ZOBRIST;

use super::types::{castle_bit, Color, Move, Piece, Square};
use super::{Board, NullMoveInfo, UnmakeInfo};

#[inline]
fn piece_key(color: Color, piece: Piece, sq: Square) -> u64 {
    ZOBRIST.piece_keys[color.index()][piece.index()][sq.index()]
}

impl Board {
    #[inline]
    #[must_use]
    pub(crate) fn has_castling_right(&self, color: Color, kingside: bool) -> bool {
        self.castling_rights & castle_bit(color, kingside) != 0
    }

    /// Play `mv`. The returned record restores the position exactly via
    /// `unmake_move`; hash, bitboards and counters are updated in place.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let us = self.side_to_move();
        let them = us.flip();

        let info_snapshot = UnmakeInfo {
            captured: None,
            previous_en_passant: self.en_passant_target,
            previous_castling_rights: self.castling_rights,
            previous_hash: self.hash,
            previous_halfmove_clock: self.halfmove_clock,
        };

        let mut hash = self.hash;
        // The en-passant contribution depends on side to move and pawn
        // placement, so it is removed up front and re-added at the end from
        // the updated state.
        hash ^= self.en_passant_component();
        hash ^= ZOBRIST.side_key;

        let mut captured = None;

        if mv.is_en_passant() {
            let cap_sq = mv.to().offset(if us == Color::White { -1 } else { 1 }, 0).unwrap();
            captured = Some((them, Piece::Pawn));
            self.remove_piece(cap_sq, them, Piece::Pawn);
            hash ^= piece_key(them, Piece::Pawn, cap_sq);
        } else if mv.is_capture() {
            let (cap_color, cap_piece) = self
                .piece_at(mv.to())
                .expect("capture target square is empty");
            captured = Some((cap_color, cap_piece));
            self.remove_piece(mv.to(), cap_color, cap_piece);
            hash ^= piece_key(cap_color, cap_piece, mv.to());
        }

        let (_, moving_piece) = self.piece_at(mv.from()).expect("move source square is empty");
        self.remove_piece(mv.from(), us, moving_piece);
        hash ^= piece_key(us, moving_piece, mv.from());

        let placed_piece = mv.promoted_piece().unwrap_or(moving_piece);
        self.set_piece(mv.to(), us, placed_piece);
        hash ^= piece_key(us, placed_piece, mv.to());

        if mv.is_castling() {
            let back = mv.to().rank();
            let (rook_from, rook_to) = if mv.is_castle_kingside() {
                (Square::new(back, 7), Square::new(back, 5))
            } else {
                (Square::new(back, 0), Square::new(back, 3))
            };
            self.remove_piece(rook_from, us, Piece::Rook);
            self.set_piece(rook_to, us, Piece::Rook);
            hash ^= piece_key(us, Piece::Rook, rook_from);
            hash ^= piece_key(us, Piece::Rook, rook_to);
        }

        // Castling right updates, keyed per right.
        if moving_piece == Piece::King {
            for kingside in [true, false] {
                if self.has_castling_right(us, kingside) {
                    hash ^= castle_key(us, kingside);
                    self.castling_rights &= !castle_bit(us, kingside);
                }
            }
        } else if moving_piece == Piece::Rook {
            self.clear_rook_right(us, mv.from(), &mut hash);
        }
        if let Some((cap_color, Piece::Rook)) = captured {
            self.clear_rook_right(cap_color, mv.to(), &mut hash);
        }

        // New en-passant target on double pushes only.
        self.en_passant_target = if mv.is_double_pawn_push() {
            mv.from().offset(if us == Color::White { 1 } else { -1 }, 0)
        } else {
            None
        };

        if moving_piece == Piece::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.white_to_move = !self.white_to_move;
        // Re-add the en-passant contribution for the updated state.
        self.hash = hash;
        self.hash ^= self.en_passant_component();

        self.hash_history.push(self.hash);

        UnmakeInfo {
            captured,
            ..info_snapshot
        }
    }

    fn clear_rook_right(&mut self, color: Color, sq: Square, hash: &mut u64) {
        let back = if color == Color::White { 0 } else { 7 };
        if sq == Square::new(back, 0) && self.has_castling_right(color, false) {
            *hash ^= castle_key(color, false);
            self.castling_rights &= !castle_bit(color, false);
        } else if sq == Square::new(back, 7) && self.has_castling_right(color, true) {
            *hash ^= castle_key(color, true);
            self.castling_rights &= !castle_bit(color, true);
        }
    }

    pub fn unmake_move(&mut self, mv: Move, info: UnmakeInfo) {
        self.hash_history.pop();

        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.previous_en_passant;
        self.castling_rights = info.previous_castling_rights;
        self.hash = info.previous_hash;
        self.halfmove_clock = info.previous_halfmove_clock;

        let us = self.side_to_move();

        let placed_piece = self
            .piece_at(mv.to())
            .expect("unmake: move target square is empty")
            .1;
        self.remove_piece(mv.to(), us, placed_piece);
        let moving_piece = if mv.is_promotion() {
            Piece::Pawn
        } else {
            placed_piece
        };
        self.set_piece(mv.from(), us, moving_piece);

        if mv.is_castling() {
            let back = mv.to().rank();
            let (rook_from, rook_to) = if mv.is_castle_kingside() {
                (Square::new(back, 7), Square::new(back, 5))
            } else {
                (Square::new(back, 0), Square::new(back, 3))
            };
            self.remove_piece(rook_to, us, Piece::Rook);
            self.set_piece(rook_from, us, Piece::Rook);
        }

        if let Some((cap_color, cap_piece)) = info.captured {
            let cap_sq = if mv.is_en_passant() {
                mv.to()
                    .offset(if us == Color::White { -1 } else { 1 }, 0)
                    .unwrap()
            } else {
                mv.to()
            };
            self.set_piece(cap_sq, cap_color, cap_piece);
        }
    }

    /// Pass the turn. Sound as a search heuristic only.
    pub fn make_null_move(&mut self) -> NullMoveInfo {
        let info = NullMoveInfo {
            previous_en_passant: self.en_passant_target,
            previous_hash: self.hash,
        };
        let mut hash = self.hash;
        hash ^= self.en_passant_component();
        hash ^= ZOBRIST.side_key;
        self.en_passant_target = None;
        self.white_to_move = !self.white_to_move;
        self.hash = hash;
        self.hash_history.push(self.hash);
        info
    }

    pub fn unmake_null_move(&mut self, info: NullMoveInfo) {
        self.hash_history.pop();
        self.white_to_move = !self.white_to_move;
        self.en_passant_target = info.previous_en_passant;
        self.hash = info.previous_hash;
    }
}

#[inline]
fn castle_key(color: Color, kingside: bool) -> u64 {
    let bit = castle_bit(color, kingside);
    ZOBRIST.castling_keys[bit.trailing_zeros() as usize]
}
