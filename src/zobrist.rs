//! Zobrist key material.
//!
//! Keys are drawn from a seeded generator so hashes are identical from run
//! to run (the transposition table and the test suite both rely on that).
//! The hashing scheme follows the PolyGlot conventions: one key per
//! castling right, the en-passant file keyed only when an enemy pawn can
//! actually capture, and an explicit side-to-move key.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const KEY_SEED: u64 = 0x9E3779B97F4A7C15;

pub struct ZobristKeys {
    /// `piece_keys[color][piece][square]`
    pub piece_keys: [[[u64; 64]; 6]; 2],
    /// One key per castling right: WK, WQ, BK, BQ.
    pub castling_keys: [u64; 4],
    /// One key per en-passant file.
    pub en_passant_keys: [u64; 8],
    /// XORed in when white is to move.
    pub side_key: u64,
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(KEY_SEED);
    let mut piece_keys = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_keys {
        for piece in color.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }
    }
    let mut castling_keys = [0u64; 4];
    for key in &mut castling_keys {
        *key = rng.gen();
    }
    let mut en_passant_keys = [0u64; 8];
    for key in &mut en_passant_keys {
        *key = rng.gen();
    }
    ZobristKeys {
        piece_keys,
        castling_keys,
        en_passant_keys,
        side_key: rng.gen(),
    }
});

/// XOR of the keys for each set castling-right bit.
#[must_use]
pub fn castling_component(rights: u8) -> u64 {
    let mut h = 0u64;
    for bit in 0..4 {
        if rights & (1 << bit) != 0 {
            h ^= ZOBRIST.castling_keys[bit];
        }
    }
    h
}
