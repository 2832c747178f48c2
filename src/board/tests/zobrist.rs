//! Zobrist hashing tests.
//!
//! Every incremental update must agree with a full recomputation; the move
//! sequences exercise en-passant keying, castling-right revocation and
//! side-to-move toggling.

use crate::board::Board;

fn play_checking_hash(board: &mut Board, moves: &[&str]) {
    for uci in moves {
        let mv = board.parse_move(uci).expect("legal move");
        board.make_move(mv);
        assert_eq!(
            board.hash(),
            board.calculate_hash(),
            "incremental hash diverged after {uci}"
        );
    }
}

#[test]
fn startpos_hash_matches_recomputation() {
    let board = Board::new();
    assert_eq!(board.hash(), board.calculate_hash());
}

#[test]
fn incremental_hash_tracks_king_walk_line() {
    // Covers a double push, a blocked en-passant file, a real en-passant
    // opportunity (e5 can take f6), and both kings losing castling rights.
    let mut board = Board::new();
    play_checking_hash(&mut board, &["e2e4", "d7d5", "e4e5", "f7f5", "e1e2", "e8f7"]);
}

#[test]
fn incremental_hash_tracks_en_passant_capture_line() {
    // b4c3 is an actual en-passant capture; a1a3 drops a castling right by
    // moving the rook.
    let mut board = Board::new();
    play_checking_hash(
        &mut board,
        &["a2a4", "b7b5", "h2h4", "b5b4", "c2c4", "b4c3", "a1a3"],
    );
}

#[test]
fn en_passant_file_is_keyed_only_when_capturable() {
    // After 1.e4 the en-passant target exists but no black pawn can use
    // it; the hash must match the identical position without the target.
    let with_target =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    let without_target =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    assert_eq!(with_target.hash(), without_target.hash());
}

#[test]
fn capturable_en_passant_distinguishes_positions() {
    // With a black pawn on d4, c2c4 creates a usable en-passant right; the
    // position must hash differently from the same piece placement where
    // the right has lapsed.
    let mut direct = Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3");
    let mv = direct.parse_move("c2c4").unwrap();
    direct.make_move(mv);
    assert_eq!(direct.hash(), direct.calculate_hash());

    let lapsed =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/8/2Pp4/8/PP1PPPPP/RNBQKBNR b KQkq - 0 3");
    assert_ne!(direct.hash(), lapsed.hash());
}

#[test]
fn null_move_round_trips_the_hash() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let before = board.hash();
    let info = board.make_null_move();
    assert_ne!(board.hash(), before);
    assert_eq!(board.hash(), board.calculate_hash());
    board.unmake_null_move(info);
    assert_eq!(board.hash(), before);
}

#[test]
fn castling_rights_change_the_hash() {
    let with_rights = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let without = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
    assert_ne!(with_rights.hash(), without.hash());
}

#[test]
fn side_to_move_changes_the_hash() {
    let white = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    let black = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    assert_ne!(white.hash(), black.hash());
}
