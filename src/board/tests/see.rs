//! Static exchange evaluation tests.

use crate::board::Board;

fn see(fen: &str, uci: &str, threshold: i32) -> bool {
    let mut board = Board::from_fen(fen);
    let mv = board.parse_move(uci).expect("legal move");
    board.see(mv, threshold)
}

#[test]
fn undefended_pawn_is_a_clean_win() {
    let fen = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";
    assert!(see(fen, "e4d5", 0));
    assert!(see(fen, "e4d5", 100));
    assert!(!see(fen, "e4d5", 101));
}

#[test]
fn defended_pawn_is_an_even_trade() {
    let fen = "4k3/8/2p5/3p4/4P3/8/8/4K3 w - - 0 1";
    assert!(see(fen, "e4d5", 0));
    assert!(!see(fen, "e4d5", 1));
}

#[test]
fn knight_takes_defended_pawn_loses_material() {
    let fen = "4k3/8/2p5/3p4/4N3/8/8/4K3 w - - 0 1";
    assert!(!see(fen, "e4d5", 0));
    // The trade nets pawn-for-knight; it clears a deeply negative bar.
    assert!(see(fen, "e4d5", -250));
}

#[test]
fn queen_grabbing_defended_pawn_is_disastrous() {
    let fen = "4k3/8/2p5/3p4/8/3Q4/8/4K3 w - - 0 1";
    assert!(!see(fen, "d3d5", 0));
    assert!(!see(fen, "d3d5", -700));
}

#[test]
fn xray_recapture_is_seen() {
    // Rxe5 appears to lose the exchange, but the doubled rook on e1
    // recaptures through the vacated e2 square: the trade nets a pawn.
    let fen = "4r2k/8/8/4p3/8/8/4R3/4R1K1 w - - 0 1";
    assert!(see(fen, "e2e5", 0));
    assert!(see(fen, "e2e5", 100));
    assert!(!see(fen, "e2e5", 101));
}

#[test]
fn en_passant_capture_is_scored_as_a_pawn() {
    let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
    assert!(see(fen, "e5d6", 0));
    assert!(!see(fen, "e5d6", 101));
}

#[test]
fn quiet_move_into_a_defended_square_fails() {
    // Nc3-d5 walks into c6xd5 with no compensation.
    let fen = "4k3/8/2p5/8/8/2N5/8/4K3 w - - 0 1";
    assert!(!see(fen, "c3d5", 0));
    assert!(see(fen, "c3d5", -320));
}

#[test]
fn castling_never_trades_material() {
    let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
    assert!(see(fen, "e1g1", 0));
    assert!(!see(fen, "e1g1", 1));
}
