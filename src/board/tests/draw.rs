//! Draw classification tests.

use crate::board::{Board, DrawState};

fn drawn_state(fen: &str) -> DrawState {
    let mut board = Board::from_fen(fen);
    let in_check = board.in_check();
    board.is_drawn(in_check)
}

#[test]
fn same_colored_bishops_is_drawn() {
    // Both bishops on dark squares: neither side can ever mate.
    assert_eq!(
        drawn_state("8/2k1b3/8/8/8/4B3/2K5/8 w - - 0 1"),
        DrawState::Drawn
    );
}

#[test]
fn opposite_colored_bishops_is_not_drawn() {
    assert_eq!(
        drawn_state("8/2k1b3/8/8/8/5B2/2K5/8 w - - 0 1"),
        DrawState::None
    );
}

#[test]
fn lone_minor_is_drawn() {
    assert_eq!(drawn_state("8/2k1b3/8/8/8/8/2K5/8 w - - 0 1"), DrawState::Drawn);
    assert_eq!(drawn_state("8/2k1B3/8/8/8/8/2K5/8 w - - 0 1"), DrawState::Drawn);
    assert_eq!(drawn_state("8/2k1N3/8/8/8/8/2K5/8 w - - 0 1"), DrawState::Drawn);
    assert_eq!(drawn_state("8/2k1n3/8/8/8/8/2K5/8 w - - 0 1"), DrawState::Drawn);
}

#[test]
fn bare_kings_is_drawn() {
    assert_eq!(drawn_state("8/2k5/8/8/8/8/2K5/8 w - - 0 1"), DrawState::Drawn);
}

#[test]
fn pawns_prevent_the_material_draw() {
    assert_eq!(
        drawn_state("8/2k5/8/8/8/4P3/2K5/8 w - - 0 1"),
        DrawState::None
    );
}

#[test]
fn fifty_move_rule_is_drawn() {
    assert_eq!(
        drawn_state("r3k3/8/8/8/8/8/8/R3K3 w - - 100 1"),
        DrawState::Drawn
    );
    assert_eq!(
        drawn_state("r3k3/8/8/8/8/8/8/R3K3 w - - 99 1"),
        DrawState::None
    );
}

#[test]
fn fifty_move_expiry_in_checkmate_is_a_loss() {
    // Back-rank mate with the clock already expired: the mate takes
    // precedence over the draw.
    assert_eq!(
        drawn_state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 1"),
        DrawState::Lost
    );
}

#[test]
fn halfmove_clock_resets_on_pawn_moves() {
    let mut board = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 99 1");
    let mv = board.parse_move("e2e4").unwrap();
    board.make_move(mv);
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.is_drawn(false), DrawState::None);
}

#[test]
fn knight_shuffle_reaches_a_repetition() {
    let mut board = Board::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        let mv = board.parse_move(uci).unwrap();
        board.make_move(mv);
    }
    // One full shuffle: the starting position has occurred once before.
    assert!(board.is_repetition(1));
    assert!(!board.is_repetition(2));

    for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        let mv = board.parse_move(uci).unwrap();
        board.make_move(mv);
    }
    // Two full shuffles: twice before (threefold overall).
    assert!(board.is_repetition(2));
}

#[test]
fn repetition_window_respects_irreversible_moves() {
    let mut board = Board::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "e2e4"] {
        let mv = board.parse_move(uci).unwrap();
        board.make_move(mv);
    }
    // The pawn push reset the window; nothing before it can repeat.
    assert!(!board.is_repetition(1));
}
