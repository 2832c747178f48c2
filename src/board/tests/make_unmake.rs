//! Make/unmake round-trip tests.

use rand::prelude::*;

use crate::board::{Board, Move, Piece, Square, UnmakeInfo};

fn find_move(board: &mut Board, uci: &str) -> Move {
    board.parse_move(uci).expect("expected legal move")
}

fn snapshot(board: &Board) -> (u64, u8, Option<Square>, u32, String) {
    (
        board.hash(),
        board.castling_rights(),
        board.en_passant_target(),
        board.halfmove_clock(),
        board.to_fen(),
    )
}

#[test]
fn en_passant_capture_round_trips() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let before = snapshot(&board);
    let mv = find_move(&mut board, "e5f6");
    assert!(mv.is_en_passant());
    let info = board.make_move(mv);
    board.unmake_move(mv, info);
    assert_eq!(snapshot(&board), before);
}

#[test]
fn promotion_round_trips() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let before = snapshot(&board);
    let mv = find_move(&mut board, "a7a8q");
    let info = board.make_move(mv);
    assert_eq!(
        board.piece_at(Square::new(7, 0)),
        Some((crate::board::Color::White, Piece::Queen))
    );
    board.unmake_move(mv, info);
    assert_eq!(snapshot(&board), before);
    assert_eq!(
        board.piece_at(Square::new(6, 0)),
        Some((crate::board::Color::White, Piece::Pawn))
    );
}

#[test]
fn castling_round_trips_both_sides() {
    for uci in ["e1g1", "e1c1"] {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let before = snapshot(&board);
        let mv = find_move(&mut board, uci);
        assert!(mv.is_castling());
        let info = board.make_move(mv);
        assert_eq!(board.castling_rights() & 0b0011, 0);
        board.unmake_move(mv, info);
        assert_eq!(snapshot(&board), before);
    }
}

#[test]
fn null_move_round_trips_state() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let before = snapshot(&board);
    let side = board.side_to_move();

    let info = board.make_null_move();
    assert_eq!(board.en_passant_target(), None);
    assert_ne!(board.side_to_move(), side);

    board.unmake_null_move(info);
    assert_eq!(snapshot(&board), before);
    assert_eq!(board.side_to_move(), side);
}

#[test]
fn legal_moves_are_stable_across_make_unmake() {
    let mut board = Board::new();
    let initial: Vec<String> = board.legal_moves().iter().map(ToString::to_string).collect();

    let moves = board.legal_moves();
    for &mv in &moves {
        let info = board.make_move(mv);
        board.unmake_move(mv, info);
    }

    let after: Vec<String> = board.legal_moves().iter().map(ToString::to_string).collect();
    assert_eq!(initial, after);
}

#[test]
fn random_playout_keeps_hash_incremental() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut history: Vec<(Move, UnmakeInfo)> = Vec::new();

    for _ in 0..120 {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves.as_slice()[rng.gen_range(0..moves.len())];
        let info = board.make_move(mv);
        history.push((mv, info));
        assert_eq!(board.hash(), board.calculate_hash());
    }

    while let Some((mv, info)) = history.pop() {
        board.unmake_move(mv, info);
        assert_eq!(board.hash(), board.calculate_hash());
    }

    assert_eq!(board.to_fen(), Board::new().to_fen());
}

#[test]
fn capture_heavy_playout_round_trips() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let before = snapshot(&board);
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut history: Vec<(Move, UnmakeInfo)> = Vec::new();

    for _ in 0..60 {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        // Prefer captures to stress capture/promotion restoration.
        let captures: Vec<Move> = moves.iter().copied().filter(|m| m.is_capture()).collect();
        let mv = if captures.is_empty() || rng.gen_bool(0.3) {
            moves.as_slice()[rng.gen_range(0..moves.len())]
        } else {
            captures[rng.gen_range(0..captures.len())]
        };
        let info = board.make_move(mv);
        history.push((mv, info));
        assert_eq!(board.hash(), board.calculate_hash());
    }

    while let Some((mv, info)) = history.pop() {
        board.unmake_move(mv, info);
    }
    assert_eq!(snapshot(&board), before);
}
