//! Staged move picker.
//!
//! Yields pseudo-legal moves one stage at a time so a cutoff never pays for
//! generating or scoring moves it will not reach: transposition-table hint,
//! winning captures, killers, quiets by history, losing captures last.

use crate::board::{Board, GenKind, Move, Piece, ScoredMoveList, see_value};

use super::history::{HistoryTable, KillerTable};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Stage {
    TtMove,
    GenerateCaptures,
    GoodCaptures,
    Killer1,
    Killer2,
    GenerateQuiets,
    Quiets,
    BadCaptures,
    Done,
}

/// Which search drives the picker.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    /// Full ordering with killers and quiets.
    Search,
    /// Captures and promotions only, unless evading check.
    Quiescence,
}

pub struct MovePicker {
    stage: Stage,
    mode: PickerMode,
    in_check: bool,
    tt_move: Move,
    killer1: Move,
    killer2: Move,
    captures: ScoredMoveList,
    capture_idx: usize,
    bad_captures: ScoredMoveList,
    bad_idx: usize,
    quiets: ScoredMoveList,
    quiet_idx: usize,
}

impl MovePicker {
    /// Picker for the main search.
    #[must_use]
    pub fn new(board: &Board, tt_move: Move, killers: &KillerTable, ply: usize) -> Self {
        MovePicker {
            stage: Stage::TtMove,
            mode: PickerMode::Search,
            in_check: board.in_check(),
            tt_move,
            killer1: killers.primary(ply),
            killer2: killers.secondary(ply),
            captures: ScoredMoveList::new(),
            capture_idx: 0,
            bad_captures: ScoredMoveList::new(),
            bad_idx: 0,
            quiets: ScoredMoveList::new(),
            quiet_idx: 0,
        }
    }

    /// Picker for quiescence: noisy moves only, evasions when in check.
    #[must_use]
    pub fn new_quiescence(board: &Board, tt_move: Move) -> Self {
        MovePicker {
            stage: Stage::TtMove,
            mode: PickerMode::Quiescence,
            in_check: board.in_check(),
            tt_move,
            killer1: Move::null(),
            killer2: Move::null(),
            captures: ScoredMoveList::new(),
            capture_idx: 0,
            bad_captures: ScoredMoveList::new(),
            bad_idx: 0,
            quiets: ScoredMoveList::new(),
            quiet_idx: 0,
        }
    }

    /// Next pseudo-legal move in ordering priority, or `None` when
    /// exhausted. The caller is responsible for the final legality test.
    pub fn next_move(&mut self, board: &Board, history: &HistoryTable) -> Option<Move> {
        loop {
            match self.stage {
                Stage::TtMove => {
                    self.stage = Stage::GenerateCaptures;
                    if self.yields_tt_move(board) {
                        return Some(self.tt_move);
                    }
                }
                Stage::GenerateCaptures => {
                    self.generate_captures(board);
                    self.stage = Stage::GoodCaptures;
                }
                Stage::GoodCaptures => {
                    while let Some(scored) = self.captures.pick_best(self.capture_idx) {
                        self.capture_idx += 1;
                        if scored.mv == self.tt_move {
                            continue;
                        }
                        // Losing captures wait until every quiet has been
                        // tried.
                        if !board.see(scored.mv, 0) {
                            self.bad_captures.push(scored.mv, scored.score);
                            continue;
                        }
                        return Some(scored.mv);
                    }
                    self.stage = self.after_good_captures();
                }
                Stage::Killer1 => {
                    self.stage = Stage::Killer2;
                    if self.yields_killer(board, self.killer1) {
                        return Some(self.killer1);
                    }
                }
                Stage::Killer2 => {
                    self.stage = Stage::GenerateQuiets;
                    if self.killer2 != self.killer1 && self.yields_killer(board, self.killer2) {
                        return Some(self.killer2);
                    }
                }
                Stage::GenerateQuiets => {
                    self.generate_quiets(board, history);
                    self.stage = Stage::Quiets;
                }
                Stage::Quiets => {
                    if let Some(scored) = self.quiets.pick_best(self.quiet_idx) {
                        self.quiet_idx += 1;
                        return Some(scored.mv);
                    }
                    self.stage = Stage::BadCaptures;
                }
                Stage::BadCaptures => {
                    if let Some(scored) = self.bad_captures.pick_best(self.bad_idx) {
                        self.bad_idx += 1;
                        return Some(scored.mv);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }

    fn after_good_captures(&self) -> Stage {
        match self.mode {
            PickerMode::Search => Stage::Killer1,
            // Check evasions still walk quiets; otherwise noisy moves only.
            PickerMode::Quiescence if self.in_check => Stage::GenerateQuiets,
            PickerMode::Quiescence => Stage::BadCaptures,
        }
    }

    fn yields_tt_move(&self, board: &Board) -> bool {
        if self.tt_move == Move::null() || !board.is_pseudo_legal(self.tt_move) {
            return false;
        }
        // Outside check, quiescence only considers noisy hints.
        self.mode == PickerMode::Search || self.in_check || !self.tt_move.is_quiet()
    }

    fn yields_killer(&self, board: &Board, killer: Move) -> bool {
        killer != Move::null()
            && killer != self.tt_move
            && killer.is_quiet()
            && board.is_pseudo_legal(killer)
    }

    fn generate_captures(&mut self, board: &Board) {
        let moves = board.pseudo_legal_moves(GenKind::Tactical);
        for &mv in &moves {
            if mv == self.tt_move {
                continue;
            }
            self.captures.push(mv, capture_score(board, mv));
        }
    }

    fn generate_quiets(&mut self, board: &Board, history: &HistoryTable) {
        let moves = board.pseudo_legal_moves(GenKind::All);
        let side = board.side_to_move();
        for &mv in &moves {
            if !mv.is_quiet() {
                continue;
            }
            if mv == self.tt_move || mv == self.killer1 || mv == self.killer2 {
                continue;
            }
            self.quiets.push(mv, history.score(side, mv));
        }
    }

}

/// MVV-LVA with a promotion bonus: prefer big victims, cheap attackers,
/// and queening.
fn capture_score(board: &Board, mv: Move) -> i32 {
    let victim = board.captured_piece(mv).map_or(0, see_value);
    let attacker = board
        .piece_at(mv.from())
        .map_or(0, |(_, piece)| see_value(piece));
    let promo = mv
        .promoted_piece()
        .map_or(0, |piece| see_value(piece) - see_value(Piece::Pawn));
    victim * 10 - attacker + promo
}
