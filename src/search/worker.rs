//! One search worker: quiescence, alpha-beta, aspiration windows and the
//! iterative deepening driver with time management.
//!
//! Workers run on their own OS threads. They share the transposition table
//! and the abort flag; killers, history and the stack are private. Worker 0
//! is the main worker: it owns time management, tablebase root probing and
//! protocol output.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::board::see_value;
use crate::board::{Board, DrawState, Move, MAX_MOVES, MAX_PLY};
use crate::tt::{Bound, TranspositionTable};

use super::constants::{
    mate_in, mated_in, score_from_tt, score_to_tt, Score, VALUE_INFINITE, VALUE_MATE,
    VALUE_MATE_IN_MAX_PLY, VALUE_NONE, VALUE_TB_LOSS_IN_MAX_PLY, VALUE_TB_WIN_IN_MAX_PLY,
};
use super::history::{history_bonus, EffortTable, HistoryTable, KillerTable};
use super::limits::Limits;
use super::params::SearchParams;
use super::picker::MovePicker;
use super::tablebase::{TablebaseProber, Wdl};
use super::{DepthReport, InfoSink, SearchResult};

/// Node classification; determines window policy and selectivity gating.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    Root,
    Pv,
    NonPv,
}

impl NodeKind {
    #[inline]
    fn is_pv(self) -> bool {
        self != NodeKind::NonPv
    }
}

/// Marker stored in a stack frame after a null move. `from == to` never
/// encodes a real move.
const NULL_MOVE_SENTINEL: Move = Move::from_u16(0xFFFF);

/// Wall clock is consulted once per this many polling checks.
const CHECK_INTERVAL: i64 = 2048;

/// Base late-move-reduction table, `1 + ln(depth) * ln(moves) / divisor`.
/// Built per worker so the divisor stays tunable through `SearchParams`.
fn build_reductions(divisor: f64) -> Box<[[i32; MAX_MOVES]; MAX_PLY]> {
    let mut table = Box::new([[0i32; MAX_MOVES]; MAX_PLY]);
    for depth in 1..MAX_PLY {
        for moves in 1..MAX_MOVES {
            table[depth][moves] =
                1 + ((depth as f64).ln() * (moves as f64).ln() / divisor) as i32;
        }
    }
    table
}

/// Per-ply search frame. The stack carries two leading sentinel frames so
/// `frame - 2` lookups are always in bounds.
#[derive(Clone, Copy)]
struct Frame {
    current_move: Move,
    excluded: Move,
    eval: Score,
}

impl Frame {
    const fn empty() -> Self {
        Frame {
            current_move: Move::null(),
            excluded: Move::null(),
            eval: 0,
        }
    }
}

pub struct Worker {
    pub id: usize,
    board: Board,
    limits: Limits,
    params: SearchParams,
    tt: Arc<TranspositionTable>,
    tb: Option<Arc<dyn TablebaseProber>>,
    stop: Arc<AtomicBool>,
    shared_nodes: Arc<AtomicU64>,
    shared_tbhits: Arc<AtomicU64>,
    sink: Option<Arc<dyn InfoSink>>,

    history: HistoryTable,
    killers: KillerTable,
    effort: EffortTable,
    reductions: Box<[[i32; MAX_MOVES]; MAX_PLY]>,
    stack: Vec<Frame>,
    pv_table: Vec<[Move; MAX_PLY + 1]>,
    pv_length: Vec<usize>,
    root_moves: Vec<Move>,

    nodes: u64,
    flushed_nodes: u64,
    tbhits: u64,
    flushed_tbhits: u64,
    seldepth: usize,
    check_countdown: i64,
    start_time: Instant,
}

impl Worker {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: usize,
        board: Board,
        limits: Limits,
        tt: Arc<TranspositionTable>,
        tb: Option<Arc<dyn TablebaseProber>>,
        stop: Arc<AtomicBool>,
        shared_nodes: Arc<AtomicU64>,
        shared_tbhits: Arc<AtomicU64>,
        sink: Option<Arc<dyn InfoSink>>,
    ) -> Self {
        let params = SearchParams::default();
        Worker {
            id,
            board,
            limits,
            reductions: build_reductions(params.lmr_divisor),
            params,
            tt,
            tb,
            stop,
            shared_nodes,
            shared_tbhits,
            sink,
            history: HistoryTable::new(),
            killers: KillerTable::new(),
            effort: EffortTable::new(),
            stack: vec![Frame::empty(); MAX_PLY + 4],
            pv_table: vec![[Move::null(); MAX_PLY + 1]; MAX_PLY + 2],
            pv_length: vec![0; MAX_PLY + 2],
            root_moves: Vec::new(),
            nodes: 0,
            flushed_nodes: 0,
            tbhits: 0,
            flushed_tbhits: 0,
            seldepth: 0,
            check_countdown: CHECK_INTERVAL,
            start_time: Instant::now(),
        }
    }

    /// Entry point: set up the root, consult the tablebase, then iterate.
    pub fn start_thinking(&mut self) -> SearchResult {
        self.start_time = Instant::now();
        self.check_countdown = CHECK_INTERVAL;

        let legal = self.board.legal_moves();
        self.root_moves = legal
            .iter()
            .copied()
            .filter(|mv| {
                self.limits.searchmoves.is_empty() || self.limits.searchmoves.contains(mv)
            })
            .collect();

        if self.root_moves.is_empty() {
            let score = if self.board.in_check() { mated_in(0) } else { 0 };
            return self.finish(None, score);
        }

        if self.id == 0 && self.limits.has_time_budget() {
            if let Some(result) = self.try_tablebase_root() {
                return result;
            }
            // With a forced reply there is nothing to allocate time for.
            if self.root_moves.len() == 1 {
                let mv = self.root_moves[0];
                return self.finish(Some(mv), 0);
            }
        }

        self.iterative_deepening()
    }

    /// Play the distance-to-zeroing move outright when the tables know it.
    fn try_tablebase_root(&mut self) -> Option<SearchResult> {
        let prober = self.tb.clone()?;
        if u32::from(self.board.occupied_bb().popcount()) > prober.max_pieces() {
            return None;
        }
        match prober.probe_root(&mut self.board) {
            Some(probe) => {
                self.tbhits += 1;
                let score = match probe.wdl {
                    Wdl::Win => VALUE_TB_WIN_IN_MAX_PLY,
                    Wdl::Loss => VALUE_TB_LOSS_IN_MAX_PLY,
                    Wdl::Draw => 0,
                };
                if let Some(sink) = &self.sink {
                    sink.depth_report(&DepthReport {
                        depth: probe.dtz,
                        seldepth: 1,
                        score,
                        nodes: 0,
                        nps: 0,
                        tbhits: 1,
                        hashfull: self.tt.hashfull(),
                        time_ms: self.elapsed_ms(),
                        pv: vec![probe.mv],
                    });
                }
                Some(self.finish(Some(probe.mv), score))
            }
            None => {
                // Covered piece count but no usable table move: report and
                // fall through to a normal search.
                if let Some(sink) = &self.sink {
                    sink.diagnostic("tablebase root probe failed, searching normally");
                }
                None
            }
        }
    }

    fn finish(&mut self, best_move: Option<Move>, score: Score) -> SearchResult {
        self.flush_counters();
        self.stop.store(true, Ordering::Relaxed);
        SearchResult {
            best_move,
            score,
            nodes: self.shared_nodes.load(Ordering::Relaxed),
        }
    }

    fn iterative_deepening(&mut self) -> SearchResult {
        let mut bestmove = Move::null();
        let mut result: Score = -VALUE_INFINITE;
        let mut score: Score = 0;
        let mut eval_average: i64 = 0;
        let mut bestmove_changes = 0u32;
        let mut optimum = self.limits.time.optimum;
        let maximum = self.limits.time.maximum;

        self.effort.clear();
        for frame in &mut self.stack {
            *frame = Frame::empty();
        }

        let mut depth = 1;
        while depth <= self.limits.depth {
            self.seldepth = 0;
            result = self.aspiration(depth, result);
            eval_average += i64::from(result);

            if self.limit_reached() {
                break;
            }
            if self.id != 0 {
                depth += 1;
                continue;
            }

            score = result;
            if bestmove != self.pv_table[0][0] {
                bestmove_changes += 1;
            }
            bestmove = self.pv_table[0][0];

            if optimum != 0 {
                let now = self.elapsed_ms();

                // Node-count time management: an iteration that spent most
                // of its nodes on the final best move will not change its
                // mind; stop early.
                let effort =
                    (self.effort.spent_on(bestmove) * 100 / self.nodes.max(1)).min(90);
                if depth > 10 && optimum * (110 - effort) / 100 < now {
                    break;
                }

                // Falling behind our own average: think longer.
                if i64::from(score) + 30 < eval_average / i64::from(depth) {
                    optimum = optimum * 110 / 100;
                }

                if bestmove_changes > 4 {
                    optimum = maximum * 3 / 4;
                } else if depth > 10 && now * 10 > optimum * 6 {
                    break;
                }
            }
            depth += 1;
        }

        // Analysis mode never stops on its own; wait for the external abort.
        if self.limits.infinite {
            while !self.stop.load(Ordering::Relaxed) {
                std::thread::yield_now();
            }
        }

        if bestmove == Move::null() {
            bestmove = self.pv_table[0][0];
        }
        if bestmove == Move::null() {
            bestmove = self.root_moves[0];
        }

        if self.id == 0 {
            self.finish(Some(bestmove), score)
        } else {
            self.flush_counters();
            SearchResult {
                best_move: Some(bestmove),
                score,
                nodes: self.nodes,
            }
        }
    }

    /// One root iteration inside an aspiration window, widening on failure.
    fn aspiration(&mut self, depth: i32, prev: Score) -> Score {
        let mut alpha = -VALUE_INFINITE;
        let mut beta = VALUE_INFINITE;
        let mut delta = self.params.aspiration_delta;

        // Shallow iterations are too unstable for a narrow window.
        if depth >= 9 {
            alpha = prev - delta;
            beta = prev + delta;
        }

        let mut result;
        loop {
            if alpha < -self.params.aspiration_bound {
                alpha = -VALUE_INFINITE;
            }
            if beta > self.params.aspiration_bound {
                beta = VALUE_INFINITE;
            }

            result = self.absearch(depth, alpha, beta, NodeKind::Root, 2);

            if self.stop.load(Ordering::Relaxed) {
                return 0;
            }
            if self.id == 0 && self.limits.nodes != 0 && self.nodes >= self.limits.nodes {
                return 0;
            }

            if result <= alpha {
                beta = (alpha + beta) / 2;
                alpha = (alpha - delta).max(-VALUE_INFINITE);
                delta += delta / 2;
            } else if result >= beta {
                beta = (beta + delta).min(VALUE_INFINITE);
                delta += delta / 2;
            } else {
                break;
            }
        }

        if self.id == 0 {
            self.report_depth(depth, result);
        }
        result
    }

    fn report_depth(&mut self, depth: i32, score: Score) {
        self.flush_counters();
        let Some(sink) = self.sink.clone() else {
            return;
        };
        let nodes = self.shared_nodes.load(Ordering::Relaxed);
        let tbhits = self.shared_tbhits.load(Ordering::Relaxed);
        let time_ms = self.elapsed_ms();
        sink.depth_report(&DepthReport {
            depth,
            seldepth: self.seldepth,
            score,
            nodes,
            nps: nodes * 1000 / (time_ms + 1),
            tbhits,
            hashfull: self.tt.hashfull(),
            time_ms,
            pv: self.pv_table[0][..self.pv_length[0]].to_vec(),
        });
    }

    /// Principal-variation alpha-beta.
    #[allow(clippy::too_many_lines)]
    fn absearch(
        &mut self,
        mut depth: i32,
        mut alpha: Score,
        mut beta: Score,
        node: NodeKind,
        frame_idx: usize,
    ) -> Score {
        if self.limit_reached() {
            return 0;
        }

        let root = node == NodeKind::Root;
        let pv = node.is_pv();
        let ply = frame_idx - 2;
        let us = self.board.side_to_move();
        let excluded = self.stack[frame_idx].excluded;
        let in_check = self.board.in_check();

        let mut best: Score = -VALUE_INFINITE;
        let mut max_value: Score = VALUE_MATE;

        if ply >= MAX_PLY {
            return if in_check { 0 } else { self.board.evaluate() };
        }

        self.pv_length[ply] = ply;

        // Draw detection and mate distance pruning.
        if !root {
            if self.board.is_repetition(1 + u32::from(pv)) {
                // Tiny jitter keeps shuffling lines from looking exactly
                // like neutral draws.
                return -1 + (self.nodes & 2) as Score;
            }
            match self.board.is_drawn(in_check) {
                DrawState::Drawn => return 0,
                DrawState::Lost => return mated_in(ply),
                DrawState::None => {}
            }

            alpha = alpha.max(mated_in(ply));
            beta = beta.min(mate_in(ply + 1));
            if alpha >= beta {
                return alpha;
            }
        }

        if in_check {
            depth += 1;
        }
        if depth <= 0 {
            return self.qsearch(alpha, beta, node, frame_idx);
        }

        debug_assert!(alpha < beta);
        debug_assert!(pv || alpha == beta - 1);

        self.stack[frame_idx + 1].excluded = Move::null();
        if pv && ply > self.seldepth {
            self.seldepth = ply;
        }

        let tt_hit = self.tt.probe(self.board.hash());
        let tt_move = tt_hit.map_or(Move::null(), |hit| hit.mv);
        let tt_score = tt_hit.map_or(VALUE_NONE, |hit| score_from_tt(hit.score, ply));

        // Bound-based cutoff from the table; suppressed along the
        // principal variation, in singular verification, and right after a
        // null move.
        if let Some(hit) = tt_hit {
            if !root
                && !pv
                && excluded == Move::null()
                && hit.depth >= depth
                && self.stack[frame_idx - 1].current_move != NULL_MOVE_SENTINEL
                && tt_score != VALUE_NONE
            {
                match hit.bound {
                    Bound::Exact => return tt_score,
                    Bound::Lower => alpha = alpha.max(tt_score),
                    Bound::Upper => beta = beta.min(tt_score),
                    Bound::None => {}
                }
                if alpha >= beta {
                    return tt_score;
                }
            }
        }

        // Interior tablebase probe.
        if !root {
            if let Some(tb_score) = self.probe_tablebase_wdl(ply) {
                let (tb_score, bound) = tb_score;
                let cuts = match bound {
                    Bound::Exact => true,
                    Bound::Lower => tb_score >= beta,
                    _ => tb_score <= alpha,
                };
                if cuts {
                    self.tt.store(
                        self.board.hash(),
                        depth + 6,
                        score_to_tt(tb_score, ply),
                        bound,
                        Move::null(),
                    );
                    return tb_score;
                }
                if pv {
                    if bound == Bound::Lower {
                        best = tb_score;
                        alpha = alpha.max(best);
                    } else {
                        max_value = tb_score;
                    }
                }
            }
        }

        let mut improving = false;

        if in_check {
            self.stack[frame_idx].eval = VALUE_NONE;
        } else {
            // The table score doubles as a cheap static evaluation.
            let static_eval = if tt_score != VALUE_NONE {
                tt_score
            } else {
                self.board.evaluate()
            };
            self.stack[frame_idx].eval = static_eval;
            let prior_eval = self.stack[frame_idx - 2].eval;
            improving = prior_eval != VALUE_NONE && static_eval > prior_eval;

            if !root {
                // Internal iterative reductions: no table move means the
                // first iteration here is cheap ordering work.
                if depth >= 3 && tt_hit.is_none() {
                    depth -= 1;
                }
                if pv && tt_hit.is_none() {
                    depth -= 1;
                }
                if depth <= 0 {
                    return self.qsearch(alpha, beta, NodeKind::Pv, frame_idx);
                }

                if !pv && excluded == Move::null() {
                    // Razoring: hopeless static eval, verify with
                    // quiescence.
                    if depth < self.params.razor_depth
                        && static_eval + self.params.razor_margin < alpha
                    {
                        return self.qsearch(alpha, beta, NodeKind::NonPv, frame_idx);
                    }

                    // Reverse futility: eval is so far above beta that a
                    // real search will not come back down.
                    if beta.abs() < VALUE_TB_WIN_IN_MAX_PLY
                        && depth < self.params.rfp_depth
                        && static_eval - self.params.rfp_depth_margin * depth
                            + self.params.rfp_improving_margin * Score::from(improving)
                            >= beta
                    {
                        return beta;
                    }

                    // Null move pruning.
                    if self.board.non_pawn_material(us)
                        && self.stack[frame_idx - 1].current_move != NULL_MOVE_SENTINEL
                        && depth >= self.params.nmp_depth
                        && static_eval >= beta
                    {
                        let reduction = self.params.nmp_base_reduction
                            + (depth / 5).min(4)
                            + ((static_eval - beta) / self.params.nmp_eval_divisor).min(3);

                        let info = self.board.make_null_move();
                        self.stack[frame_idx].current_move = NULL_MOVE_SENTINEL;
                        let null_score = -self.absearch(
                            depth - reduction,
                            -beta,
                            -beta + 1,
                            NodeKind::NonPv,
                            frame_idx + 1,
                        );
                        self.board.unmake_null_move(info);

                        if null_score >= beta {
                            // Mate scores from a null search are not proven.
                            return if null_score >= VALUE_TB_WIN_IN_MAX_PLY {
                                beta
                            } else {
                                null_score
                            };
                        }
                    }
                }
            }
        }

        // Move loop.
        let mut picker = MovePicker::new(&self.board, tt_move, &self.killers, ply);
        let mut quiets_tried = [Move::null(); 64];
        let mut stored_quiets = 0usize;
        let mut quiet_count = 0i32;
        let mut made_moves = 0u32;
        let mut best_move = Move::null();

        while let Some(mv) = picker.next_move(&self.board, &self.history) {
            if mv == excluded {
                continue;
            }
            if root {
                if !self.root_moves.contains(&mv) {
                    continue;
                }
            } else if self.board.leaves_king_in_check(mv) {
                continue;
            }
            made_moves += 1;

            let capture = mv.is_capture();
            let mut extension = 0;

            // Shallow-depth pruning once any result is on the board.
            if !root && best > VALUE_TB_LOSS_IN_MAX_PLY {
                if capture {
                    if depth < self.params.see_capture_depth
                        && !self.board.see(mv, -(depth * self.params.see_capture_margin))
                    {
                        continue;
                    }
                } else {
                    if !in_check
                        && !pv
                        && !mv.is_promotion()
                        && depth <= self.params.lmp_depth
                        && quiet_count > self.params.lmp_base as i32 + depth * depth
                    {
                        continue;
                    }
                    if depth < self.params.see_quiet_depth
                        && !self.board.see(mv, -(depth * self.params.see_quiet_margin))
                    {
                        continue;
                    }
                }
            }

            // Singular extension: is the table move forced? A reduced
            // search with it excluded tells us.
            if let Some(hit) = tt_hit {
                if !root
                    && depth >= self.params.singular_depth
                    && mv == tt_move
                    && excluded == Move::null()
                    && tt_score.abs() < 10000
                    && hit.bound.is_lower()
                    && hit.depth >= depth - 3
                {
                    let singular_beta = tt_score - self.params.singular_margin * depth;
                    let singular_depth = (depth - 1) / 2;

                    self.stack[frame_idx].excluded = mv;
                    let value = self.absearch(
                        singular_depth,
                        singular_beta - 1,
                        singular_beta,
                        NodeKind::NonPv,
                        frame_idx,
                    );
                    self.stack[frame_idx].excluded = Move::null();

                    if value < singular_beta {
                        extension = 1;
                    } else if singular_beta >= beta {
                        // Multicut: even without the table move we beat
                        // beta.
                        return singular_beta;
                    }
                }
            }

            let new_depth = depth - 1 + extension;

            if self.id == 0 && root && self.elapsed_ms() > 10_000 {
                if let Some(sink) = &self.sink {
                    sink.currmove(depth - i32::from(in_check), mv, made_moves);
                }
            }

            self.nodes += 1;
            let nodes_before = self.nodes;
            let info = self.board.make_move(mv);
            self.stack[frame_idx].current_move = mv;

            let mut score: Score = 0;
            let do_full_search;

            // Late move reductions: late, quiet-ordered moves get a
            // shallower verification search first.
            if depth >= 3 && !in_check && made_moves as i32 > 3 + 2 * i32::from(pv) {
                let mut reduction = self.reductions[(depth as usize).min(MAX_PLY - 1)]
                    [(made_moves as usize).min(MAX_MOVES - 1)];
                reduction -= (self.id % 2) as i32;
                reduction += i32::from(!improving);
                reduction += i32::from(!pv);
                let reduced = (new_depth - reduction).clamp(1, new_depth + 1);

                score = -self.absearch(reduced, -alpha - 1, -alpha, NodeKind::NonPv, frame_idx + 1);
                do_full_search = score > alpha && reduced < new_depth;
            } else {
                do_full_search = !pv || made_moves > 1;
            }

            if do_full_search {
                score =
                    -self.absearch(new_depth, -alpha - 1, -alpha, NodeKind::NonPv, frame_idx + 1);
            }

            // Full window for the first move and for zero-window results
            // that landed inside the bounds.
            if pv && ((score > alpha && score < beta) || made_moves == 1) {
                score = -self.absearch(new_depth, -beta, -alpha, NodeKind::Pv, frame_idx + 1);
            }

            self.board.unmake_move(mv, info);
            debug_assert!(score > -VALUE_INFINITE && score < VALUE_INFINITE);

            if self.id == 0 && root {
                self.effort.add(mv, self.nodes - nodes_before);
            }

            if score > best {
                best = score;

                if score > alpha {
                    alpha = score;
                    best_move = mv;
                    self.update_pv(ply, mv);

                    if score >= beta {
                        self.update_quiet_stats(
                            best_move,
                            depth,
                            &quiets_tried[..stored_quiets],
                            ply,
                        );
                        break;
                    }
                }
            }

            if !capture {
                if stored_quiets < quiets_tried.len() {
                    quiets_tried[stored_quiets] = mv;
                    stored_quiets += 1;
                }
                quiet_count += 1;
            }
        }

        // No legal move: in a singular verification that means the
        // excluded move was the only one; otherwise mate or stalemate.
        if made_moves == 0 {
            best = if excluded != Move::null() {
                alpha
            } else if in_check {
                mated_in(ply)
            } else {
                0
            };
        }

        if pv {
            best = best.min(max_value);
        }

        let bound = if best >= beta {
            Bound::Lower
        } else if pv && best_move != Move::null() {
            Bound::Exact
        } else {
            Bound::Upper
        };

        if excluded == Move::null() && !self.stop.load(Ordering::Relaxed) {
            self.tt
                .store(self.board.hash(), depth, score_to_tt(best, ply), bound, best_move);
        }

        debug_assert!(best > -VALUE_INFINITE && best < VALUE_INFINITE);
        best
    }

    /// Quiescence: stand pat, then noisy moves only.
    fn qsearch(
        &mut self,
        mut alpha: Score,
        beta: Score,
        node: NodeKind,
        frame_idx: usize,
    ) -> Score {
        if self.limit_reached() {
            return 0;
        }

        let pv = node.is_pv();
        let ply = frame_idx - 2;
        let us = self.board.side_to_move();
        let in_check = self.board.in_check();

        debug_assert!(alpha < beta);

        if ply >= MAX_PLY {
            return self.board.evaluate();
        }

        if self.board.is_repetition(1 + u32::from(pv)) {
            return -1 + (self.nodes & 2) as Score;
        }
        match self.board.is_drawn(in_check) {
            DrawState::Drawn => return 0,
            DrawState::Lost => return mated_in(ply),
            DrawState::None => {}
        }

        let mut best_value = self.board.evaluate();
        if best_value >= beta {
            return best_value;
        }
        if best_value > alpha {
            alpha = best_value;
        }

        let tt_hit = self.tt.probe(self.board.hash());
        let tt_move = tt_hit.map_or(Move::null(), |hit| hit.mv);
        let tt_score = tt_hit.map_or(VALUE_NONE, |hit| score_from_tt(hit.score, ply));

        if let Some(hit) = tt_hit {
            if !pv && tt_score != VALUE_NONE {
                match hit.bound {
                    Bound::Exact => return tt_score,
                    Bound::Lower if tt_score >= beta => return tt_score,
                    Bound::Upper if tt_score <= alpha => return tt_score,
                    _ => {}
                }
            }
        }

        let mut picker = MovePicker::new_quiescence(&self.board, tt_move);
        let mut best_move = Move::null();
        let mut made_moves = 0u32;

        while let Some(mv) = picker.next_move(&self.board, &self.history) {
            if self.board.leaves_king_in_check(mv) {
                continue;
            }
            made_moves += 1;

            if best_value > VALUE_TB_LOSS_IN_MAX_PLY {
                // Delta pruning: even winning the piece plus a wide margin
                // cannot reach alpha.
                if let Some(captured) = self.board.captured_piece(mv) {
                    if !in_check
                        && best_value + self.params.qs_delta_margin + see_value(captured) < alpha
                        && !mv.is_promotion()
                        && self.board.non_pawn_material(us)
                    {
                        continue;
                    }
                }
                if !in_check && !self.board.see(mv, 0) {
                    continue;
                }
            }

            self.nodes += 1;
            let info = self.board.make_move(mv);
            let score = -self.qsearch(-beta, -alpha, node, frame_idx + 1);
            self.board.unmake_move(mv, info);

            debug_assert!(score > -VALUE_INFINITE && score < VALUE_INFINITE);

            if score > best_value {
                best_value = score;

                if score > alpha {
                    alpha = score;
                    best_move = mv;

                    if score >= beta {
                        break;
                    }
                }
            }
        }

        if in_check && made_moves == 0 {
            return mated_in(ply);
        }

        let bound = if best_value >= beta {
            Bound::Lower
        } else {
            Bound::Upper
        };
        if !self.stop.load(Ordering::Relaxed) {
            self.tt.store(
                self.board.hash(),
                0,
                score_to_tt(best_value, ply),
                bound,
                best_move,
            );
        }

        debug_assert!(best_value > -VALUE_INFINITE && best_value < VALUE_INFINITE);
        best_value
    }

    /// Interior WDL probe mapped into the mate-distance-encoded score band.
    fn probe_tablebase_wdl(&mut self, ply: usize) -> Option<(Score, Bound)> {
        let prober = self.tb.clone()?;
        if u32::from(self.board.occupied_bb().popcount()) > prober.max_pieces() {
            return None;
        }
        let wdl = prober.probe_wdl(&self.board)?;
        self.tbhits += 1;
        Some(match wdl {
            Wdl::Win => (VALUE_MATE_IN_MAX_PLY - ply as Score - 1, Bound::Lower),
            Wdl::Loss => (-VALUE_MATE_IN_MAX_PLY + ply as Score + 1, Bound::Upper),
            Wdl::Draw => (0, Bound::Exact),
        })
    }

    /// Beta cutoff bookkeeping: killers shift, the cutoff move gains
    /// history, earlier quiets lose it.
    fn update_quiet_stats(&mut self, best_move: Move, depth: i32, quiets: &[Move], ply: usize) {
        if !best_move.is_quiet() {
            return;
        }
        let side = self.board.side_to_move();
        self.killers.update(ply, best_move);

        let bonus = history_bonus(depth);
        if depth > 1 {
            self.history.update(side, best_move, bonus);
        }
        for &quiet in quiets {
            if quiet != best_move {
                self.history.update(side, quiet, -bonus);
            }
        }
    }

    fn update_pv(&mut self, ply: usize, mv: Move) {
        self.pv_table[ply][ply] = mv;
        let child_len = self.pv_length[ply + 1];
        let (head, tail) = self.pv_table.split_at_mut(ply + 1);
        let parent = &mut head[ply];
        let child = &tail[0];
        for i in (ply + 1)..child_len {
            parent[i] = child[i];
        }
        self.pv_length[ply] = child_len.max(ply + 1);
    }

    /// Cooperative budget check. Helpers only observe the abort flag; the
    /// main worker enforces node and wall-clock ceilings, consulting the
    /// clock once per [`CHECK_INTERVAL`] polls.
    fn limit_reached(&mut self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }

        self.check_countdown -= 1;
        if self.check_countdown <= 0 {
            self.check_countdown = CHECK_INTERVAL;
            self.flush_counters();

            if self.id == 0
                && self.limits.time.maximum != 0
                && self.elapsed_ms() >= self.limits.time.maximum
            {
                self.stop.store(true, Ordering::Relaxed);
                return true;
            }
        }

        if self.id == 0 && self.limits.nodes != 0 && self.nodes >= self.limits.nodes {
            self.stop.store(true, Ordering::Relaxed);
            return true;
        }

        false
    }

    fn flush_counters(&mut self) {
        let node_delta = self.nodes - self.flushed_nodes;
        if node_delta > 0 {
            self.shared_nodes.fetch_add(node_delta, Ordering::Relaxed);
            self.flushed_nodes = self.nodes;
        }
        let tb_delta = self.tbhits - self.flushed_tbhits;
        if tb_delta > 0 {
            self.shared_tbhits.fetch_add(tb_delta, Ordering::Relaxed);
            self.flushed_tbhits = self.tbhits;
        }
    }

    #[inline]
    fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}
