//! Engine controller: owns the game board, the worker pool and the option
//! state, and turns parsed UCI commands into actions.

use std::sync::Arc;
use std::time::Instant;

use crate::board::{Board, MAX_PLY};
use crate::search::tablebase::{SyzygyTablebase, TablebaseProber};
use crate::search::{InfoSink, Limits, SearchPool};
use crate::uci::{
    parse_go_params, parse_position_command, GoParams, OptionAction, UciCommand, UciOptions,
};

use super::time::compute_time_budget;

pub const ENGINE_NAME: &str = "Basalt";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct EngineController {
    board: Board,
    pool: SearchPool,
    options: UciOptions,
    sink: Arc<dyn InfoSink>,
}

impl EngineController {
    #[must_use]
    pub fn new(sink: Arc<dyn InfoSink>) -> Self {
        let options = UciOptions::default();
        EngineController {
            board: Board::new(),
            pool: SearchPool::new(options.hash_mb, options.threads),
            options,
            sink,
        }
    }

    /// Handle one command; returns `false` on `quit`.
    pub fn handle(&mut self, command: UciCommand) -> bool {
        match command {
            UciCommand::Uci => {
                println!("id name {ENGINE_NAME} {ENGINE_VERSION}");
                println!("id author the {ENGINE_NAME} developers");
                self.options.print();
                println!("uciok");
            }
            UciCommand::IsReady => println!("readyok"),
            UciCommand::UciNewGame => {
                self.pool.abort();
                self.board = Board::new();
                self.pool.clear_tt();
            }
            UciCommand::Position(parts) => {
                self.pool.abort();
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Err(e) = parse_position_command(&mut self.board, &parts) {
                    self.sink.diagnostic(&format!("rejected position: {e}"));
                }
            }
            UciCommand::Go(parts) => {
                self.pool.abort();
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                let params = parse_go_params(&parts);
                self.go(&params);
            }
            UciCommand::SetOption(parts) => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                self.apply_option(&parts);
            }
            UciCommand::Perft(depth) => self.perft(depth),
            UciCommand::Stop => {
                self.pool.stop();
                self.pool.wait();
            }
            UciCommand::Quit => {
                self.pool.abort();
                return false;
            }
            UciCommand::Unknown(line) => {
                self.sink.diagnostic(&format!("unknown command: {line}"));
            }
        }
        true
    }

    fn go(&mut self, params: &GoParams) {
        let mut limits = Limits {
            depth: params.depth.map_or(MAX_PLY as i32, |d| d.clamp(1, MAX_PLY as i32)),
            nodes: params.nodes.unwrap_or(0),
            time: compute_time_budget(params, self.board.side_to_move(), self.options.move_overhead_ms),
            searchmoves: Vec::new(),
            infinite: params.infinite,
        };

        for move_str in &params.searchmoves {
            match self.board.parse_move(move_str) {
                Ok(mv) => limits.searchmoves.push(mv),
                Err(_) => self
                    .sink
                    .diagnostic(&format!("ignoring searchmove {move_str}")),
            }
        }

        self.pool
            .start_search(&self.board, limits, Arc::clone(&self.sink));
    }

    fn apply_option(&mut self, parts: &[&str]) {
        if self.pool.is_searching() {
            self.pool.abort();
        }
        match self.options.apply(parts) {
            OptionAction::ResizeHash(mb) => self.pool.resize_tt(mb),
            OptionAction::ClearHash => self.pool.clear_tt(),
            OptionAction::SetThreads(n) => self.pool.set_threads(n),
            OptionAction::LoadTablebase(path) => match SyzygyTablebase::load(&path) {
                Ok(tb) => {
                    self.sink.diagnostic(&format!(
                        "loaded syzygy tables (up to {} pieces)",
                        tb.max_pieces()
                    ));
                    self.pool.set_tablebase(Arc::new(tb));
                }
                Err(e) => self
                    .sink
                    .diagnostic(&format!("failed to load syzygy tables: {e}")),
            },
            OptionAction::None => {}
        }
    }

    fn perft(&mut self, depth: usize) {
        let start = Instant::now();
        let nodes = self.board.perft(depth);
        let elapsed = start.elapsed().as_millis().max(1) as u64;
        println!(
            "info string perft({depth}) = {nodes} nodes in {elapsed} ms ({} nps)",
            nodes * 1000 / elapsed
        );
    }

    /// Current board (tests and the driver loop).
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}
