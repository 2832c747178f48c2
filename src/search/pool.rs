//! Worker thread pool.
//!
//! Lazy SMP: every worker searches the same position independently from a
//! cloned board, coordinating only through the shared transposition table
//! and the abort flag. Worker 0 manages time and emits protocol output;
//! any other worker's findings reach the result through the table.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::board::Board;
use crate::tt::TranspositionTable;

use super::tablebase::TablebaseProber;
use super::worker::Worker;
use super::{InfoSink, Limits, SearchResult};

/// Deep recursion wants room; the default thread stack is too small.
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

pub struct SearchPool {
    tt: Arc<TranspositionTable>,
    tb: Option<Arc<dyn TablebaseProber>>,
    stop: Arc<AtomicBool>,
    num_threads: usize,
    handles: Vec<JoinHandle<SearchResult>>,
    main_handle: Option<JoinHandle<SearchResult>>,
}

impl SearchPool {
    #[must_use]
    pub fn new(tt_mb: usize, num_threads: usize) -> Self {
        SearchPool {
            tt: Arc::new(TranspositionTable::new(tt_mb)),
            tb: None,
            stop: Arc::new(AtomicBool::new(true)),
            num_threads: num_threads.max(1),
            handles: Vec::new(),
            main_handle: None,
        }
    }

    pub fn set_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    pub fn set_tablebase(&mut self, tb: Arc<dyn TablebaseProber>) {
        self.tb = Some(tb);
    }

    /// Reallocate the transposition table. Must not race a running search.
    pub fn resize_tt(&mut self, tt_mb: usize) {
        self.wait();
        self.tt = Arc::new(TranspositionTable::new(tt_mb));
    }

    /// Zero the shared table ("new game").
    pub fn clear_tt(&mut self) {
        self.wait();
        self.tt.clear();
    }

    #[must_use]
    pub fn tt(&self) -> &Arc<TranspositionTable> {
        &self.tt
    }

    /// True while workers from the last `go` are still running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.main_handle.is_some()
    }

    /// Launch a search. The main worker reports through `sink` and emits
    /// `bestmove` when it finishes; the call returns immediately.
    pub fn start_search(&mut self, board: &Board, limits: Limits, sink: Arc<dyn InfoSink>) {
        self.wait();

        // A fresh abort flag per search: the old one stays set for any
        // straggler from the previous search.
        self.stop = Arc::new(AtomicBool::new(false));
        self.tt.new_search();

        let shared_nodes = Arc::new(AtomicU64::new(0));
        let shared_tbhits = Arc::new(AtomicU64::new(0));

        for id in 1..self.num_threads {
            let mut worker = Worker::new(
                id,
                board.clone(),
                limits.clone(),
                Arc::clone(&self.tt),
                self.tb.clone(),
                Arc::clone(&self.stop),
                Arc::clone(&shared_nodes),
                Arc::clone(&shared_tbhits),
                None,
            );
            let handle = std::thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn(move || worker.start_thinking())
                .expect("failed to spawn search worker");
            self.handles.push(handle);
        }

        let mut main_worker = Worker::new(
            0,
            board.clone(),
            limits,
            Arc::clone(&self.tt),
            self.tb.clone(),
            Arc::clone(&self.stop),
            shared_nodes,
            shared_tbhits,
            Some(Arc::clone(&sink)),
        );
        let main = std::thread::Builder::new()
            .name("search-0".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = main_worker.start_thinking();
                sink.bestmove(result.best_move);
                result
            })
            .expect("failed to spawn main search worker");
        self.main_handle = Some(main);
    }

    /// Run a search on the calling thread's schedule and return its result
    /// (blocks until every worker has exited).
    pub fn search_blocking(&mut self, board: &mut Board, limits: Limits) -> SearchResult {
        self.start_search(board, limits, Arc::new(super::SilentSink));
        self.wait().expect("search produced no result")
    }

    /// Request a cooperative stop without waiting.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Join all workers; returns the main worker's result if one ran.
    pub fn wait(&mut self) -> Option<SearchResult> {
        let result = self
            .main_handle
            .take()
            .and_then(|handle| handle.join().ok());
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        result
    }

    /// Stop and join everything.
    pub fn abort(&mut self) -> Option<SearchResult> {
        self.stop();
        self.wait()
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingSink {
        depths: Mutex<Vec<i32>>,
        best: Mutex<Option<crate::board::Move>>,
    }

    impl InfoSink for CollectingSink {
        fn depth_report(&self, report: &super::super::DepthReport) {
            self.depths.lock().unwrap().push(report.depth);
        }
        fn currmove(&self, _depth: i32, _mv: crate::board::Move, _n: u32) {}
        fn bestmove(&self, mv: Option<crate::board::Move>) {
            *self.best.lock().unwrap() = mv;
        }
        fn diagnostic(&self, _message: &str) {}
    }

    #[test]
    fn blocking_search_finds_a_move() {
        let mut pool = SearchPool::new(8, 1);
        let mut board = Board::new();
        let result = pool.search_blocking(&mut board, Limits::depth(4));
        assert!(result.best_move.is_some());
        assert!(result.nodes > 0);
    }

    #[test]
    fn deepening_reports_every_depth_in_order() {
        let mut pool = SearchPool::new(8, 1);
        let board = Board::new();
        let sink = Arc::new(CollectingSink {
            depths: Mutex::new(Vec::new()),
            best: Mutex::new(None),
        });
        pool.start_search(&board, Limits::depth(5), Arc::clone(&sink) as Arc<dyn InfoSink>);
        pool.wait();

        let depths = sink.depths.lock().unwrap().clone();
        assert_eq!(depths, vec![1, 2, 3, 4, 5]);
        assert!(sink.best.lock().unwrap().is_some());
    }

    #[test]
    fn parallel_search_emits_a_legal_bestmove() {
        let mut pool = SearchPool::new(16, 4);
        let mut board =
            Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
        let result = pool.search_blocking(&mut board, Limits::depth(6));
        let best = result.best_move.expect("parallel search found a move");
        assert!(board.legal_moves().contains(best));
    }

    #[test]
    fn infinite_search_stops_on_abort() {
        let mut pool = SearchPool::new(8, 2);
        let board = Board::new();
        pool.start_search(&board, Limits::infinite(), Arc::new(super::super::SilentSink));
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(pool.is_searching());
        let result = pool.abort().expect("infinite search returns on abort");
        assert!(result.best_move.is_some());
    }

    #[test]
    fn stalemate_reports_no_bestmove() {
        let mut pool = SearchPool::new(4, 1);
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let result = pool.search_blocking(&mut board, Limits::depth(3));
        assert!(result.best_move.is_none());
        assert_eq!(result.score, 0);
    }
}
