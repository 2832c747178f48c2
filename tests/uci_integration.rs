//! UCI front-end integration: commands drive the controller, output flows
//! through the sink.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use basalt::board::Move;
use basalt::engine::EngineController;
use basalt::search::{DepthReport, InfoSink};
use basalt::uci::{parse_uci_command, UciCommand};

#[derive(Default)]
struct CollectingSink {
    reports: Mutex<Vec<DepthReport>>,
    bestmoves: Mutex<Vec<Option<Move>>>,
    diagnostics: Mutex<Vec<String>>,
}

impl InfoSink for CollectingSink {
    fn depth_report(&self, report: &DepthReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
    fn currmove(&self, _depth: i32, _mv: Move, _move_number: u32) {}
    fn bestmove(&self, mv: Option<Move>) {
        self.bestmoves.lock().unwrap().push(mv);
    }
    fn diagnostic(&self, message: &str) {
        self.diagnostics.lock().unwrap().push(message.to_string());
    }
}

fn drive(controller: &mut EngineController, lines: &[&str]) {
    for line in lines {
        let command = parse_uci_command(line).expect("parsable command");
        assert!(controller.handle(command), "unexpected quit on {line}");
    }
}

/// Searches finish on their own schedule; block until `bestmove` arrives.
fn wait_for_bestmove(sink: &CollectingSink) -> Option<Move> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(mv) = sink.bestmoves.lock().unwrap().first() {
            return *mv;
        }
        assert!(Instant::now() < deadline, "search never finished");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn go_depth_emits_reports_and_a_bestmove() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(
        &mut controller,
        &["position startpos moves e2e4 e7e5", "go depth 4"],
    );
    assert!(wait_for_bestmove(&sink).is_some());

    let reports = sink.reports.lock().unwrap();
    assert!(!reports.is_empty());
    assert!(reports.windows(2).all(|w| w[0].depth < w[1].depth));
}

#[test]
fn quit_returns_false() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink);
    assert!(!controller.handle(UciCommand::Quit));
}

#[test]
fn position_command_updates_the_board() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(
        &mut controller,
        &["position fen 6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", "go depth 3"],
    );
    assert_eq!(wait_for_bestmove(&sink).unwrap().to_string(), "a1a8");
}

#[test]
fn bad_position_is_reported_not_fatal() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(&mut controller, &["position fen not a real fen at all 1"]);
    assert!(!sink.diagnostics.lock().unwrap().is_empty());
}

#[test]
fn setoption_and_newgame_are_accepted_mid_session() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(
        &mut controller,
        &[
            "setoption name Hash value 32",
            "setoption name Threads value 2",
            "ucinewgame",
            "position startpos",
            "go depth 3",
        ],
    );
    assert!(wait_for_bestmove(&sink).is_some());
}

#[test]
fn stop_during_infinite_search_yields_a_bestmove() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(&mut controller, &["position startpos", "go infinite"]);
    std::thread::sleep(Duration::from_millis(50));
    drive(&mut controller, &["stop"]);

    assert!(wait_for_bestmove(&sink).is_some());
}

#[test]
fn go_movetime_terminates_on_its_own() {
    let sink = Arc::new(CollectingSink::default());
    let mut controller = EngineController::new(sink.clone());

    drive(&mut controller, &["position startpos", "go movetime 100"]);
    assert!(wait_for_bestmove(&sink).is_some());
}
