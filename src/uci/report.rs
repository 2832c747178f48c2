//! Protocol output: score formatting and the stdout report sink.

use crate::board::Move;
use crate::search::constants::{Score, VALUE_MATE, VALUE_MATE_IN_MAX_PLY};
use crate::search::{DepthReport, InfoSink};

/// Format a score for `info` lines: `cp N` in the centipawn band, `mate N`
/// in the reserved band. Scores within noise of zero print as 0.
#[must_use]
pub fn format_score(score: Score) -> String {
    let score = if score.abs() <= 4 { 0 } else { score };

    if score >= VALUE_MATE_IN_MAX_PLY {
        let plies = VALUE_MATE - score;
        format!("mate {}", plies / 2 + plies % 2)
    } else if score <= -VALUE_MATE_IN_MAX_PLY {
        let plies = VALUE_MATE + score;
        format!("mate {}", -(plies / 2 + plies % 2))
    } else {
        format!("cp {score}")
    }
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sink that prints UCI lines on stdout.
pub struct UciSink;

impl InfoSink for UciSink {
    fn depth_report(&self, report: &DepthReport) {
        println!(
            "info depth {} seldepth {} score {} nodes {} nps {} tbhits {} hashfull {} time {} pv {}",
            report.depth,
            report.seldepth,
            format_score(report.score),
            report.nodes,
            report.nps,
            report.tbhits,
            report.hashfull,
            report.time_ms,
            format_pv(&report.pv),
        );
    }

    fn currmove(&self, depth: i32, mv: Move, move_number: u32) {
        println!("info depth {depth} currmove {mv} currmovenumber {move_number}");
    }

    fn bestmove(&self, mv: Option<Move>) {
        match mv {
            Some(mv) => println!("bestmove {mv}"),
            None => println!("bestmove (none)"),
        }
    }

    fn diagnostic(&self, message: &str) {
        println!("info string {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::constants::{mate_in, mated_in};

    #[test]
    fn centipawn_scores_format_plainly() {
        assert_eq!(format_score(123), "cp 123");
        assert_eq!(format_score(-850), "cp -850");
    }

    #[test]
    fn near_zero_scores_collapse_to_zero() {
        assert_eq!(format_score(3), "cp 0");
        assert_eq!(format_score(-4), "cp 0");
        assert_eq!(format_score(5), "cp 5");
    }

    #[test]
    fn mate_scores_count_full_moves() {
        assert_eq!(format_score(mate_in(1)), "mate 1");
        assert_eq!(format_score(mate_in(2)), "mate 1");
        assert_eq!(format_score(mate_in(3)), "mate 2");
        assert_eq!(format_score(mate_in(5)), "mate 3");
    }

    #[test]
    fn mated_scores_are_negative() {
        assert_eq!(format_score(mated_in(1)), "mate -1");
        assert_eq!(format_score(mated_in(2)), "mate -1");
        assert_eq!(format_score(mated_in(4)), "mate -2");
    }
}
