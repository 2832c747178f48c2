//! Wall-clock budget computation from UCI clock parameters.

use crate::board::Color;
use crate::search::TimeBudget;
use crate::uci::GoParams;

/// Assumed moves remaining when the GUI does not say.
const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Fraction of the remaining clock the hard ceiling may never exceed.
const MAX_TIME_PERCENT: u64 = 80;

/// Compute the optimum/maximum envelope for the side to move.
///
/// `move_overhead_ms` covers protocol latency; it is deducted from the
/// remaining clock before any split.
#[must_use]
pub fn compute_time_budget(
    params: &GoParams,
    side: Color,
    move_overhead_ms: u64,
) -> TimeBudget {
    if let Some(movetime) = params.movetime {
        let ms = movetime.saturating_sub(move_overhead_ms).max(1);
        return TimeBudget {
            optimum: ms,
            maximum: ms,
        };
    }

    let (time, inc) = match side {
        Color::White => (params.wtime, params.winc.unwrap_or(0)),
        Color::Black => (params.btime, params.binc.unwrap_or(0)),
    };
    let Some(time) = time else {
        return TimeBudget::default();
    };

    let remaining = time.saturating_sub(move_overhead_ms).max(1);
    let movestogo = params.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);

    let mut optimum = remaining / movestogo + inc * 3 / 4;
    let maximum = (optimum * 3)
        .min(remaining * MAX_TIME_PERCENT / 100)
        .max(1);
    optimum = optimum.min(maximum);

    TimeBudget {
        optimum: optimum.max(1),
        maximum,
    }
}
