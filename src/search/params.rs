//! Tunable search parameters.
//!
//! Every empirical threshold the pruning and extension gates use lives
//! here, so retuning never touches search structure.

#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Razoring: below this depth, drop to quiescence when
    /// `eval + razor_margin < alpha`.
    pub razor_depth: i32,
    pub razor_margin: i32,

    /// Reverse futility: fail high when
    /// `eval - rfp_depth_margin * depth + rfp_improving_margin * improving >= beta`.
    pub rfp_depth: i32,
    pub rfp_depth_margin: i32,
    pub rfp_improving_margin: i32,

    /// Null move: minimum depth, and the eval-above-beta divisor feeding
    /// the reduction.
    pub nmp_depth: i32,
    pub nmp_base_reduction: i32,
    pub nmp_eval_divisor: i32,

    /// SEE pruning thresholds per depth, captures vs quiets.
    pub see_capture_depth: i32,
    pub see_capture_margin: i32,
    pub see_quiet_depth: i32,
    pub see_quiet_margin: i32,

    /// Late move pruning: maximum depth and the base move budget
    /// (`lmp_base + depth * depth` quiets are searched).
    pub lmp_depth: i32,
    pub lmp_base: usize,

    /// Singular extensions: minimum depth and margin per depth.
    pub singular_depth: i32,
    pub singular_margin: i32,

    /// Late move reductions: log-product divisor for the base table.
    pub lmr_divisor: f64,

    /// Delta pruning margin in quiescence.
    pub qs_delta_margin: i32,

    /// Aspiration window: initial half-width and the bound magnitude past
    /// which the window snaps fully open.
    pub aspiration_delta: i32,
    pub aspiration_bound: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            razor_depth: 3,
            razor_margin: 129,
            rfp_depth: 7,
            rfp_depth_margin: 64,
            rfp_improving_margin: 71,
            nmp_depth: 3,
            nmp_base_reduction: 5,
            nmp_eval_divisor: 214,
            see_capture_depth: 6,
            see_capture_margin: 92,
            see_quiet_depth: 7,
            see_quiet_margin: 93,
            lmp_depth: 5,
            lmp_base: 4,
            singular_depth: 8,
            singular_margin: 3,
            lmr_divisor: 1.75,
            qs_delta_margin: 400,
            aspiration_delta: 30,
            aspiration_bound: 3500,
        }
    }
}
