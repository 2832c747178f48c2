//! Per-worker move ordering state: butterfly history, killer moves, and
//! the per-root-move node effort counters feeding time management.

use crate::board::{Color, Move, MAX_PLY};

/// History scores live in `[-MAX_HISTORY, MAX_HISTORY]`.
pub const MAX_HISTORY: i32 = 16384;

/// Bonus for a move at a given depth, saturating for deep cutoffs.
#[inline]
#[must_use]
pub fn history_bonus(depth: i32) -> i32 {
    (depth * 155).min(2000)
}

/// Butterfly quiet history indexed by side, from- and to-square.
pub struct HistoryTable {
    entries: Box<[[[i32; 64]; 64]; 2]>,
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: Box::new([[[0; 64]; 64]; 2]),
        }
    }

    #[inline]
    #[must_use]
    pub fn score(&self, side: Color, mv: Move) -> i32 {
        self.entries[side.index()][mv.from().index()][mv.to().index()]
    }

    /// Gravity update: pulls the entry toward the bonus, harder the further
    /// away it is, which keeps values bounded without explicit clamping.
    pub fn update(&mut self, side: Color, mv: Move, bonus: i32) {
        let entry =
            &mut self.entries[side.index()][mv.from().index()][mv.to().index()];
        *entry += bonus - *entry * bonus.abs() / MAX_HISTORY;
    }

    pub fn clear(&mut self) {
        for side in self.entries.iter_mut() {
            for from in side.iter_mut() {
                from.fill(0);
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable::new()
    }
}

/// Two killer slots per ply; a new killer shifts the old one down.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::null(); 2]; MAX_PLY],
        }
    }

    #[inline]
    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::null(), |s| s[0])
    }

    #[inline]
    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::null(), |s| s[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::null(); 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable::new()
    }
}

/// Nodes spent below each root move, indexed by from/to square. The main
/// worker uses the share spent on the final best move to shorten the time
/// budget when the choice is easy.
pub struct EffortTable {
    nodes: Box<[[u64; 64]; 64]>,
}

impl EffortTable {
    #[must_use]
    pub fn new() -> Self {
        EffortTable {
            nodes: Box::new([[0; 64]; 64]),
        }
    }

    #[inline]
    pub fn add(&mut self, mv: Move, nodes: u64) {
        self.nodes[mv.from().index()][mv.to().index()] += nodes;
    }

    #[inline]
    #[must_use]
    pub fn spent_on(&self, mv: Move) -> u64 {
        self.nodes[mv.from().index()][mv.to().index()]
    }

    pub fn clear(&mut self) {
        for from in self.nodes.iter_mut() {
            from.fill(0);
        }
    }
}

impl Default for EffortTable {
    fn default() -> Self {
        EffortTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv(from: usize, to: usize) -> Move {
        Move::quiet(Square::from_index(from), Square::from_index(to))
    }

    #[test]
    fn gravity_update_stays_bounded() {
        let mut table = HistoryTable::new();
        let m = mv(12, 28);
        for _ in 0..10_000 {
            table.update(Color::White, m, history_bonus(20));
        }
        assert!(table.score(Color::White, m) <= MAX_HISTORY);
        for _ in 0..20_000 {
            table.update(Color::White, m, -history_bonus(20));
        }
        assert!(table.score(Color::White, m) >= -MAX_HISTORY);
    }

    #[test]
    fn history_is_per_side() {
        let mut table = HistoryTable::new();
        let m = mv(12, 28);
        table.update(Color::White, m, 500);
        assert_eq!(table.score(Color::Black, m), 0);
        assert!(table.score(Color::White, m) > 0);
    }

    #[test]
    fn killer_update_shifts_slots() {
        let mut killers = KillerTable::new();
        let first = mv(1, 18);
        let second = mv(6, 21);
        killers.update(3, first);
        killers.update(3, second);
        assert_eq!(killers.primary(3), second);
        assert_eq!(killers.secondary(3), first);
        // Re-inserting the primary killer must not duplicate it.
        killers.update(3, second);
        assert_eq!(killers.secondary(3), first);
    }

    #[test]
    fn effort_accumulates_per_root_move() {
        let mut effort = EffortTable::new();
        let m = mv(12, 28);
        effort.add(m, 100);
        effort.add(m, 50);
        assert_eq!(effort.spent_on(m), 150);
    }
}
