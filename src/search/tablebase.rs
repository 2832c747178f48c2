//! Endgame tablebase adapter.
//!
//! The search consults tablebases through the small [`TablebaseProber`]
//! trait: a win/draw/loss probe at interior nodes and a distance-to-zeroing
//! best-move probe at the root. The bundled implementation bridges into
//! Syzygy tables via `shakmaty-syzygy`; the FEN round trip is only paid at
//! low piece counts.

use std::path::Path;

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};
use shakmaty_syzygy::{Tablebase, Wdl as SyzygyWdl};

use crate::board::{Board, Move};

/// Win/draw/loss from the side to move's perspective. Cursed wins and
/// blessed losses count as draws: the fifty-move rule stops conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wdl {
    Win,
    Draw,
    Loss,
}

/// Root probe result: the move to play plus its class and distance.
#[derive(Clone, Copy, Debug)]
pub struct RootProbe {
    pub mv: Move,
    pub wdl: Wdl,
    pub dtz: i32,
}

/// The two operations the search needs; the backing library is
/// replaceable.
pub trait TablebaseProber: Send + Sync {
    /// Largest piece count the loaded tables cover.
    fn max_pieces(&self) -> u32;

    /// Interior-node WDL probe. `None` when the position is not covered.
    fn probe_wdl(&self, board: &Board) -> Option<Wdl>;

    /// Root probe: the DTZ-optimal move, if the tables know one.
    fn probe_root(&self, board: &mut Board) -> Option<RootProbe>;
}

/// Syzygy-backed prober.
pub struct SyzygyTablebase {
    tables: Tablebase<Chess>,
}

impl SyzygyTablebase {
    /// Load all tables found under `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut tables = Tablebase::new();
        tables.add_directory(path.as_ref())?;
        Ok(SyzygyTablebase { tables })
    }

    /// Bridge the engine board into a shakmaty position.
    fn to_probe_position(board: &Board) -> Option<Chess> {
        let fen: Fen = board.to_fen().parse().ok()?;
        fen.into_position(CastlingMode::Standard).ok()
    }

    fn map_wdl(wdl: SyzygyWdl) -> Wdl {
        match wdl {
            SyzygyWdl::Win => Wdl::Win,
            SyzygyWdl::Loss => Wdl::Loss,
            SyzygyWdl::CursedWin | SyzygyWdl::BlessedLoss | SyzygyWdl::Draw => Wdl::Draw,
        }
    }
}

impl TablebaseProber for SyzygyTablebase {
    fn max_pieces(&self) -> u32 {
        self.tables.max_pieces() as u32
    }

    fn probe_wdl(&self, board: &Board) -> Option<Wdl> {
        let pos = Self::to_probe_position(board)?;
        self.tables
            .probe_wdl_after_zeroing(&pos)
            .ok()
            .map(Self::map_wdl)
    }

    fn probe_root(&self, board: &mut Board) -> Option<RootProbe> {
        let pos = Self::to_probe_position(board)?;
        let (tb_move, dtz) = self.tables.best_move(&pos).ok().flatten()?;

        let wdl = self
            .tables
            .probe_wdl_after_zeroing(&pos)
            .ok()
            .map(Self::map_wdl)?;

        // The table move comes back in the foreign move type; match it
        // against our own legal moves through its UCI spelling.
        let uci = tb_move.to_uci(CastlingMode::Standard).to_string();
        let mv = board.parse_move(&uci).ok()?;

        Some(RootProbe {
            mv,
            wdl,
            dtz: dtz.ignore_rounding().0,
        })
    }
}
