//! Read-only view of a settled game state
//!
//! Snapshots are what renderers and persistence collaborators consume after
//! every settled state: the live tile list, goal tallies, move counters and
//! phase, all by value and serializable. [`crate::game::Game::snapshot_into`]
//! refills an existing snapshot without reallocating its vectors, for
//! callers polling every settled state.

use serde::Serialize;

/// One live tile, by id, kind code and cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub id: u32,
    pub code: u16,
    pub row: i8,
    pub col: i8,
}

/// One goal with its running tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalView {
    pub kind_code: u16,
    pub target: u32,
    pub done: u32,
}

/// Everything a collaborator needs between moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub rows: u8,
    pub cols: u8,
    /// Live tiles in raster order
    pub tiles: Vec<TileView>,
    pub goals: Vec<GoalView>,
    pub moves_used: u32,
    pub moves_remaining: u32,
    pub phase: &'static str,
}

impl GameSnapshot {
    /// Reset to an empty snapshot, keeping vector capacity
    pub fn clear(&mut self) {
        self.rows = 0;
        self.cols = 0;
        self.tiles.clear();
        self.goals.clear();
        self.moves_used = 0;
        self.moves_remaining = 0;
        self.phase = "idle";
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            tiles: Vec::new(),
            goals: Vec::new(),
            moves_used: 0,
            moves_remaining: 0,
            phase: "idle",
        }
    }
}
