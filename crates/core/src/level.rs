//! Level module - static per-level configuration
//!
//! Levels are external data (JSON in the shipped game) describing the grid,
//! the move budget, obstacle placement and destruction goals. The engine
//! validates a level once at game construction; a level that passes
//! [`Level::validate`] can always be generated and played.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use matchstone_types::{
    Position, CODE_WOOD_NORMAL, MAX_GRID_DIM, MAX_ORDINARY_KINDS, MIN_GRID_DIM,
};

/// A cell reference in level data (unsigned, always on the board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u8,
    pub col: u8,
}

impl CellRef {
    pub fn new(row: u8, col: u8) -> Self {
        CellRef { row, col }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row as i8, self.col as i8)
    }
}

/// A destruction goal: destroy `count` tiles crediting under `kind_code`
///
/// Valid codes are ordinary colour indices below the level's `tile_kinds`
/// and `CODE_WOOD_NORMAL` for wooden obstacles. Bombs and stone never
/// credit goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub kind_code: u16,
    pub count: u32,
}

/// Static definition of one playable level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub rows: u8,
    pub cols: u8,
    /// Accepted moves before the attempt fails
    pub max_moves: u32,
    /// Number of ordinary colours in play (codes `0..tile_kinds`)
    pub tile_kinds: u8,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Moves-remaining thresholds for 1, 2 and 3 stars, non-decreasing
    pub star_thresholds: [u32; 3],
    #[serde(default)]
    pub wooden_tiles: Vec<CellRef>,
    #[serde(default)]
    pub stone_tiles: Vec<CellRef>,
    /// Percent chance that a refill tile skips match avoidance (0..=100)
    #[serde(default)]
    pub accidental_match_chance: u32,
}

/// Faults in level data, reported at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("board dimensions {rows}x{cols} outside {MIN_GRID_DIM}..={MAX_GRID_DIM}")]
    BadDimensions { rows: u8, cols: u8 },
    #[error("tile_kinds {0} outside 1..={MAX_ORDINARY_KINDS}")]
    BadTileKinds(u8),
    #[error("max_moves must be at least 1")]
    NoMoves,
    #[error("obstacle at {row},{col} outside the board")]
    ObstacleOutOfBounds { row: u8, col: u8 },
    #[error("two obstacles configured at {row},{col}")]
    ObstacleOverlap { row: u8, col: u8 },
    #[error("obstacles cover every cell of the board")]
    NoPlayableCells,
    #[error("goal code {0} is not a creditable kind for this level")]
    BadGoalKind(u16),
    #[error("level declares no goals and has no wooden tiles")]
    NoGoals,
    #[error("star thresholds {0:?} must be non-decreasing")]
    BadStarThresholds([u32; 3]),
    #[error("accidental_match_chance {0} exceeds 100")]
    BadChance(u32),
}

impl Level {
    /// Check every structural constraint on the level data
    pub fn validate(&self) -> Result<(), LevelError> {
        let dims_ok = |d: u8| (MIN_GRID_DIM..=MAX_GRID_DIM).contains(&d);
        if !dims_ok(self.rows) || !dims_ok(self.cols) {
            return Err(LevelError::BadDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.tile_kinds == 0 || self.tile_kinds > MAX_ORDINARY_KINDS {
            return Err(LevelError::BadTileKinds(self.tile_kinds));
        }
        if self.max_moves == 0 {
            return Err(LevelError::NoMoves);
        }
        if self.accidental_match_chance > 100 {
            return Err(LevelError::BadChance(self.accidental_match_chance));
        }

        let mut seen = vec![false; self.rows as usize * self.cols as usize];
        for cell in self.wooden_tiles.iter().chain(&self.stone_tiles) {
            if cell.row >= self.rows || cell.col >= self.cols {
                return Err(LevelError::ObstacleOutOfBounds {
                    row: cell.row,
                    col: cell.col,
                });
            }
            let idx = cell.row as usize * self.cols as usize + cell.col as usize;
            if seen[idx] {
                return Err(LevelError::ObstacleOverlap {
                    row: cell.row,
                    col: cell.col,
                });
            }
            seen[idx] = true;
        }
        let obstacle_count = self.wooden_tiles.len() + self.stone_tiles.len();
        if obstacle_count >= self.rows as usize * self.cols as usize {
            return Err(LevelError::NoPlayableCells);
        }

        // At least one goal, declared or the implicit wood one
        if self.goals.is_empty() && self.wooden_tiles.is_empty() {
            return Err(LevelError::NoGoals);
        }
        for goal in &self.goals {
            let ordinary = goal.kind_code < u16::from(self.tile_kinds);
            let wood = goal.kind_code == CODE_WOOD_NORMAL && !self.wooden_tiles.is_empty();
            if !ordinary && !wood {
                return Err(LevelError::BadGoalKind(goal.kind_code));
            }
        }

        let [t1, t2, t3] = self.star_thresholds;
        if t1 > t2 || t2 > t3 {
            return Err(LevelError::BadStarThresholds(self.star_thresholds));
        }

        Ok(())
    }

    /// Number of wooden obstacles the level starts with
    pub fn wood_count(&self) -> u32 {
        self.wooden_tiles.len() as u32
    }

    /// True when the level declares its own wood goal
    pub fn has_explicit_wood_goal(&self) -> bool {
        self.goals.iter().any(|g| g.kind_code == CODE_WOOD_NORMAL)
    }
}
