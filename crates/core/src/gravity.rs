//! Gravity and refill - column compaction and replacement tile generation
//!
//! Both operations work per column, independently. `settle` compacts movable
//! tiles into the lowest non-obstacle cells, preserving their relative
//! vertical order; obstacles never move and are never landed on. `refill`
//! tops the column back up with freshly sampled ordinary tiles entering from
//! above the grid.

use arrayvec::ArrayVec;

use matchstone_types::{
    Position, TileFall, TileKind, TileSpawn, GENERATION_RETRY_CAP, MAX_GRID_DIM,
};

use crate::board::{Board, Tile};
use crate::level::Level;
use crate::rng::SimpleRng;

type ColumnBuf = ArrayVec<(Position, Tile), { MAX_GRID_DIM as usize }>;

/// Let every movable tile fall as far as it can
///
/// Per column: lift out the movable tiles bottom-up, then drop them back into
/// the lowest non-obstacle cells, bottom-most tile first. Obstacle cells are
/// skipped, so a tile falls past a stone or wood ledge rather than resting on
/// it. Idempotent: settling a settled board moves nothing.
///
/// Returns one [`TileFall`] per tile whose cell changed.
pub fn settle(board: &mut Board) -> Vec<TileFall> {
    let mut falls = Vec::new();

    for col in 0..board.cols() as i8 {
        let mut movers = ColumnBuf::new();
        for row in (0..board.rows() as i8).rev() {
            let pos = Position::new(row, col);
            if let Some(tile) = board.tile_at(pos) {
                if tile.kind.is_movable() {
                    board.take(pos);
                    movers.push((pos, tile));
                }
            }
        }

        // Only obstacles remain in the column; fill around them bottom-up
        let mut next = 0;
        for row in (0..board.rows() as i8).rev() {
            if next >= movers.len() {
                break;
            }
            let pos = Position::new(row, col);
            if board.tile_at(pos).is_some() {
                continue;
            }
            let (from, tile) = movers[next];
            next += 1;
            board.put(pos, Some(tile));
            if from != pos {
                falls.push(TileFall {
                    id: tile.id,
                    from,
                    to: pos,
                });
            }
        }
    }

    falls
}

/// Top every column back up to full with new ordinary tiles
///
/// Vacant non-obstacle cells are filled deepest-first. Each tile first rolls
/// the level's accidental-match chance: a winning roll takes one unconstrained
/// colour sample, otherwise the colour is resampled up to
/// [`GENERATION_RETRY_CAP`] times while it would complete a run at its
/// destination, accepting the last sample on exhaustion. Entry rows count up
/// above the grid (`-1`, `-2`, ...) per column so presentation can stack the
/// drop-in queue.
pub fn refill(board: &mut Board, level: &Level, rng: &mut SimpleRng) -> Vec<TileSpawn> {
    let mut spawns = Vec::new();

    for col in 0..board.cols() as i8 {
        let mut entry_row: i8 = -1;
        for row in (0..board.rows() as i8).rev() {
            let pos = Position::new(row, col);
            if board.tile_at(pos).is_some() {
                continue;
            }

            let mut colour = rng.next_range(u32::from(level.tile_kinds)) as u8;
            if !rng.chance(level.accidental_match_chance) {
                for _ in 0..GENERATION_RETRY_CAP {
                    if !board.completes_run(pos, colour) {
                        break;
                    }
                    colour = rng.next_range(u32::from(level.tile_kinds)) as u8;
                }
            }

            let kind = TileKind::Ordinary(colour);
            let Some(id) = board.spawn(pos, kind) else {
                continue;
            };
            spawns.push(TileSpawn {
                id,
                kind,
                entry: Position::new(entry_row, col),
                destination: pos,
            });
            entry_row -= 1;
        }
    }

    spawns
}
