//! Match detection - run-length scanning for lines of ordinary tiles
//!
//! A match is a maximal run of three or more same-coloured ordinary tiles in
//! one row or one column. Runs close at colour changes, bombs, obstacles,
//! empty cells and board edges. The row pass and the column pass are
//! independent; a tile sitting at the corner of an L belongs to both runs,
//! which is what lets the resolver treat crossings specially.

use matchstone_types::{Axis, Position, TileKind};

use crate::board::Board;

/// A detected run of three or more same-coloured tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRun {
    pub colour: u8,
    pub axis: Axis,
    /// Run cells in ascending board order
    pub cells: Vec<Position>,
}

impl MatchRun {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell of the run (lowest row/col)
    pub fn start(&self) -> Position {
        self.cells[0]
    }

    /// Last cell of the run
    pub fn end(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }

    /// Middle cell of the run (upper-middle for even lengths)
    pub fn midpoint(&self) -> Position {
        self.cells[self.cells.len() / 2]
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

fn colour_at(board: &Board, pos: Position) -> Option<u8> {
    match board.tile_at(pos)?.kind {
        TileKind::Ordinary(n) => Some(n),
        _ => None,
    }
}

/// Scan the whole board for matches
///
/// Row runs are emitted first in raster order, then column runs in
/// column-major order, so the result is deterministic for a given board.
pub fn find_matches(board: &Board) -> Vec<MatchRun> {
    let rows = board.rows() as i8;
    let cols = board.cols() as i8;
    let mut runs = Vec::new();

    for row in 0..rows {
        let mut col = 0;
        while col < cols {
            let pos = Position::new(row, col);
            let Some(colour) = colour_at(board, pos) else {
                col += 1;
                continue;
            };
            let mut end = col + 1;
            while end < cols && colour_at(board, Position::new(row, end)) == Some(colour) {
                end += 1;
            }
            if end - col >= 3 {
                runs.push(MatchRun {
                    colour,
                    axis: Axis::Row,
                    cells: (col..end).map(|c| Position::new(row, c)).collect(),
                });
            }
            col = end;
        }
    }

    for col in 0..cols {
        let mut row = 0;
        while row < rows {
            let pos = Position::new(row, col);
            let Some(colour) = colour_at(board, pos) else {
                row += 1;
                continue;
            };
            let mut end = row + 1;
            while end < rows && colour_at(board, Position::new(end, col)) == Some(colour) {
                end += 1;
            }
            if end - row >= 3 {
                runs.push(MatchRun {
                    colour,
                    axis: Axis::Col,
                    cells: (row..end).map(|r| Position::new(r, col)).collect(),
                });
            }
            row = end;
        }
    }

    runs
}

/// Would swapping these two cells leave at least one match on the board?
///
/// Probes a scratch copy; the real board is untouched. Symmetric in its
/// arguments. Off-board positions are never valid.
pub fn is_valid_swap(board: &Board, a: Position, b: Position) -> bool {
    let mut scratch = board.clone();
    if !scratch.swap(a, b) {
        return false;
    }
    !find_matches(&scratch).is_empty()
}
