//! Board module - the tile grid and its structural operations
//!
//! The board is a `rows x cols` grid where each cell holds at most one tile.
//! Uses flat row-major storage. Obstacles are pinned at generation time and
//! never move; ordinary tiles and bombs occupy the remaining cells.
//!
//! Tile ids are allocated by a per-board counter and are never reused, so an
//! id names the same logical tile across falls and in-place bomb conversion.

use matchstone_types::{Position, TileId, TileKind, GENERATION_RETRY_CAP};

use crate::level::Level;
use crate::matches::{find_matches, is_valid_swap};
use crate::rng::SimpleRng;

/// A tile occupying one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

/// The game board - flat array storage, row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Flat array of cells (row * cols + col)
    cells: Vec<Option<Tile>>,
    /// Next tile id; monotonic, never reused within this board
    next_id: u32,
}

impl Board {
    /// Create an empty board of the given dimensions
    pub fn empty(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
            next_id: 0,
        }
    }

    /// Generate a starting board for a level
    ///
    /// Obstacles first, then a raster fill (top-to-bottom, left-to-right) of
    /// ordinary tiles. Each cell resamples its colour up to
    /// [`GENERATION_RETRY_CAP`] times while it would complete a run with the
    /// two cells to its left or the two above; on exhaustion the last sample
    /// is accepted and the opening scan deals with whatever it made.
    pub fn generate(level: &Level, rng: &mut SimpleRng) -> Self {
        let mut board = Board::empty(level.rows, level.cols);
        for cell in &level.wooden_tiles {
            board.spawn(cell.position(), TileKind::WoodNormal);
        }
        for cell in &level.stone_tiles {
            board.spawn(cell.position(), TileKind::Stone);
        }

        for row in 0..level.rows as i8 {
            for col in 0..level.cols as i8 {
                let pos = Position::new(row, col);
                if board.tile_at(pos).is_some() {
                    continue;
                }
                let mut colour = rng.next_range(u32::from(level.tile_kinds)) as u8;
                for _ in 0..GENERATION_RETRY_CAP {
                    if !board.makes_raster_run(pos, colour) {
                        break;
                    }
                    colour = rng.next_range(u32::from(level.tile_kinds)) as u8;
                }
                board.spawn(pos, TileKind::Ordinary(colour));
            }
        }
        board
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.row >= self.rows as i8 || pos.col < 0 || pos.col >= self.cols as i8 {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    fn position_of(&self, idx: usize) -> Position {
        Position::new(
            (idx / self.cols as usize) as i8,
            (idx % self.cols as usize) as i8,
        )
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Check if a position is on the board
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell contents at a position
    /// Returns `None` if out of bounds, `Some(None)` for an empty cell
    pub fn get(&self, pos: Position) -> Option<Option<Tile>> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Get the tile at a position, if the cell is on the board and occupied
    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.get(pos).flatten()
    }

    /// Set cell contents at a position
    /// Returns false if out of bounds
    pub fn put(&mut self, pos: Position, cell: Option<Tile>) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Allocate a fresh tile id
    pub fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a brand-new tile of the given kind at a position
    /// Returns the allocated id, or `None` if the position is off the board
    pub fn spawn(&mut self, pos: Position, kind: TileKind) -> Option<TileId> {
        let idx = self.index(pos)?;
        let id = self.alloc_id();
        self.cells[idx] = Some(Tile { id, kind });
        Some(id)
    }

    /// Remove and return the tile at a position
    pub fn take(&mut self, pos: Position) -> Option<Tile> {
        let idx = self.index(pos)?;
        self.cells[idx].take()
    }

    /// Swap the contents of two cells
    /// Returns false (and leaves the board untouched) if either is off-board
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Iterate all occupied cells in raster order
    pub fn iter_tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| cell.map(|tile| (self.position_of(idx), tile)))
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn colour_at(&self, pos: Position) -> Option<u8> {
        match self.tile_at(pos)?.kind {
            TileKind::Ordinary(n) => Some(n),
            _ => None,
        }
    }

    /// Would placing `colour` here close a run with cells already filled by a
    /// raster-order generation pass (two to the left or two above)?
    fn makes_raster_run(&self, pos: Position, colour: u8) -> bool {
        let left = self.colour_at(pos.offset(0, -1)) == Some(colour)
            && self.colour_at(pos.offset(0, -2)) == Some(colour);
        let up = self.colour_at(pos.offset(-1, 0)) == Some(colour)
            && self.colour_at(pos.offset(-2, 0)) == Some(colour);
        left || up
    }

    /// Would placing `colour` here complete a run of three in any direction?
    ///
    /// Unlike the raster-order generation check this covers all six patterns
    /// (two left, straddle, two right; and the same vertically), so it is
    /// correct for cells filled out of raster order, e.g. refills.
    pub fn completes_run(&self, pos: Position, colour: u8) -> bool {
        let c = |dr: i8, dc: i8| self.colour_at(pos.offset(dr, dc)) == Some(colour);

        // Horizontal: xx_, x_x, _xx
        if (c(0, -2) && c(0, -1)) || (c(0, -1) && c(0, 1)) || (c(0, 1) && c(0, 2)) {
            return true;
        }
        // Vertical: same three shapes
        (c(-2, 0) && c(-1, 0)) || (c(-1, 0) && c(1, 0)) || (c(1, 0) && c(2, 0))
    }

    /// Does any accepted move exist on this board?
    ///
    /// True when a bomb is present (a tap is always available) or when some
    /// orthogonally adjacent pair of ordinary tiles would match if swapped.
    /// Each pair is probed once, against its right and down neighbours.
    pub fn has_valid_moves(&self) -> bool {
        if self.iter_tiles().any(|(_, tile)| tile.kind.is_bomb()) {
            return true;
        }

        for row in 0..self.rows as i8 {
            for col in 0..self.cols as i8 {
                let pos = Position::new(row, col);
                if self.colour_at(pos).is_none() {
                    continue;
                }
                for (dr, dc) in [(0, 1), (1, 0)] {
                    let neighbour = pos.offset(dr, dc);
                    if self.colour_at(neighbour).is_none() {
                        continue;
                    }
                    if is_valid_swap(self, pos, neighbour) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Re-type the ordinary tiles in place until no run of three exists
    ///
    /// Bombs and obstacles keep their cells and kinds; ordinary tiles keep
    /// their cells and ids but draw fresh shuffled colours. Each attempt that
    /// still contains a match is rejected; after `max_attempts` the last
    /// arrangement stands (the next scan resolves anything it left).
    ///
    /// Returns true when the accepted arrangement is match-free.
    pub fn reshuffle(&mut self, level: &Level, rng: &mut SimpleRng, max_attempts: u32) -> bool {
        let slots: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.map_or(false, |t| t.kind.is_ordinary()))
            .map(|(idx, _)| idx)
            .collect();
        if slots.is_empty() {
            return find_matches(self).is_empty();
        }

        for _ in 0..max_attempts {
            let mut colours: Vec<u8> = (0..slots.len())
                .map(|_| rng.next_range(u32::from(level.tile_kinds)) as u8)
                .collect();
            rng.shuffle(&mut colours);

            for (&idx, &colour) in slots.iter().zip(&colours) {
                if let Some(tile) = &mut self.cells[idx] {
                    tile.kind = TileKind::Ordinary(colour);
                }
            }
            if find_matches(self).is_empty() {
                return true;
            }
        }
        false
    }

    /// Build a board from kind rows for testing; ids run sequentially in
    /// raster order, so fixtures can predict them
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Option<TileKind>>>) -> Self {
        let height = rows.len() as u8;
        let width = rows.first().map_or(0, |r| r.len()) as u8;
        assert!(rows.iter().all(|r| r.len() == width as usize));

        let mut board = Board::empty(height, width);
        for (r, row) in rows.iter().enumerate() {
            for (c, kind) in row.iter().enumerate() {
                if let Some(kind) = kind {
                    board.spawn(Position::new(r as i8, c as i8), *kind);
                }
            }
        }
        board
    }

    /// Dump the grid as kind rows for testing/display
    #[cfg(test)]
    pub fn kinds(&self) -> Vec<Vec<Option<TileKind>>> {
        (0..self.rows as i8)
            .map(|r| {
                (0..self.cols as i8)
                    .map(|c| self.tile_at(Position::new(r, c)).map(|t| t.kind))
                    .collect()
            })
            .collect()
    }
}
