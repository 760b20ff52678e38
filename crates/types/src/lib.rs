//! Shared types module - data structures and constants for the match engine
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules core, rendering, replay tooling, headless runs).
//!
//! # Tile Codes
//!
//! Every tile kind has a stable numeric code used by snapshots, goal
//! definitions and destruction events. Ordinary tiles use their colour index
//! directly; special kinds use reserved ranges:
//!
//! | Code | Kind | Notes |
//! |------|------|-------|
//! | `0..=7` | `Ordinary(n)` | colour index, up to `MAX_ORDINARY_KINDS` |
//! | `100` | `BombVertical` | clears its column |
//! | `101` | `BombHorizontal` | clears its row |
//! | `102` | `BombArea` | clears a 5x5 block |
//! | `200` | `WoodNormal` | destructible obstacle, intact |
//! | `201` | `WoodBroken` | destructible obstacle, damaged |
//! | `300` | `Stone` | indestructible obstacle |
//!
//! Goal accounting always credits wood under code `200` regardless of the
//! damage stage the tile was in when destroyed (see [`TileKind::goal_code`]).
//!
//! # Pacing Constants
//!
//! The engine itself never sleeps; cascades resolve synchronously and every
//! effect carries a logical `delay` in cell units. Presentation layers convert
//! delays to wall time with these advisory constants (milliseconds):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `HIT_STAGGER_MS` | 60 | per delay unit, blast ripple pacing |
//! | `REMOVAL_PULSE_MS` | 180 | removal highlight duration |
//! | `FALL_STEP_MS` | 90 | per cell of gravity travel |
//!
//! # Retry Caps
//!
//! Randomized placement is bounded: after `GENERATION_RETRY_CAP` resamples the
//! board accepts the last candidate, and after `RESHUFFLE_RETRY_CAP` rejected
//! shuffles the last arrangement stands. Degraded results are legal states;
//! the next scan picks up whatever they left behind.
//!
//! # Examples
//!
//! ```
//! use matchstone_types::{Position, TileKind, PlayerAction, MAX_GRID_DIM};
//!
//! // Classify tile kinds
//! let red = TileKind::Ordinary(0);
//! assert!(red.is_ordinary() && red.is_movable());
//! assert!(TileKind::BombArea.is_bomb());
//! assert!(TileKind::Stone.is_obstacle() && !TileKind::Stone.is_movable());
//!
//! // Codes round-trip
//! assert_eq!(TileKind::from_code(101), Some(TileKind::BombHorizontal));
//! assert_eq!(TileKind::BombHorizontal.code(), 101);
//!
//! // Positions order row-major and know their neighbours
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! // Player intents
//! let swap = PlayerAction::Swap { from: a, to: Position::new(2, 4) };
//! assert!(matches!(swap, PlayerAction::Swap { .. }));
//!
//! assert_eq!(MAX_GRID_DIM, 16);
//! ```

/// Smallest supported board dimension (rows and columns)
pub const MIN_GRID_DIM: u8 = 3;

/// Largest supported board dimension (rows and columns)
pub const MAX_GRID_DIM: u8 = 16;

/// Maximum number of ordinary tile colours a level may use
pub const MAX_ORDINARY_KINDS: u8 = 8;

/// Resample attempts per cell before generation/refill accepts the last candidate
pub const GENERATION_RETRY_CAP: u32 = 50;

/// Full-board shuffle attempts before a reshuffle accepts the last arrangement
pub const RESHUFFLE_RETRY_CAP: u32 = 100;

/// Reshuffle rounds the controller tries before letting a moveless board stand
pub const MAX_RESHUFFLE_ROUNDS: u32 = 8;

/// Resolution passes per cascade before the resolver stops early
///
/// Unreachable in normal play (refill avoids new matches); only degenerate
/// configurations such as a single colour can keep a cascade alive forever,
/// and those stop here instead.
pub const MAX_CASCADE_PASSES: u32 = 1024;

/// Chebyshev radius of an area bomb blast (radius 2 = 5x5 block)
pub const AREA_BLAST_RADIUS: i8 = 2;

/// Advisory pacing: milliseconds per blast delay unit
pub const HIT_STAGGER_MS: u32 = 60;

/// Advisory pacing: removal highlight duration in milliseconds
pub const REMOVAL_PULSE_MS: u32 = 180;

/// Advisory pacing: milliseconds per cell of gravity travel
pub const FALL_STEP_MS: u32 = 90;

/// Numeric code for [`TileKind::BombVertical`]
pub const CODE_BOMB_VERTICAL: u16 = 100;

/// Numeric code for [`TileKind::BombHorizontal`]
pub const CODE_BOMB_HORIZONTAL: u16 = 101;

/// Numeric code for [`TileKind::BombArea`]
pub const CODE_BOMB_AREA: u16 = 102;

/// Numeric code for [`TileKind::WoodNormal`]
pub const CODE_WOOD_NORMAL: u16 = 200;

/// Numeric code for [`TileKind::WoodBroken`]
pub const CODE_WOOD_BROKEN: u16 = 201;

/// Numeric code for [`TileKind::Stone`]
pub const CODE_STONE: u16 = 300;

/// Stable identity of a tile, allocated by the board that owns it.
///
/// Ids survive gravity moves and in-place bomb conversion; a removed tile's
/// id is never reused within the same board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// The kinds of tile that can occupy a board cell
///
/// Ordinary tiles match and fall; bombs fall but never match; wood and stone
/// are obstacles pinned to their cells. Wood has two damage stages, stone is
/// indestructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Ordinary coloured tile; the payload is the colour index
    Ordinary(u8),
    /// Clears its whole column when detonated
    BombVertical,
    /// Clears its whole row when detonated
    BombHorizontal,
    /// Clears a 5x5 block centred on itself when detonated
    BombArea,
    /// Intact wooden obstacle (two hits to destroy)
    WoodNormal,
    /// Damaged wooden obstacle (one hit to destroy)
    WoodBroken,
    /// Indestructible stone obstacle
    Stone,
}

impl TileKind {
    /// True for ordinary coloured tiles
    pub fn is_ordinary(&self) -> bool {
        matches!(self, TileKind::Ordinary(_))
    }

    /// True for any bomb kind
    pub fn is_bomb(&self) -> bool {
        matches!(
            self,
            TileKind::BombVertical | TileKind::BombHorizontal | TileKind::BombArea
        )
    }

    /// True for wooden obstacles in either damage stage
    pub fn is_wooden(&self) -> bool {
        matches!(self, TileKind::WoodNormal | TileKind::WoodBroken)
    }

    /// True for stone obstacles
    pub fn is_stone(&self) -> bool {
        matches!(self, TileKind::Stone)
    }

    /// True for any obstacle (wood or stone)
    pub fn is_obstacle(&self) -> bool {
        self.is_wooden() || self.is_stone()
    }

    /// True for tiles that participate in gravity (ordinary tiles and bombs)
    pub fn is_movable(&self) -> bool {
        self.is_ordinary() || self.is_bomb()
    }

    /// Stable numeric code for snapshots, goals and events
    ///
    /// # Examples
    ///
    /// ```
    /// use matchstone_types::TileKind;
    ///
    /// assert_eq!(TileKind::Ordinary(3).code(), 3);
    /// assert_eq!(TileKind::BombVertical.code(), 100);
    /// assert_eq!(TileKind::Stone.code(), 300);
    /// ```
    pub fn code(&self) -> u16 {
        match self {
            TileKind::Ordinary(n) => u16::from(*n),
            TileKind::BombVertical => CODE_BOMB_VERTICAL,
            TileKind::BombHorizontal => CODE_BOMB_HORIZONTAL,
            TileKind::BombArea => CODE_BOMB_AREA,
            TileKind::WoodNormal => CODE_WOOD_NORMAL,
            TileKind::WoodBroken => CODE_WOOD_BROKEN,
            TileKind::Stone => CODE_STONE,
        }
    }

    /// Parse a numeric code back into a kind
    ///
    /// Ordinary codes are accepted up to `MAX_ORDINARY_KINDS - 1`; anything
    /// else outside the reserved codes returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use matchstone_types::TileKind;
    ///
    /// assert_eq!(TileKind::from_code(0), Some(TileKind::Ordinary(0)));
    /// assert_eq!(TileKind::from_code(201), Some(TileKind::WoodBroken));
    /// assert_eq!(TileKind::from_code(99), None);
    /// ```
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            c if c < u16::from(MAX_ORDINARY_KINDS) => Some(TileKind::Ordinary(c as u8)),
            CODE_BOMB_VERTICAL => Some(TileKind::BombVertical),
            CODE_BOMB_HORIZONTAL => Some(TileKind::BombHorizontal),
            CODE_BOMB_AREA => Some(TileKind::BombArea),
            CODE_WOOD_NORMAL => Some(TileKind::WoodNormal),
            CODE_WOOD_BROKEN => Some(TileKind::WoodBroken),
            CODE_STONE => Some(TileKind::Stone),
            _ => None,
        }
    }

    /// Code under which destruction of this kind is credited to goals
    ///
    /// Wood credits under `CODE_WOOD_NORMAL` whatever stage it was destroyed
    /// in; every other kind credits under its own code.
    pub fn goal_code(&self) -> u16 {
        match self {
            TileKind::WoodBroken => CODE_WOOD_NORMAL,
            other => other.code(),
        }
    }
}


/// Axis of a match run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Col,
}

/// A cell coordinate on the board
///
/// Rows grow downward, columns grow rightward. Coordinates are signed so that
/// refill entry points can sit above the grid (negative rows); all in-board
/// positions are non-negative. Ordering is row-major, which fixes scan and
/// event order across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// True when `other` shares an edge with `self`
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dr = (i16::from(self.row) - i16::from(other.row)).abs();
        let dc = (i16::from(self.col) - i16::from(other.col)).abs();
        dr + dc == 1
    }

    /// The position offset by the given row/column deltas
    pub fn offset(&self, dr: i8, dc: i8) -> Position {
        Position::new(self.row + dr, self.col + dc)
    }
}

/// A player intent handed to the controller
///
/// Both variants are validated by the controller; invalid intents are
/// rejected without consuming a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Swap two orthogonally adjacent tiles
    Swap { from: Position, to: Position },
    /// Detonate the bomb at the given cell
    Tap(Position),
}

/// Lifecycle phase of a level attempt
///
/// There is no "resolving" phase: cascade resolution happens synchronously
/// inside the controller call, so an observer can never see one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting moves
    Idle,
    /// All goals met; no further moves accepted
    Complete,
    /// Move budget exhausted with goals outstanding
    Failed,
}

impl Phase {
    /// True once the attempt has ended, in either direction
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Idle)
    }

    /// Lowercase name for transcripts and snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Complete => "complete",
            Phase::Failed => "failed",
        }
    }
}

/// A bomb going off, with the logical delay at which it fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Position,
    /// Cell-distance delay from the pass trigger (0 for seeded bombs)
    pub delay: u32,
}

/// A tile leaving the board
///
/// `delay` is the logical hit time of the cell: 0 for plain match removals,
/// the blast travel distance for bomb-hit cells. Presentation layers multiply
/// by [`HIT_STAGGER_MS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedTile {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Position,
    pub delay: u32,
}

/// One damage step applied to a wooden obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WoodHit {
    pub position: Position,
    /// `false`: intact -> broken. `true`: broken -> destroyed (also removed).
    pub crushed: bool,
}

/// A bomb materializing out of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombSpawn {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Position,
    /// True when an existing tile was converted in place (id preserved)
    pub converted: bool,
}

/// A tile settling under gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFall {
    pub id: TileId,
    pub from: Position,
    pub to: Position,
}

/// A refill tile entering from above the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpawn {
    pub id: TileId,
    pub kind: TileKind,
    /// Above-grid entry cell (negative row), for drop-in animation
    pub entry: Position,
    pub destination: Position,
}

/// Everything that happened in one resolution pass, in contract order:
/// detonations, wood damage, removals, bomb spawns, falls, refills.
///
/// A cascade is a `Vec<PassEvents>`; pass `n + 1` was caused entirely by the
/// board state pass `n` left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassEvents {
    pub detonations: Vec<Detonation>,
    pub wood_hits: Vec<WoodHit>,
    pub removed: Vec<RemovedTile>,
    pub bombs_spawned: Vec<BombSpawn>,
    pub falls: Vec<TileFall>,
    pub spawns: Vec<TileSpawn>,
}

impl PassEvents {
    /// True when the pass changed nothing (quiescence marker)
    pub fn is_empty(&self) -> bool {
        self.detonations.is_empty()
            && self.wood_hits.is_empty()
            && self.removed.is_empty()
            && self.bombs_spawned.is_empty()
            && self.falls.is_empty()
            && self.spawns.is_empty()
    }

    /// Destroyed-tile tally keyed by goal code, for scoring and goal credit
    ///
    /// Wood aggregates under [`CODE_WOOD_NORMAL`]; the map is ordered so
    /// iteration is deterministic.
    pub fn destroyed_counts(&self) -> std::collections::BTreeMap<u16, u32> {
        let mut counts = std::collections::BTreeMap::new();
        for removal in &self.removed {
            *counts.entry(removal.kind.goal_code()).or_insert(0) += 1;
        }
        counts
    }
}
