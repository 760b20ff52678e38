//! Match engine core - pure, deterministic, and testable
//!
//! This crate contains the complete rules engine: board model, match
//! detection, gravity and refill, cascade resolution with bomb chaining, and
//! the move/goal controller. It has **zero dependencies** on UI, networking,
//! or I/O, making it:
//!
//! - **Deterministic**: same level and seed replay identical games
//! - **Testable**: every rule is exercised without timing simulation
//! - **Portable**: runs headless, in a terminal front end, or under a bot
//!
//! # Module Structure
//!
//! - [`board`]: the tile grid, generation, valid-move probing, reshuffle
//! - [`matches`]: run-length match scanning and hypothetical-swap validation
//! - [`gravity`]: column compaction around obstacles, and refill
//! - [`cascade`]: the scan/classify/detonate/damage/remove/refill pass loop
//! - [`game`]: move validation, goal accounting, win/loss, reshuffle policy
//! - [`level`]: static level configuration and its validation
//! - [`progress`]: goal tallies, star ratings, best-result comparison
//! - [`rng`]: seedable LCG random source, threaded explicitly
//! - [`snapshot`]: serializable read surface for collaborators
//!
//! # Game Rules
//!
//! - **Matching**: three or more same-coloured tiles in a row or column
//! - **Bombs**: a four-run spawns a directional bomb perpendicular to the
//!   run; a five-run or a crossing pair of runs spawns a 5x5 area bomb;
//!   blasts chain through other bombs in travel-delay order
//! - **Obstacles**: wood takes two damage steps and credits the wood goal on
//!   destruction; stone is indestructible and immune
//! - **Budget**: each accepted swap or tap costs exactly one move; goals met
//!   is a win, budget exhausted is a loss, and a moveless board reshuffles
//!
//! # Example
//!
//! ```
//! use matchstone_core::{Game, Goal, Level};
//!
//! let level = Level {
//!     rows: 8,
//!     cols: 8,
//!     max_moves: 20,
//!     tile_kinds: 5,
//!     goals: vec![Goal { kind_code: 0, count: 10 }],
//!     star_thresholds: [0, 5, 10],
//!     wooden_tiles: vec![],
//!     stone_tiles: vec![],
//!     accidental_match_chance: 0,
//! };
//!
//! let game = Game::new(level, 12345).unwrap();
//! assert_eq!(game.moves_used(), 0);
//! assert_eq!(game.snapshot().tiles.len(), 64);
//! assert!(game.board().has_valid_moves());
//! ```

pub mod board;
pub mod cascade;
pub mod game;
pub mod gravity;
pub mod level;
pub mod matches;
pub mod progress;
pub mod rng;
pub mod snapshot;

pub use matchstone_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Tile};
pub use cascade::{resolve, Trigger};
pub use game::{Game, MoveRejection, MoveReport};
pub use gravity::{refill, settle};
pub use level::{CellRef, Goal, Level, LevelError};
pub use matches::{find_matches, is_valid_swap, MatchRun};
pub use progress::{star_rating, GoalProgress, LevelResult};
pub use rng::SimpleRng;
pub use snapshot::{GameSnapshot, GoalView, TileView};
