//! Game controller - move validation, goal accounting and the level lifecycle
//!
//! `Game` owns the board, the RNG and the counters; everything happens
//! synchronously inside [`Game::apply`], so there is no observable
//! mid-resolution state. Rejected intents are no-ops by design: they arise
//! from ordinary UI races and consume neither a move nor any board state.

use matchstone_types::{
    PassEvents, Phase, PlayerAction, Position, TileKind, MAX_RESHUFFLE_ROUNDS,
    RESHUFFLE_RETRY_CAP,
};

use crate::board::Board;
use crate::cascade::{resolve, Trigger};
use crate::level::{Level, LevelError};
use crate::matches::is_valid_swap;
use crate::progress::{star_rating, GoalProgress, LevelResult};
use crate::rng::SimpleRng;
use crate::snapshot::{GameSnapshot, GoalView, TileView};

/// Why a player intent was refused
///
/// Rejections mutate nothing and consume no move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The attempt already ended
    GameOver,
    /// A referenced cell is off the board
    OutOfBounds,
    /// A referenced cell holds no tile
    EmptyCell,
    /// Swap endpoints do not share an edge
    NotAdjacent,
    /// One of the swapped tiles is wood or stone
    ObstacleSwap,
    /// The swap involves no bomb and produces no match
    NoMatch,
    /// Tap on a tile that is not a bomb
    NotABomb,
}

impl MoveRejection {
    pub fn code(self) -> &'static str {
        match self {
            MoveRejection::GameOver => "game_over",
            MoveRejection::OutOfBounds | MoveRejection::EmptyCell => "invalid_cell",
            MoveRejection::NotAdjacent
            | MoveRejection::ObstacleSwap
            | MoveRejection::NoMatch => "invalid_swap",
            MoveRejection::NotABomb => "invalid_tap",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MoveRejection::GameOver => "the attempt has already ended",
            MoveRejection::OutOfBounds => "cell is outside the board",
            MoveRejection::EmptyCell => "cell holds no tile",
            MoveRejection::NotAdjacent => "swap cells are not orthogonal neighbours",
            MoveRejection::ObstacleSwap => "obstacle tiles cannot be swapped",
            MoveRejection::NoMatch => "swap would not produce a match",
            MoveRejection::NotABomb => "only bombs can be tapped",
        }
    }
}

/// Everything one accepted move produced
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    /// The cascade, one entry per resolution pass
    pub passes: Vec<PassEvents>,
    /// Reshuffles performed to restore a playable board afterwards
    pub reshuffles: u32,
    pub goals_met: bool,
    pub phase: Phase,
    /// Star rating, present once the attempt completes
    pub stars: Option<u8>,
}

/// Reshuffle until a valid move exists, within the bounded round count
fn ensure_playable(board: &mut Board, level: &Level, rng: &mut SimpleRng) -> u32 {
    let mut rounds = 0;
    while !board.has_valid_moves() && rounds < MAX_RESHUFFLE_ROUNDS {
        board.reshuffle(level, rng, RESHUFFLE_RETRY_CAP);
        rounds += 1;
    }
    rounds
}

/// One level attempt: board, goals, move budget and lifecycle phase
#[derive(Debug, Clone)]
pub struct Game {
    level: Level,
    board: Board,
    progress: GoalProgress,
    rng: SimpleRng,
    moves_used: u32,
    phase: Phase,
    seed: u32,
}

impl Game {
    /// Validate the level, generate its opening board and start at move zero
    ///
    /// The opening board has no matches; if it happens to have no valid move
    /// either, it is reshuffled before play starts.
    pub fn new(level: Level, seed: u32) -> Result<Self, LevelError> {
        level.validate()?;
        let mut rng = SimpleRng::new(seed);
        let mut board = Board::generate(&level, &mut rng);
        ensure_playable(&mut board, &level, &mut rng);
        let progress = GoalProgress::for_level(&level);
        Ok(Game {
            level,
            board,
            progress,
            rng,
            moves_used: 0,
            phase: Phase::Idle,
            seed,
        })
    }

    /// Start from a sculpted board instead of a generated one
    ///
    /// Goal progress is still seeded from the level, with the implicit wood
    /// goal counted from the board actually supplied. A moveless board is
    /// reshuffled before play, like a generated one.
    pub fn with_board(level: Level, mut board: Board, seed: u32) -> Result<Self, LevelError> {
        level.validate()?;
        let mut rng = SimpleRng::new(seed);
        ensure_playable(&mut board, &level, &mut rng);
        let wood = board
            .iter_tiles()
            .filter(|(_, t)| t.kind.is_wooden())
            .count() as u32;
        let progress = GoalProgress::with_wood(&level, wood);
        Ok(Game {
            level,
            board,
            progress,
            rng,
            moves_used: 0,
            phase: Phase::Idle,
            seed,
        })
    }

    /// Apply one player intent
    ///
    /// An accepted intent consumes exactly one move however long the cascade
    /// runs, resolves to quiescence, credits goals, settles the terminal
    /// phase, and reshuffles as needed to leave a playable board behind.
    pub fn apply(&mut self, action: PlayerAction) -> Result<MoveReport, MoveRejection> {
        if self.phase.is_terminal() {
            return Err(MoveRejection::GameOver);
        }
        let trigger = match action {
            PlayerAction::Tap(pos) => self.accept_tap(pos)?,
            PlayerAction::Swap { from, to } => self.accept_swap(from, to)?,
        };

        self.moves_used += 1;
        let mut passes = resolve(&mut self.board, &self.level, &mut self.rng, trigger);
        self.credit(&passes);

        let mut reshuffles = 0;
        if self.progress.all_met() {
            self.phase = Phase::Complete;
        } else if self.moves_used >= self.level.max_moves {
            self.phase = Phase::Failed;
        } else {
            // Keep the board playable; a reshuffle that degrades into a
            // matched state resolves as a free extra cascade
            while self.phase == Phase::Idle
                && !self.board.has_valid_moves()
                && reshuffles < MAX_RESHUFFLE_ROUNDS
            {
                self.board
                    .reshuffle(&self.level, &mut self.rng, RESHUFFLE_RETRY_CAP);
                reshuffles += 1;
                let extra = resolve(
                    &mut self.board,
                    &self.level,
                    &mut self.rng,
                    Trigger::default(),
                );
                self.credit(&extra);
                passes.extend(extra);
                if self.progress.all_met() {
                    self.phase = Phase::Complete;
                }
            }
        }

        let stars = (self.phase == Phase::Complete)
            .then(|| star_rating(self.moves_remaining(), self.level.star_thresholds));
        Ok(MoveReport {
            passes,
            reshuffles,
            goals_met: self.progress.all_met(),
            phase: self.phase,
            stars,
        })
    }

    fn accept_tap(&self, pos: Position) -> Result<Trigger, MoveRejection> {
        if !self.board.in_bounds(pos) {
            return Err(MoveRejection::OutOfBounds);
        }
        let Some(tile) = self.board.tile_at(pos) else {
            return Err(MoveRejection::EmptyCell);
        };
        if !tile.kind.is_bomb() {
            return Err(MoveRejection::NotABomb);
        }
        Ok(Trigger::tap(pos))
    }

    fn accept_swap(&mut self, from: Position, to: Position) -> Result<Trigger, MoveRejection> {
        if !self.board.in_bounds(from) || !self.board.in_bounds(to) {
            return Err(MoveRejection::OutOfBounds);
        }
        let (Some(a), Some(b)) = (self.board.tile_at(from), self.board.tile_at(to)) else {
            return Err(MoveRejection::EmptyCell);
        };
        if !from.is_adjacent(to) {
            return Err(MoveRejection::NotAdjacent);
        }
        if a.kind.is_obstacle() || b.kind.is_obstacle() {
            return Err(MoveRejection::ObstacleSwap);
        }
        let involves_bomb = a.kind.is_bomb() || b.kind.is_bomb();
        if !involves_bomb && !is_valid_swap(&self.board, from, to) {
            return Err(MoveRejection::NoMatch);
        }

        self.board.swap(from, to);
        let mut trigger = Trigger::swap(from, to);
        // A bomb set in motion by the swap detonates where it landed
        for pos in [to, from] {
            if self
                .board
                .tile_at(pos)
                .map_or(false, |t| t.kind.is_bomb())
            {
                trigger.seeds.push(pos);
            }
        }
        Ok(trigger)
    }

    /// Credit every destroyed tile to its goal; bombs carry no goal code
    /// and fall through [`GoalProgress::record`] untracked
    fn credit(&mut self, passes: &[PassEvents]) {
        for pass in passes {
            for (code, count) in pass.destroyed_counts() {
                self.progress.record(code, count);
            }
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn goal_progress(&self) -> &GoalProgress {
        &self.progress
    }

    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    pub fn moves_remaining(&self) -> u32 {
        self.level.max_moves.saturating_sub(self.moves_used)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The finished attempt as the persistence collaborator sees it, once
    /// the game is over
    pub fn result(&self) -> Option<LevelResult> {
        match self.phase {
            Phase::Idle => None,
            Phase::Complete => Some(LevelResult {
                completed: true,
                stars: star_rating(self.moves_remaining(), self.level.star_thresholds),
                moves_used: self.moves_used,
            }),
            Phase::Failed => Some(LevelResult {
                completed: false,
                stars: 0,
                moves_used: self.moves_used,
            }),
        }
    }

    /// Write the current settled state into an existing snapshot, reusing
    /// its allocations
    pub fn snapshot_into(&self, snap: &mut GameSnapshot) {
        snap.clear();
        snap.rows = self.board.rows();
        snap.cols = self.board.cols();
        for (pos, tile) in self.board.iter_tiles() {
            snap.tiles.push(TileView {
                id: tile.id.0,
                code: tile.kind.code(),
                row: pos.row,
                col: pos.col,
            });
        }
        for entry in self.progress.entries() {
            snap.goals.push(GoalView {
                kind_code: entry.kind_code,
                target: entry.target,
                done: entry.done,
            });
        }
        snap.moves_used = self.moves_used;
        snap.moves_remaining = self.moves_remaining();
        snap.phase = self.phase.as_str();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
