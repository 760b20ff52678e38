//! Goal progress and completion rewards
//!
//! Tracks per-kind destruction counts against the level's goals, computes the
//! star rating for a completed attempt, and carries the best-result rule the
//! persistence collaborator applies.

use matchstone_types::CODE_WOOD_NORMAL;

use crate::level::Level;

/// One goal with its running tally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalEntry {
    pub kind_code: u16,
    pub target: u32,
    pub done: u32,
}

impl GoalEntry {
    pub fn is_met(&self) -> bool {
        self.done >= self.target
    }
}

/// Destruction tallies for every goal of a level attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalProgress {
    entries: Vec<GoalEntry>,
}

impl GoalProgress {
    /// Seed progress for a level: every declared goal at zero, plus an
    /// implicit wood goal (target = wooden obstacle count) when the level has
    /// wooden tiles but declares no wood goal of its own
    pub fn for_level(level: &Level) -> Self {
        Self::with_wood(level, level.wood_count())
    }

    /// Like [`GoalProgress::for_level`] with an explicit wood count, for
    /// boards sculpted independently of the level's obstacle list
    pub fn with_wood(level: &Level, wood_count: u32) -> Self {
        let mut entries: Vec<GoalEntry> = level
            .goals
            .iter()
            .map(|goal| GoalEntry {
                kind_code: goal.kind_code,
                target: goal.count,
                done: 0,
            })
            .collect();
        if wood_count > 0 && !level.has_explicit_wood_goal() {
            entries.push(GoalEntry {
                kind_code: CODE_WOOD_NORMAL,
                target: wood_count,
                done: 0,
            });
        }
        GoalProgress { entries }
    }

    /// Credit `n` destroyed tiles under a goal code
    ///
    /// Codes with no matching goal are ignored, which is how bombs and
    /// off-goal colours stay out of the tallies.
    pub fn record(&mut self, kind_code: u16, n: u32) {
        for entry in &mut self.entries {
            if entry.kind_code == kind_code {
                entry.done += n;
            }
        }
    }

    /// True once every goal has reached its target
    pub fn all_met(&self) -> bool {
        self.entries.iter().all(GoalEntry::is_met)
    }

    pub fn entries(&self) -> &[GoalEntry] {
        &self.entries
    }
}

/// Star rating for a completed level
///
/// Thresholds are non-decreasing moves-remaining breakpoints for 1, 2 and 3
/// stars. Any completion earns at least one star, even below the first
/// breakpoint.
pub fn star_rating(moves_remaining: u32, thresholds: [u32; 3]) -> u8 {
    let [_, t2, t3] = thresholds;
    if moves_remaining >= t3 {
        3
    } else if moves_remaining >= t2 {
        2
    } else {
        1
    }
}

/// Outcome of one finished attempt, as handed to the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelResult {
    pub completed: bool,
    pub stars: u8,
    pub moves_used: u32,
}

impl LevelResult {
    /// Should this result replace the stored one?
    ///
    /// A completion always beats no record and any failure; among
    /// completions, more stars win, and equal stars with fewer moves win.
    pub fn improves(&self, previous: Option<&LevelResult>) -> bool {
        if !self.completed {
            return false;
        }
        match previous {
            None => true,
            Some(prev) if !prev.completed => true,
            Some(prev) => {
                self.stars > prev.stars
                    || (self.stars == prev.stars && self.moves_used < prev.moves_used)
            }
        }
    }
}
