//! Headless autoplay runner (default binary).
//!
//! Loads a level definition from JSON (or uses the built-in demo level),
//! then plays greedy valid moves to termination, printing a per-move
//! transcript: the action taken, the cascade size, destruction counts and
//! goal progress. Useful for soak-testing the engine and for demonstrating
//! the full collaborator loop without any UI.

use std::fs;

use anyhow::{anyhow, Context, Result};

use matchstone::core::{is_valid_swap, Board, CellRef, Game, Goal, Level};
use matchstone::types::{Phase, PlayerAction, Position};

#[derive(Debug, Clone)]
struct RunConfig {
    level_path: Option<String>,
    seed: u32,
    max_actions: u32,
}

fn parse_args(args: &[String]) -> Result<RunConfig> {
    let mut config = RunConfig {
        level_path: None,
        seed: 1,
        max_actions: 500,
    };
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                config.seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--max-actions" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --max-actions"))?;
                config.max_actions = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --max-actions value: {}", v))?;
            }
            flag if flag.starts_with("--") => {
                return Err(anyhow!("unknown argument: {}", flag));
            }
            path if config.level_path.is_none() => {
                config.level_path = Some(path.to_string());
            }
            extra => {
                return Err(anyhow!("unexpected argument: {}", extra));
            }
        }
        i += 1;
    }
    Ok(config)
}

/// A small showcase level: two colour goals, a wood pocket and a stone
fn demo_level() -> Level {
    Level {
        rows: 8,
        cols: 8,
        max_moves: 25,
        tile_kinds: 5,
        goals: vec![
            Goal {
                kind_code: 0,
                count: 15,
            },
            Goal {
                kind_code: 2,
                count: 10,
            },
        ],
        star_thresholds: [0, 6, 12],
        wooden_tiles: vec![CellRef::new(3, 3), CellRef::new(3, 4)],
        stone_tiles: vec![CellRef::new(5, 2)],
        accidental_match_chance: 10,
    }
}

/// Pick the next move the way a simple bot would: detonate any bomb on the
/// board, otherwise take the first adjacent swap that produces a match
fn choose_action(board: &Board) -> Option<PlayerAction> {
    for (pos, tile) in board.iter_tiles() {
        if tile.kind.is_bomb() {
            return Some(PlayerAction::Tap(pos));
        }
    }
    for row in 0..board.rows() as i8 {
        for col in 0..board.cols() as i8 {
            let pos = Position::new(row, col);
            let movable = |p: Position| {
                board
                    .tile_at(p)
                    .map_or(false, |t| t.kind.is_ordinary())
            };
            if !movable(pos) {
                continue;
            }
            for (dr, dc) in [(0, 1), (1, 0)] {
                let neighbour = pos.offset(dr, dc);
                if movable(neighbour) && is_valid_swap(board, pos, neighbour) {
                    return Some(PlayerAction::Swap {
                        from: pos,
                        to: neighbour,
                    });
                }
            }
        }
    }
    None
}

fn describe(action: PlayerAction) -> String {
    match action {
        PlayerAction::Tap(pos) => format!("tap ({},{})", pos.row, pos.col),
        PlayerAction::Swap { from, to } => format!(
            "swap ({},{})->({},{})",
            from.row, from.col, to.row, to.col
        ),
    }
}

fn goal_line(game: &Game) -> String {
    game.goal_progress()
        .entries()
        .iter()
        .map(|e| format!("kind {}: {}/{}", e.kind_code, e.done, e.target))
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;

    let level = match &config.level_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading level file {}", path))?;
            serde_json::from_str::<Level>(&text)
                .with_context(|| format!("parsing level file {}", path))?
        }
        None => demo_level(),
    };

    println!(
        "level {}x{}, {} moves, {} colours, {} goals (seed {})",
        level.rows,
        level.cols,
        level.max_moves,
        level.tile_kinds,
        level.goals.len(),
        config.seed
    );

    let mut game =
        Game::new(level, config.seed).map_err(|e| anyhow!("invalid level: {}", e))?;

    for _ in 0..config.max_actions {
        if game.phase().is_terminal() {
            break;
        }
        let Some(action) = choose_action(game.board()) else {
            return Err(anyhow!(
                "no playable action found on a board the engine reports playable"
            ));
        };
        let report = game
            .apply(action)
            .map_err(|e| anyhow!("engine rejected a probed action: {}", e.message()))?;

        let destroyed: u32 = report
            .passes
            .iter()
            .map(|p| p.destroyed_counts().values().sum::<u32>())
            .sum();
        println!(
            "move {:>2}/{}: {:<18} {} pass(es), {} destroyed | {}",
            game.moves_used(),
            game.level().max_moves,
            describe(action),
            report.passes.len(),
            destroyed,
            goal_line(&game),
        );
        if report.reshuffles > 0 {
            println!("          board reshuffled {}x to stay playable", report.reshuffles);
        }
    }

    match game.phase() {
        Phase::Complete => {
            let result = game
                .result()
                .ok_or_else(|| anyhow!("completed game produced no result"))?;
            println!(
                "completed in {} moves: {} star(s)",
                result.moves_used, result.stars
            );
        }
        Phase::Failed => println!(
            "failed: out of moves after {} with goals unmet ({})",
            game.moves_used(),
            goal_line(&game)
        ),
        Phase::Idle => println!(
            "stopped after {} actions with the game still open",
            game.moves_used()
        ),
    }
    Ok(())
}
