//! Cascade resolution - the fixed-point loop behind every accepted move
//!
//! One call to [`resolve`] runs the board from a just-mutated state to
//! quiescence: scan for matches, plan bomb creations (crossing runs merge
//! into area bombs), chain bomb detonations through a delay-ordered queue,
//! damage obstacles, remove the hit set, materialize new bombs, then refill
//! and settle, and scan again. Each iteration is one pass; the pass ledger is
//! the engine's whole output contract to presentation and scoring.
//!
//! Within a pass the order is fixed: damage before removal, removal before
//! bomb materialization, materialization before refill, refill before the
//! final settle. Bomb chains are processed smallest-delay-first with
//! discovery order as the tie-break, and a bomb found again at a smaller
//! delay is re-scheduled at that delay (it never detonates twice).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use matchstone_types::{
    Axis, BombSpawn, Detonation, PassEvents, Position, RemovedTile, TileKind, WoodHit,
    AREA_BLAST_RADIUS, MAX_CASCADE_PASSES,
};

use crate::board::{Board, Tile};
use crate::gravity::{refill, settle};
use crate::level::Level;
use crate::matches::{find_matches, MatchRun};
use crate::rng::SimpleRng;

/// What set a resolution off
///
/// The swap context only applies to the first pass: it gives the swap
/// endpoints placement priority when a bomb is created from a match they are
/// part of. Seeds are bombs activated directly (a tap, or a bomb moved by the
/// swap) and enter the chain at delay zero.
#[derive(Debug, Clone, Default)]
pub struct Trigger {
    /// The just-performed swap as `(origin, destination)`
    pub swap: Option<(Position, Position)>,
    /// Bomb cells to detonate at delay zero
    pub seeds: Vec<Position>,
}

impl Trigger {
    pub fn swap(from: Position, to: Position) -> Self {
        Trigger {
            swap: Some((from, to)),
            seeds: Vec::new(),
        }
    }

    pub fn tap(bomb: Position) -> Self {
        Trigger {
            swap: None,
            seeds: vec![bomb],
        }
    }
}

/// Run the board to quiescence, returning one [`PassEvents`] per pass
///
/// Quiescence: a scan finds no matches and no seeded activations remain. The
/// pass count is capped at [`MAX_CASCADE_PASSES`] as an escape valve for
/// degenerate configurations whose refills can never stop matching.
pub fn resolve(
    board: &mut Board,
    level: &Level,
    rng: &mut SimpleRng,
    trigger: Trigger,
) -> Vec<PassEvents> {
    let mut passes = Vec::new();
    let mut swap = trigger.swap;
    let mut seeds = trigger.seeds;

    while (passes.len() as u32) < MAX_CASCADE_PASSES {
        let runs = find_matches(board);
        if runs.is_empty() && seeds.is_empty() {
            break;
        }
        let events = resolve_pass(
            board,
            level,
            rng,
            &runs,
            swap.take(),
            std::mem::take(&mut seeds),
        );
        passes.push(events);
    }

    passes
}

/// A bomb creation planned while classifying this pass's matches
#[derive(Debug, Clone, Copy)]
struct PlannedBomb {
    cell: Position,
    kind: TileKind,
}

fn resolve_pass(
    board: &mut Board,
    level: &Level,
    rng: &mut SimpleRng,
    runs: &[MatchRun],
    swap: Option<(Position, Position)>,
    seeds: Vec<Position>,
) -> PassEvents {
    let mut events = PassEvents::default();
    let planned = plan_bombs(runs, swap);

    // Hit set: every affected cell with the smallest delay it was reached at.
    // Match cells are hit immediately.
    let mut hits: BTreeMap<Position, u32> = BTreeMap::new();
    for run in runs {
        for &cell in &run.cells {
            hits.insert(cell, 0);
        }
    }

    run_bomb_chain(board, seeds, &mut hits, &mut events);
    apply_obstacle_rules(board, runs, &mut hits, &mut events);

    // Removal: everything hit goes, except a cell about to become a bomb
    // keeps its tile for conversion
    let planned_cells: BTreeSet<Position> = planned.iter().map(|p| p.cell).collect();
    for (&cell, &delay) in &hits {
        if planned_cells.contains(&cell) {
            continue;
        }
        let Some(tile) = board.tile_at(cell) else {
            continue;
        };
        if !tile.kind.is_movable() {
            continue;
        }
        board.take(cell);
        events.removed.push(RemovedTile {
            id: tile.id,
            kind: tile.kind,
            position: cell,
            delay,
        });
    }

    // Materialize planned bombs before refill so the next scan sees them
    for plan in planned {
        match board.tile_at(plan.cell) {
            Some(tile) => {
                board.put(
                    plan.cell,
                    Some(Tile {
                        id: tile.id,
                        kind: plan.kind,
                    }),
                );
                events.bombs_spawned.push(BombSpawn {
                    id: tile.id,
                    kind: plan.kind,
                    position: plan.cell,
                    converted: true,
                });
            }
            None => {
                if let Some(id) = board.spawn(plan.cell, plan.kind) {
                    events.bombs_spawned.push(BombSpawn {
                        id,
                        kind: plan.kind,
                        position: plan.cell,
                        converted: false,
                    });
                }
            }
        }
    }

    events.falls = settle(board);
    events.spawns = refill(board, level, rng);
    events.falls.extend(settle(board));
    events
}

/// Turn this pass's match runs into bomb creation plans
///
/// Crossing same-colour runs with a combined footprint of five or more merge
/// into one area bomb; each remaining run spawns by its own length: five or
/// more an area bomb, exactly four a directional bomb perpendicular to the
/// run, three nothing. Placement prefers the swap destination, then the swap
/// origin, then the geometric cell (crossing point or run midpoint).
fn plan_bombs(runs: &[MatchRun], swap: Option<(Position, Position)>) -> Vec<PlannedBomb> {
    let mut planned = Vec::new();
    let mut consumed = vec![false; runs.len()];

    for i in 0..runs.len() {
        if runs[i].axis != Axis::Row {
            continue;
        }
        for j in 0..runs.len() {
            if consumed[i] || consumed[j] || runs[j].axis != Axis::Col {
                continue;
            }
            let (h, v) = (&runs[i], &runs[j]);
            if h.colour != v.colour {
                continue;
            }
            let crossing = Position::new(h.start().row, v.start().col);
            let crosses = (v.start().row..=v.end().row).contains(&crossing.row)
                && (h.start().col..=h.end().col).contains(&crossing.col);
            if !crosses || h.len() + v.len() - 1 < 5 {
                continue;
            }
            let cell =
                swap_endpoint_in(swap, |p| h.contains(p) || v.contains(p)).unwrap_or(crossing);
            planned.push(PlannedBomb {
                cell,
                kind: TileKind::BombArea,
            });
            consumed[i] = true;
            consumed[j] = true;
        }
    }

    for (i, run) in runs.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        let kind = match run.len() {
            0..=3 => continue,
            4 => match run.axis {
                Axis::Row => TileKind::BombVertical,
                Axis::Col => TileKind::BombHorizontal,
            },
            _ => TileKind::BombArea,
        };
        let cell = swap_endpoint_in(swap, |p| run.contains(p)).unwrap_or_else(|| run.midpoint());
        planned.push(PlannedBomb { cell, kind });
    }

    planned
}

/// Destination first, origin second, neither if the swap missed the match
fn swap_endpoint_in(
    swap: Option<(Position, Position)>,
    contains: impl Fn(Position) -> bool,
) -> Option<Position> {
    let (from, to) = swap?;
    if contains(to) {
        Some(to)
    } else if contains(from) {
        Some(from)
    } else {
        None
    }
}

/// Detonate the seeded bombs and every bomb their blasts reach
///
/// A min-heap on `(delay, discovery order)` drives the chain. Relaxation is
/// monotone: a bomb already queued is re-queued only at a strictly smaller
/// delay, and once detonated it is done for the pass. Every blast cell joins
/// `hits` at the smallest delay any blast reached it.
fn run_bomb_chain(
    board: &Board,
    seeds: Vec<Position>,
    hits: &mut BTreeMap<Position, u32>,
    events: &mut PassEvents,
) {
    let is_bomb_at =
        |cell: Position| board.tile_at(cell).map_or(false, |t| t.kind.is_bomb());

    let mut queue: BinaryHeap<Reverse<(u32, u32, Position)>> = BinaryHeap::new();
    let mut best: BTreeMap<Position, u32> = BTreeMap::new();
    let mut detonated: BTreeSet<Position> = BTreeSet::new();
    let mut order = 0u32;

    for pos in seeds {
        if is_bomb_at(pos) && !best.contains_key(&pos) {
            best.insert(pos, 0);
            queue.push(Reverse((0, order, pos)));
            order += 1;
        }
    }

    while let Some(Reverse((delay, _, pos))) = queue.pop() {
        if detonated.contains(&pos) || best.get(&pos) != Some(&delay) {
            continue;
        }
        let Some(bomb) = board.tile_at(pos) else {
            continue;
        };
        detonated.insert(pos);
        events.detonations.push(Detonation {
            id: bomb.id,
            kind: bomb.kind,
            position: pos,
            delay,
        });

        for (cell, offset) in blast_cells(board, pos, bomb.kind) {
            let at = delay + offset;
            hits.entry(cell)
                .and_modify(|d| *d = (*d).min(at))
                .or_insert(at);
            if cell == pos || detonated.contains(&cell) || !is_bomb_at(cell) {
                continue;
            }
            if best.get(&cell).map_or(true, |&b| at < b) {
                best.insert(cell, at);
                queue.push(Reverse((at, order, cell)));
                order += 1;
            }
        }
    }
}

/// The cells a detonation reaches, each with its travel offset from the bomb
///
/// Directional bombs sweep their whole row or column at axis distance; area
/// bombs cover a 5x5 block at Chebyshev ring distance. Off-board cells are
/// clipped, never errors.
fn blast_cells(board: &Board, pos: Position, kind: TileKind) -> Vec<(Position, u32)> {
    let mut cells = Vec::new();
    match kind {
        TileKind::BombHorizontal => {
            for col in 0..board.cols() as i8 {
                cells.push((
                    Position::new(pos.row, col),
                    (col - pos.col).unsigned_abs() as u32,
                ));
            }
        }
        TileKind::BombVertical => {
            for row in 0..board.rows() as i8 {
                cells.push((
                    Position::new(row, pos.col),
                    (row - pos.row).unsigned_abs() as u32,
                ));
            }
        }
        TileKind::BombArea => {
            for dr in -AREA_BLAST_RADIUS..=AREA_BLAST_RADIUS {
                for dc in -AREA_BLAST_RADIUS..=AREA_BLAST_RADIUS {
                    let cell = pos.offset(dr, dc);
                    if board.in_bounds(cell) {
                        cells.push((cell, dr.unsigned_abs().max(dc.unsigned_abs()) as u32));
                    }
                }
            }
        }
        _ => {}
    }
    cells
}

/// Apply the obstacle rules to the hit set
///
/// Stone is immune: its cells leave the hit set untouched and uncounted.
/// Wood takes one damage step per pass when directly hit, or when
/// orthogonally adjacent to a plain-match cell; bomb blasts damage only the
/// wood they cover, never its neighbours. An intact wood breaks in place; a
/// broken one is removed and enters the pass ledger (it credits the wood
/// goal).
fn apply_obstacle_rules(
    board: &mut Board,
    runs: &[MatchRun],
    hits: &mut BTreeMap<Position, u32>,
    events: &mut PassEvents,
) {
    let wooden =
        |board: &Board, cell: Position| board.tile_at(cell).map_or(false, |t| t.kind.is_wooden());

    let mut damage: BTreeSet<Position> = hits
        .keys()
        .copied()
        .filter(|&cell| wooden(board, cell))
        .collect();
    for run in runs {
        for &cell in &run.cells {
            for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let neighbour = cell.offset(dr, dc);
                if wooden(board, neighbour) {
                    damage.insert(neighbour);
                }
            }
        }
    }

    hits.retain(|&cell, _| !board.tile_at(cell).map_or(false, |t| t.kind.is_stone()));

    for &cell in &damage {
        let Some(tile) = board.tile_at(cell) else {
            continue;
        };
        match tile.kind {
            TileKind::WoodNormal => {
                board.put(
                    cell,
                    Some(Tile {
                        id: tile.id,
                        kind: TileKind::WoodBroken,
                    }),
                );
                events.wood_hits.push(WoodHit {
                    position: cell,
                    crushed: false,
                });
            }
            TileKind::WoodBroken => {
                board.take(cell);
                events.wood_hits.push(WoodHit {
                    position: cell,
                    crushed: true,
                });
                events.removed.push(RemovedTile {
                    id: tile.id,
                    kind: TileKind::WoodBroken,
                    position: cell,
                    delay: hits.get(&cell).copied().unwrap_or(0),
                });
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ord(n: u8) -> Option<TileKind> {
        Some(TileKind::Ordinary(n))
    }

    // A wide palette keeps refills from starting follow-up cascades, so the
    // fixture's own geometry is the whole story
    fn quiet_level(rows: u8, cols: u8) -> Level {
        Level {
            rows,
            cols,
            max_moves: 10,
            tile_kinds: 8,
            goals: vec![],
            star_thresholds: [0, 3, 6],
            wooden_tiles: vec![],
            stone_tiles: vec![],
            accidental_match_chance: 0,
        }
    }

    fn resolve_swap(
        board: &mut Board,
        level: &Level,
        from: Position,
        to: Position,
    ) -> Vec<PassEvents> {
        board.swap(from, to);
        let mut rng = SimpleRng::new(1);
        resolve(board, level, &mut rng, Trigger::swap(from, to))
    }

    #[test]
    fn test_three_run_plain_removal_no_bomb() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(2), ord(1), ord(3)],
            vec![ord(2), ord(1), ord(4), ord(5)],
            vec![ord(6), ord(7), ord(6), ord(7)],
        ]);
        let level = quiet_level(3, 4);
        // Swapping (1,1) up makes row 0 read 1,1,1
        let passes = resolve_swap(&mut board, &level, Position::new(1, 1), Position::new(0, 1));

        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].removed.len(), 3);
        assert!(passes[0].bombs_spawned.is_empty());
        assert!(passes[0].detonations.is_empty());
        assert_eq!(board.tile_count(), 12);
    }

    #[test]
    fn test_four_run_spawns_perpendicular_bomb_at_destination() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(5), ord(1), ord(1), ord(7)],
            vec![ord(3), ord(1), ord(4), ord(5), ord(3)],
            vec![ord(6), ord(7), ord(6), ord(2), ord(6)],
        ]);
        let level = quiet_level(3, 5);
        // Swapping (1,1) up fills the gap: row 0 reads 1,1,1,1,7; the
        // destination (0,1) is not the run midpoint (0,2), so placement
        // proves the endpoint priority
        let to = Position::new(0, 1);
        let passes = resolve_swap(&mut board, &level, Position::new(1, 1), to);

        assert_eq!(passes[0].bombs_spawned.len(), 1);
        let spawn = &passes[0].bombs_spawned[0];
        assert_eq!(spawn.kind, TileKind::BombVertical);
        assert_eq!(spawn.position, to);
        assert!(spawn.converted);
        // Three removed, one converted in place
        assert_eq!(passes[0].removed.len(), 3);
    }

    #[test]
    fn test_origin_endpoint_places_when_destination_misses() {
        let mut board = Board::from_rows(vec![
            vec![ord(5), ord(1), ord(2), ord(6), ord(7)],
            vec![ord(1), ord(4), ord(1), ord(1), ord(3)],
            vec![ord(6), ord(7), ord(6), ord(2), ord(6)],
        ]);
        let level = quiet_level(3, 5);
        // Dragging (1,1) up sends the 1 at (0,1) down into the gap: row 1
        // reads 1,1,1,1 and contains the origin (1,1) but not the
        // destination (0,1)
        let from = Position::new(1, 1);
        let passes = resolve_swap(&mut board, &level, from, Position::new(0, 1));

        assert_eq!(passes[0].bombs_spawned.len(), 1);
        let spawn = &passes[0].bombs_spawned[0];
        assert_eq!(spawn.kind, TileKind::BombVertical);
        assert_eq!(spawn.position, from);
    }

    #[test]
    fn test_vertical_four_run_spawns_horizontal_bomb() {
        let mut board = Board::from_rows(vec![
            vec![ord(2), ord(5), ord(3)],
            vec![ord(2), ord(6), ord(4)],
            vec![ord(5), ord(2), ord(3)],
            vec![ord(2), ord(6), ord(4)],
            vec![ord(7), ord(3), ord(5)],
        ]);
        let level = quiet_level(5, 3);
        // Swapping (2,1) left lines up 2,2,2,2 in column 0
        let passes = resolve_swap(&mut board, &level, Position::new(2, 1), Position::new(2, 0));

        assert_eq!(passes[0].bombs_spawned.len(), 1);
        let spawn = &passes[0].bombs_spawned[0];
        assert_eq!(spawn.kind, TileKind::BombHorizontal);
        assert_eq!(spawn.position, Position::new(2, 0));
    }

    #[test]
    fn test_five_run_spawns_area_bomb() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(1), ord(2), ord(1), ord(1)],
            vec![ord(3), ord(4), ord(1), ord(5), ord(3)],
            vec![ord(6), ord(7), ord(6), ord(7), ord(6)],
        ]);
        let level = quiet_level(3, 5);
        let passes = resolve_swap(&mut board, &level, Position::new(1, 2), Position::new(0, 2));

        assert_eq!(passes[0].bombs_spawned.len(), 1);
        let spawn = &passes[0].bombs_spawned[0];
        assert_eq!(spawn.kind, TileKind::BombArea);
        assert_eq!(spawn.position, Position::new(0, 2));
        assert_eq!(passes[0].removed.len(), 4);
    }

    #[test]
    fn test_crossing_runs_merge_into_area_bomb_at_corner() {
        // An L of 3s: three down column 0, three across row 2, corner
        // shared, 3 + 3 - 1 = 5 cells
        let mut board = Board::from_rows(vec![
            vec![ord(3), ord(1), ord(2), ord(5)],
            vec![ord(3), ord(2), ord(1), ord(6)],
            vec![ord(3), ord(3), ord(3), ord(7)],
            vec![ord(1), ord(5), ord(6), ord(2)],
        ]);
        let level = quiet_level(4, 4);
        let mut rng = SimpleRng::new(4);
        let passes = resolve(&mut board, &level, &mut rng, Trigger::default());

        assert_eq!(passes[0].bombs_spawned.len(), 1);
        let spawn = &passes[0].bombs_spawned[0];
        assert_eq!(spawn.kind, TileKind::BombArea);
        // No swap context, so the crossing cell wins
        assert_eq!(spawn.position, Position::new(2, 0));
        // Five cells in the L: one converted, four removed
        assert_eq!(passes[0].removed.len(), 4);
    }

    #[test]
    fn test_non_crossing_runs_stay_separate() {
        // Parallel same-colour runs never combine; each resolves alone
        let mut board = Board::from_rows(vec![
            vec![ord(3), ord(3), ord(3), ord(5)],
            vec![ord(1), ord(2), ord(1), ord(6)],
            vec![ord(3), ord(3), ord(3), ord(7)],
            vec![ord(2), ord(5), ord(6), ord(2)],
        ]);
        let level = quiet_level(4, 4);
        let mut rng = SimpleRng::new(4);
        let passes = resolve(&mut board, &level, &mut rng, Trigger::default());

        assert!(passes[0].bombs_spawned.is_empty());
        assert_eq!(passes[0].removed.len(), 6);
    }

    #[test]
    fn test_area_blast_covers_clipped_5x5() {
        let board = Board::from_rows(vec![vec![ord(0); 8]; 8]);
        let cells = blast_cells(&board, Position::new(3, 3), TileKind::BombArea);
        assert_eq!(cells.len(), 25);
        for (cell, offset) in &cells {
            assert!((1..=5).contains(&cell.row) && (1..=5).contains(&cell.col));
            let ring = (cell.row - 3).abs().max((cell.col - 3).abs()) as u32;
            assert_eq!(*offset, ring);
        }

        // Corner placement clips to the on-board quadrant
        let corner = blast_cells(&board, Position::new(0, 0), TileKind::BombArea);
        assert_eq!(corner.len(), 9);
    }

    #[test]
    fn test_directional_blast_offsets_are_axis_distance() {
        let board = Board::from_rows(vec![vec![ord(0); 6]; 4]);
        let row_sweep = blast_cells(&board, Position::new(2, 1), TileKind::BombHorizontal);
        assert_eq!(row_sweep.len(), 6);
        assert!(row_sweep.contains(&(Position::new(2, 5), 4)));
        assert!(row_sweep.contains(&(Position::new(2, 1), 0)));

        let col_sweep = blast_cells(&board, Position::new(2, 1), TileKind::BombVertical);
        assert_eq!(col_sweep.len(), 4);
        assert!(col_sweep.contains(&(Position::new(0, 1), 2)));
    }

    #[test]
    fn test_tap_detonation_clears_row_and_consumes_bomb() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(2), ord(1), ord(3)],
            vec![ord(2), Some(TileKind::BombHorizontal), ord(4), ord(5)],
            vec![ord(6), ord(7), ord(6), ord(7)],
        ]);
        let level = quiet_level(3, 4);
        let mut rng = SimpleRng::new(8);
        let passes = resolve(
            &mut board,
            &level,
            &mut rng,
            Trigger::tap(Position::new(1, 1)),
        );

        assert_eq!(passes[0].detonations.len(), 1);
        assert_eq!(passes[0].detonations[0].delay, 0);
        // The whole row went, bomb included
        assert_eq!(passes[0].removed.len(), 4);
        let kinds: Vec<_> = passes[0].removed.iter().map(|r| r.kind).collect();
        assert!(kinds.contains(&TileKind::BombHorizontal));
        assert_eq!(board.tile_count(), 12);
    }

    #[test]
    fn test_chain_delays_are_monotone_and_single_shot() {
        // Three row bombs spread along one row; the middle one is seeded
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(2), ord(1), ord(3), ord(2), ord(4)],
            vec![
                Some(TileKind::BombHorizontal),
                ord(4),
                Some(TileKind::BombHorizontal),
                ord(5),
                ord(6),
                Some(TileKind::BombHorizontal),
            ],
            vec![ord(6), ord(7), ord(6), ord(7), ord(1), ord(5)],
        ]);
        let level = quiet_level(3, 6);
        let mut rng = SimpleRng::new(8);
        let passes = resolve(
            &mut board,
            &level,
            &mut rng,
            Trigger::tap(Position::new(1, 2)),
        );

        let detonations = &passes[0].detonations;
        assert_eq!(detonations.len(), 3);
        // Seed first, then outward by travel distance
        assert_eq!(detonations[0].position, Position::new(1, 2));
        assert_eq!(detonations[0].delay, 0);
        assert_eq!(detonations[1].position, Position::new(1, 0));
        assert_eq!(detonations[1].delay, 2);
        assert_eq!(detonations[2].position, Position::new(1, 5));
        assert_eq!(detonations[2].delay, 3);
        for pair in detonations.windows(2) {
            assert!(pair[0].delay <= pair[1].delay);
        }
    }

    #[test]
    fn test_relaxation_reschedules_at_the_smaller_delay() {
        // Diagonal colour stripes carry no runs; the bombs are the story.
        // The seeded area bomb reaches both column bombs at ring distance 2.
        // The upper one is processed first and books the bottom row bomb at
        // 2 + 6 = 8; the lower one then rebooks it at 2 + 2 = 4, which must
        // win, and the bomb must detonate exactly once.
        let mut rows: Vec<Vec<Option<TileKind>>> = (0..7)
            .map(|r| (0..5).map(|c| ord(((r + 2 * c) % 5) as u8)).collect())
            .collect();
        rows[2][2] = Some(TileKind::BombArea);
        rows[0][0] = Some(TileKind::BombVertical);
        rows[4][0] = Some(TileKind::BombVertical);
        rows[6][0] = Some(TileKind::BombHorizontal);
        let mut board = Board::from_rows(rows);

        let level = quiet_level(7, 5);
        let mut rng = SimpleRng::new(8);
        let passes = resolve(
            &mut board,
            &level,
            &mut rng,
            Trigger::tap(Position::new(2, 2)),
        );

        let detonations = &passes[0].detonations;
        assert_eq!(detonations.len(), 4);
        let delays: Vec<u32> = detonations.iter().map(|d| d.delay).collect();
        assert_eq!(delays, vec![0, 2, 2, 4]);
        assert_eq!(detonations[3].position, Position::new(6, 0));
        let mut cells: Vec<_> = detonations.iter().map(|d| d.position).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_stone_is_immune_to_blasts_and_matches() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(2), ord(1), ord(3)],
            vec![
                Some(TileKind::Stone),
                Some(TileKind::BombHorizontal),
                ord(4),
                ord(5),
            ],
            vec![ord(6), ord(7), ord(6), ord(7)],
        ]);
        let level = quiet_level(3, 4);
        let mut rng = SimpleRng::new(8);
        let passes = resolve(
            &mut board,
            &level,
            &mut rng,
            Trigger::tap(Position::new(1, 1)),
        );

        assert_eq!(
            board.tile_at(Position::new(1, 0)).unwrap().kind,
            TileKind::Stone
        );
        assert!(passes[0]
            .removed
            .iter()
            .all(|r| r.position != Position::new(1, 0)));
        assert!(passes[0].wood_hits.is_empty());
    }

    #[test]
    fn test_match_adjacency_damages_wood_in_stages() {
        let level = quiet_level(3, 4);

        let make = |wood: TileKind| {
            Board::from_rows(vec![
                vec![ord(1), Some(wood), ord(2), ord(3)],
                vec![ord(4), ord(1), ord(4), ord(4)],
                vec![ord(2), ord(4), ord(5), ord(6)],
            ])
        };

        // Swapping (1,1) down makes row 1 read 4,4,4,4 beside the wood
        let mut board = make(TileKind::WoodNormal);
        let passes = resolve_swap(&mut board, &level, Position::new(1, 1), Position::new(2, 1));
        assert_eq!(
            passes[0].wood_hits,
            vec![WoodHit {
                position: Position::new(0, 1),
                crushed: false
            }]
        );
        assert_eq!(
            board.tile_at(Position::new(0, 1)).unwrap().kind,
            TileKind::WoodBroken
        );
        assert!(passes[0].removed.iter().all(|r| !r.kind.is_wooden()));

        // The same hit on already-broken wood removes and credits it
        let mut board = make(TileKind::WoodBroken);
        let passes = resolve_swap(&mut board, &level, Position::new(1, 1), Position::new(2, 1));
        assert_eq!(
            passes[0].wood_hits,
            vec![WoodHit {
                position: Position::new(0, 1),
                crushed: true
            }]
        );
        assert_eq!(
            passes[0]
                .removed
                .iter()
                .filter(|r| r.kind == TileKind::WoodBroken)
                .count(),
            1
        );
    }

    #[test]
    fn test_bomb_damages_only_wood_it_covers() {
        // The wood at (0,1) is adjacent to the blast row but not in it; the
        // wood at (1,3) sits in the row and takes the hit
        let mut board = Board::from_rows(vec![
            vec![ord(1), Some(TileKind::WoodNormal), ord(2), ord(3)],
            vec![
                Some(TileKind::BombHorizontal),
                ord(4),
                ord(5),
                Some(TileKind::WoodNormal),
            ],
            vec![ord(2), ord(6), ord(7), ord(6)],
        ]);
        let level = quiet_level(3, 4);
        let mut rng = SimpleRng::new(8);
        let passes = resolve(
            &mut board,
            &level,
            &mut rng,
            Trigger::tap(Position::new(1, 0)),
        );

        assert_eq!(
            passes[0].wood_hits,
            vec![WoodHit {
                position: Position::new(1, 3),
                crushed: false
            }]
        );
        assert_eq!(
            board.tile_at(Position::new(0, 1)).unwrap().kind,
            TileKind::WoodNormal
        );
    }

    #[test]
    fn test_pass_refills_board_back_to_full() {
        let mut board = Board::from_rows(vec![
            vec![ord(1), ord(2), ord(1), ord(3)],
            vec![ord(2), ord(1), ord(4), ord(5)],
            vec![ord(6), ord(7), ord(6), ord(7)],
        ]);
        let level = quiet_level(3, 4);
        let before = board.tile_count();
        let passes = resolve_swap(&mut board, &level, Position::new(1, 1), Position::new(0, 1));

        assert_eq!(board.tile_count(), before);
        let removed: usize = passes.iter().map(|p| p.removed.len()).sum();
        let spawned: usize = passes.iter().map(|p| p.spawns.len()).sum();
        assert_eq!(removed, spawned);
    }
}
