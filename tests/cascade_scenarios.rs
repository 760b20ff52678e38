//! End-to-end cascade behaviour: multi-pass chains, bombs persisting
//! between resolutions, and obstacle bookkeeping under blasts.

use matchstone::core::{find_matches, resolve, Board, Level, SimpleRng, Trigger};
use matchstone::types::{Position, TileKind};

fn ord(n: u8) -> Option<TileKind> {
    Some(TileKind::Ordinary(n))
}

fn board_from(rows: Vec<Vec<Option<TileKind>>>) -> Board {
    let height = rows.len() as u8;
    let width = rows[0].len() as u8;
    let mut board = Board::empty(height, width);
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), width as usize);
        for (c, kind) in row.iter().enumerate() {
            if let Some(kind) = kind {
                board.spawn(Position::new(r as i8, c as i8), *kind);
            }
        }
    }
    board
}

// Eight colours keep refills from inventing extra cascades, so every pass
// in these fixtures is one the fixture itself arranged
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

#[test]
fn cascade_continues_when_falls_line_up_a_second_run() {
    // Removing the 1-run across row 2 drops the column-0 threes onto the
    // three at the bottom, which must trigger a second pass on its own
    let mut board = board_from(vec![
        vec![ord(3), ord(5), ord(6), ord(7)],
        vec![ord(3), ord(6), ord(7), ord(5)],
        vec![ord(1), ord(2), ord(1), ord(4)],
        vec![ord(3), ord(1), ord(6), ord(2)],
    ]);
    let level = quiet_level(4, 4);
    assert!(find_matches(&board).is_empty());

    let from = Position::new(3, 1);
    let to = Position::new(2, 1);
    board.swap(from, to);
    let mut rng = SimpleRng::new(1);
    let passes = resolve(&mut board, &level, &mut rng, Trigger::swap(from, to));

    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].removed.len(), 3);
    assert!(passes[0]
        .removed
        .iter()
        .all(|r| r.kind == TileKind::Ordinary(1)));
    assert_eq!(passes[1].removed.len(), 3);
    assert!(passes[1]
        .removed
        .iter()
        .all(|r| r.kind == TileKind::Ordinary(3)));

    // Mass balance: every removal was matched by a refill spawn
    let removed: usize = passes.iter().map(|p| p.removed.len()).sum();
    let spawned: usize = passes.iter().map(|p| p.spawns.len()).sum();
    assert_eq!(removed, spawned);
    assert_eq!(board.tile_count(), 16);
    assert!(find_matches(&board).is_empty());
}

#[test]
fn spawned_bomb_stays_on_the_board_until_activated() {
    let mut board = board_from(vec![
        vec![ord(1), ord(5), ord(1), ord(1), ord(7)],
        vec![ord(3), ord(1), ord(4), ord(5), ord(3)],
        vec![ord(6), ord(7), ord(6), ord(2), ord(6)],
    ]);
    let level = quiet_level(3, 5);
    let mut rng = SimpleRng::new(2);

    // The swap fills the gap in row 0: a four-run converts the destination
    let from = Position::new(1, 1);
    let to = Position::new(0, 1);
    board.swap(from, to);
    let passes = resolve(&mut board, &level, &mut rng, Trigger::swap(from, to));

    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].bombs_spawned.len(), 1);
    let bomb_id = passes[0].bombs_spawned[0].id;
    let parked = board.tile_at(to).unwrap();
    assert_eq!(parked.kind, TileKind::BombVertical);
    assert_eq!(parked.id, bomb_id);
    assert_eq!(board.tile_count(), 15);

    // A later tap spends it: the whole column goes, bomb included
    let passes = resolve(&mut board, &level, &mut rng, Trigger::tap(to));
    assert_eq!(passes[0].detonations.len(), 1);
    assert_eq!(passes[0].detonations[0].kind, TileKind::BombVertical);
    assert_eq!(passes[0].removed.len(), 3);
    assert!(passes[0].removed.iter().any(|r| r.id == bomb_id));
    assert_eq!(board.tile_count(), 15);
}

#[test]
fn chained_bombs_all_fire_in_one_pass() {
    let mut board = board_from(vec![
        vec![Some(TileKind::BombVertical), ord(1), ord(2), ord(3), ord(4)],
        vec![ord(5), ord(2), ord(3), ord(4), ord(5)],
        vec![ord(6), ord(3), ord(4), ord(5), ord(6)],
        vec![Some(TileKind::BombHorizontal), ord(4), ord(5), ord(6), ord(7)],
        vec![ord(7), ord(5), ord(6), ord(7), ord(1)],
    ]);
    let level = quiet_level(5, 5);
    let mut rng = SimpleRng::new(3);
    let passes = resolve(
        &mut board,
        &level,
        &mut rng,
        Trigger::tap(Position::new(0, 0)),
    );

    let detonations = &passes[0].detonations;
    assert_eq!(detonations.len(), 2);
    assert_eq!(detonations[0].position, Position::new(0, 0));
    assert_eq!(detonations[0].delay, 0);
    assert_eq!(detonations[1].position, Position::new(3, 0));
    assert_eq!(detonations[1].delay, 3);
    assert!(board
        .iter_tiles()
        .all(|(_, tile)| !tile.kind.is_bomb()));
    // Column 0 and row 3 both cleared: 5 + 5 - 1 cells
    assert_eq!(passes[0].removed.len(), 9);
}

#[test]
fn blasts_account_for_wood_and_spare_stone() {
    let make = |wood: TileKind| {
        board_from(vec![
            vec![ord(1), ord(2), ord(3), ord(4), ord(5)],
            vec![
                Some(TileKind::BombHorizontal),
                ord(6),
                Some(wood),
                ord(7),
                Some(TileKind::Stone),
            ],
            vec![ord(5), ord(4), ord(3), ord(2), ord(1)],
        ])
    };
    let level = quiet_level(3, 5);

    // Intact wood in the blast row breaks in place
    let mut board = make(TileKind::WoodNormal);
    let mut rng = SimpleRng::new(4);
    let passes = resolve(
        &mut board,
        &level,
        &mut rng,
        Trigger::tap(Position::new(1, 0)),
    );
    assert_eq!(passes[0].wood_hits.len(), 1);
    assert!(!passes[0].wood_hits[0].crushed);
    assert_eq!(
        board.tile_at(Position::new(1, 2)).unwrap().kind,
        TileKind::WoodBroken
    );
    assert_eq!(
        board.tile_at(Position::new(1, 4)).unwrap().kind,
        TileKind::Stone
    );
    // Bomb plus the two ordinary tiles in the row; wood is damaged, not
    // removed, and stone is untouched
    assert_eq!(passes[0].removed.len(), 3);
    assert_eq!(board.tile_count(), 15);

    // Broken wood is crushed, credited and its cell refilled
    let mut board = make(TileKind::WoodBroken);
    let mut rng = SimpleRng::new(4);
    let passes = resolve(
        &mut board,
        &level,
        &mut rng,
        Trigger::tap(Position::new(1, 0)),
    );
    assert_eq!(passes[0].wood_hits.len(), 1);
    assert!(passes[0].wood_hits[0].crushed);
    assert_eq!(
        passes[0]
            .removed
            .iter()
            .filter(|r| r.kind == TileKind::WoodBroken)
            .count(),
        1
    );
    assert!(board
        .tile_at(Position::new(1, 2))
        .map_or(false, |t| t.kind.is_ordinary()));
    assert_eq!(board.tile_count(), 15);
}
