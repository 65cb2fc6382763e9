use maze_chase_core::{Direction, MazeTemplate, TileCoord, WrapPolicy};
use maze_chase_world::{Layout, Maze};

fn template(rows: &[&[u8]]) -> MazeTemplate {
    MazeTemplate::from_rows(rows.iter().map(|row| row.to_vec()).collect())
}

fn maze(rows: &[&[u8]]) -> Maze {
    Maze::from_template(&template(rows), Layout::new(24.0, 0.0, 0.0)).expect("valid template")
}

/// A 5x5 board with one horizontal and one vertical tunnel crossing the
/// boundary, walls elsewhere on the rim.
fn tunnel_maze() -> Maze {
    maze(&[
        &[1, 1, 0, 1, 1],
        &[1, 2, 0, 0, 1],
        &[0, 0, 0, 0, 0],
        &[1, 0, 0, 3, 1],
        &[1, 1, 0, 1, 1],
    ])
}

#[test]
fn wraparound_symmetry_on_every_boundary_tile() {
    let maze = tunnel_maze();

    // For each boundary tile, probing one step outside with wrap enabled
    // must agree with probing the wrapped-in-bounds equivalent directly.
    for y in 0..5 {
        let left_outside = TileCoord::new(-1, y);
        let right_inside = TileCoord::new(4, y);
        assert_eq!(
            maze.is_walkable(left_outside, WrapPolicy::Allowed),
            maze.is_walkable(right_inside, WrapPolicy::Forbidden),
            "row {y} left edge"
        );

        let right_outside = TileCoord::new(5, y);
        let left_inside = TileCoord::new(0, y);
        assert_eq!(
            maze.is_walkable(right_outside, WrapPolicy::Allowed),
            maze.is_walkable(left_inside, WrapPolicy::Forbidden),
            "row {y} right edge"
        );
    }

    for x in 0..5 {
        let top_outside = TileCoord::new(x, -1);
        let bottom_inside = TileCoord::new(x, 4);
        assert_eq!(
            maze.is_walkable(top_outside, WrapPolicy::Allowed),
            maze.is_walkable(bottom_inside, WrapPolicy::Forbidden),
            "column {x} top edge"
        );

        let bottom_outside = TileCoord::new(x, 5);
        let top_inside = TileCoord::new(x, 0);
        assert_eq!(
            maze.is_walkable(bottom_outside, WrapPolicy::Allowed),
            maze.is_walkable(top_inside, WrapPolicy::Forbidden),
            "column {x} bottom edge"
        );
    }
}

#[test]
fn out_of_bounds_stays_blocked_without_wrap() {
    let maze = tunnel_maze();
    assert!(!maze.is_walkable(TileCoord::new(-1, 2), WrapPolicy::Forbidden));
    assert!(!maze.is_walkable(TileCoord::new(5, 2), WrapPolicy::Forbidden));
    assert!(!maze.is_walkable(TileCoord::new(2, -1), WrapPolicy::Forbidden));
    assert!(!maze.is_walkable(TileCoord::new(2, 5), WrapPolicy::Forbidden));
}

#[test]
fn diagonal_wrap_is_never_synthesized() {
    // Fully open board: both axis wraps from every corner are individually
    // walkable, yet the diagonal neighbor must stay unreachable.
    let maze = maze(&[&[2, 0, 0], &[0, 0, 0], &[0, 0, 3]]);

    for corner in [
        TileCoord::new(-1, -1),
        TileCoord::new(3, -1),
        TileCoord::new(-1, 3),
        TileCoord::new(3, 3),
    ] {
        assert!(
            !maze.is_walkable(corner, WrapPolicy::Allowed),
            "{corner:?} must not wrap"
        );
    }

    let neighbors: Vec<_> = maze
        .neighbors(TileCoord::new(0, 0), WrapPolicy::Allowed)
        .collect();
    assert_eq!(neighbors.len(), 4);
    assert!(!neighbors
        .iter()
        .any(|neighbor| neighbor.tile == TileCoord::new(2, 2)));
}

#[test]
fn corner_tiles_may_wrap_on_both_axes_independently() {
    let maze = maze(&[&[2, 0, 0], &[0, 0, 0], &[0, 0, 3]]);

    let neighbors: Vec<_> = maze
        .neighbors(TileCoord::new(0, 0), WrapPolicy::Allowed)
        .collect();

    // Up wraps to the bottom row, Left wraps to the rightmost column; the
    // two in-bounds steps stay untouched.
    assert_eq!(neighbors[0].tile, TileCoord::new(0, 2));
    assert!(neighbors[0].wrapped);
    assert_eq!(neighbors[0].direction, Direction::Up);

    assert_eq!(neighbors[1].tile, TileCoord::new(0, 1));
    assert!(!neighbors[1].wrapped);

    assert_eq!(neighbors[2].tile, TileCoord::new(2, 0));
    assert!(neighbors[2].wrapped);
    assert_eq!(neighbors[2].direction, Direction::Left);

    assert_eq!(neighbors[3].tile, TileCoord::new(1, 0));
    assert!(!neighbors[3].wrapped);
}

#[test]
fn wrap_neighbor_requires_walkable_destination() {
    // The right edge of the tunnel row is a wall, so stepping left out of
    // bounds must not produce a neighbor even with wrap enabled.
    let maze = maze(&[&[2, 0, 1], &[0, 0, 0], &[0, 0, 3]]);

    let neighbors: Vec<_> = maze
        .neighbors(TileCoord::new(0, 0), WrapPolicy::Allowed)
        .collect();

    assert!(!neighbors
        .iter()
        .any(|neighbor| neighbor.direction == Direction::Left));
}

#[test]
fn reachability_is_idempotent() {
    let maze = tunnel_maze();
    let first = maze.reachable_from(maze.player_start());
    let second = maze.reachable_from(maze.player_start());
    assert_eq!(first, second);
    assert!(first.contains(&maze.player_start()));
}

#[test]
fn reachability_excludes_sealed_pockets() {
    let maze = maze(&[
        &[2, 0, 1, 0],
        &[0, 0, 1, 0],
        &[3, 0, 1, 0],
    ]);

    let reachable = maze.reachable_from(maze.player_start());

    for y in 0..3 {
        assert!(!reachable.contains(&TileCoord::new(3, y)), "pocket row {y}");
    }
    assert_eq!(reachable.len(), 6);
}

#[test]
fn reachability_ignores_wraparound_edges() {
    // The tunnel row connects the edges only through wraparound, which
    // reachability analysis must not traverse.
    let maze = maze(&[&[1, 1, 1], &[2, 1, 3], &[1, 1, 1]]);

    let reachable = maze.reachable_from(maze.player_start());

    assert_eq!(reachable.len(), 1);
    assert!(!reachable.contains(&TileCoord::new(2, 1)));
}

#[test]
fn reachability_from_a_wall_is_empty() {
    let maze = maze(&[&[2, 1, 3]]);
    assert!(maze.reachable_from(TileCoord::new(1, 0)).is_empty());
}

#[test]
fn walkable_tiles_enumerate_floor_in_row_major_order() {
    let maze = maze(&[&[2, 1], &[0, 3]]);
    assert_eq!(
        maze.walkable_tiles(),
        vec![
            TileCoord::new(0, 0),
            TileCoord::new(0, 1),
            TileCoord::new(1, 1)
        ]
    );
}
