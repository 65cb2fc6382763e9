//! Tile-locked movement shared by the player and the pursuer.

use std::time::Duration;

use maze_chase_core::{Direction, PixelPoint, TileCoord, WrapPolicy};

use crate::maze::Maze;

/// Result of a step commit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommitOutcome {
    /// The entity started interpolating toward an adjacent tile.
    Stepped {
        /// Tile the entity is leaving.
        from: TileCoord,
        /// Tile the entity now moves toward.
        to: TileCoord,
    },
    /// The step crossed a wraparound edge; the entity snapped to the
    /// opposite side in one step instead of sliding across the board.
    Teleported {
        /// Tile the entity left.
        from: TileCoord,
        /// Tile the entity now occupies.
        to: TileCoord,
    },
    /// The step was illegal or the entity was mid-transit; nothing changed.
    Rejected,
}

/// One mobile entity: discrete tile plus continuous pixel position.
///
/// Player and pursuer are both instances of this shape; behavioral
/// differences (wrap policy, cannot-stop) are parameters supplied by the
/// world, not subtypes.
#[derive(Clone, Debug)]
pub(crate) struct Mobile {
    /// Tile the entity occupies or is actively leaving.
    pub(crate) tile: TileCoord,
    /// Tile currently being moved toward; equals `tile` once arrived.
    pub(crate) target_tile: TileCoord,
    /// Continuous position, converging on the center of `target_tile`.
    pub(crate) position: PixelPoint,
    /// Last committed direction.
    pub(crate) facing: Option<Direction>,
    /// Movement speed in pixels per second.
    pub(crate) speed: f32,
}

impl Mobile {
    /// Creates an entity at rest on the provided tile.
    pub(crate) fn at(tile: TileCoord, speed: f32, maze: &Maze) -> Self {
        Self {
            tile,
            target_tile: tile,
            position: maze.tile_to_pixel(tile),
            facing: None,
            speed,
        }
    }

    /// Reports whether the entity is interpolating between tile centers.
    pub(crate) fn is_moving(&self) -> bool {
        self.tile != self.target_tile
    }

    /// Attempts to commit a step in `direction` under the given wrap policy.
    ///
    /// Only legal while tile-locked and toward a walkable destination; every
    /// other attempt is silently rejected so caller bugs cannot corrupt the
    /// match. Boundary crossings teleport rather than slide.
    pub(crate) fn commit(
        &mut self,
        direction: Direction,
        maze: &Maze,
        wrap: WrapPolicy,
    ) -> CommitOutcome {
        if self.is_moving() {
            return CommitOutcome::Rejected;
        }

        let step = self.tile.offset(direction);
        if !maze.is_walkable(step, wrap) {
            return CommitOutcome::Rejected;
        }

        self.facing = Some(direction);
        let from = self.tile;

        if maze.in_bounds(step) {
            self.target_tile = step;
            CommitOutcome::Stepped { from, to: step }
        } else {
            let to = maze.wrap(step);
            self.tile = to;
            self.target_tile = to;
            self.position = maze.tile_to_pixel(to);
            CommitOutcome::Teleported { from, to }
        }
    }

    /// Moves the position toward the target center by `speed * dt`, clamped
    /// so it cannot overshoot. Returns `true` when the entity arrives and
    /// snaps onto the center this tick.
    pub(crate) fn advance(&mut self, dt: Duration, maze: &Maze) -> bool {
        if !self.is_moving() {
            return false;
        }

        let center = maze.tile_to_pixel(self.target_tile);
        let dx = center.x() - self.position.x();
        let dy = center.y() - self.position.y();
        let distance = (dx * dx + dy * dy).sqrt();
        let travel = self.speed * dt.as_secs_f32();

        if travel >= distance || distance <= f32::EPSILON {
            self.position = center;
            self.tile = self.target_tile;
            return true;
        }

        self.position = PixelPoint::new(
            self.position.x() + dx / distance * travel,
            self.position.y() + dy / distance * travel,
        );
        false
    }
}
