#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for the maze-chase core.
//!
//! The world owns the maze, both mobile entities, the pickups and the hazard
//! accumulators. All mutation flows through [`apply`]; all observation flows
//! through [`query`]. One [`maze_chase_core::Command::Tick`] call per rendered
//! frame drives the entire simulation — no background work, no callbacks.

mod hazards;
mod maze;
mod mobile;
mod rng;

pub use maze::{Layout, Maze, MazeError, Neighbor, NeighborIter};

use std::time::Duration;

use maze_chase_core::{
    Command, Direction, Event, LossCause, MatchConfig, MatchOutcome, TileCoord,
};

use hazards::Hazards;
use mobile::{CommitOutcome, Mobile};

/// Fraction of the tile length used as the catch distance when the
/// configuration does not pin one explicitly.
const DEFAULT_CONTACT_RADIUS_RATIO: f32 = 0.75;

#[derive(Clone, Debug)]
enum MatchStatus {
    Running,
    Settling {
        outcome: MatchOutcome,
        remaining: Duration,
    },
    Ended {
        outcome: MatchOutcome,
    },
}

/// Represents the authoritative state of one match.
#[derive(Debug)]
pub struct World {
    maze: Maze,
    config: MatchConfig,
    player: Mobile,
    pursuer: Mobile,
    intent: Option<Direction>,
    collectibles: Vec<TileCoord>,
    oxygen_tanks: Vec<TileCoord>,
    collected: u32,
    total_to_collect: u32,
    contact: Duration,
    contact_radius: f32,
    hazards: Hazards,
    status: MatchStatus,
    rng_state: u64,
}

impl World {
    /// Creates a new world from a validated maze and a match configuration.
    #[must_use]
    pub fn new(maze: Maze, config: MatchConfig) -> Self {
        let mut rng_state = config.rng_seed;
        let hazards = Hazards::new(&config.debuffs, config.hazards, &mut rng_state);
        let contact_radius = config
            .contact_radius
            .unwrap_or(maze.layout().tile_length() * DEFAULT_CONTACT_RADIUS_RATIO);
        let player = Mobile::at(maze.player_start(), config.player_speed, &maze);
        let pursuer = Mobile::at(
            maze.pursuer_start(),
            config.pursuer_speed * config.difficulty.pursuer_speed_multiplier,
            &maze,
        );

        Self {
            maze,
            config,
            player,
            pursuer,
            intent: None,
            collectibles: Vec::new(),
            oxygen_tanks: Vec::new(),
            collected: 0,
            total_to_collect: 0,
            contact: Duration::ZERO,
            contact_radius,
            hazards,
            status: MatchStatus::Running,
            rng_state,
        }
    }

    fn is_running(&self) -> bool {
        matches!(self.status, MatchStatus::Running)
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        match &mut self.status {
            MatchStatus::Ended { .. } => return,
            MatchStatus::Settling { outcome, remaining } => {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    let outcome = *outcome;
                    self.status = MatchStatus::Ended { outcome };
                    out_events.push(Event::MatchEnded { outcome });
                }
                return;
            }
            MatchStatus::Running => {}
        }

        out_events.push(Event::TimeAdvanced { dt });

        let effects = self
            .hazards
            .advance(dt, &mut self.rng_state, out_events);
        if effects.oxygen_depleted {
            self.finish(
                MatchOutcome::Lost {
                    cause: LossCause::OxygenDepleted,
                },
                out_events,
            );
            return;
        }

        if !effects.player_frozen {
            self.commit_player(out_events);
            let scaled = dt.mul_f32(effects.speed_scale);
            let _ = self.player.advance(scaled, &self.maze);
        }

        let _ = self.pursuer.advance(dt, &self.maze);
        if !self.pursuer.is_moving() {
            out_events.push(Event::PursuerRouteNeeded {
                from: self.pursuer.tile,
            });
        }

        self.resolve_pickups(out_events);
        if self.is_running() {
            self.resolve_contact(dt, out_events);
        }
    }

    /// Attempts a player step from the sticky intent, honoring the
    /// cannot-stop variant's auto-commit and perpendicular fallback.
    fn commit_player(&mut self, out_events: &mut Vec<Event>) {
        if self.player.is_moving() {
            return;
        }

        let cannot_stop = self.config.debuffs.cannot_stop;
        let mut direction = self.intent;
        if direction.is_none() && cannot_stop {
            direction = self.player.facing;
        }
        let Some(direction) = direction else {
            return;
        };

        match self.player.commit(direction, &self.maze, self.config.player_wrap) {
            CommitOutcome::Stepped { from, to } => out_events.push(Event::PlayerStepCommitted {
                from,
                to,
                direction,
                wrapped: false,
            }),
            CommitOutcome::Teleported { from, to } => out_events.push(Event::PlayerStepCommitted {
                from,
                to,
                direction,
                wrapped: true,
            }),
            CommitOutcome::Rejected => {
                if cannot_stop {
                    self.turn_perpendicular(direction, out_events);
                }
                // Otherwise the entity simply stays tile-locked this tick.
            }
        }
    }

    /// Cannot-stop wall handling: try the two perpendicular directions in
    /// fixed order and commit to the first walkable one.
    fn turn_perpendicular(&mut self, blocked: Direction, out_events: &mut Vec<Event>) {
        for side in blocked.perpendicular() {
            match self.player.commit(side, &self.maze, self.config.player_wrap) {
                CommitOutcome::Stepped { from, to } => {
                    self.intent = Some(side);
                    out_events.push(Event::PlayerStepCommitted {
                        from,
                        to,
                        direction: side,
                        wrapped: false,
                    });
                    return;
                }
                CommitOutcome::Teleported { from, to } => {
                    self.intent = Some(side);
                    out_events.push(Event::PlayerStepCommitted {
                        from,
                        to,
                        direction: side,
                        wrapped: true,
                    });
                    return;
                }
                CommitOutcome::Rejected => {}
            }
        }
    }

    fn step_pursuer(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }
        if self.pursuer.is_moving() {
            log::debug!("pursuer step ignored: entity is mid-transit");
            return;
        }

        match self
            .pursuer
            .commit(direction, &self.maze, self.config.difficulty.pursuer_wrap)
        {
            CommitOutcome::Stepped { from, to } => out_events.push(Event::PursuerStepCommitted {
                from,
                to,
                direction,
                wrapped: false,
            }),
            CommitOutcome::Teleported { from, to } => {
                out_events.push(Event::PursuerStepCommitted {
                    from,
                    to,
                    direction,
                    wrapped: true,
                })
            }
            CommitOutcome::Rejected => {
                log::debug!("pursuer step ignored: {direction:?} is not walkable");
            }
        }
    }

    fn resolve_pickups(&mut self, out_events: &mut Vec<Event>) {
        let tile = self.player.tile;

        if let Some(index) = self.collectibles.iter().position(|&candidate| candidate == tile) {
            let _ = self.collectibles.swap_remove(index);
            self.collected += 1;
            out_events.push(Event::CollectibleCollected {
                tile,
                collected: self.collected,
                remaining: self.collectibles.len() as u32,
            });

            if self.total_to_collect > 0 && self.collected >= self.total_to_collect {
                self.finish(
                    MatchOutcome::Won {
                        collected: self.collected,
                    },
                    out_events,
                );
                return;
            }
        }

        if let Some(index) = self.oxygen_tanks.iter().position(|&candidate| candidate == tile) {
            let _ = self.oxygen_tanks.swap_remove(index);
            let _ = self.hazards.refill_oxygen();
            out_events.push(Event::OxygenTankCollected { tile });
        }
    }

    /// Catch detection over continuous pixel distance, accumulating the
    /// grace timer while contact is sustained and resetting it on
    /// separation. Tile equality needs no separate test: coincident tiles
    /// collapse the pixel distance to zero.
    fn resolve_contact(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let distance = self.player.position.distance_to(self.pursuer.position);

        if distance < self.contact_radius {
            if self.config.debuffs.one_hit_catch {
                self.finish(
                    MatchOutcome::Lost {
                        cause: LossCause::Caught,
                    },
                    out_events,
                );
                return;
            }

            self.contact = self.contact.saturating_add(dt);
            if self.contact >= self.config.difficulty.contact_grace {
                self.finish(
                    MatchOutcome::Lost {
                        cause: LossCause::Caught,
                    },
                    out_events,
                );
            }
        } else {
            self.contact = Duration::ZERO;
        }
    }

    /// Records the terminal outcome. The report to the shell is deferred by
    /// the configured settle delay; a zero delay reports within this tick.
    fn finish(&mut self, outcome: MatchOutcome, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        if self.config.settle_delay.is_zero() {
            self.status = MatchStatus::Ended { outcome };
            out_events.push(Event::MatchEnded { outcome });
        } else {
            self.status = MatchStatus::Settling {
                outcome,
                remaining: self.config.settle_delay,
            };
        }
    }

    /// Tiles eligible for a new pickup: reachable floor, excluding both
    /// start tiles and tiles already carrying a pickup.
    fn scatter_pool(&self) -> Vec<TileCoord> {
        self.maze
            .reachable_from(self.maze.player_start())
            .into_iter()
            .filter(|&tile| tile != self.maze.player_start() && tile != self.maze.pursuer_start())
            .filter(|tile| !self.collectibles.contains(tile))
            .filter(|tile| !self.oxygen_tanks.contains(tile))
            .collect()
    }

    /// Fisher-Yates shuffle over the eligible pool, truncated to `count`.
    fn scatter_targets(&mut self, count: u32) -> Vec<TileCoord> {
        let mut pool = self.scatter_pool();
        for index in (1..pool.len()).rev() {
            let swap_index = (rng::advance(&mut self.rng_state) % (index as u64 + 1)) as usize;
            pool.swap(index, swap_index);
        }
        pool.truncate(count as usize);
        pool
    }

    fn scatter_collectibles(&mut self, count: u32, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        let tiles = self.scatter_targets(count);
        let placed = tiles.len() as u32;
        if placed < count {
            log::warn!("requested {count} collectibles but only {placed} tiles were eligible");
        }
        self.collectibles.extend(tiles);
        self.total_to_collect += placed;
        out_events.push(Event::CollectiblesPlaced { count: placed });
    }

    fn scatter_oxygen_tanks(&mut self, count: u32, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        let tiles = self.scatter_targets(count);
        let placed = tiles.len() as u32;
        if placed < count {
            log::warn!("requested {count} oxygen tanks but only {placed} tiles were eligible");
        }
        self.oxygen_tanks.extend(tiles);
        out_events.push(Event::OxygenTanksPlaced { count: placed });
    }

    /// Validates an explicit placement list against walkability and
    /// reachability, skipping (and logging) illegal or duplicate tiles.
    fn filter_placements(&self, tiles: &[TileCoord], occupied: &[TileCoord]) -> Vec<TileCoord> {
        let reachable = self.maze.reachable_from(self.maze.player_start());
        let mut accepted: Vec<TileCoord> = Vec::with_capacity(tiles.len());

        for &tile in tiles {
            if !reachable.contains(&tile) {
                log::warn!("pickup placement skipped: {tile:?} is not reachable floor");
                continue;
            }
            if occupied.contains(&tile) || accepted.contains(&tile) {
                log::warn!("pickup placement skipped: {tile:?} already carries a pickup");
                continue;
            }
            accepted.push(tile);
        }

        accepted
    }

    fn place_collectibles(&mut self, tiles: &[TileCoord], out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        let mut occupied = self.collectibles.clone();
        occupied.extend_from_slice(&self.oxygen_tanks);
        let accepted = self.filter_placements(tiles, &occupied);
        let placed = accepted.len() as u32;
        self.collectibles.extend(accepted);
        self.total_to_collect += placed;
        out_events.push(Event::CollectiblesPlaced { count: placed });
    }

    fn place_oxygen_tanks(&mut self, tiles: &[TileCoord], out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        let mut occupied = self.collectibles.clone();
        occupied.extend_from_slice(&self.oxygen_tanks);
        let accepted = self.filter_placements(tiles, &occupied);
        let placed = accepted.len() as u32;
        self.oxygen_tanks.extend(accepted);
        out_events.push(Event::OxygenTanksPlaced { count: placed });
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetPlayerIntent { direction } => {
            if world.is_running() {
                world.intent = direction;
            }
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StepPursuer { direction } => world.step_pursuer(direction, out_events),
        Command::PlaceCollectibles { tiles } => world.place_collectibles(&tiles, out_events),
        Command::PlaceOxygenTanks { tiles } => world.place_oxygen_tanks(&tiles, out_events),
        Command::ScatterCollectibles { count } => world.scatter_collectibles(count, out_events),
        Command::ScatterOxygenTanks { count } => world.scatter_oxygen_tanks(count, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use maze_chase_core::{
        Direction, MatchOutcome, MatchPhase, PixelPoint, TileCoord,
    };

    use super::{Maze, MatchStatus, World};

    /// Immutable representation of one mobile entity's state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MobileSnapshot {
        /// Tile the entity occupies or is actively leaving.
        pub tile: TileCoord,
        /// Tile the entity is moving toward; equals `tile` at rest.
        pub target_tile: TileCoord,
        /// Continuous pixel position.
        pub position: PixelPoint,
        /// Last committed direction.
        pub facing: Option<Direction>,
        /// Movement speed in pixels per second.
        pub speed: f32,
        /// Whether the entity is interpolating between tile centers.
        pub is_moving: bool,
    }

    /// Collection progress toward the win condition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Progress {
        /// Collectibles gathered so far.
        pub collected: u32,
        /// Collectibles required in total.
        pub total: u32,
    }

    /// Provides read-only access to the maze topology.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> MobileSnapshot {
        snapshot(&world.player)
    }

    /// Captures the pursuer's current state.
    #[must_use]
    pub fn pursuer(world: &World) -> MobileSnapshot {
        snapshot(&world.pursuer)
    }

    /// Tiles currently carrying a collectible.
    #[must_use]
    pub fn collectibles(world: &World) -> &[TileCoord] {
        &world.collectibles
    }

    /// Tiles currently carrying an oxygen tank.
    #[must_use]
    pub fn oxygen_tanks(world: &World) -> &[TileCoord] {
        &world.oxygen_tanks
    }

    /// Collection progress toward the win condition.
    #[must_use]
    pub fn progress(world: &World) -> Progress {
        Progress {
            collected: world.collected,
            total: world.total_to_collect,
        }
    }

    /// Current oxygen level, if the drain hazard is active this match.
    #[must_use]
    pub fn oxygen_level(world: &World) -> Option<f32> {
        world.hazards.oxygen_level()
    }

    /// Coarse lifecycle phase of the match.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        match world.status {
            MatchStatus::Running => MatchPhase::Running,
            MatchStatus::Settling { .. } => MatchPhase::Settling,
            MatchStatus::Ended { .. } => MatchPhase::Ended,
        }
    }

    /// Terminal outcome, available once it has been reported.
    #[must_use]
    pub fn outcome(world: &World) -> Option<MatchOutcome> {
        match world.status {
            MatchStatus::Ended { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Duration of the currently sustained pursuer contact.
    #[must_use]
    pub fn contact_duration(world: &World) -> Duration {
        world.contact
    }

    /// Manhattan distance between the player's and the pursuer's tiles,
    /// typically rendered as a proximity warning.
    #[must_use]
    pub fn threat_distance(world: &World) -> u32 {
        world.player.tile.manhattan_distance(world.pursuer.tile)
    }

    /// The player's sticky movement intent.
    #[must_use]
    pub fn player_intent(world: &World) -> Option<Direction> {
        world.intent
    }

    fn snapshot(mobile: &super::Mobile) -> MobileSnapshot {
        MobileSnapshot {
            tile: mobile.tile,
            target_tile: mobile.target_tile,
            position: mobile.position,
            facing: mobile.facing,
            speed: mobile.speed,
            is_moving: mobile.is_moving(),
        }
    }
}
