#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match-loop facade consumed by presentation shells.
//!
//! A [`MatchSession`] assembles the authoritative world and the pursuit
//! system from one configuration record, then pumps the command/event cycle
//! once per rendered frame: apply the player's intent, advance the clock,
//! let the pursuit system answer any route request, and hand the frame's
//! events back to the caller. The shell renders positions through
//! [`maze_chase_world::query`] and receives exactly one
//! [`Event::MatchEnded`] per match.

use std::time::Duration;

use maze_chase_core::{
    Command, Direction, Event, MatchConfig, MatchOutcome, MazeTemplate, TileCoord,
};
use maze_chase_system_pursuit::{Config as PursuitConfig, Pursuit};
use maze_chase_world::{self as world, query, Layout, Maze, MazeError, World};
use thiserror::Error;

/// Seed separation between the world's generator and the pursuit system's
/// fallback generator, so the two streams never overlap.
const PURSUIT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Errors preventing a match from being assembled.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SetupError {
    /// The maze template failed validation.
    #[error(transparent)]
    Maze(#[from] MazeError),
    /// The configured player speed is not a positive number.
    #[error("player speed must be positive, got {0}")]
    InvalidPlayerSpeed(f32),
    /// The configured pursuer speed (after the difficulty multiplier) is
    /// not a positive number.
    #[error("effective pursuer speed must be positive, got {0}")]
    InvalidPursuerSpeed(f32),
    /// The configured contact radius is not a positive number.
    #[error("contact radius must be positive, got {0}")]
    InvalidContactRadius(f32),
    /// The layout's tile length is not a positive number.
    #[error("tile length must be positive, got {0}")]
    InvalidTileLength(f32),
}

/// One assembled match: the world plus the systems that drive it.
#[derive(Debug)]
pub struct MatchSession {
    world: World,
    pursuit: Pursuit,
    outcome: Option<MatchOutcome>,
}

impl MatchSession {
    /// Assembles a match from a maze template, a pixel layout and a match
    /// configuration, scattering the configured pickups.
    pub fn new(
        template: &MazeTemplate,
        layout: Layout,
        config: MatchConfig,
    ) -> Result<Self, SetupError> {
        if !(config.player_speed > 0.0) {
            return Err(SetupError::InvalidPlayerSpeed(config.player_speed));
        }
        let pursuer_speed = config.pursuer_speed * config.difficulty.pursuer_speed_multiplier;
        if !(pursuer_speed > 0.0) {
            return Err(SetupError::InvalidPursuerSpeed(pursuer_speed));
        }
        if let Some(radius) = config.contact_radius {
            if !(radius > 0.0) {
                return Err(SetupError::InvalidContactRadius(radius));
            }
        }
        if !(layout.tile_length() > 0.0) {
            return Err(SetupError::InvalidTileLength(layout.tile_length()));
        }

        let maze = Maze::from_template(template, layout)?;
        let pursuit = Pursuit::new(PursuitConfig::new(
            config.difficulty.pursuer_wrap,
            config.rng_seed ^ PURSUIT_SEED_SALT,
        ));

        let collectible_count = config.collectible_count;
        let oxygen_tank_count = if config.debuffs.oxygen_drain {
            config.oxygen_tank_count
        } else {
            0
        };

        let mut world = World::new(maze, config);
        let mut events = Vec::new();
        if collectible_count > 0 {
            world::apply(
                &mut world,
                Command::ScatterCollectibles {
                    count: collectible_count,
                },
                &mut events,
            );
        }
        if oxygen_tank_count > 0 {
            world::apply(
                &mut world,
                Command::ScatterOxygenTanks {
                    count: oxygen_tank_count,
                },
                &mut events,
            );
        }

        Ok(Self {
            world,
            pursuit,
            outcome: None,
        })
    }

    /// Performs one frame of the match loop and returns the frame's events.
    ///
    /// `intent` is the shell's current directional wish — keyboard, touch
    /// joystick or scripted input all reduce to this one value.
    pub fn tick(&mut self, intent: Option<Direction>, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SetPlayerIntent { direction: intent },
            &mut events,
        );
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.pump_pursuit(&mut events);
        self.capture_outcome(&events);
        events
    }

    /// Places collectibles on explicit tiles, for scripted layouts.
    pub fn place_collectibles(&mut self, tiles: &[TileCoord]) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceCollectibles {
                tiles: tiles.to_vec(),
            },
            &mut events,
        );
        events
    }

    /// Places oxygen tanks on explicit tiles, for scripted layouts.
    pub fn place_oxygen_tanks(&mut self, tiles: &[TileCoord]) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceOxygenTanks {
                tiles: tiles.to_vec(),
            },
            &mut events,
        );
        events
    }

    /// Terminal outcome, available once the settle delay elapsed and the
    /// world reported it.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Read-only access to the world for rendering queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Answers this frame's route requests with pursuit step commands.
    ///
    /// Commit happens within the same frame, so in a live chase the search
    /// runs exactly once per pursuer tile arrival.
    fn pump_pursuit(&mut self, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        let player_tile = query::player(&self.world).tile;
        self.pursuit
            .handle(events, query::maze(&self.world), player_tile, &mut commands);

        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    fn capture_outcome(&mut self, events: &[Event]) {
        for event in events {
            if let Event::MatchEnded { outcome } = event {
                self.outcome = Some(*outcome);
            }
        }
    }
}
