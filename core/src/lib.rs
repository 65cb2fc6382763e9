#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-chase engine.
//!
//! This crate defines the message surface that connects presentation shells,
//! the authoritative world, and pure systems. Shells submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cardinal movement directions available to mobile entities.
///
/// The declaration order doubles as the deterministic enumeration order used
/// by adjacency queries and pathfinding tie-breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in deterministic enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Tile-space delta produced by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two directions perpendicular to this one, in fixed order.
    ///
    /// Vertical travel yields `[Left, Right]`; horizontal travel yields
    /// `[Up, Down]`. The order is part of the cannot-stop turning contract.
    #[must_use]
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }
}

/// Location of a single grid tile expressed as signed column and row indices.
///
/// Coordinates are signed so that a tile one step past a boundary remains
/// expressible before wraparound reduction; only the maze decides whether such
/// a coordinate resolves to anything.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Coordinate produced by a single step in the provided direction.
    ///
    /// The result may lie outside any particular maze; callers resolve it
    /// through walkability queries.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> TileCoord {
        let (dx, dy) = direction.delta();
        TileCoord::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Continuous position expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    x: f32,
    y: f32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Classification of a single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Traversable floor.
    Path,
    /// Impassable wall.
    Wall,
}

/// Governs whether boundary-crossing steps resolve to the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapPolicy {
    /// Steps leaving the grid are treated as blocked.
    Forbidden,
    /// Steps leaving the grid by one tile resolve to the opposite edge.
    Allowed,
}

impl WrapPolicy {
    /// Reports whether wraparound adjacency is permitted under this policy.
    #[must_use]
    pub const fn allows(self) -> bool {
        matches!(self, WrapPolicy::Allowed)
    }
}

/// Rectangular maze description supplied by the content layer.
///
/// Cells use the reserved values [`MazeTemplate::PATH`],
/// [`MazeTemplate::WALL`], [`MazeTemplate::PLAYER_START`] and
/// [`MazeTemplate::PURSUER_START`]; both start markers count as walkable
/// floor. Validation happens when the world builds a maze from the template,
/// not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeTemplate {
    rows: Vec<Vec<u8>>,
}

impl MazeTemplate {
    /// Cell value marking traversable floor.
    pub const PATH: u8 = 0;
    /// Cell value marking an impassable wall.
    pub const WALL: u8 = 1;
    /// Cell value marking the player's start tile.
    pub const PLAYER_START: u8 = 2;
    /// Cell value marking the pursuer's start tile.
    pub const PURSUER_START: u8 = 3;

    /// Creates a template from row-major cell values.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        Self { rows }
    }

    /// Row-major cell values backing the template.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

/// Gameplay modifiers that alter locomotion or catch resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Debuff {
    /// The player keeps moving in the last committed direction.
    CannotStop,
    /// Any pursuer contact is immediately fatal, bypassing the grace window.
    OneHitCatch,
    /// The player periodically freezes in place.
    RandomFreeze,
    /// The player periodically slows to a fraction of normal speed.
    Limp,
    /// Oxygen drains over time and must be replenished from tank pickups.
    OxygenDrain,
}

/// Set of debuffs active for a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuffSet {
    /// Enables [`Debuff::CannotStop`].
    pub cannot_stop: bool,
    /// Enables [`Debuff::OneHitCatch`].
    pub one_hit_catch: bool,
    /// Enables [`Debuff::RandomFreeze`].
    pub random_freeze: bool,
    /// Enables [`Debuff::Limp`].
    pub limp: bool,
    /// Enables [`Debuff::OxygenDrain`].
    pub oxygen_drain: bool,
}

impl DebuffSet {
    /// Set with every debuff disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            cannot_stop: false,
            one_hit_catch: false,
            random_freeze: false,
            limp: false,
            oxygen_drain: false,
        }
    }
}

/// Difficulty parameters supplied by the progression layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Multiplier applied to the pursuer's base speed.
    pub pursuer_speed_multiplier: f32,
    /// Sustained contact tolerated before a catch is ruled fatal.
    pub contact_grace: Duration,
    /// Whether the pursuer may traverse wraparound edges.
    pub pursuer_wrap: WrapPolicy,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            pursuer_speed_multiplier: 1.0,
            contact_grace: Duration::from_millis(300),
            pursuer_wrap: WrapPolicy::Forbidden,
        }
    }
}

/// Tuning for the elapsed-time hazard accumulators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardConfig {
    /// Interval between freeze chance rolls.
    pub freeze_check_interval: Duration,
    /// Probability in `[0, 1]` that a roll freezes the player.
    pub freeze_chance: f32,
    /// Duration of a triggered freeze.
    pub freeze_duration: Duration,
    /// Shortest pause between limp episodes.
    pub limp_interval_min: Duration,
    /// Longest pause between limp episodes.
    pub limp_interval_max: Duration,
    /// Duration of a limp episode.
    pub limp_duration: Duration,
    /// Speed fraction applied while limping.
    pub limp_speed_scale: f32,
    /// Interval between oxygen drain steps.
    pub oxygen_drain_interval: Duration,
    /// Oxygen units removed per drain step.
    pub oxygen_drain_step: f32,
    /// Oxygen units restored by a tank pickup.
    pub oxygen_refill: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            freeze_check_interval: Duration::from_millis(2000),
            freeze_chance: 0.06,
            freeze_duration: Duration::from_millis(1000),
            limp_interval_min: Duration::from_millis(3000),
            limp_interval_max: Duration::from_millis(5000),
            limp_duration: Duration::from_millis(350),
            limp_speed_scale: 0.4,
            oxygen_drain_interval: Duration::from_millis(200),
            oxygen_drain_step: 1.0,
            oxygen_refill: 40.0,
        }
    }
}

/// Complete configuration record for a single match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Player movement speed in pixels per second.
    pub player_speed: f32,
    /// Pursuer base movement speed in pixels per second, before the
    /// difficulty multiplier.
    pub pursuer_speed: f32,
    /// Whether the player may traverse wraparound edges.
    pub player_wrap: WrapPolicy,
    /// Number of collectibles scattered at match start.
    pub collectible_count: u32,
    /// Number of oxygen tanks scattered when oxygen drain is active.
    pub oxygen_tank_count: u32,
    /// Catch distance between entity centers in pixels. `None` derives
    /// three quarters of the tile length.
    pub contact_radius: Option<f32>,
    /// Delay between a terminal outcome and its report to the shell.
    pub settle_delay: Duration,
    /// Seed for the world's deterministic random generator.
    pub rng_seed: u64,
    /// Difficulty parameters.
    pub difficulty: DifficultyConfig,
    /// Debuffs active for the match.
    pub debuffs: DebuffSet,
    /// Hazard accumulator tuning.
    pub hazards: HazardConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_speed: 160.0,
            pursuer_speed: 120.0,
            player_wrap: WrapPolicy::Allowed,
            collectible_count: 15,
            oxygen_tank_count: 5,
            contact_radius: None,
            settle_delay: Duration::from_millis(600),
            rng_seed: 0x7f4a_9c3d_52e1_b604,
            difficulty: DifficultyConfig::default(),
            debuffs: DebuffSet::default(),
            hazards: HazardConfig::default(),
        }
    }
}

/// Reasons a match can be lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// The pursuer caught the player.
    Caught,
    /// The oxygen reserve ran out.
    OxygenDepleted,
}

/// Terminal result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Every collectible was gathered.
    Won {
        /// Number of collectibles gathered.
        collected: u32,
    },
    /// The player was defeated.
    Lost {
        /// What defeated the player.
        cause: LossCause,
    },
}

/// Coarse lifecycle phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// The match is being simulated.
    Running,
    /// A terminal outcome exists but has not yet been reported.
    Settling,
    /// The terminal outcome has been reported; ticks are ignored.
    Ended,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the player's current movement intent.
    SetPlayerIntent {
        /// Desired direction, or `None` for no movement wish.
        direction: Option<Direction>,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the pursuer commit a step in the specified direction.
    StepPursuer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Places collectibles on the provided tiles, skipping illegal ones.
    PlaceCollectibles {
        /// Tiles that should receive a collectible.
        tiles: Vec<TileCoord>,
    },
    /// Places oxygen tanks on the provided tiles, skipping illegal ones.
    PlaceOxygenTanks {
        /// Tiles that should receive an oxygen tank.
        tiles: Vec<TileCoord>,
    },
    /// Scatters collectibles across reachable floor tiles.
    ScatterCollectibles {
        /// Number of collectibles requested.
        count: u32,
    },
    /// Scatters oxygen tanks across reachable floor tiles.
    ScatterOxygenTanks {
        /// Number of tanks requested.
        count: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player committed a step toward a new tile.
    PlayerStepCommitted {
        /// Tile the player is leaving.
        from: TileCoord,
        /// Tile the player is now moving toward or teleported onto.
        to: TileCoord,
        /// Committed direction of travel.
        direction: Direction,
        /// Whether the step crossed a wraparound edge as a teleport.
        wrapped: bool,
    },
    /// Confirms that the pursuer committed a step toward a new tile.
    PursuerStepCommitted {
        /// Tile the pursuer is leaving.
        from: TileCoord,
        /// Tile the pursuer is now moving toward or teleported onto.
        to: TileCoord,
        /// Committed direction of travel.
        direction: Direction,
        /// Whether the step crossed a wraparound edge as a teleport.
        wrapped: bool,
    },
    /// Announces that the pursuer rests at a tile center and awaits a route.
    PursuerRouteNeeded {
        /// Tile the pursuer currently occupies.
        from: TileCoord,
    },
    /// Confirms that the player gathered a collectible.
    CollectibleCollected {
        /// Tile the collectible occupied.
        tile: TileCoord,
        /// Collectibles gathered so far.
        collected: u32,
        /// Collectibles still on the board.
        remaining: u32,
    },
    /// Confirms that the player gathered an oxygen tank.
    OxygenTankCollected {
        /// Tile the tank occupied.
        tile: TileCoord,
    },
    /// Reports how many collectibles were placed on the board.
    CollectiblesPlaced {
        /// Number of collectibles actually placed.
        count: u32,
    },
    /// Reports how many oxygen tanks were placed on the board.
    OxygenTanksPlaced {
        /// Number of tanks actually placed.
        count: u32,
    },
    /// Announces that a hazard fired against the player.
    DebuffTriggered {
        /// The hazard that fired.
        debuff: Debuff,
    },
    /// Reports the single terminal outcome of the match.
    MatchEnded {
        /// The outcome reached.
        outcome: MatchOutcome,
    },
}
