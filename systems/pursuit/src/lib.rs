#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that chooses the pursuer's next step.
//!
//! The world announces every pursuer arrival with
//! [`Event::PursuerRouteNeeded`]; this system answers each request with at
//! most one [`Command::StepPursuer`], computed by a breadth-first search
//! toward the player's current tile. Only the first step of the shortest
//! path is used — the search re-runs at the next arrival, which keeps the
//! pursuer reactive to the player's latest position instead of committing to
//! a stale route. The search runs once per tile arrival, never per frame.

use std::collections::VecDeque;

use maze_chase_core::{Command, Direction, Event, TileCoord, WrapPolicy};
use maze_chase_world::Maze;

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the pursuit system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    wrap: WrapPolicy,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided wrap policy and seed.
    ///
    /// The policy decides whether the search may traverse wraparound edges;
    /// the default fairness design forbids it so the player can escape
    /// through tunnels the pursuer cannot take.
    #[must_use]
    pub const fn new(wrap: WrapPolicy, rng_seed: u64) -> Self {
        Self { wrap, rng_seed }
    }
}

/// Route decision produced for a single pursuer arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitPlan {
    /// Tile the chosen step leads to, already wrapped into bounds.
    pub next_tile: TileCoord,
    /// Direction of the chosen step.
    pub direction: Direction,
    /// Whether the chosen step crosses a wraparound edge.
    pub via_wrap: bool,
}

/// Pure system that answers pursuer route requests with step commands.
#[derive(Debug)]
pub struct Pursuit {
    wrap: WrapPolicy,
    rng_state: u64,
    fallback_steps: u64,
    exhausted_searches: u64,
    visited: Vec<bool>,
    seeds: Vec<Option<PursuitPlan>>,
    queue: VecDeque<TileCoord>,
}

impl Pursuit {
    /// Creates a new pursuit system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            wrap: config.wrap,
            rng_state: config.rng_seed,
            fallback_steps: 0,
            exhausted_searches: 0,
            visited: Vec::new(),
            seeds: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Consumes world events and the read-only maze to emit step commands.
    ///
    /// `player_tile` is passed explicitly by the orchestrator; the system
    /// never holds a reference into the world.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &Maze,
        player_tile: TileCoord,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PursuerRouteNeeded { from } = event {
                if let Some(plan) = self.plan(maze, *from, player_tile) {
                    out.push(Command::StepPursuer {
                        direction: plan.direction,
                    });
                }
            }
        }
    }

    /// Chooses the next step from `from` toward `target`.
    ///
    /// Returns `None` when the pursuer already shares the target tile or has
    /// no walkable neighbor at all. An exhausted search (target disconnected
    /// under the configured policy) falls back to a uniformly random
    /// walkable neighbor so pursuit never stalls the match.
    pub fn plan(
        &mut self,
        maze: &Maze,
        from: TileCoord,
        target: TileCoord,
    ) -> Option<PursuitPlan> {
        if from == target {
            return None;
        }

        if let Some(plan) = self.search(maze, from, target) {
            return Some(plan);
        }

        self.exhausted_searches += 1;
        log::warn!(
            "pursuit search from {from:?} found no route to {target:?}; taking a random step"
        );
        self.random_step(maze, from)
    }

    /// Number of random fallback steps taken so far.
    #[must_use]
    pub fn fallback_steps(&self) -> u64 {
        self.fallback_steps
    }

    /// Number of searches that exhausted without reaching the target.
    #[must_use]
    pub fn exhausted_searches(&self) -> u64 {
        self.exhausted_searches
    }

    /// Breadth-first search returning the first step of a shortest path.
    ///
    /// FIFO frontier over the maze's deterministic neighbor order; every
    /// discovered tile inherits the first step that opened its branch, so
    /// reaching the target immediately yields the step to return.
    fn search(&mut self, maze: &Maze, from: TileCoord, target: TileCoord) -> Option<PursuitPlan> {
        let cell_count = (maze.columns() as usize) * (maze.rows() as usize);
        self.visited.clear();
        self.visited.resize(cell_count, false);
        self.seeds.clear();
        self.seeds.resize(cell_count, None);
        self.queue.clear();

        let columns = maze.columns() as usize;
        let index = |tile: TileCoord| -> usize {
            tile.y() as usize * columns + tile.x() as usize
        };

        self.visited[index(from)] = true;
        self.queue.push_back(from);

        while let Some(tile) = self.queue.pop_front() {
            let inherited = self.seeds[index(tile)];

            for neighbor in maze.neighbors(tile, self.wrap) {
                let neighbor_index = index(neighbor.tile);
                if self.visited[neighbor_index] {
                    continue;
                }
                self.visited[neighbor_index] = true;

                let seed = inherited.unwrap_or(PursuitPlan {
                    next_tile: neighbor.tile,
                    direction: neighbor.direction,
                    via_wrap: neighbor.wrapped,
                });

                if neighbor.tile == target {
                    return Some(seed);
                }

                self.seeds[neighbor_index] = Some(seed);
                self.queue.push_back(neighbor.tile);
            }
        }

        None
    }

    fn random_step(&mut self, maze: &Maze, from: TileCoord) -> Option<PursuitPlan> {
        let mut candidates = [None; 4];
        let mut count = 0;
        for neighbor in maze.neighbors(from, self.wrap) {
            candidates[count] = Some(neighbor);
            count += 1;
        }

        if count == 0 {
            log::debug!("pursuer at {from:?} has no walkable neighbor; holding position");
            return None;
        }

        let pick = (self.advance_rng() % count as u64) as usize;
        let neighbor = candidates[pick]?;
        self.fallback_steps += 1;
        Some(PursuitPlan {
            next_tile: neighbor.tile,
            direction: neighbor.direction,
            via_wrap: neighbor.wrapped,
        })
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
