//! Debuff hazards modeled as elapsed-time accumulators.
//!
//! Every timed effect is an accumulated-duration counter compared against its
//! threshold inside the tick, never a scheduled callback, so a test can call
//! `tick(dt)` N times and observe reproducible results.

use std::time::Duration;

use maze_chase_core::{Debuff, DebuffSet, Event, HazardConfig};

use crate::rng;

const FULL_OXYGEN: f32 = 100.0;

/// Per-tick hazard effects applied to the player.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HazardTick {
    /// The player may neither commit nor move this tick.
    pub(crate) player_frozen: bool,
    /// Fraction applied to the player's speed this tick.
    pub(crate) speed_scale: f32,
    /// The oxygen reserve ran out this tick.
    pub(crate) oxygen_depleted: bool,
}

#[derive(Clone, Debug)]
struct FreezeState {
    check_accumulator: Duration,
    frozen_remaining: Duration,
}

#[derive(Clone, Debug)]
struct LimpState {
    until_next: Duration,
    limp_remaining: Duration,
}

#[derive(Clone, Debug)]
struct OxygenState {
    level: f32,
    drain_accumulator: Duration,
}

/// Accumulator bundle for the hazards enabled by the match's debuff set.
#[derive(Clone, Debug)]
pub(crate) struct Hazards {
    config: HazardConfig,
    freeze: Option<FreezeState>,
    limp: Option<LimpState>,
    oxygen: Option<OxygenState>,
}

impl Hazards {
    pub(crate) fn new(debuffs: &DebuffSet, config: HazardConfig, rng_state: &mut u64) -> Self {
        let freeze = debuffs.random_freeze.then(|| FreezeState {
            check_accumulator: Duration::ZERO,
            frozen_remaining: Duration::ZERO,
        });
        let limp = debuffs.limp.then(|| LimpState {
            until_next: rng::duration_between(
                rng_state,
                config.limp_interval_min,
                config.limp_interval_max,
            ),
            limp_remaining: Duration::ZERO,
        });
        let oxygen = debuffs.oxygen_drain.then(|| OxygenState {
            level: FULL_OXYGEN,
            drain_accumulator: Duration::ZERO,
        });

        Self {
            config,
            freeze,
            limp,
            oxygen,
        }
    }

    /// Advances every active accumulator by `dt` and reports the combined
    /// effects for this tick.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        rng_state: &mut u64,
        out_events: &mut Vec<Event>,
    ) -> HazardTick {
        let mut effects = HazardTick {
            player_frozen: false,
            speed_scale: 1.0,
            oxygen_depleted: false,
        };

        if let Some(freeze) = &mut self.freeze {
            if !freeze.frozen_remaining.is_zero() {
                freeze.frozen_remaining = freeze.frozen_remaining.saturating_sub(dt);
                effects.player_frozen = true;
            } else {
                freeze.check_accumulator = freeze.check_accumulator.saturating_add(dt);
                while freeze.check_accumulator >= self.config.freeze_check_interval {
                    freeze.check_accumulator -= self.config.freeze_check_interval;
                    if rng::unit(rng_state) < self.config.freeze_chance {
                        freeze.frozen_remaining = self.config.freeze_duration;
                        effects.player_frozen = true;
                        out_events.push(Event::DebuffTriggered {
                            debuff: Debuff::RandomFreeze,
                        });
                        break;
                    }
                }
            }
        }

        if let Some(limp) = &mut self.limp {
            if !limp.limp_remaining.is_zero() {
                limp.limp_remaining = limp.limp_remaining.saturating_sub(dt);
                effects.speed_scale = self.config.limp_speed_scale;
            } else {
                limp.until_next = limp.until_next.saturating_sub(dt);
                if limp.until_next.is_zero() {
                    limp.limp_remaining = self.config.limp_duration;
                    limp.until_next = rng::duration_between(
                        rng_state,
                        self.config.limp_interval_min,
                        self.config.limp_interval_max,
                    );
                    effects.speed_scale = self.config.limp_speed_scale;
                    out_events.push(Event::DebuffTriggered {
                        debuff: Debuff::Limp,
                    });
                }
            }
        }

        if let Some(oxygen) = &mut self.oxygen {
            oxygen.drain_accumulator = oxygen.drain_accumulator.saturating_add(dt);
            while oxygen.drain_accumulator >= self.config.oxygen_drain_interval {
                oxygen.drain_accumulator -= self.config.oxygen_drain_interval;
                oxygen.level -= self.config.oxygen_drain_step;
            }
            if oxygen.level <= 0.0 {
                effects.oxygen_depleted = true;
            }
        }

        effects
    }

    /// Refills the oxygen reserve from a tank pickup. Returns `false` when
    /// oxygen is not tracked this match.
    pub(crate) fn refill_oxygen(&mut self) -> bool {
        match &mut self.oxygen {
            Some(oxygen) => {
                oxygen.level = (oxygen.level + self.config.oxygen_refill).min(FULL_OXYGEN);
                true
            }
            None => false,
        }
    }

    /// Current oxygen level, if the drain hazard is active.
    pub(crate) fn oxygen_level(&self) -> Option<f32> {
        self.oxygen.as_ref().map(|oxygen| oxygen.level.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debuffs(freeze: bool, limp: bool, oxygen: bool) -> DebuffSet {
        DebuffSet {
            random_freeze: freeze,
            limp,
            oxygen_drain: oxygen,
            ..DebuffSet::none()
        }
    }

    #[test]
    fn certain_freeze_fires_and_expires() {
        let config = HazardConfig {
            freeze_check_interval: Duration::from_millis(100),
            freeze_chance: 1.0,
            freeze_duration: Duration::from_millis(200),
            ..HazardConfig::default()
        };
        let mut rng_state = 1;
        let mut hazards = Hazards::new(&debuffs(true, false, false), config, &mut rng_state);
        let mut events = Vec::new();
        let dt = Duration::from_millis(100);

        assert!(hazards.advance(dt, &mut rng_state, &mut events).player_frozen);
        assert_eq!(
            events,
            vec![Event::DebuffTriggered {
                debuff: Debuff::RandomFreeze
            }]
        );
        assert!(hazards.advance(dt, &mut rng_state, &mut events).player_frozen);
        assert!(hazards.advance(dt, &mut rng_state, &mut events).player_frozen);
        // The freeze has expired; the next roll starts a fresh accumulation.
        assert!(!hazards
            .advance(Duration::from_millis(50), &mut rng_state, &mut events)
            .player_frozen);
    }

    #[test]
    fn zero_chance_never_freezes() {
        let config = HazardConfig {
            freeze_check_interval: Duration::from_millis(100),
            freeze_chance: 0.0,
            ..HazardConfig::default()
        };
        let mut rng_state = 1;
        let mut hazards = Hazards::new(&debuffs(true, false, false), config, &mut rng_state);
        let mut events = Vec::new();

        for _ in 0..50 {
            let effects = hazards.advance(Duration::from_millis(100), &mut rng_state, &mut events);
            assert!(!effects.player_frozen);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn limp_scales_speed_for_its_duration() {
        let config = HazardConfig {
            limp_interval_min: Duration::from_millis(300),
            limp_interval_max: Duration::from_millis(300),
            limp_duration: Duration::from_millis(200),
            limp_speed_scale: 0.4,
            ..HazardConfig::default()
        };
        let mut rng_state = 3;
        let mut hazards = Hazards::new(&debuffs(false, true, false), config, &mut rng_state);
        let mut events = Vec::new();
        let dt = Duration::from_millis(100);

        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 1.0);
        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 1.0);
        // Third tick exhausts the 300 ms pause and starts the episode.
        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 0.4);
        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 0.4);
        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 0.4);
        assert_eq!(hazards.advance(dt, &mut rng_state, &mut events).speed_scale, 1.0);
        assert_eq!(
            events,
            vec![Event::DebuffTriggered {
                debuff: Debuff::Limp
            }]
        );
    }

    #[test]
    fn oxygen_drains_and_refills() {
        let config = HazardConfig {
            oxygen_drain_interval: Duration::from_millis(100),
            oxygen_drain_step: 60.0,
            oxygen_refill: 40.0,
            ..HazardConfig::default()
        };
        let mut rng_state = 5;
        let mut hazards = Hazards::new(&debuffs(false, false, true), config, &mut rng_state);
        let mut events = Vec::new();
        let dt = Duration::from_millis(100);

        let effects = hazards.advance(dt, &mut rng_state, &mut events);
        assert!(!effects.oxygen_depleted);
        assert_eq!(hazards.oxygen_level(), Some(40.0));

        assert!(hazards.refill_oxygen());
        assert_eq!(hazards.oxygen_level(), Some(80.0));

        let effects = hazards.advance(dt, &mut rng_state, &mut events);
        assert!(!effects.oxygen_depleted);
        assert_eq!(hazards.oxygen_level(), Some(20.0));

        let effects = hazards.advance(dt, &mut rng_state, &mut events);
        assert!(effects.oxygen_depleted);
        assert_eq!(hazards.oxygen_level(), Some(0.0));
    }

    #[test]
    fn refill_without_oxygen_tracking_reports_false() {
        let mut rng_state = 5;
        let mut hazards = Hazards::new(
            &DebuffSet::none(),
            HazardConfig::default(),
            &mut rng_state,
        );
        assert!(!hazards.refill_oxygen());
        assert_eq!(hazards.oxygen_level(), None);
    }
}
