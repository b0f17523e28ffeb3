use bevy::prelude::*;

pub mod arena;
pub mod config;
pub mod coverage_metrics;
pub mod invariant_checks;
pub mod match_reset;
pub mod paint;
pub mod spatial_grid;
pub mod team;
pub mod terrain_query;
pub mod tile;
pub mod tile_registry;
pub mod turf_modifiers;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::{MatchConfig, DEFAULT_COVERAGE_INTERVAL, FIXED_TIMESTEP};
use match_reset::apply_match_reset;
use team::TeamRoster;
use tile_registry::TileRegistry;

// ---------------------------------------------------------------------------
// Fixed-tick phases
// ---------------------------------------------------------------------------

/// Ordered phases for turf systems in `FixedUpdate`.
///
/// Configured as a chain: `Resolve` → `Query` → `Aggregate`. Only `Resolve`
/// writes tile ownership; the other two phases read it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TurfSet {
    /// Tick counters, match reset, then claim resolution in FIFO order.
    Resolve,
    /// Per-occupant turf status.
    Query,
    /// Coverage tallies, standings, invariant checks.
    Aggregate,
}

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Fixed ticks elapsed since startup. Stamped onto queued and logged claims.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Throttle for the coverage refresh; only every `interval`-th tick aggregates.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CoverageTimer {
    pub counter: u32,
    interval: u32,
}

impl Default for CoverageTimer {
    fn default() -> Self {
        Self::new(DEFAULT_COVERAGE_INTERVAL)
    }
}

impl CoverageTimer {
    pub fn new(interval: u32) -> Self {
        Self {
            counter: 0,
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn tick(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    pub fn should_run(&self) -> bool {
        self.counter.is_multiple_of(self.interval)
    }
}

pub fn tick_counters(mut timer: ResMut<CoverageTimer>, mut tick: ResMut<TickCounter>) {
    timer.tick();
    tick.0 = tick.0.wrapping_add(1);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Everything the turf core needs. Reads [`MatchConfig`] if one was inserted
/// beforehand, otherwise runs with defaults.
pub struct TurfPlugin;

impl Plugin for TurfPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<MatchConfig>()
            .cloned()
            .unwrap_or_default();

        let roster = match config.roster() {
            Ok(roster) => roster,
            Err(e) => {
                warn!("Invalid team roster in match config, using defaults: {e}");
                TeamRoster::default()
            }
        };

        app.insert_resource(roster)
            .insert_resource(config.arena)
            .insert_resource(config.turf)
            .insert_resource(CoverageTimer::new(config.coverage_interval))
            .insert_resource(Time::<Fixed>::from_duration(FIXED_TIMESTEP))
            .insert_resource(config)
            .init_resource::<TickCounter>()
            .init_resource::<TileRegistry>()
            .add_systems(Startup, arena::init_arena)
            .add_systems(
                FixedUpdate,
                tick_counters
                    .before(apply_match_reset)
                    .in_set(TurfSet::Resolve),
            );

        app.configure_sets(
            FixedUpdate,
            (TurfSet::Resolve, TurfSet::Query, TurfSet::Aggregate).chain(),
        );

        app.add_plugins((
            paint::PaintPlugin,
            match_reset::MatchResetPlugin,
            terrain_query::TerrainQueryPlugin,
            coverage_metrics::CoverageMetricsPlugin,
            invariant_checks::InvariantChecksPlugin,
        ));
    }
}

#[cfg(test)]
mod timer_tests {
    use super::*;

    #[test]
    fn coverage_timer_fires_every_interval() {
        let mut timer = CoverageTimer::new(4);
        let fired: Vec<u32> = (1..=12)
            .filter(|_| {
                timer.tick();
                timer.should_run()
            })
            .collect();
        assert_eq!(fired, vec![4, 8, 12]);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut timer = CoverageTimer::new(0);
        assert_eq!(timer.interval(), 1);
        timer.tick();
        assert!(timer.should_run());
    }
}
