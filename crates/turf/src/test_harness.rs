//! # TestArena: headless harness for the turf core
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + [`TurfPlugin`] so tests
//! can queue claims, step fixed ticks and read back registry state without a
//! window, physics or renderer.
//!
//! Virtual time is driven manually: every [`TestArena::tick`] advances the
//! clock by exactly one fixed timestep, so one call runs one `FixedUpdate`.

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::arena::SkipArenaInit;
use crate::config::{MatchConfig, FIXED_TIMESTEP};
use crate::coverage_metrics::CoverageMetrics;
use crate::invariant_checks::TurfInvariantViolations;
use crate::match_reset::MatchResetEvent;
use crate::paint::{Claim, ClaimQueue, ClaimResultLog, ClaimSource};
use crate::team::{TeamId, TeamRoster};
use crate::terrain_query::{OnOwnTurf, TurfOccupant};
use crate::tile_registry::TileRegistry;
use crate::{CoverageTimer, TickCounter, TurfPlugin};

pub struct TestArena {
    app: App,
}

impl Default for TestArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TestArena {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Default two-team match with an **empty** registry. Add tiles with
    /// [`TestArena::with_surface_tiles`].
    pub fn new() -> Self {
        Self::build(MatchConfig::default(), true)
    }

    /// Like [`TestArena::new`] but with a custom match configuration.
    pub fn with_config(config: MatchConfig) -> Self {
        Self::build(config, true)
    }

    /// Let the startup system generate the hex arena from `config.arena`.
    pub fn with_hex_arena(config: MatchConfig) -> Self {
        Self::build(config, false)
    }

    fn build(config: MatchConfig, skip_arena: bool) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_TIMESTEP));

        // The marker and config must exist BEFORE TurfPlugin builds.
        if skip_arena {
            app.insert_resource(SkipArenaInit);
        }
        app.insert_resource(config);
        app.add_plugins(TurfPlugin);

        // First update runs Startup; no fixed tick elapses yet.
        app.update();

        Self { app }
    }

    // -----------------------------------------------------------------------
    // World setup
    // -----------------------------------------------------------------------

    /// Replace the registry with unowned floor tiles at `positions`.
    pub fn with_surface_tiles(mut self, positions: impl IntoIterator<Item = Vec3>) -> Self {
        let world = self.app.world_mut();
        world.insert_resource(TileRegistry::from_surface(positions));
        world.resource_mut::<CoverageMetrics>().invalidate();
        self
    }

    /// `n` floor tiles in a row along x, 10 units apart, so that no claim with
    /// a radius below 10 reaches more than one of them.
    pub fn with_tile_row(self, n: usize) -> Self {
        self.with_surface_tiles((0..n).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)))
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Queue a claim for the next tick, as a scripted source.
    pub fn submit_claim(&mut self, team: TeamId, origin: Vec3, radius: f32) {
        let tick = self.tick_count();
        self.app.world_mut().resource_mut::<ClaimQueue>().push(
            tick,
            ClaimSource::Script,
            Claim::new(origin, radius, team),
        );
    }

    pub fn spawn_occupant(&mut self, team: TeamId, position: Vec3) -> Entity {
        self.app
            .world_mut()
            .spawn((TurfOccupant { team }, Transform::from_translation(position)))
            .id()
    }

    pub fn move_occupant(&mut self, entity: Entity, position: Vec3) {
        if let Some(mut transform) = self.app.world_mut().get_mut::<Transform>(entity) {
            transform.translation = position;
        }
    }

    /// Request a reset; it lands on the next tick.
    pub fn reset_match(&mut self) {
        self.app.world_mut().send_event(MatchResetEvent);
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Advance `n` fixed ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Run until the coverage timer has fired at least once.
    pub fn tick_coverage_cycle(&mut self) {
        let interval = self.app.world().resource::<CoverageTimer>().interval();
        self.tick(interval);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    pub fn registry(&self) -> &TileRegistry {
        self.resource::<TileRegistry>()
    }

    pub fn roster(&self) -> &TeamRoster {
        self.resource::<TeamRoster>()
    }

    pub fn metrics(&self) -> &CoverageMetrics {
        self.resource::<CoverageMetrics>()
    }

    pub fn results(&self) -> &ClaimResultLog {
        self.resource::<ClaimResultLog>()
    }

    pub fn violations(&self) -> &TurfInvariantViolations {
        self.resource::<TurfInvariantViolations>()
    }

    pub fn tick_count(&self) -> u64 {
        self.resource::<TickCounter>().0
    }

    /// `None` until the occupant has been through one tick.
    pub fn on_own_turf(&self, entity: Entity) -> Option<bool> {
        self.app.world().get::<OnOwnTurf>(entity).map(|s| s.0)
    }
}
