//! Runtime guards for ownership and coverage.
//!
//! Run on every coverage refresh. Violations are logged and counted; the
//! registry is never "repaired" here since only the claim resolver may write
//! ownership.

use bevy::prelude::*;

use crate::coverage_metrics::{update_coverage_metrics, CoverageMetrics};
use crate::team::TeamRoster;
use crate::tile_registry::TileRegistry;
use crate::{CoverageTimer, TurfSet};

/// Slack for float summation when checking the 100% bound.
const COVERAGE_SUM_EPSILON: f32 = 1e-3;

/// Violations found by the last validation pass. Read by integration tests.
#[derive(Resource, Default, Debug)]
pub struct TurfInvariantViolations {
    /// Tiles owned by a team that is not on the roster.
    pub foreign_owner: u32,
    /// Per-team percentages summing past 100.
    pub coverage_overflow: u32,
    /// Spatial index entries out of step with the live tile count.
    pub index_mismatch: u32,
}

impl TurfInvariantViolations {
    pub fn total(&self) -> u32 {
        self.foreign_owner + self.coverage_overflow + self.index_mismatch
    }
}

pub struct InvariantChecksPlugin;

impl Plugin for InvariantChecksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TurfInvariantViolations>();
        app.add_systems(
            FixedUpdate,
            validate_ownership
                .after(update_coverage_metrics)
                .in_set(TurfSet::Aggregate),
        );
    }
}

pub fn validate_ownership(
    timer: Res<CoverageTimer>,
    registry: Res<TileRegistry>,
    roster: Res<TeamRoster>,
    metrics: Res<CoverageMetrics>,
    mut violations: ResMut<TurfInvariantViolations>,
) {
    if !timer.should_run() {
        return;
    }
    violations.foreign_owner = 0;
    violations.coverage_overflow = 0;
    violations.index_mismatch = 0;

    let indexed = registry.indexed_count();
    if indexed != registry.len() {
        warn!(
            "Invariant violation: spatial index holds {indexed} tiles but the registry has {}",
            registry.len()
        );
        violations.index_mismatch += 1;
    }

    for tile in registry.all_tiles() {
        if let Some(owner) = tile.owner {
            if !roster.contains(owner) {
                warn!(
                    "Invariant violation: tile {:?} owned by {} which is not on the roster",
                    tile.id, owner
                );
                violations.foreign_owner += 1;
            }
        }
    }

    let sum: f32 = metrics.snapshot.teams.iter().map(|t| t.percent).sum();
    if sum > 100.0 + COVERAGE_SUM_EPSILON {
        warn!("Invariant violation: team coverage sums to {sum:.3}%");
        violations.coverage_overflow += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use crate::team::TeamId;
    use crate::tile::TileId;

    fn run(registry: TileRegistry) -> TurfInvariantViolations {
        let mut world = World::new();
        let roster = TeamRoster::default();
        let mut metrics = CoverageMetrics::default();
        metrics.refresh(&registry, &roster);
        world.insert_resource(CoverageTimer::default());
        world.insert_resource(registry);
        world.insert_resource(roster);
        world.insert_resource(metrics);
        world.init_resource::<TurfInvariantViolations>();
        world.run_system_once(validate_ownership).unwrap();
        world.remove_resource::<TurfInvariantViolations>().unwrap()
    }

    #[test]
    fn clean_registry_has_no_violations() {
        let mut reg = TileRegistry::from_surface([Vec3::ZERO, Vec3::X]);
        reg.set_owner(TileId(0), Some(TeamId(0)));
        assert_eq!(run(reg).total(), 0);
    }

    #[test]
    fn index_tracks_removed_stamps() {
        let mut reg = TileRegistry::from_surface([Vec3::ZERO, Vec3::X]);
        let a = reg.place(Vec3::new(4.0, 0.0, 4.0), TeamId(0));
        reg.place(Vec3::new(-4.0, 0.0, 4.0), TeamId(1));
        reg.clear_tile(a);
        let v = run(reg);
        assert_eq!(v.index_mismatch, 0);
        assert_eq!(v.total(), 0);
    }

    #[test]
    fn foreign_owner_is_counted() {
        let mut reg = TileRegistry::from_surface([Vec3::ZERO, Vec3::X]);
        reg.set_owner(TileId(1), Some(TeamId(3)));
        let v = run(reg);
        assert_eq!(v.foreign_owner, 1);
        assert_eq!(v.coverage_overflow, 0);
    }
}
