//! Per-team surface coverage and the standings derived from it.
//!
//! The scoreboard never walks the registry itself. Coverage is computed here
//! on the [`CoverageTimer`] cadence and exposed as a [`CoverageMetrics`]
//! resource that consumers read directly. The cached snapshot is only rebuilt
//! when the registry revision moved since the previous refresh.

use bevy::prelude::*;

use crate::team::{TeamId, TeamRoster};
use crate::tile_registry::TileRegistry;
use crate::{CoverageTimer, TurfSet};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamCoverage {
    pub team: TeamId,
    pub owned: usize,
    /// 0.0..=100.0
    pub percent: f32,
}

/// Ownership tallies for every roster team at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageSnapshot {
    /// Roster order.
    pub teams: Vec<TeamCoverage>,
    pub total_tiles: usize,
}

impl CoverageSnapshot {
    pub fn owned_count(&self, team: TeamId) -> usize {
        self.entry(team).map_or(0, |t| t.owned)
    }

    pub fn percent(&self, team: TeamId) -> f32 {
        self.entry(team).map_or(0.0, |t| t.percent)
    }

    fn entry(&self, team: TeamId) -> Option<&TeamCoverage> {
        self.teams.iter().find(|t| t.team == team)
    }
}

/// Tally owners over every tile. An empty registry yields 0% for every team.
pub fn snapshot(registry: &TileRegistry, roster: &TeamRoster) -> CoverageSnapshot {
    let total_tiles = registry.len();
    let mut teams: Vec<TeamCoverage> = roster
        .ids()
        .map(|team| TeamCoverage {
            team,
            owned: 0,
            percent: 0.0,
        })
        .collect();

    for tile in registry.all_tiles() {
        let Some(owner) = tile.owner else {
            continue;
        };
        if let Some(entry) = teams.iter_mut().find(|t| t.team == owner) {
            entry.owned += 1;
        }
    }

    if total_tiles > 0 {
        for entry in &mut teams {
            entry.percent = entry.owned as f32 / total_tiles as f32 * 100.0;
        }
    }

    CoverageSnapshot { teams, total_tiles }
}

/// Lowest coverage first. Equal percentages keep roster order.
pub fn ranked_standings(snapshot: &CoverageSnapshot) -> Vec<(TeamId, f32)> {
    let mut standings: Vec<(TeamId, f32)> =
        snapshot.teams.iter().map(|t| (t.team, t.percent)).collect();
    standings.sort_by(|a, b| a.1.total_cmp(&b.1));
    standings
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Cached coverage for the UI, refreshed every [`CoverageTimer`] interval.
#[derive(Resource, Default, Debug, Clone)]
pub struct CoverageMetrics {
    pub snapshot: CoverageSnapshot,
    pub standings: Vec<(TeamId, f32)>,
    /// Registry revision the cache was built from; `None` until first refresh.
    computed_at: Option<u64>,
    /// Number of times the snapshot was actually rebuilt.
    pub rebuilds: u32,
}

impl CoverageMetrics {
    /// Rebuild from the registry if it changed since the last refresh.
    /// Returns `true` if a rebuild happened.
    pub fn refresh(&mut self, registry: &TileRegistry, roster: &TeamRoster) -> bool {
        if self.computed_at == Some(registry.revision()) {
            return false;
        }
        self.snapshot = snapshot(registry, roster);
        self.standings = ranked_standings(&self.snapshot);
        self.computed_at = Some(registry.revision());
        self.rebuilds += 1;
        true
    }

    /// Drop the cache so the next refresh rebuilds unconditionally.
    pub fn invalidate(&mut self) {
        self.computed_at = None;
    }

    /// The team currently holding the least surface, if any team exists.
    pub fn last_place(&self) -> Option<TeamId> {
        self.standings.first().map(|(team, _)| *team)
    }

    pub fn leader(&self) -> Option<TeamId> {
        self.standings.last().map(|(team, _)| *team)
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct CoverageMetricsPlugin;

impl Plugin for CoverageMetricsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CoverageMetrics>();
        app.add_systems(
            FixedUpdate,
            update_coverage_metrics.in_set(TurfSet::Aggregate),
        );
    }
}

pub fn update_coverage_metrics(
    timer: Res<CoverageTimer>,
    registry: Res<TileRegistry>,
    roster: Res<TeamRoster>,
    mut metrics: ResMut<CoverageMetrics>,
) {
    if !timer.should_run() {
        return;
    }
    metrics.refresh(&registry, &roster);
}
