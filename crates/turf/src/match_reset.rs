use bevy::prelude::*;

use crate::coverage_metrics::CoverageMetrics;
use crate::paint::{ClaimQueue, ClaimResultLog};
use crate::tile_registry::TileRegistry;
use crate::TurfSet;

/// Start the match over: every tile unowned, stamps gone, pending claims
/// dropped. Takes effect at the start of the next fixed tick, before any
/// claim from that tick is resolved.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct MatchResetEvent;

pub struct MatchResetPlugin;

impl Plugin for MatchResetPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MatchResetEvent>();
        app.add_systems(FixedUpdate, apply_match_reset.in_set(TurfSet::Resolve));
    }
}

pub fn apply_match_reset(
    mut events: EventReader<MatchResetEvent>,
    mut registry: ResMut<TileRegistry>,
    mut queue: ResMut<ClaimQueue>,
    mut log: ResMut<ClaimResultLog>,
    mut metrics: ResMut<CoverageMetrics>,
) {
    if events.read().count() == 0 {
        return;
    }
    let dropped = queue.len();
    queue.clear();
    log.clear();
    registry.reset();
    metrics.invalidate();
    info!(
        "Match reset: {} surface tiles cleared, {} pending claim(s) dropped",
        registry.len(),
        dropped
    );
}
