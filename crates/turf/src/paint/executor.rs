//! Claim executor system: drains the [`ClaimQueue`] each fixed tick and
//! resolves every queued claim against the registry in submission order,
//! recording results in the [`ClaimResultLog`].

use bevy::prelude::*;

use crate::team::TeamRoster;
use crate::tile_registry::TileRegistry;
use crate::TickCounter;

use super::result_log::ClaimResultLog;
use super::{resolve_claim, ClaimOutcome, ClaimQueue};

/// Resolve all pending claims, one at a time, to completion.
///
/// Holding `ResMut<TileRegistry>` for the whole pass is what serializes
/// claims: nothing else can touch the registry between one claim's scan and
/// its commit.
pub fn resolve_queued_claims(
    tick: Res<TickCounter>,
    roster: Res<TeamRoster>,
    mut queue: ResMut<ClaimQueue>,
    mut registry: ResMut<TileRegistry>,
    mut log: ResMut<ClaimResultLog>,
) {
    for queued in queue.drain() {
        let result = resolve_claim(&mut registry, &roster, &queued.claim);
        match &result {
            Ok(ClaimOutcome::Placed { tile, cleared }) => debug!(
                "tick {}: {} painted {:?} at {}, cleared {} enemy tile(s)",
                tick.0,
                queued.claim.team,
                tile,
                queued.claim.origin,
                cleared.len()
            ),
            Ok(ClaimOutcome::Blocked { friendly }) => debug!(
                "tick {}: {} claim at {} blocked by friendly {:?}",
                tick.0, queued.claim.team, queued.claim.origin, friendly
            ),
            Err(e) => warn!("tick {}: {:?} {}", tick.0, queued.source, e),
        }
        log.push(queued.tick, queued.claim, result);
    }
}
