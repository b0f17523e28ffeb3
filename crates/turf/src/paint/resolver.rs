//! Friendly-skip / enemy-overwrite resolution of a single paint claim.

use crate::team::TeamRoster;
use crate::tile::TileId;
use crate::tile_registry::TileRegistry;

use super::{Claim, ClaimError, ClaimOutcome, ClaimResult};

/// Apply one claim to the registry.
///
/// Scans every tile within `claim.radius` of the origin. The first tile owned
/// by the claiming team voids the whole claim: the scan stops and nothing is
/// mutated, including enemy tiles already seen. If the scan finishes without a
/// friendly hit, every enemy-owned tile in range is cleared and exactly one new
/// tile owned by the claiming team is placed at the exact origin. Cleared
/// surface tiles become unowned; cleared stamps are removed outright, so the
/// placed tile may reuse one of the ids in `cleared`.
///
/// Because the placed tile sits at distance zero from its origin, repeating
/// the same claim with any positive radius is blocked by it.
pub fn resolve_claim(
    registry: &mut TileRegistry,
    roster: &TeamRoster,
    claim: &Claim,
) -> ClaimResult {
    if !roster.contains(claim.team) {
        return Err(ClaimError::UnknownTeam(claim.team));
    }
    if !claim.origin.is_finite() {
        return Err(ClaimError::NonFiniteOrigin);
    }

    let doomed = match scan(registry, claim) {
        Scan::Friendly(friendly) => return Ok(ClaimOutcome::Blocked { friendly }),
        Scan::Clear(doomed) => doomed,
    };

    for &id in &doomed {
        registry.clear_tile(id);
    }
    let tile = registry.place(claim.origin, claim.team);

    Ok(ClaimOutcome::Placed {
        tile,
        cleared: doomed,
    })
}

enum Scan {
    Friendly(TileId),
    Clear(Vec<TileId>),
}

fn scan(registry: &TileRegistry, claim: &Claim) -> Scan {
    let mut doomed = Vec::new();
    for tile in registry.tiles_within(claim.origin, claim.radius) {
        match tile.owner {
            Some(owner) if owner == claim.team => return Scan::Friendly(tile.id),
            Some(_) => doomed.push(tile.id),
            None => {}
        }
    }
    Scan::Clear(doomed)
}
