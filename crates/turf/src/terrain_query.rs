//! "Am I standing on my own turf?" for movement and combat modifiers.
//!
//! Surface detection belongs to physics, so it sits behind [`SurfaceProbe`].
//! The core only resolves the probe result against the registry and compares
//! owners. Nothing here mutates the registry.

use bevy::prelude::*;

use crate::config::{PROBE_LIFT, TILE_FOOTPRINT_RADIUS};
use crate::team::TeamId;
use crate::tile::TileId;
use crate::tile_registry::TileRegistry;
use crate::turf_modifiers::TurfModifiers;
use crate::TurfSet;

/// What a downward probe from a position struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeHit {
    /// Empty space below (off the arena edge, mid-air above a gap).
    NoSurface,
    /// Solid surface. `None` if nothing was ever painted there.
    Surface(Option<TileId>),
}

/// Downward surface detection, supplied by whoever owns collision.
pub trait SurfaceProbe {
    fn probe(&self, position: Vec3, max_distance: f32) -> ProbeHit;
}

/// Resolve a probe result against the registry: `true` only if it struck a
/// tile currently owned by `team`.
pub fn owned_by(registry: &TileRegistry, hit: ProbeHit, team: TeamId) -> bool {
    match hit {
        ProbeHit::Surface(Some(id)) => registry.owner(id) == Some(team),
        ProbeHit::Surface(None) | ProbeHit::NoSurface => false,
    }
}

/// Registry-backed turf lookup for one probe implementation.
pub struct TerrainQuery<'a, P: SurfaceProbe> {
    registry: &'a TileRegistry,
    probe: &'a P,
    max_distance: f32,
}

impl<'a, P: SurfaceProbe> TerrainQuery<'a, P> {
    pub fn new(registry: &'a TileRegistry, probe: &'a P, max_distance: f32) -> Self {
        Self {
            registry,
            probe,
            max_distance,
        }
    }

    pub fn is_owned_by(&self, position: Vec3, team: TeamId) -> bool {
        owned_by(
            self.registry,
            self.probe.probe(position, self.max_distance),
            team,
        )
    }
}

// ---------------------------------------------------------------------------
// FootprintProbe
// ---------------------------------------------------------------------------

/// A [`SurfaceProbe`] that needs no physics: every tile is a flat disc of
/// `footprint` radius at its own height.
///
/// A probe from `position` hits the surface if some tile's disc lies under it
/// no further than `max_distance` down (and at most [`PROBE_LIFT`] above it).
/// When painted tiles are under the probe, the nearest one is reported.
pub struct FootprintProbe<'a> {
    registry: &'a TileRegistry,
    footprint: f32,
}

impl<'a> FootprintProbe<'a> {
    pub fn new(registry: &'a TileRegistry) -> Self {
        Self::with_footprint(registry, TILE_FOOTPRINT_RADIUS)
    }

    pub fn with_footprint(registry: &'a TileRegistry, footprint: f32) -> Self {
        Self {
            registry,
            footprint,
        }
    }
}

impl SurfaceProbe for FootprintProbe<'_> {
    fn probe(&self, position: Vec3, max_distance: f32) -> ProbeHit {
        let below = |y: f32| y <= position.y + PROBE_LIFT && position.y - y <= max_distance;

        let mut found_surface = false;
        let mut painted: Option<(f32, TileId)> = None;
        for tile in self.registry.tiles_within(position, self.footprint) {
            if !below(tile.position.y) {
                continue;
            }
            found_surface = true;
            if tile.owner.is_none() {
                continue;
            }
            let d2 = tile.horizontal_distance_squared(position);
            if painted.map_or(true, |(best, _)| d2 < best) {
                painted = Some((d2, tile.id));
            }
        }

        match (found_surface, painted) {
            (_, Some((_, id))) => ProbeHit::Surface(Some(id)),
            (true, None) => ProbeHit::Surface(None),
            (false, None) => ProbeHit::NoSurface,
        }
    }
}

// ---------------------------------------------------------------------------
// Occupants
// ---------------------------------------------------------------------------

/// Marks an entity whose turf status should be tracked each tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurfOccupant {
    pub team: TeamId,
}

/// Whether the occupant stood on its own team's paint at the last tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnOwnTurf(pub bool);

pub struct TerrainQueryPlugin;

impl Plugin for TerrainQueryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, update_turf_status.in_set(TurfSet::Query));
    }
}

/// Refresh [`OnOwnTurf`] for every occupant; inserts it where missing.
pub fn update_turf_status(
    mut commands: Commands,
    registry: Res<TileRegistry>,
    modifiers: Res<TurfModifiers>,
    mut occupants: Query<(Entity, &Transform, &TurfOccupant, Option<&mut OnOwnTurf>)>,
) {
    let probe = FootprintProbe::new(&registry);
    let query = TerrainQuery::new(&registry, &probe, modifiers.turf_check_distance);

    for (entity, transform, occupant, status) in &mut occupants {
        let on_turf = query.is_owned_by(transform.translation, occupant.team);
        match status {
            Some(mut status) => {
                if status.0 != on_turf {
                    status.0 = on_turf;
                }
            }
            None => {
                commands.entity(entity).insert(OnOwnTurf(on_turf));
            }
        }
    }
}
