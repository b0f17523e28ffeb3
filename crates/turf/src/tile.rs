use bevy::prelude::*;

use crate::team::TeamId;

/// Dense index into the [`crate::tile_registry::TileRegistry`].
///
/// Surface ids are stable for the whole match. A stamp id is valid only while
/// the stamp is painted: once it is cleared, or the match resets, the id may be
/// handed to a newer stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Part of the arena floor, created at level setup.
    Surface,
    /// Laid down by a successful paint claim at its impact point.
    Stamp,
}

/// One ownership slot on the paintable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Vec3,
    pub owner: Option<TeamId>,
}

impl Tile {
    pub fn is_owned_by(&self, team: TeamId) -> bool {
        self.owner == Some(team)
    }

    /// Distance in the x/z plane. Height is visual stacking only.
    #[inline]
    pub fn horizontal_distance_squared(&self, point: Vec3) -> f32 {
        let dx = self.position.x - point.x;
        let dz = self.position.z - point.z;
        dx * dx + dz * dz
    }
}
