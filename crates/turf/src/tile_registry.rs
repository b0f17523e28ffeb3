//! Authoritative store of paintable tiles and their current owners.
//!
//! The registry is the only place ownership lives. The claim resolver mutates
//! it through [`TileRegistry::clear_tile`] and [`TileRegistry::place`]; the
//! coverage aggregator and terrain queries only read it. Every effective
//! mutation bumps [`TileRegistry::revision`], which downstream caches compare
//! against to know when to recompute.
//!
//! Surface tiles live for the whole match. Stamps live only while owned: a
//! cleared stamp is removed and its slot is reissued to the next stamp, so the
//! tile count is always surface tiles plus painted stamps.

use bevy::prelude::*;

use crate::spatial_grid::SpatialGrid;
use crate::team::TeamId;
use crate::tile::{Tile, TileId, TileKind};

#[derive(Resource, Debug, Clone, Default)]
pub struct TileRegistry {
    /// Indexed by [`TileId`]. Surface tiles fill the first `surface` slots.
    slots: Vec<Option<Tile>>,
    /// Vacated stamp slots, reused last-in first-out.
    free: Vec<TileId>,
    surface: usize,
    live: usize,
    index: SpatialGrid,
    revision: u64,
}

impl TileRegistry {
    /// Build the registry for a level. Every tile starts unowned.
    pub fn from_surface(positions: impl IntoIterator<Item = Vec3>) -> Self {
        let mut registry = Self::default();
        for position in positions {
            registry.push(TileKind::Surface, position, None);
        }
        registry.surface = registry.live;
        registry
    }

    fn push(&mut self, kind: TileKind, position: Vec3, owner: Option<TeamId>) -> TileId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                TileId(self.slots.len() as u32 - 1)
            }
        };
        self.slots[id.index()] = Some(Tile {
            id,
            kind,
            position,
            owner,
        });
        self.index.insert(id, position.x, position.z);
        self.live += 1;
        id
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Every live tile, in id order.
    pub fn all_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.slots.iter().flatten()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn owner(&self, id: TileId) -> Option<TeamId> {
        self.get(id).and_then(|t| t.owner)
    }

    /// Surface tiles plus live stamps.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Entries in the spatial index. Always equal to [`Self::len`].
    pub fn indexed_count(&self) -> usize {
        self.index.tile_count()
    }

    /// Tiles whose horizontal distance to `center` is at most `radius`,
    /// boundary included, in id order.
    ///
    /// A radius that is zero, negative or NaN finds nothing, even a tile
    /// sitting exactly on `center`.
    pub fn tiles_within(&self, center: Vec3, radius: f32) -> Vec<&Tile> {
        if radius.is_nan() || radius <= 0.0 || !center.is_finite() {
            return Vec::new();
        }
        if radius == f32::INFINITY {
            return self.all_tiles().collect();
        }

        let r2 = radius * radius;
        let mut found: Vec<&Tile> = self
            .index
            .query_rect(
                center.x - radius,
                center.z - radius,
                center.x + radius,
                center.z + radius,
            )
            .into_iter()
            .filter_map(|id| self.get(id))
            .filter(|t| t.horizontal_distance_squared(center) <= r2)
            .collect();
        found.sort_unstable_by_key(|t| t.id);
        found
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Set a tile's owner. Returns `true` if ownership actually changed;
    /// repeating the same assignment is a no-op and leaves the revision alone.
    pub fn set_owner(&mut self, id: TileId, owner: Option<TeamId>) -> bool {
        let Some(tile) = self.slots.get_mut(id.index()).and_then(Option::as_mut) else {
            return false;
        };
        if tile.owner == owner {
            return false;
        }
        tile.owner = owner;
        self.revision += 1;
        true
    }

    /// Strip a tile of its paint. A surface tile becomes unowned; a stamp is
    /// removed and its id may be reissued by a later [`Self::place`].
    /// Returns `false` if there was nothing to clear.
    pub fn clear_tile(&mut self, id: TileId) -> bool {
        let Some(tile) = self.get(id).copied() else {
            return false;
        };
        match tile.kind {
            TileKind::Surface => self.set_owner(id, None),
            TileKind::Stamp => {
                self.slots[id.index()] = None;
                self.index.remove(id, tile.position.x, tile.position.z);
                self.free.push(id);
                self.live -= 1;
                self.revision += 1;
                true
            }
        }
    }

    /// Lay a new owned stamp at exactly `position`.
    pub fn place(&mut self, position: Vec3, team: TeamId) -> TileId {
        let id = self.push(TileKind::Stamp, position, Some(team));
        self.revision += 1;
        id
    }

    /// Match reset: drop every stamp and clear every owner. Surface tiles
    /// keep their ids.
    pub fn reset(&mut self) {
        self.slots.truncate(self.surface);
        self.free.clear();
        self.index.clear();
        for tile in self.slots.iter_mut().flatten() {
            tile.owner = None;
            self.index.insert(tile.id, tile.position.x, tile.position.z);
        }
        self.live = self.surface;
        self.revision += 1;
    }

    pub fn surface_count(&self) -> usize {
        self.surface
    }

    pub fn owned_count(&self, team: TeamId) -> usize {
        self.all_tiles().filter(|t| t.is_owned_by(team)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: TeamId = TeamId(0);
    const B: TeamId = TeamId(1);

    fn row(n: usize, step: f32) -> TileRegistry {
        TileRegistry::from_surface((0..n).map(|i| Vec3::new(i as f32 * step, 2.0, 0.0)))
    }

    #[test]
    fn surface_tiles_start_unowned() {
        let reg = row(10, 1.0);
        assert_eq!(reg.len(), 10);
        assert!(reg.all_tiles().all(|t| t.owner.is_none()));
        assert!(reg.all_tiles().all(|t| t.kind == TileKind::Surface));
        assert_eq!(reg.revision(), 0);
    }

    #[test]
    fn tiles_within_includes_boundary() {
        let reg = row(5, 1.0);
        let ids: Vec<TileId> = reg
            .tiles_within(Vec3::new(2.0, 0.0, 0.0), 1.0)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![TileId(1), TileId(2), TileId(3)]);
    }

    #[test]
    fn tiles_within_ignores_height() {
        let reg = TileRegistry::from_surface([Vec3::new(0.0, 50.0, 0.0)]);
        assert_eq!(reg.tiles_within(Vec3::new(0.0, -50.0, 0.3), 0.5).len(), 1);
    }

    #[test]
    fn tiles_within_crosses_negative_buckets() {
        let reg = TileRegistry::from_surface([
            Vec3::new(-0.2, 0.0, -0.2),
            Vec3::new(0.2, 0.0, 0.2),
            Vec3::new(-5.0, 0.0, 0.0),
        ]);
        assert_eq!(reg.tiles_within(Vec3::ZERO, 0.5).len(), 2);
    }

    #[test]
    fn non_positive_radius_finds_nothing() {
        let reg = row(3, 1.0);
        assert!(reg.tiles_within(Vec3::ZERO, 0.0).is_empty());
        assert!(reg.tiles_within(Vec3::ZERO, -1.0).is_empty());
        assert!(reg.tiles_within(Vec3::ZERO, f32::NAN).is_empty());
    }

    #[test]
    fn infinite_radius_finds_everything() {
        let reg = row(7, 30.0);
        assert_eq!(reg.tiles_within(Vec3::ZERO, f32::INFINITY).len(), 7);
    }

    #[test]
    fn huge_finite_radius_finds_everything() {
        let reg = TileRegistry::from_surface([
            Vec3::new(-900.0, 0.0, 900.0),
            Vec3::ZERO,
            Vec3::new(2.0e6, 0.0, -2.0e6),
        ]);
        assert_eq!(reg.tiles_within(Vec3::ZERO, 1.0e10).len(), 3);
        assert_eq!(reg.tiles_within(Vec3::ZERO, f32::MAX).len(), 3);
    }

    #[test]
    fn set_owner_is_idempotent() {
        let mut reg = row(2, 1.0);
        assert!(reg.set_owner(TileId(0), Some(A)));
        let rev = reg.revision();
        assert!(!reg.set_owner(TileId(0), Some(A)));
        assert_eq!(reg.revision(), rev);
        assert_eq!(reg.owner(TileId(0)), Some(A));
    }

    #[test]
    fn set_owner_on_missing_tile_is_ignored() {
        let mut reg = row(1, 1.0);
        assert!(!reg.set_owner(TileId(9), Some(A)));
        assert_eq!(reg.revision(), 0);
    }

    #[test]
    fn place_adds_an_indexed_stamp() {
        let mut reg = row(2, 1.0);
        let origin = Vec3::new(10.0, 2.0, 10.0);
        let id = reg.place(origin, B);
        let tile = reg.get(id).unwrap();
        assert_eq!(tile.kind, TileKind::Stamp);
        assert_eq!(tile.position, origin);
        assert_eq!(tile.owner, Some(B));
        assert_eq!(reg.tiles_within(origin, 0.01).len(), 1);
        assert_eq!(reg.revision(), 1);
    }

    #[test]
    fn clear_tile_removes_stamp_and_reuses_its_id() {
        let mut reg = row(2, 1.0);
        let spot = Vec3::new(10.0, 2.0, 10.0);
        let id = reg.place(spot, B);
        assert_eq!(reg.len(), 3);

        assert!(reg.clear_tile(id));
        assert_eq!(reg.len(), 2);
        assert!(reg.get(id).is_none());
        assert!(reg.tiles_within(spot, 0.5).is_empty());
        assert_eq!(reg.indexed_count(), 2);
        assert!(!reg.clear_tile(id));

        let again = reg.place(Vec3::new(-3.0, 2.0, 0.0), A);
        assert_eq!(again, id);
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.all_tiles().count(), 3);
    }

    #[test]
    fn clear_tile_keeps_surface_tiles() {
        let mut reg = row(2, 1.0);
        reg.set_owner(TileId(1), Some(A));
        assert!(reg.clear_tile(TileId(1)));
        assert_eq!(reg.owner(TileId(1)), None);
        assert_eq!(reg.len(), 2);
        assert!(!reg.clear_tile(TileId(1)));
    }

    #[test]
    fn reset_drops_stamps_and_clears_owners() {
        let mut reg = row(3, 1.0);
        reg.set_owner(TileId(1), Some(A));
        reg.place(Vec3::new(0.5, 0.0, 0.0), B);
        let rev = reg.revision();

        reg.reset();

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.surface_count(), 3);
        assert!(reg.all_tiles().all(|t| t.owner.is_none()));
        assert!(reg.revision() > rev);
        assert_eq!(reg.tiles_within(Vec3::new(0.5, 0.0, 0.0), 0.1).len(), 0);
        assert_eq!(reg.indexed_count(), 3);
    }
}
