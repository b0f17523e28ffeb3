use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::config::TILE_BUCKET_SIZE;
use crate::tile::TileId;

/// Horizontal bucket index over tile positions.
///
/// Arenas are centered on the origin, so buckets are hashed rather than laid
/// out in a fixed array; negative coordinates are ordinary keys. The y axis is
/// ignored.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bucket_size: f32,
    buckets: HashMap<IVec2, Vec<TileId>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(TILE_BUCKET_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(bucket_size: f32) -> Self {
        Self {
            bucket_size,
            buckets: HashMap::default(),
        }
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    pub fn insert(&mut self, id: TileId, x: f32, z: f32) {
        let key = self.bucket_of(x, z);
        self.buckets.entry(key).or_default().push(id);
    }

    /// Drop `id` from the bucket holding `(x, z)`. Empty buckets are removed.
    pub fn remove(&mut self, id: TileId, x: f32, z: f32) {
        let key = self.bucket_of(x, z);
        let Some(ids) = self.buckets.get_mut(&key) else {
            return;
        };
        if let Some(pos) = ids.iter().position(|&other| other == id) {
            ids.swap_remove(pos);
        }
        if ids.is_empty() {
            self.buckets.remove(&key);
        }
    }

    /// Every id in a bucket touched by the given horizontal rectangle. Callers
    /// do their own exact distance test.
    pub fn query_rect(&self, min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Vec<TileId> {
        let lo = self.bucket_of(min_x, min_z);
        let hi = self.bucket_of(max_x, max_z);

        let mut result = Vec::new();
        let span = (i64::from(hi.x) - i64::from(lo.x) + 1)
            .checked_mul(i64::from(hi.y) - i64::from(lo.y) + 1);
        if span.map_or(true, |s| s > self.buckets.len() as i64) {
            // Rect wider than the populated area: walk occupied buckets instead.
            for (key, ids) in &self.buckets {
                if (lo.x..=hi.x).contains(&key.x) && (lo.y..=hi.y).contains(&key.y) {
                    result.extend_from_slice(ids);
                }
            }
            return result;
        }
        for bz in lo.y..=hi.y {
            for bx in lo.x..=hi.x {
                if let Some(ids) = self.buckets.get(&IVec2::new(bx, bz)) {
                    result.extend_from_slice(ids);
                }
            }
        }
        result
    }

    #[inline]
    fn bucket_of(&self, x: f32, z: f32) -> IVec2 {
        IVec2::new(
            (x / self.bucket_size).floor() as i32,
            (z / self.bucket_size).floor() as i32,
        )
    }

    pub fn tile_count(&self) -> usize {
        self.buckets.values().map(|v| v.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_insert_query() {
        let mut grid = SpatialGrid::new(2.0);
        grid.insert(TileId(1), 0.5, 0.5);
        grid.insert(TileId(2), -3.0, -3.0);
        grid.insert(TileId(3), 40.0, 40.0);

        let result = grid.query_rect(-4.0, -4.0, 1.0, 1.0);
        assert!(result.contains(&TileId(1)));
        assert!(result.contains(&TileId(2)));
        assert!(!result.contains(&TileId(3)));
    }

    #[test]
    fn test_spatial_bucket_edge_is_included() {
        let mut grid = SpatialGrid::new(2.0);
        grid.insert(TileId(0), 2.0, 0.0);
        // 2.0 lands in bucket 1; a rect ending exactly there must still reach it.
        assert_eq!(grid.query_rect(0.0, 0.0, 2.0, 0.0), vec![TileId(0)]);
    }

    #[test]
    fn test_spatial_huge_rect_walks_occupied_buckets() {
        let mut grid = SpatialGrid::new(2.0);
        grid.insert(TileId(0), 1.0, 1.0);
        grid.insert(TileId(1), -500.0, 300.0);
        let mut result = grid.query_rect(-1e6, -1e6, 1e6, 1e6);
        result.sort();
        assert_eq!(result, vec![TileId(0), TileId(1)]);
    }

    #[test]
    fn test_spatial_rect_spanning_every_bucket() {
        let mut grid = SpatialGrid::new(0.5);
        grid.insert(TileId(0), 0.0, 0.0);
        grid.insert(TileId(1), 3.0e9, -3.0e9);
        // Bucket keys saturate at the i32 range; the span product exceeds i64.
        let mut result = grid.query_rect(-f32::MAX, -f32::MAX, f32::MAX, f32::MAX);
        result.sort();
        assert_eq!(result, vec![TileId(0), TileId(1)]);

        let result = grid.query_rect(-1.0e10, -1.0e10, 1.0e10, 1.0e10);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_spatial_remove() {
        let mut grid = SpatialGrid::new(2.0);
        grid.insert(TileId(0), 1.0, 1.0);
        grid.insert(TileId(1), 1.5, 0.5);
        grid.insert(TileId(2), -7.0, 3.0);

        grid.remove(TileId(1), 1.5, 0.5);
        assert_eq!(grid.query_rect(0.0, 0.0, 1.9, 1.9), vec![TileId(0)]);
        assert_eq!(grid.tile_count(), 2);

        grid.remove(TileId(2), -7.0, 3.0);
        grid.remove(TileId(2), -7.0, 3.0);
        assert!(grid.query_rect(-8.0, 2.0, -6.0, 4.0).is_empty());
        assert_eq!(grid.tile_count(), 1);
    }

    #[test]
    fn test_spatial_clear() {
        let mut grid = SpatialGrid::default();
        grid.insert(TileId(1), 5.0, 5.0);
        assert_eq!(grid.tile_count(), 1);

        grid.clear();
        assert_eq!(grid.tile_count(), 0);
    }
}
