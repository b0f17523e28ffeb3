//! Arena floor generation: a disc of flat-topped hexagon tiles.
//!
//! Column centers are `1.5 * hex_radius + spacing` apart; rows are
//! `sqrt(3) * hex_radius + spacing` apart, with odd columns pushed half a row
//! along z. Only centers inside `fill_radius` of the origin become tiles.

use bevy::prelude::*;
use serde::Deserialize;

use crate::coverage_metrics::CoverageMetrics;
use crate::tile_registry::TileRegistry;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Radius of the filled disc, world units.
    pub fill_radius: f32,
    /// Center-to-vertex distance of one hexagon.
    pub hex_radius: f32,
    /// Extra gap between adjacent hexagon edges.
    pub spacing: f32,
    /// Height every floor tile sits at.
    pub base_height: f32,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            fill_radius: 10.0,
            hex_radius: 1.0,
            spacing: 0.1,
            base_height: 2.0,
        }
    }
}

impl ArenaLayout {
    pub fn validate(&self) -> Result<(), String> {
        let finite = [self.fill_radius, self.hex_radius, self.spacing, self.base_height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err("arena dimensions must be finite".to_string());
        }
        if self.hex_radius <= 0.0 {
            return Err(format!("hex_radius must be positive, got {}", self.hex_radius));
        }
        if self.spacing < 0.0 || self.fill_radius < 0.0 {
            return Err("spacing and fill_radius must not be negative".to_string());
        }
        Ok(())
    }

    pub fn column_spacing(&self) -> f32 {
        self.hex_radius * 2.0 * 0.75 + self.spacing
    }

    pub fn row_spacing(&self) -> f32 {
        3f32.sqrt() * self.hex_radius + self.spacing
    }

    /// Centers of every hex tile in the disc, column-major from the most
    /// negative column.
    pub fn hex_positions(&self) -> Vec<Vec3> {
        let col_step = self.column_spacing();
        let row_step = self.row_spacing();
        let max_cols = (self.fill_radius / col_step).ceil() as i32;
        let max_rows = (self.fill_radius / row_step).ceil() as i32;

        let mut positions = Vec::new();
        for col in -max_cols..=max_cols {
            let x = col as f32 * col_step;
            let z_offset = if col.abs() % 2 == 1 { row_step * 0.5 } else { 0.0 };
            for row in -max_rows..=max_rows {
                let z = row as f32 * row_step + z_offset;
                if Vec2::new(x, z).length() <= self.fill_radius {
                    positions.push(Vec3::new(x, self.base_height, z));
                }
            }
        }
        positions
    }
}

/// Marker resource: when present, [`init_arena`] leaves the registry alone.
/// Used by the test harness to start from a hand-built tile set.
#[derive(Resource)]
pub struct SkipArenaInit;

pub fn init_arena(
    mut commands: Commands,
    layout: Res<ArenaLayout>,
    mut metrics: ResMut<CoverageMetrics>,
    skip: Option<Res<SkipArenaInit>>,
) {
    if skip.is_some() {
        return;
    }
    let registry = TileRegistry::from_surface(layout.hex_positions());
    info!(
        "Arena ready: {} hex tiles in a {:.1}-unit disc",
        registry.len(),
        layout.fill_radius
    );
    commands.insert_resource(registry);
    metrics.invalidate();
}
