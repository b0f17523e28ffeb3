use bevy::prelude::*;
use serde::Deserialize;

/// Home/away-turf multipliers applied by movement and shooting.
///
/// Standing on your own paint is full strength; anywhere else the matching
/// penalty applies. The core only answers the on-turf question, these values
/// are match configuration handed to whoever moves and shoots.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurfModifiers {
    pub speed_penalty: f32,
    pub jump_penalty: f32,
    /// Ammo regeneration.
    pub regen_penalty: f32,
    /// Probe length below an occupant's position.
    pub turf_check_distance: f32,
}

impl Default for TurfModifiers {
    fn default() -> Self {
        Self {
            speed_penalty: 0.5,
            jump_penalty: 0.5,
            regen_penalty: 0.5,
            turf_check_distance: 1.0,
        }
    }
}

impl TurfModifiers {
    pub fn speed_multiplier(&self, on_own_turf: bool) -> f32 {
        if on_own_turf {
            1.0
        } else {
            self.speed_penalty
        }
    }

    pub fn jump_multiplier(&self, on_own_turf: bool) -> f32 {
        if on_own_turf {
            1.0
        } else {
            self.jump_penalty
        }
    }

    pub fn regen_multiplier(&self, on_own_turf: bool) -> f32 {
        if on_own_turf {
            1.0
        } else {
            self.regen_penalty
        }
    }
}
