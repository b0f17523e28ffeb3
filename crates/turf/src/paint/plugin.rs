//! Plugin that wires up claim handling: queue, executor, and result log.

use bevy::prelude::*;

use super::executor::resolve_queued_claims;
use super::result_log::ClaimResultLog;
use super::ClaimQueue;
use crate::match_reset::apply_match_reset;
use crate::TurfSet;

/// Registers the claim queue, result log, and executor system.
pub struct PaintPlugin;

impl Plugin for PaintPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClaimQueue>();
        app.init_resource::<ClaimResultLog>();

        app.add_systems(
            FixedUpdate,
            resolve_queued_claims
                .after(apply_match_reset)
                .in_set(TurfSet::Resolve),
        );
    }
}
