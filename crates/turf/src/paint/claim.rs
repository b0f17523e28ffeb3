use std::fmt;

use bevy::prelude::*;

use crate::team::TeamId;
use crate::tile::TileId;

/// A request to paint the surface around `origin` for `team`.
///
/// Consumed by exactly one resolution step and never stored afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Claim {
    /// Where the projectile struck the surface.
    pub origin: Vec3,
    /// De-duplication / overwrite radius.
    pub radius: f32,
    pub team: TeamId,
}

impl Claim {
    pub fn new(origin: Vec3, radius: f32, team: TeamId) -> Self {
        Self {
            origin,
            radius,
            team,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Enemy tiles in range were cleared and one new tile was placed.
    Placed { tile: TileId, cleared: Vec<TileId> },
    /// A friendly tile was in range; nothing changed.
    Blocked { friendly: TileId },
}

impl ClaimOutcome {
    pub fn placed(&self) -> Option<TileId> {
        match self {
            ClaimOutcome::Placed { tile, .. } => Some(*tile),
            ClaimOutcome::Blocked { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// The team is not on this match's roster. Never creates a team.
    UnknownTeam(TeamId),
    /// The origin has a NaN or infinite coordinate.
    NonFiniteOrigin,
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimError::UnknownTeam(team) => {
                write!(f, "claim rejected: {team} is not on the match roster")
            }
            ClaimError::NonFiniteOrigin => write!(f, "claim rejected: origin is not finite"),
        }
    }
}

impl std::error::Error for ClaimError {}

pub type ClaimResult = Result<ClaimOutcome, ClaimError>;
