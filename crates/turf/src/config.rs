use std::fmt;
use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::arena::ArenaLayout;
use crate::team::{RosterError, Team, TeamId, TeamRoster};
use crate::turf_modifiers::TurfModifiers;

/// Fixed simulation rate. Claims, turf status and coverage all advance on this step.
pub const TICK_HZ: f64 = 64.0;
/// One fixed step. 1/64 s is exact in both `f64` and `Duration`.
pub const FIXED_TIMESTEP: Duration = Duration::from_micros(15_625);

/// De-duplication / overwrite radius of a paint claim in world units.
pub const DEFAULT_CLAIM_RADIUS: f32 = 0.5;

/// Coverage is recomputed every this many fixed ticks.
pub const DEFAULT_COVERAGE_INTERVAL: u32 = 8;

/// Resolved claims kept in the result log.
pub const CLAIM_LOG_CAPACITY: usize = 64;

/// Horizontal size of one spatial bucket in the tile registry.
pub const TILE_BUCKET_SIZE: f32 = 2.0;

/// Radius of the disc a tile covers when probed from above.
pub const TILE_FOOTPRINT_RADIUS: f32 = 0.5;

/// How far above its position a probe starts looking for a surface.
pub const PROBE_LIFT: f32 = 0.6;

/// Upper bound on teams in one match (one per scoreboard corner).
pub const MAX_TEAMS: usize = 4;

/// Palette used when a team config does not name a color.
pub const TEAM_PALETTE: [[f32; 3]; MAX_TEAMS] = [
    [1.0, 0.45, 0.0],
    [0.1, 0.35, 1.0],
    [0.2, 0.85, 0.3],
    [0.85, 0.15, 0.75],
];

// ---------------------------------------------------------------------------
// Match configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    /// sRGB, 0.0..=1.0 per channel.
    #[serde(default)]
    pub color: Option<[f32; 3]>,
}

/// Everything a match needs at setup. Insert as a resource before adding
/// [`crate::TurfPlugin`]; missing fields fall back to the defaults below.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub teams: Vec<TeamConfig>,
    pub claim_radius: f32,
    pub coverage_interval: u32,
    pub arena: ArenaLayout,
    pub turf: TurfModifiers,
    /// Seed for anything random a host layers on top (bots, spawn jitter).
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            teams: vec![
                TeamConfig {
                    name: "Orange".to_string(),
                    color: None,
                },
                TeamConfig {
                    name: "Blue".to_string(),
                    color: None,
                },
            ],
            claim_radius: DEFAULT_CLAIM_RADIUS,
            coverage_interval: DEFAULT_COVERAGE_INTERVAL,
            arena: ArenaLayout::default(),
            turf: TurfModifiers::default(),
            seed: 0,
        }
    }
}

impl MatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.claim_radius.is_finite() || self.claim_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "claim_radius must be a finite, non-negative number, got {}",
                self.claim_radius
            )));
        }
        if self.coverage_interval == 0 {
            return Err(ConfigError::Invalid(
                "coverage_interval must be at least 1".to_string(),
            ));
        }
        self.arena.validate().map_err(ConfigError::Invalid)?;
        self.roster().map(|_| ())
    }

    /// Team ids are assigned in config order, starting at 0.
    pub fn roster(&self) -> Result<TeamRoster, ConfigError> {
        let teams = self
            .teams
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let [r, g, b] = t.color.unwrap_or(TEAM_PALETTE[i % MAX_TEAMS]);
                Team {
                    id: TeamId(i as u8),
                    name: t.name.clone(),
                    color: Color::srgb(r, g, b),
                }
            })
            .collect();
        Ok(TeamRoster::new(teams)?)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Roster(RosterError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "Malformed match config: {e}"),
            ConfigError::Roster(e) => write!(f, "Bad team roster: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid match config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Roster(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<RosterError> for ConfigError {
    fn from(e: RosterError) -> Self {
        ConfigError::Roster(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.roster().unwrap().len(), 2);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = MatchConfig::from_json_str(r#"{ "claim_radius": 0.75 }"#).unwrap();
        assert!((config.claim_radius - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.coverage_interval, DEFAULT_COVERAGE_INTERVAL);
        assert_eq!(config.teams.len(), 2);
    }

    #[test]
    fn team_colors_come_from_palette_unless_given() {
        let json = r#"{
            "teams": [
                { "name": "Red", "color": [1.0, 0.0, 0.0] },
                { "name": "Blue" }
            ]
        }"#;
        let roster = MatchConfig::from_json_str(json).unwrap().roster().unwrap();
        assert_eq!(roster.color_of(TeamId(0)), Some(Color::srgb(1.0, 0.0, 0.0)));
        let [r, g, b] = TEAM_PALETTE[1];
        assert_eq!(roster.color_of(TeamId(1)), Some(Color::srgb(r, g, b)));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let err = MatchConfig::from_json_str(r#"{ "claim_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn too_many_teams_is_rejected() {
        let json = r#"{ "teams": [
            {"name":"a"},{"name":"b"},{"name":"c"},{"name":"d"},{"name":"e"}
        ] }"#;
        let err = MatchConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Roster(RosterError::TooManyTeams(5))));
    }

    #[test]
    fn garbage_json_is_a_parse_error() {
        let err = MatchConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Malformed match config"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MatchConfig::load("/definitely/not/here/match.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
