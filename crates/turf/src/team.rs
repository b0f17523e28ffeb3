use std::fmt;

use bevy::prelude::*;

use crate::config::MAX_TEAMS;

/// Team identifier carried by claims, tiles and occupants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Rendering only. Ownership logic compares [`TeamId`]s, never colors.
    pub color: Color,
}

/// The teams taking part in the current match, in scoreboard order.
///
/// Built once at match setup and read-only afterwards. Claims from a team that
/// is not on the roster are rejected.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TeamRoster {
    teams: Vec<Team>,
}

impl Default for TeamRoster {
    fn default() -> Self {
        crate::config::MatchConfig::default()
            .roster()
            .unwrap_or(Self { teams: Vec::new() })
    }
}

impl TeamRoster {
    pub fn new(teams: Vec<Team>) -> Result<Self, RosterError> {
        if teams.len() > MAX_TEAMS {
            return Err(RosterError::TooManyTeams(teams.len()));
        }
        for (i, team) in teams.iter().enumerate() {
            if teams[..i].iter().any(|t| t.id == team.id) {
                return Err(RosterError::DuplicateTeam(team.id));
            }
        }
        Ok(Self { teams })
    }

    pub fn contains(&self, id: TeamId) -> bool {
        self.teams.iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn color_of(&self, id: TeamId) -> Option<Color> {
        self.get(id).map(|t| t.color)
    }

    pub fn name_of(&self, id: TeamId) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.iter().map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RosterError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    TooManyTeams(usize),
    DuplicateTeam(TeamId),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::TooManyTeams(n) => {
                write!(f, "{n} teams configured, at most {MAX_TEAMS} are supported")
            }
            RosterError::DuplicateTeam(id) => write!(f, "{id} appears more than once"),
        }
    }
}

impl std::error::Error for RosterError {}
