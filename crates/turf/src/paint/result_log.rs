//! Ring-buffer log of recently resolved claims and their results.
//!
//! Gives callers (scoreboards, bots, tests) a way to see what the resolver did
//! without diffing the registry.

use bevy::prelude::*;

use crate::config::CLAIM_LOG_CAPACITY;

use super::{Claim, ClaimResult};

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedClaim {
    pub tick: u64,
    pub claim: Claim,
    pub result: ClaimResult,
}

/// The last [`CLAIM_LOG_CAPACITY`] claim/result pairs, oldest first.
#[derive(Resource, Debug, Clone, Default)]
pub struct ClaimResultLog {
    entries: Vec<LoggedClaim>,
    rejected_total: u64,
}

impl ClaimResultLog {
    /// Record a result. If the buffer is full the oldest entry is evicted.
    pub fn push(&mut self, tick: u64, claim: Claim, result: ClaimResult) {
        if result.is_err() {
            self.rejected_total += 1;
        }
        if self.entries.len() >= CLAIM_LOG_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(LoggedClaim {
            tick,
            claim,
            result,
        });
    }

    /// The last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[LoggedClaim] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Rejected claims since the last clear, including evicted ones.
    pub fn rejected_total(&self) -> u64 {
        self.rejected_total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.rejected_total = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{ClaimError, ClaimOutcome};
    use crate::team::TeamId;
    use crate::tile::TileId;

    fn claim(x: f32) -> Claim {
        Claim::new(Vec3::new(x, 0.0, 0.0), 0.5, TeamId(0))
    }

    #[test]
    fn push_and_last_n() {
        let mut log = ClaimResultLog::default();
        log.push(1, claim(0.0), Ok(ClaimOutcome::Blocked { friendly: TileId(0) }));
        log.push(2, claim(1.0), Err(ClaimError::UnknownTeam(TeamId(9))));

        let last = log.last_n(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].tick, 2);
        assert_eq!(log.last_n(10).len(), 2);
        assert_eq!(log.rejected_total(), 1);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = ClaimResultLog::default();
        for i in 0..70 {
            log.push(
                i,
                claim(i as f32),
                Err(ClaimError::NonFiniteOrigin),
            );
        }
        assert_eq!(log.len(), CLAIM_LOG_CAPACITY);
        assert_eq!(log.last_n(CLAIM_LOG_CAPACITY)[0].tick, 70 - CLAIM_LOG_CAPACITY as u64);
        assert_eq!(log.rejected_total(), 70);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = ClaimResultLog::default();
        log.push(0, claim(0.0), Err(ClaimError::NonFiniteOrigin));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.rejected_total(), 0);
    }
}
