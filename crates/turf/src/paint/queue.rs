use bevy::prelude::*;

use super::Claim;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimSource {
    /// A paint projectile struck the surface.
    Projectile,
    /// A scripted painter (demo bots, AI).
    Bot,
    /// Test or tooling input.
    Script,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedClaim {
    pub tick: u64,
    pub source: ClaimSource,
    pub claim: Claim,
}

/// Claims waiting for the next resolution pass, in submission order.
///
/// Emitters only ever push; the executor is the single reader, so no two
/// claims can interleave their scans.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ClaimQueue {
    pending: Vec<QueuedClaim>,
}

impl ClaimQueue {
    pub fn push(&mut self, tick: u64, source: ClaimSource, claim: Claim) {
        self.pending.push(QueuedClaim {
            tick,
            source,
            claim,
        });
    }

    pub fn drain(&mut self) -> Vec<QueuedClaim> {
        self.pending.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::TeamId;

    #[test]
    fn push_and_drain_preserves_fifo() {
        let mut queue = ClaimQueue::default();
        queue.push(3, ClaimSource::Bot, Claim::new(Vec3::X, 0.5, TeamId(0)));
        queue.push(3, ClaimSource::Projectile, Claim::new(Vec3::Z, 0.5, TeamId(1)));
        queue.push(4, ClaimSource::Script, Claim::new(Vec3::ZERO, 0.0, TeamId(0)));

        assert_eq!(queue.len(), 3);
        let drained = queue.drain();
        assert!(queue.is_empty());

        assert_eq!(drained[0].source, ClaimSource::Bot);
        assert_eq!(drained[0].claim.origin, Vec3::X);
        assert_eq!(drained[1].claim.team, TeamId(1));
        assert_eq!(drained[2].tick, 4);
    }

    #[test]
    fn clear_drops_pending_claims() {
        let mut queue = ClaimQueue::default();
        queue.push(0, ClaimSource::Bot, Claim::new(Vec3::ZERO, 0.5, TeamId(0)));
        queue.clear();
        assert!(queue.drain().is_empty());
    }
}
