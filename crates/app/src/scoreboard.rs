//! Console scoreboard: periodic coverage lines and a final result.

use bevy::prelude::*;

use turf::coverage_metrics::CoverageMetrics;
use turf::team::{TeamId, TeamRoster};
use turf::{TickCounter, TurfSet};

/// Fixed ticks between scoreboard lines (five seconds at 64 Hz).
const REPORT_EVERY: u64 = 64 * 5;

pub struct ScoreboardPlugin;

impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, report_standings.after(TurfSet::Aggregate));
        app.add_systems(Update, announce_result);
    }
}

/// One line per report, lowest coverage first, e.g.
/// `Orange 12.3% | Blue 40.1%`.
pub fn format_standings(standings: &[(TeamId, f32)], roster: &TeamRoster) -> String {
    standings
        .iter()
        .map(|(team, percent)| {
            let name = roster.name_of(*team).unwrap_or("?");
            format!("{name} {percent:.1}%")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn report_standings(
    tick: Res<TickCounter>,
    metrics: Res<CoverageMetrics>,
    roster: Res<TeamRoster>,
) {
    if tick.0 == 0 || !tick.0.is_multiple_of(REPORT_EVERY) {
        return;
    }
    info!("Coverage: {}", format_standings(&metrics.standings, &roster));
    if let Some(last) = metrics.last_place() {
        if roster.len() > 1 {
            info!(
                "{} is in last place",
                roster.name_of(last).unwrap_or("?")
            );
        }
    }
}

fn announce_result(
    mut exits: EventReader<AppExit>,
    metrics: Res<CoverageMetrics>,
    roster: Res<TeamRoster>,
) {
    if exits.read().count() == 0 {
        return;
    }
    info!("Final coverage: {}", format_standings(&metrics.standings, &roster));
    if let Some(leader) = metrics.leader() {
        info!("{} wins", roster.name_of(leader).unwrap_or("?"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standings_line_uses_team_names_and_one_decimal() {
        let roster = TeamRoster::default();
        let line = format_standings(&[(TeamId(1), 0.0), (TeamId(0), 100.0 / 101.0)], &roster);
        assert_eq!(line, "Blue 0.0% | Orange 1.0%");
    }
}
