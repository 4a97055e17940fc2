//! Performance extraction from weekly matchups

use crate::types::PerformanceRecord;
use league_store::{MatchupRecord, RosterRecord};
use std::collections::HashMap;

/// Turn a week's matchups into per-team performance records.
///
/// Each valid two-team matchup emits two records, one per side, each using
/// the opposite side as the opponent. Matchups without a second roster id
/// are byes and are skipped; matchups referencing a roster id missing from
/// `rosters` are skipped as well rather than failing the whole week.
/// Missing point values default to zero.
pub fn extract_performances(
    matchups: &[MatchupRecord],
    rosters: &HashMap<String, RosterRecord>,
) -> Vec<PerformanceRecord> {
    let mut performances = Vec::with_capacity(matchups.len() * 2);

    for matchup in matchups {
        // Bye week
        let team2_id = match matchup.team2_roster_id.as_deref() {
            Some(id) => id,
            None => continue,
        };

        let team1_roster = rosters.get(&matchup.team1_roster_id);
        let team2_roster = rosters.get(team2_id);
        let (team1_roster, team2_roster) = match (team1_roster, team2_roster) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                tracing::warn!(
                    matchup = %matchup.provider_matchup_id,
                    "Skipping matchup with unknown roster reference"
                );
                continue;
            }
        };

        performances.push(side_performance(
            &matchup.team1_roster_id,
            team1_roster,
            matchup.team1_points,
            matchup.team1_projected,
            team2_id,
            team2_roster,
            matchup.team2_points,
            matchup.winner_roster_id.as_deref(),
        ));
        performances.push(side_performance(
            team2_id,
            team2_roster,
            matchup.team2_points,
            matchup.team2_projected,
            &matchup.team1_roster_id,
            team1_roster,
            matchup.team1_points,
            matchup.winner_roster_id.as_deref(),
        ));
    }

    performances
}

/// Display name for a roster, falling back to a synthesized team label
pub fn team_display_name(roster: &RosterRecord, roster_id: &str) -> String {
    roster.team_name.clone().unwrap_or_else(|| format!("Team {roster_id}"))
}

/// Owner display name, falling back to "Unknown"
pub fn owner_display_name(roster: &RosterRecord) -> String {
    roster.owner_name.clone().unwrap_or_else(|| "Unknown".to_string())
}

#[allow(clippy::too_many_arguments)]
fn side_performance(
    roster_id: &str,
    roster: &RosterRecord,
    points: Option<f64>,
    projected: Option<f64>,
    opponent_id: &str,
    opponent: &RosterRecord,
    opponent_points: Option<f64>,
    winner_roster_id: Option<&str>,
) -> PerformanceRecord {
    let points = points.unwrap_or(0.0);
    let opponent_points = opponent_points.unwrap_or(0.0);

    PerformanceRecord {
        roster_id: roster_id.to_string(),
        team_name: team_display_name(roster, roster_id),
        owner_name: owner_display_name(roster),
        points_scored: points,
        points_projected: projected.unwrap_or(0.0),
        // A tied matchup stores no winner, so both sides read false
        win: winner_roster_id == Some(roster_id),
        opponent_name: team_display_name(opponent, opponent_id),
        opponent_points,
        margin: (points - opponent_points).abs(),
    }
}
