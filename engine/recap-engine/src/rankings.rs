//! Power ranking calculation with movement and trend

use crate::performance::{owner_display_name, team_display_name};
use crate::types::{PowerRankingEntry, Trend};
use league_store::RosterRecord;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Composite ranking metric: cumulative points plus win percentage weighted
/// to 100. A roster with zero games played has win percentage 0 and scores
/// purely on points_for.
pub fn power_score(roster: &RosterRecord) -> f64 {
    let games = roster.wins + roster.losses + roster.ties;
    let win_percentage =
        if games > 0 { f64::from(roster.wins) / f64::from(games) } else { 0.0 };
    roster.points_for + win_percentage * 100.0
}

/// Rank all rosters of a league by power score.
///
/// `previous_ranks` is the externally persisted baseline from the last
/// computation, keyed by provider roster id; rosters absent from it default
/// to their new rank and therefore show zero movement. The calculator never
/// writes any state; persisting the returned ranks as the next baseline is
/// the caller's responsibility.
///
/// Ranks are dense and 1-based. Equal power scores keep the input
/// enumeration order (the sort is stable); no secondary statistic breaks
/// ties.
pub fn calculate_power_rankings(
    rosters: &[RosterRecord],
    previous_ranks: &HashMap<String, i32>,
) -> Vec<PowerRankingEntry> {
    let mut entries: Vec<PowerRankingEntry> = rosters
        .iter()
        .map(|roster| PowerRankingEntry {
            rank: 0,
            previous_rank: previous_ranks.get(&roster.provider_roster_id).copied(),
            roster_id: roster.provider_roster_id.clone(),
            team_name: team_display_name(roster, &roster.provider_roster_id),
            owner_name: owner_display_name(roster),
            record: format_record(roster),
            points_for: roster.points_for,
            points_against: roster.points_against,
            power_score: power_score(roster),
            trend: Trend::Same,
            movement: 0,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.power_score.partial_cmp(&a.power_score).unwrap_or(Ordering::Equal)
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        let new_rank = (index + 1) as i32;
        let old_rank = entry.previous_rank.unwrap_or(new_rank);

        entry.rank = new_rank;
        entry.movement = old_rank - new_rank;
        entry.trend = match entry.movement.cmp(&0) {
            Ordering::Greater => Trend::Up,
            Ordering::Less => Trend::Down,
            Ordering::Equal => Trend::Same,
        };
    }

    entries
}

/// "W-L" record string, with the ties segment only when nonzero
fn format_record(roster: &RosterRecord) -> String {
    if roster.ties > 0 {
        format!("{}-{}-{}", roster.wins, roster.losses, roster.ties)
    } else {
        format!("{}-{}", roster.wins, roster.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_roster(
        roster_id: &str,
        wins: i32,
        losses: i32,
        ties: i32,
        points_for: f64,
    ) -> RosterRecord {
        RosterRecord {
            id: roster_id.parse().unwrap_or(0),
            league_id: 1,
            provider_roster_id: roster_id.to_string(),
            provider_owner_id: None,
            team_name: Some(format!("Team {roster_id}")),
            owner_name: Some(format!("Owner {roster_id}")),
            wins,
            losses,
            ties,
            points_for,
            points_against: 0.0,
            power_rank: None,
            power_rank_previous: None,
            faab_budget_used: None,
            waiver_position: None,
        }
    }

    #[test]
    fn test_power_score_formula() {
        // 3-0 with 300 points: 300 + 100 * 1.0
        let undefeated = create_test_roster("1", 3, 0, 0, 300.0);
        assert_eq!(power_score(&undefeated), 400.0);

        // 0-3 with 250 points: 250 + 100 * 0.0
        let winless = create_test_roster("2", 0, 3, 0, 250.0);
        assert_eq!(power_score(&winless), 250.0);

        let rankings =
            calculate_power_rankings(&[winless, undefeated.clone()], &HashMap::new());
        assert_eq!(rankings[0].roster_id, "1");
        assert_eq!(rankings[0].rank, 1);
        assert_eq!(rankings[1].roster_id, "2");
        assert_eq!(rankings[1].rank, 2);
    }

    #[test]
    fn test_zero_games_scores_on_points_alone() {
        let unplayed = create_test_roster("1", 0, 0, 0, 120.5);
        assert_eq!(power_score(&unplayed), 120.5);
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let rosters: Vec<RosterRecord> = (1..=10)
            .map(|i| create_test_roster(&i.to_string(), i % 4, 3 - (i % 4), 0, 100.0 * i as f64))
            .collect();

        let rankings = calculate_power_rankings(&rosters, &HashMap::new());

        let mut ranks: Vec<i32> = rankings.iter().map(|e| e.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=10).collect::<Vec<i32>>());
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        // Identical records and points: the enumeration order is the tie-break
        let rosters = vec![
            create_test_roster("first", 2, 2, 0, 200.0),
            create_test_roster("second", 2, 2, 0, 200.0),
            create_test_roster("third", 2, 2, 0, 200.0),
        ];

        let rankings = calculate_power_rankings(&rosters, &HashMap::new());
        let order: Vec<&str> = rankings.iter().map(|e| e.roster_id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_no_previous_rank_means_no_movement() {
        let rosters = vec![
            create_test_roster("1", 3, 0, 0, 300.0),
            create_test_roster("2", 1, 2, 0, 200.0),
        ];

        let rankings = calculate_power_rankings(&rosters, &HashMap::new());
        for entry in &rankings {
            assert_eq!(entry.movement, 0);
            assert_eq!(entry.trend, Trend::Same);
        }
    }

    #[test]
    fn test_movement_and_trend_from_previous_ranks() {
        let rosters = vec![
            create_test_roster("1", 3, 0, 0, 300.0),
            create_test_roster("2", 1, 2, 0, 200.0),
        ];
        let mut previous = HashMap::new();
        previous.insert("1".to_string(), 2);
        previous.insert("2".to_string(), 1);

        let rankings = calculate_power_rankings(&rosters, &previous);

        // Roster 1 climbed 2 -> 1, roster 2 fell 1 -> 2
        assert_eq!(rankings[0].roster_id, "1");
        assert_eq!(rankings[0].movement, 1);
        assert_eq!(rankings[0].trend, Trend::Up);
        assert_eq!(rankings[1].movement, -1);
        assert_eq!(rankings[1].trend, Trend::Down);
    }

    #[test]
    fn test_movement_sum_is_not_forced_to_zero() {
        // A new entrant defaults to zero movement, so the league-wide sum
        // of movement may be nonzero. This asymmetry is intended.
        let rosters = vec![
            create_test_roster("veteran", 3, 0, 0, 300.0),
            create_test_roster("rookie", 2, 1, 0, 280.0),
            create_test_roster("faller", 1, 2, 0, 200.0),
        ];
        let mut previous = HashMap::new();
        previous.insert("veteran".to_string(), 2);
        previous.insert("faller".to_string(), 1);

        let rankings = calculate_power_rankings(&rosters, &previous);
        let total: i32 = rankings.iter().map(|e| e.movement).sum();
        assert_eq!(total, -1);
    }

    #[test]
    fn test_score_monotonic_in_points_and_win_pct() {
        let base = create_test_roster("1", 2, 2, 0, 200.0);
        let more_points = create_test_roster("2", 2, 2, 0, 250.0);
        assert!(power_score(&more_points) > power_score(&base));

        let better_record = create_test_roster("3", 3, 1, 0, 200.0);
        assert!(power_score(&better_record) > power_score(&base));
    }

    #[test]
    fn test_record_string_omits_zero_ties() {
        assert_eq!(format_record(&create_test_roster("1", 4, 2, 0, 0.0)), "4-2");
        assert_eq!(format_record(&create_test_roster("2", 4, 2, 1, 0.0)), "4-2-1");
    }
}
