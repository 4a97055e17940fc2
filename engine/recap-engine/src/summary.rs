//! Weekly summary aggregation
//!
//! Composes performance extraction, power rankings, and transaction
//! summaries into one immutable [`WeeklySummary`]. Pure apart from the
//! store reads; callers needing consistency during concurrent ingestion
//! must provide a consistent snapshot through the store.

use crate::error::{EngineError, Result};
use crate::performance::extract_performances;
use crate::rankings::calculate_power_rankings;
use crate::transactions::{most_active_trader, summarize_transactions, total_faab_spent};
use crate::types::{
    MatchupResult, PerformanceRecord, PowerRankingEntry, TransactionSummary, WeeklySummary,
};
use league_store::{LeagueRecord, LeagueStore, RosterRecord};
use std::collections::HashMap;

/// Number of playoff slots shown in the playoff picture
const PLAYOFF_SLOTS: usize = 6;

/// Generates weekly summaries from stored league data
pub struct SummaryGenerator<'a> {
    store: &'a dyn LeagueStore,
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(store: &'a dyn LeagueStore) -> Self {
        Self { store }
    }

    /// Derive the complete weekly summary for a league and week.
    ///
    /// Fails with [`EngineError::LeagueNotFound`] for an unknown league and
    /// [`EngineError::NoPerformances`] for a week with no playable
    /// matchups. Newly computed ranks are returned inside the summary; the
    /// caller persists them as the next movement baseline.
    pub async fn generate(&self, league_id: i64, week: i32) -> Result<WeeklySummary> {
        let league = self
            .store
            .get_league(league_id)
            .await?
            .ok_or(EngineError::LeagueNotFound(league_id))?;

        let rosters = self.store.list_rosters(league_id).await?;
        let matchups = self.store.list_matchups(league_id, week).await?;
        let transactions = self.store.list_transactions(league_id, week).await?;

        let roster_map: HashMap<String, RosterRecord> =
            rosters.iter().map(|r| (r.provider_roster_id.clone(), r.clone())).collect();

        let performances = extract_performances(&matchups, &roster_map);

        let previous_ranks: HashMap<String, i32> = rosters
            .iter()
            .filter_map(|r| r.power_rank_previous.map(|rank| (r.provider_roster_id.clone(), rank)))
            .collect();
        let power_rankings = calculate_power_rankings(&rosters, &previous_ranks);

        let transaction_summaries = summarize_transactions(&transactions, &roster_map);

        tracing::debug!(
            league_id,
            week,
            performances = performances.len(),
            transactions = transaction_summaries.len(),
            "Derived weekly inputs"
        );

        build_summary(&league, week, performances, power_rankings, transaction_summaries)
    }
}

/// Pure composition of the three component outputs into a summary
fn build_summary(
    league: &LeagueRecord,
    week: i32,
    performances: Vec<PerformanceRecord>,
    power_rankings: Vec<PowerRankingEntry>,
    transactions: Vec<TransactionSummary>,
) -> Result<WeeklySummary> {
    let no_performances =
        || EngineError::NoPerformances { league_id: league.id, week };

    let highest_scorer =
        first_max_by(&performances, |p| p.points_scored).ok_or_else(no_performances)?.clone();
    let lowest_scorer =
        first_min_by(&performances, |p| p.points_scored).ok_or_else(no_performances)?.clone();

    let (biggest_blowout, closest_matchup) =
        blowout_and_closest(&performances).ok_or_else(no_performances)?;

    let biggest_climber = biggest_climber(&power_rankings).cloned();
    let biggest_fall = biggest_fall(&power_rankings).cloned();

    let total_faab_spent = total_faab_spent(&transactions);
    let most_active_trader = most_active_trader(&transactions);

    let total_points: f64 = performances.iter().map(|p| p.points_scored).sum();
    let average_score = average_score(&performances);

    let playoff_picture = playoff_picture(&power_rankings);

    Ok(WeeklySummary {
        league_name: league.name.clone(),
        week,
        season: league.season,
        performances,
        highest_scorer,
        lowest_scorer,
        biggest_blowout,
        closest_matchup,
        power_rankings,
        biggest_climber,
        biggest_fall,
        transactions,
        total_faab_spent,
        most_active_trader,
        average_score,
        total_points,
        playoff_picture,
    })
}

/// Mean points scored across performances; 0 for an empty week.
///
/// Deliberately more lenient than the extremal statistics, which treat an
/// empty week as an error. Keep both behaviors as they are.
pub fn average_score(performances: &[PerformanceRecord]) -> f64 {
    if performances.is_empty() {
        return 0.0;
    }
    let total: f64 = performances.iter().map(|p| p.points_scored).sum();
    total / performances.len() as f64
}

/// Winner/loser pairs ordered as (biggest blowout, closest matchup).
///
/// Candidate pairs match each winning performance back to the performance
/// naming it as the opponent. When no winner/loser pairs exist at all (no
/// wins recorded for the week), the first two performance records are
/// paired positionally rather than failing. Returns None only when fewer
/// than two performances exist.
fn blowout_and_closest(
    performances: &[PerformanceRecord],
) -> Option<(MatchupResult, MatchupResult)> {
    let pairs: Vec<(&PerformanceRecord, &PerformanceRecord)> = performances
        .iter()
        .filter(|p| p.win)
        .filter_map(|winner| {
            performances
                .iter()
                .find(|loser| {
                    loser.roster_id != winner.roster_id
                        && loser.opponent_name == winner.team_name
                })
                .map(|loser| (winner, loser))
        })
        .collect();

    if pairs.is_empty() {
        let first = performances.first()?;
        let second = performances.get(1)?;
        let fallback = MatchupResult { winner: first.clone(), loser: second.clone() };
        return Some((fallback.clone(), fallback));
    }

    let blowout = first_max_by(&pairs, |(winner, _)| winner.margin)?;
    let closest = first_min_by(&pairs, |(winner, _)| winner.margin)?;

    Some((
        MatchupResult { winner: blowout.0.clone(), loser: blowout.1.clone() },
        MatchupResult { winner: closest.0.clone(), loser: closest.1.clone() },
    ))
}

/// Entry with the largest positive movement, if any climbed
fn biggest_climber(rankings: &[PowerRankingEntry]) -> Option<&PowerRankingEntry> {
    let climbers: Vec<&PowerRankingEntry> =
        rankings.iter().filter(|e| e.movement > 0).collect();
    first_max_by(&climbers, |e| f64::from(e.movement)).copied()
}

/// Entry with the largest drop, if any fell
fn biggest_fall(rankings: &[PowerRankingEntry]) -> Option<&PowerRankingEntry> {
    let fallers: Vec<&PowerRankingEntry> =
        rankings.iter().filter(|e| e.movement < 0).collect();
    first_max_by(&fallers, |e| f64::from(e.movement.abs())).copied()
}

/// Team names of the top playoff slots by rank; all teams when the league
/// is smaller than the bracket
fn playoff_picture(rankings: &[PowerRankingEntry]) -> Vec<String> {
    let mut sorted: Vec<&PowerRankingEntry> = rankings.iter().collect();
    sorted.sort_by_key(|e| e.rank);
    sorted.iter().take(PLAYOFF_SLOTS).map(|e| e.team_name.clone()).collect()
}

// First-encountered extremes: ties resolve to the earliest element, so the
// selection is stable across identical inputs.

fn first_max_by<T, F: Fn(&T) -> f64>(items: &[T], key: F) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let value = key(item);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}

fn first_min_by<T, F: Fn(&T) -> f64>(items: &[T], key: F) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let value = key(item);
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trend;
    use league_store::{
        InMemoryLeagueStore, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider, Sport,
        TransactionKind, TransactionStatus,
    };

    fn create_test_performance(
        roster_id: &str,
        team: &str,
        points: f64,
        win: bool,
        opponent: &str,
        opponent_points: f64,
    ) -> PerformanceRecord {
        PerformanceRecord {
            roster_id: roster_id.to_string(),
            team_name: team.to_string(),
            owner_name: format!("{team} Owner"),
            points_scored: points,
            points_projected: 0.0,
            win,
            opponent_name: opponent.to_string(),
            opponent_points,
            margin: (points - opponent_points).abs(),
        }
    }

    fn create_test_entry(roster_id: &str, rank: i32, movement: i32) -> PowerRankingEntry {
        PowerRankingEntry {
            rank,
            previous_rank: Some(rank + movement),
            roster_id: roster_id.to_string(),
            team_name: format!("Team {roster_id}"),
            owner_name: format!("Owner {roster_id}"),
            record: "0-0".to_string(),
            points_for: 0.0,
            points_against: 0.0,
            power_score: 0.0,
            trend: if movement > 0 {
                Trend::Up
            } else if movement < 0 {
                Trend::Down
            } else {
                Trend::Same
            },
            movement,
        }
    }

    #[test]
    fn test_average_score_zero_on_empty_week() {
        assert_eq!(average_score(&[]), 0.0);

        let performances = vec![
            create_test_performance("1", "A", 100.0, true, "B", 80.0),
            create_test_performance("2", "B", 80.0, false, "A", 100.0),
        ];
        assert_eq!(average_score(&performances), 90.0);
    }

    #[test]
    fn test_single_matchup_is_both_blowout_and_closest() {
        let performances = vec![
            create_test_performance("1", "A", 100.0, true, "B", 80.0),
            create_test_performance("2", "B", 80.0, false, "A", 100.0),
        ];

        let (blowout, closest) = blowout_and_closest(&performances).unwrap();
        assert_eq!(blowout.winner.team_name, "A");
        assert_eq!(blowout.loser.team_name, "B");
        assert_eq!(blowout.winner.margin, 20.0);
        assert_eq!(closest.winner.team_name, "A");
        assert_eq!(closest.winner.margin, 20.0);
    }

    #[test]
    fn test_blowout_and_closest_pick_extremes() {
        let performances = vec![
            create_test_performance("1", "A", 150.0, true, "B", 80.0),
            create_test_performance("2", "B", 80.0, false, "A", 150.0),
            create_test_performance("3", "C", 101.0, true, "D", 100.0),
            create_test_performance("4", "D", 100.0, false, "C", 101.0),
        ];

        let (blowout, closest) = blowout_and_closest(&performances).unwrap();
        assert_eq!(blowout.winner.team_name, "A");
        assert_eq!(blowout.winner.margin, 70.0);
        assert_eq!(closest.winner.team_name, "C");
        assert_eq!(closest.winner.margin, 1.0);
    }

    #[test]
    fn test_no_wins_falls_back_to_positional_pairing() {
        // All-tie week: no winner/loser pairs exist
        let performances = vec![
            create_test_performance("1", "A", 90.0, false, "B", 90.0),
            create_test_performance("2", "B", 90.0, false, "A", 90.0),
        ];

        let (blowout, closest) = blowout_and_closest(&performances).unwrap();
        assert_eq!(blowout.winner.team_name, "A");
        assert_eq!(blowout.loser.team_name, "B");
        assert_eq!(closest.winner.team_name, "A");
    }

    #[test]
    fn test_climber_and_faller_selection() {
        let rankings = vec![
            create_test_entry("1", 1, 3),
            create_test_entry("2", 2, -1),
            create_test_entry("3", 3, 0),
            create_test_entry("4", 4, -4),
        ];

        assert_eq!(biggest_climber(&rankings).unwrap().roster_id, "1");
        assert_eq!(biggest_fall(&rankings).unwrap().roster_id, "4");
    }

    #[test]
    fn test_no_movers_means_no_climber_or_faller() {
        let rankings = vec![create_test_entry("1", 1, 0), create_test_entry("2", 2, 0)];
        assert!(biggest_climber(&rankings).is_none());
        assert!(biggest_fall(&rankings).is_none());
    }

    #[test]
    fn test_playoff_picture_caps_at_six() {
        let rankings: Vec<PowerRankingEntry> =
            (1..=10).map(|i| create_test_entry(&i.to_string(), i, 0)).collect();

        let picture = playoff_picture(&rankings);
        assert_eq!(picture.len(), 6);
        assert_eq!(picture[0], "Team 1");
        assert_eq!(picture[5], "Team 6");

        let small: Vec<PowerRankingEntry> =
            (1..=4).map(|i| create_test_entry(&i.to_string(), i, 0)).collect();
        assert_eq!(playoff_picture(&small).len(), 4);
    }

    // Full pipeline through the in-memory store

    async fn seed_store() -> (InMemoryLeagueStore, i64) {
        let store = InMemoryLeagueStore::new();
        let league = store
            .upsert_league(&NewLeague {
                provider: Provider::Sleeper,
                provider_league_id: "L1".to_string(),
                name: "The Gridiron Gang".to_string(),
                sport: Sport::Football,
                season: 2025,
                week: Some(3),
                num_teams: 4,
                scoring_type: Some("ppr".to_string()),
            })
            .await
            .unwrap();

        let teams: [(&str, &str, i32, f64); 4] = [
            ("1", "Alpha", 3, 330.0),
            ("2", "Beta", 2, 310.0),
            ("3", "Gamma", 1, 290.0),
            ("4", "Delta", 0, 270.0),
        ];
        for (roster_id, name, wins, points) in teams {
            store
                .upsert_roster(
                    league.id,
                    &NewRoster {
                        provider_roster_id: roster_id.to_string(),
                        provider_owner_id: None,
                        team_name: Some(name.to_string()),
                        owner_name: Some(format!("{name} Owner")),
                        wins,
                        losses: 3 - wins,
                        ties: 0,
                        points_for: points,
                        points_against: 300.0,
                        faab_budget_used: None,
                        waiver_position: None,
                    },
                )
                .await
                .unwrap();
        }

        store
            .upsert_matchup(
                league.id,
                &NewMatchup {
                    provider_matchup_id: "m1".to_string(),
                    week: 3,
                    season: 2025,
                    team1_roster_id: "1".to_string(),
                    team1_points: Some(120.0),
                    team1_projected: Some(110.0),
                    team2_roster_id: Some("4".to_string()),
                    team2_points: Some(70.0),
                    team2_projected: Some(90.0),
                    winner_roster_id: Some("1".to_string()),
                    margin_of_victory: Some(50.0),
                    is_complete: true,
                    is_playoff: false,
                },
            )
            .await
            .unwrap();
        store
            .upsert_matchup(
                league.id,
                &NewMatchup {
                    provider_matchup_id: "m2".to_string(),
                    week: 3,
                    season: 2025,
                    team1_roster_id: "2".to_string(),
                    team1_points: Some(101.0),
                    team1_projected: None,
                    team2_roster_id: Some("3".to_string()),
                    team2_points: Some(99.0),
                    team2_projected: None,
                    winner_roster_id: Some("2".to_string()),
                    margin_of_victory: Some(2.0),
                    is_complete: true,
                    is_playoff: false,
                },
            )
            .await
            .unwrap();

        store
            .upsert_transaction(
                league.id,
                &NewTransaction {
                    provider_transaction_id: "t1".to_string(),
                    kind: TransactionKind::Waiver,
                    status: TransactionStatus::Completed,
                    week: 3,
                    roster_id: "2".to_string(),
                    players_added: Some(r#"[{"name": "Player A"}]"#.to_string()),
                    players_dropped: Some(r#"["Player B"]"#.to_string()),
                    faab_bid: Some(15),
                    waiver_priority: None,
                    processed_at: None,
                },
            )
            .await
            .unwrap();

        (store, league.id)
    }

    #[tokio::test]
    async fn test_generate_full_summary() {
        let (store, league_id) = seed_store().await;
        let generator = SummaryGenerator::new(&store);

        let summary = generator.generate(league_id, 3).await.unwrap();

        assert_eq!(summary.league_name, "The Gridiron Gang");
        assert_eq!(summary.week, 3);
        assert_eq!(summary.season, 2025);
        assert_eq!(summary.performances.len(), 4);

        assert_eq!(summary.highest_scorer.team_name, "Alpha");
        assert_eq!(summary.lowest_scorer.team_name, "Delta");
        assert_eq!(summary.biggest_blowout.winner.team_name, "Alpha");
        assert_eq!(summary.biggest_blowout.loser.team_name, "Delta");
        assert_eq!(summary.closest_matchup.winner.team_name, "Beta");

        // 330+100, 310+66.7, 290+33.3, 270+0
        let order: Vec<&str> =
            summary.power_rankings.iter().map(|e| e.roster_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3", "4"]);

        // No baseline yet: everyone holds steady
        assert!(summary.biggest_climber.is_none());
        assert!(summary.biggest_fall.is_none());

        assert_eq!(summary.transactions.len(), 1);
        assert_eq!(
            summary.transactions[0].notes,
            "Picked up Player A for $15, dropped Player B"
        );
        assert_eq!(summary.total_faab_spent, 15);
        assert_eq!(summary.most_active_trader, Some("Beta Owner".to_string()));

        assert_eq!(summary.total_points, 390.0);
        assert_eq!(summary.average_score, 97.5);
        assert_eq!(summary.playoff_picture.len(), 4);
        assert_eq!(summary.playoff_picture[0], "Alpha");
    }

    #[tokio::test]
    async fn test_generate_unknown_league_is_fatal() {
        let store = InMemoryLeagueStore::new();
        let generator = SummaryGenerator::new(&store);

        match generator.generate(42, 1).await {
            Err(EngineError::LeagueNotFound(42)) => {}
            other => panic!("expected LeagueNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_empty_week_is_an_error() {
        let (store, league_id) = seed_store().await;
        let generator = SummaryGenerator::new(&store);

        // Week 7 has no matchups: extremal statistics are undefined
        match generator.generate(league_id, 7).await {
            Err(EngineError::NoPerformances { week: 7, .. }) => {}
            other => panic!("expected NoPerformances, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_movement_uses_persisted_baseline() {
        let (store, league_id) = seed_store().await;
        let generator = SummaryGenerator::new(&store);

        let first = generator.generate(league_id, 3).await.unwrap();
        let ranks: std::collections::HashMap<String, i32> =
            first.power_rankings.iter().map(|e| (e.roster_id.clone(), e.rank)).collect();
        store.update_power_ranks(league_id, &ranks).await.unwrap();

        // Gamma surges past everyone on points
        store
            .upsert_roster(
                league_id,
                &NewRoster {
                    provider_roster_id: "3".to_string(),
                    provider_owner_id: None,
                    team_name: Some("Gamma".to_string()),
                    owner_name: Some("Gamma Owner".to_string()),
                    wins: 2,
                    losses: 2,
                    ties: 0,
                    points_for: 500.0,
                    points_against: 300.0,
                    faab_budget_used: None,
                    waiver_position: None,
                },
            )
            .await
            .unwrap();

        let second = generator.generate(league_id, 3).await.unwrap();
        let climber = second.biggest_climber.expect("gamma climbed");
        assert_eq!(climber.roster_id, "3");
        assert_eq!(climber.movement, 2);
        assert_eq!(climber.trend, Trend::Up);

        let faller = second.biggest_fall.expect("someone fell");
        assert!(faller.movement < 0);
    }
}
