//! In-memory league store for tests and local development

use crate::backend::LeagueStore;
use crate::error::Result;
use crate::types::{
    LeagueRecord, MatchupRecord, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider,
    RosterRecord, TransactionRecord,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    leagues: Vec<LeagueRecord>,
    rosters: Vec<RosterRecord>,
    matchups: Vec<MatchupRecord>,
    transactions: Vec<TransactionRecord>,
    next_id: i64,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of [`LeagueStore`]
///
/// Mirrors the Postgres backend's semantics, including stable insertion
/// order for roster listings.
#[derive(Default)]
pub struct InMemoryLeagueStore {
    inner: RwLock<Inner>,
}

impl InMemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully specified league row, bypassing upsert defaults.
    ///
    /// Test seams use this to control admin-owned fields (enable flags,
    /// bot id, schedule) that `upsert_league` never touches.
    pub async fn seed_league(&self, league: LeagueRecord) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(league.id);
        inner.leagues.push(league);
    }
}

#[async_trait::async_trait]
impl LeagueStore for InMemoryLeagueStore {
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.leagues.iter().find(|l| l.id == league_id).cloned())
    }

    async fn find_league(
        &self,
        provider: Provider,
        provider_league_id: &str,
    ) -> Result<Option<LeagueRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .leagues
            .iter()
            .find(|l| l.provider == provider && l.provider_league_id == provider_league_id)
            .cloned())
    }

    async fn list_active_leagues(&self) -> Result<Vec<LeagueRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.leagues.iter().filter(|l| l.is_active).cloned().collect())
    }

    async fn list_rosters(&self, league_id: i64) -> Result<Vec<RosterRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.rosters.iter().filter(|r| r.league_id == league_id).cloned().collect())
    }

    async fn list_matchups(&self, league_id: i64, week: i32) -> Result<Vec<MatchupRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .matchups
            .iter()
            .filter(|m| m.league_id == league_id && m.week == week)
            .cloned()
            .collect())
    }

    async fn list_transactions(
        &self,
        league_id: i64,
        week: i32,
    ) -> Result<Vec<TransactionRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .transactions
            .iter()
            .filter(|t| t.league_id == league_id && t.week == week)
            .cloned()
            .collect())
    }

    async fn update_power_ranks(
        &self,
        league_id: i64,
        ranks: &HashMap<String, i32>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        for roster in inner.rosters.iter_mut().filter(|r| r.league_id == league_id) {
            if let Some(rank) = ranks.get(&roster.provider_roster_id) {
                roster.power_rank = Some(*rank);
                roster.power_rank_previous = Some(*rank);
            }
        }
        Ok(())
    }

    async fn upsert_league(&self, league: &NewLeague) -> Result<LeagueRecord> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.leagues.iter_mut().find(|l| {
            l.provider == league.provider && l.provider_league_id == league.provider_league_id
        }) {
            existing.name = league.name.clone();
            existing.sport = league.sport;
            existing.season = league.season;
            existing.week = league.week;
            existing.num_teams = league.num_teams;
            existing.scoring_type = league.scoring_type.clone();
            return Ok(existing.clone());
        }

        let id = inner.allocate_id();
        let record = LeagueRecord {
            id,
            provider: league.provider,
            provider_league_id: league.provider_league_id.clone(),
            name: league.name.clone(),
            sport: league.sport,
            season: league.season,
            week: league.week,
            num_teams: league.num_teams,
            scoring_type: league.scoring_type.clone(),
            groupme_bot_id: None,
            enable_power_rankings: true,
            enable_waiver_recaps: true,
            enable_llm_rendering: false,
            persona: None,
            power_rankings_day: "tuesday".to_string(),
            power_rankings_time: "09:00".to_string(),
            waiver_recap_day: "wednesday".to_string(),
            waiver_recap_time: "09:00".to_string(),
            is_active: true,
            last_sync_at: None,
        };
        inner.leagues.push(record.clone());
        Ok(record)
    }

    async fn upsert_roster(&self, league_id: i64, roster: &NewRoster) -> Result<()> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.rosters.iter_mut().find(|r| {
            r.league_id == league_id && r.provider_roster_id == roster.provider_roster_id
        }) {
            existing.provider_owner_id = roster.provider_owner_id.clone();
            existing.team_name = roster.team_name.clone();
            existing.owner_name = roster.owner_name.clone();
            existing.wins = roster.wins;
            existing.losses = roster.losses;
            existing.ties = roster.ties;
            existing.points_for = roster.points_for;
            existing.points_against = roster.points_against;
            existing.faab_budget_used = roster.faab_budget_used;
            existing.waiver_position = roster.waiver_position;
            return Ok(());
        }

        let id = inner.allocate_id();
        inner.rosters.push(RosterRecord {
            id,
            league_id,
            provider_roster_id: roster.provider_roster_id.clone(),
            provider_owner_id: roster.provider_owner_id.clone(),
            team_name: roster.team_name.clone(),
            owner_name: roster.owner_name.clone(),
            wins: roster.wins,
            losses: roster.losses,
            ties: roster.ties,
            points_for: roster.points_for,
            points_against: roster.points_against,
            power_rank: None,
            power_rank_previous: None,
            faab_budget_used: roster.faab_budget_used,
            waiver_position: roster.waiver_position,
        });
        Ok(())
    }

    async fn upsert_matchup(&self, league_id: i64, matchup: &NewMatchup) -> Result<()> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.matchups.iter_mut().find(|m| {
            m.league_id == league_id && m.provider_matchup_id == matchup.provider_matchup_id
        }) {
            existing.team1_roster_id = matchup.team1_roster_id.clone();
            existing.team1_points = matchup.team1_points;
            existing.team1_projected = matchup.team1_projected;
            existing.team2_roster_id = matchup.team2_roster_id.clone();
            existing.team2_points = matchup.team2_points;
            existing.team2_projected = matchup.team2_projected;
            existing.winner_roster_id = matchup.winner_roster_id.clone();
            existing.margin_of_victory = matchup.margin_of_victory;
            existing.is_complete = matchup.is_complete;
            existing.is_playoff = matchup.is_playoff;
            return Ok(());
        }

        let id = inner.allocate_id();
        inner.matchups.push(MatchupRecord {
            id,
            league_id,
            provider_matchup_id: matchup.provider_matchup_id.clone(),
            week: matchup.week,
            season: matchup.season,
            team1_roster_id: matchup.team1_roster_id.clone(),
            team1_points: matchup.team1_points,
            team1_projected: matchup.team1_projected,
            team2_roster_id: matchup.team2_roster_id.clone(),
            team2_points: matchup.team2_points,
            team2_projected: matchup.team2_projected,
            winner_roster_id: matchup.winner_roster_id.clone(),
            margin_of_victory: matchup.margin_of_victory,
            is_complete: matchup.is_complete,
            is_playoff: matchup.is_playoff,
        });
        Ok(())
    }

    async fn upsert_transaction(
        &self,
        league_id: i64,
        transaction: &NewTransaction,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner.transactions.iter_mut().find(|t| {
            t.league_id == league_id
                && t.provider_transaction_id == transaction.provider_transaction_id
        }) {
            existing.kind = transaction.kind;
            existing.status = transaction.status;
            existing.week = transaction.week;
            existing.roster_id = transaction.roster_id.clone();
            existing.players_added = transaction.players_added.clone();
            existing.players_dropped = transaction.players_dropped.clone();
            existing.faab_bid = transaction.faab_bid;
            existing.waiver_priority = transaction.waiver_priority;
            existing.processed_at = transaction.processed_at;
            return Ok(());
        }

        let id = inner.allocate_id();
        inner.transactions.push(TransactionRecord {
            id,
            league_id,
            provider_transaction_id: transaction.provider_transaction_id.clone(),
            kind: transaction.kind,
            status: transaction.status,
            week: transaction.week,
            roster_id: transaction.roster_id.clone(),
            players_added: transaction.players_added.clone(),
            players_dropped: transaction.players_dropped.clone(),
            faab_bid: transaction.faab_bid,
            waiver_priority: transaction.waiver_priority,
            processed_at: transaction.processed_at,
        });
        Ok(())
    }

    async fn touch_last_sync(&self, league_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(league) = inner.leagues.iter_mut().find(|l| l.id == league_id) {
            league.last_sync_at = Some(chrono::Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sport;

    fn create_test_league() -> NewLeague {
        NewLeague {
            provider: Provider::Sleeper,
            provider_league_id: "12345".to_string(),
            name: "Test League".to_string(),
            sport: Sport::Football,
            season: 2025,
            week: Some(4),
            num_teams: 10,
            scoring_type: Some("ppr".to_string()),
        }
    }

    fn create_test_roster(roster_id: &str, wins: i32) -> NewRoster {
        NewRoster {
            provider_roster_id: roster_id.to_string(),
            provider_owner_id: None,
            team_name: Some(format!("Squad {roster_id}")),
            owner_name: Some(format!("Owner {roster_id}")),
            wins,
            losses: 4 - wins,
            ties: 0,
            points_for: 400.0,
            points_against: 380.0,
            faab_budget_used: Some(10),
            waiver_position: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_league_creates_then_updates() {
        let store = InMemoryLeagueStore::new();

        let created = store.upsert_league(&create_test_league()).await.unwrap();
        assert_eq!(created.name, "Test League");
        assert!(created.enable_power_rankings);

        let mut renamed = create_test_league();
        renamed.name = "Renamed League".to_string();
        let updated = store.upsert_league(&renamed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Renamed League");

        let found =
            store.find_league(Provider::Sleeper, "12345").await.unwrap().expect("league exists");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_rosters_keep_insertion_order() {
        let store = InMemoryLeagueStore::new();
        let league = store.upsert_league(&create_test_league()).await.unwrap();

        for id in ["3", "1", "2"] {
            store.upsert_roster(league.id, &create_test_roster(id, 2)).await.unwrap();
        }

        let rosters = store.list_rosters(league.id).await.unwrap();
        let ids: Vec<&str> = rosters.iter().map(|r| r.provider_roster_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn test_update_power_ranks_sets_next_baseline() {
        let store = InMemoryLeagueStore::new();
        let league = store.upsert_league(&create_test_league()).await.unwrap();
        store.upsert_roster(league.id, &create_test_roster("1", 3)).await.unwrap();
        store.upsert_roster(league.id, &create_test_roster("2", 1)).await.unwrap();

        let mut ranks = HashMap::new();
        ranks.insert("1".to_string(), 2);
        store.update_power_ranks(league.id, &ranks).await.unwrap();

        let rosters = store.list_rosters(league.id).await.unwrap();
        assert_eq!(rosters[0].power_rank, Some(2));
        assert_eq!(rosters[0].power_rank_previous, Some(2));
        // Rosters absent from the rank map are untouched
        assert_eq!(rosters[1].power_rank, None);
        assert_eq!(rosters[1].power_rank_previous, None);
    }
}
