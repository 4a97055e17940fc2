//! Postgres-backed league store

use crate::backend::LeagueStore;
use crate::error::Result;
use crate::types::{
    LeagueRecord, MatchupRecord, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider,
    RosterRecord, TransactionRecord,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;

const LEAGUE_COLUMNS: &str = "id, provider, provider_league_id, name, sport, season, week, \
     num_teams, scoring_type, groupme_bot_id, enable_power_rankings, enable_waiver_recaps, \
     enable_llm_rendering, persona, power_rankings_day, power_rankings_time, waiver_recap_day, \
     waiver_recap_time, is_active, last_sync_at";

const ROSTER_COLUMNS: &str = "id, league_id, provider_roster_id, provider_owner_id, team_name, \
     owner_name, wins, losses, ties, points_for, points_against, power_rank, \
     power_rank_previous, faab_budget_used, waiver_position";

const MATCHUP_COLUMNS: &str = "id, league_id, provider_matchup_id, week, season, \
     team1_roster_id, team1_points, team1_projected, team2_roster_id, team2_points, \
     team2_projected, winner_roster_id, margin_of_victory, is_complete, is_playoff";

const TRANSACTION_COLUMNS: &str = "id, league_id, provider_transaction_id, kind, status, week, \
     roster_id, players_added, players_dropped, faab_bid, waiver_priority, processed_at";

/// Postgres implementation of [`LeagueStore`]
pub struct PgLeagueStore {
    pool: PgPool,
}

impl PgLeagueStore {
    /// Connect to Postgres and run pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Connected to league database");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests and tools)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LeagueStore for PgLeagueStore {
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueRecord>> {
        let league = sqlx::query_as::<_, LeagueRecord>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1"
        ))
        .bind(league_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(league)
    }

    async fn find_league(
        &self,
        provider: Provider,
        provider_league_id: &str,
    ) -> Result<Option<LeagueRecord>> {
        let league = sqlx::query_as::<_, LeagueRecord>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE provider = $1 AND provider_league_id = $2"
        ))
        .bind(provider)
        .bind(provider_league_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(league)
    }

    async fn list_active_leagues(&self) -> Result<Vec<LeagueRecord>> {
        let leagues = sqlx::query_as::<_, LeagueRecord>(&format!(
            "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(leagues)
    }

    async fn list_rosters(&self, league_id: i64) -> Result<Vec<RosterRecord>> {
        // Stable order: the ranking tie-break relies on it
        let rosters = sqlx::query_as::<_, RosterRecord>(&format!(
            "SELECT {ROSTER_COLUMNS} FROM rosters WHERE league_id = $1 ORDER BY id"
        ))
        .bind(league_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rosters)
    }

    async fn list_matchups(&self, league_id: i64, week: i32) -> Result<Vec<MatchupRecord>> {
        let matchups = sqlx::query_as::<_, MatchupRecord>(&format!(
            "SELECT {MATCHUP_COLUMNS} FROM matchups WHERE league_id = $1 AND week = $2 ORDER BY id"
        ))
        .bind(league_id)
        .bind(week)
        .fetch_all(&self.pool)
        .await?;

        Ok(matchups)
    }

    async fn list_transactions(
        &self,
        league_id: i64,
        week: i32,
    ) -> Result<Vec<TransactionRecord>> {
        let transactions = sqlx::query_as::<_, TransactionRecord>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE league_id = $1 AND week = $2 ORDER BY id"
        ))
        .bind(league_id)
        .bind(week)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn update_power_ranks(
        &self,
        league_id: i64,
        ranks: &HashMap<String, i32>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (roster_id, rank) in ranks {
            // The new rank is both the current rank and the movement
            // baseline for the next computation
            sqlx::query(
                "UPDATE rosters SET power_rank = $3, power_rank_previous = $3, \
                 updated_at = NOW() WHERE league_id = $1 AND provider_roster_id = $2",
            )
            .bind(league_id)
            .bind(roster_id)
            .bind(rank)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn upsert_league(&self, league: &NewLeague) -> Result<LeagueRecord> {
        let stored = sqlx::query_as::<_, LeagueRecord>(&format!(
            "INSERT INTO leagues (provider, provider_league_id, name, sport, season, week, \
                 num_teams, scoring_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (provider, provider_league_id) DO UPDATE SET \
                 name = EXCLUDED.name, sport = EXCLUDED.sport, season = EXCLUDED.season, \
                 week = EXCLUDED.week, num_teams = EXCLUDED.num_teams, \
                 scoring_type = EXCLUDED.scoring_type, updated_at = NOW() \
             RETURNING {LEAGUE_COLUMNS}"
        ))
        .bind(league.provider)
        .bind(&league.provider_league_id)
        .bind(&league.name)
        .bind(league.sport)
        .bind(league.season)
        .bind(league.week)
        .bind(league.num_teams)
        .bind(&league.scoring_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn upsert_roster(&self, league_id: i64, roster: &NewRoster) -> Result<()> {
        sqlx::query(
            "INSERT INTO rosters (league_id, provider_roster_id, provider_owner_id, team_name, \
                 owner_name, wins, losses, ties, points_for, points_against, faab_budget_used, \
                 waiver_position) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (league_id, provider_roster_id) DO UPDATE SET \
                 provider_owner_id = EXCLUDED.provider_owner_id, \
                 team_name = EXCLUDED.team_name, owner_name = EXCLUDED.owner_name, \
                 wins = EXCLUDED.wins, losses = EXCLUDED.losses, ties = EXCLUDED.ties, \
                 points_for = EXCLUDED.points_for, points_against = EXCLUDED.points_against, \
                 faab_budget_used = EXCLUDED.faab_budget_used, \
                 waiver_position = EXCLUDED.waiver_position, updated_at = NOW()",
        )
        .bind(league_id)
        .bind(&roster.provider_roster_id)
        .bind(&roster.provider_owner_id)
        .bind(&roster.team_name)
        .bind(&roster.owner_name)
        .bind(roster.wins)
        .bind(roster.losses)
        .bind(roster.ties)
        .bind(roster.points_for)
        .bind(roster.points_against)
        .bind(roster.faab_budget_used)
        .bind(roster.waiver_position)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_matchup(&self, league_id: i64, matchup: &NewMatchup) -> Result<()> {
        sqlx::query(
            "INSERT INTO matchups (league_id, provider_matchup_id, week, season, \
                 team1_roster_id, team1_points, team1_projected, team2_roster_id, team2_points, \
                 team2_projected, winner_roster_id, margin_of_victory, is_complete, is_playoff) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (league_id, provider_matchup_id) DO UPDATE SET \
                 team1_roster_id = EXCLUDED.team1_roster_id, \
                 team1_points = EXCLUDED.team1_points, \
                 team1_projected = EXCLUDED.team1_projected, \
                 team2_roster_id = EXCLUDED.team2_roster_id, \
                 team2_points = EXCLUDED.team2_points, \
                 team2_projected = EXCLUDED.team2_projected, \
                 winner_roster_id = EXCLUDED.winner_roster_id, \
                 margin_of_victory = EXCLUDED.margin_of_victory, \
                 is_complete = EXCLUDED.is_complete, is_playoff = EXCLUDED.is_playoff, \
                 updated_at = NOW()",
        )
        .bind(league_id)
        .bind(&matchup.provider_matchup_id)
        .bind(matchup.week)
        .bind(matchup.season)
        .bind(&matchup.team1_roster_id)
        .bind(matchup.team1_points)
        .bind(matchup.team1_projected)
        .bind(&matchup.team2_roster_id)
        .bind(matchup.team2_points)
        .bind(matchup.team2_projected)
        .bind(&matchup.winner_roster_id)
        .bind(matchup.margin_of_victory)
        .bind(matchup.is_complete)
        .bind(matchup.is_playoff)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_transaction(
        &self,
        league_id: i64,
        transaction: &NewTransaction,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO transactions (league_id, provider_transaction_id, kind, status, week, \
                 roster_id, players_added, players_dropped, faab_bid, waiver_priority, \
                 processed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (league_id, provider_transaction_id) DO UPDATE SET \
                 kind = EXCLUDED.kind, status = EXCLUDED.status, week = EXCLUDED.week, \
                 roster_id = EXCLUDED.roster_id, players_added = EXCLUDED.players_added, \
                 players_dropped = EXCLUDED.players_dropped, faab_bid = EXCLUDED.faab_bid, \
                 waiver_priority = EXCLUDED.waiver_priority, \
                 processed_at = EXCLUDED.processed_at, updated_at = NOW()",
        )
        .bind(league_id)
        .bind(&transaction.provider_transaction_id)
        .bind(transaction.kind)
        .bind(transaction.status)
        .bind(transaction.week)
        .bind(&transaction.roster_id)
        .bind(&transaction.players_added)
        .bind(&transaction.players_dropped)
        .bind(transaction.faab_bid)
        .bind(transaction.waiver_priority)
        .bind(transaction.processed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn touch_last_sync(&self, league_id: i64) -> Result<()> {
        sqlx::query("UPDATE leagues SET last_sync_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(league_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
