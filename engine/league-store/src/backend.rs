//! Store trait over league data backends

use crate::error::Result;
use crate::types::{
    LeagueRecord, MatchupRecord, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider,
    RosterRecord, TransactionRecord,
};
use std::collections::HashMap;

/// Abstract trait for league data backends
///
/// The recap engine only reads through this trait; the ingestor writes
/// through the upsert methods. Callers that compute summaries during
/// concurrent ingestion are responsible for reading from a consistent
/// snapshot (the Postgres backend reads each collection in one statement).
#[async_trait::async_trait]
pub trait LeagueStore: Send + Sync {
    /// Look up a league by internal id
    async fn get_league(&self, league_id: i64) -> Result<Option<LeagueRecord>>;

    /// Look up a league by provider identity
    async fn find_league(
        &self,
        provider: Provider,
        provider_league_id: &str,
    ) -> Result<Option<LeagueRecord>>;

    /// All active leagues, for scheduling
    async fn list_active_leagues(&self) -> Result<Vec<LeagueRecord>>;

    /// All rosters in a league, in stable insertion order
    async fn list_rosters(&self, league_id: i64) -> Result<Vec<RosterRecord>>;

    /// Matchups for a league and week
    async fn list_matchups(&self, league_id: i64, week: i32) -> Result<Vec<MatchupRecord>>;

    /// Transactions for a league and week
    async fn list_transactions(&self, league_id: i64, week: i32)
        -> Result<Vec<TransactionRecord>>;

    /// Persist newly computed power ranks as the next baseline.
    ///
    /// For each roster in `ranks` (keyed by provider roster id), the
    /// current `power_rank` moves to `power_rank_previous` and the new
    /// rank becomes `power_rank`.
    async fn update_power_ranks(&self, league_id: i64, ranks: &HashMap<String, i32>)
        -> Result<()>;

    /// Insert or update a league from provider data, returning the stored row
    async fn upsert_league(&self, league: &NewLeague) -> Result<LeagueRecord>;

    /// Insert or update a roster from provider data
    async fn upsert_roster(&self, league_id: i64, roster: &NewRoster) -> Result<()>;

    /// Insert or update a matchup from provider data
    async fn upsert_matchup(&self, league_id: i64, matchup: &NewMatchup) -> Result<()>;

    /// Insert or update a transaction from provider data
    async fn upsert_transaction(&self, league_id: i64, transaction: &NewTransaction)
        -> Result<()>;

    /// Record a successful sync
    async fn touch_last_sync(&self, league_id: i64) -> Result<()>;
}
