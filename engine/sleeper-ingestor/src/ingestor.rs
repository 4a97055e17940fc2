//! Normalization of Sleeper data into the league store

use crate::client::{SleeperClient, SleeperMatchupEntry, SleeperTransaction, SleeperUser};
use crate::error::Result;
use chrono::{Datelike, TimeZone, Utc};
use league_store::{
    LeagueRecord, LeagueStore, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider, Sport,
    TransactionKind, TransactionStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// How many weeks of matchups to refresh on each sync
const MATCHUP_LOOKBACK_WEEKS: i32 = 2;
/// How many weeks of transactions to refresh on each sync
const TRANSACTION_LOOKBACK_WEEKS: i32 = 1;

/// Ingests Sleeper leagues into a [`LeagueStore`]
pub struct SleeperIngestor {
    client: SleeperClient,
    store: Arc<dyn LeagueStore>,
}

impl SleeperIngestor {
    pub fn new(client: SleeperClient, store: Arc<dyn LeagueStore>) -> Self {
        Self { client, store }
    }

    /// Fetch and upsert everything for one league: league metadata,
    /// rosters, recent matchups, and recent transactions.
    ///
    /// A week that fails to ingest is logged and skipped so one bad week
    /// never aborts the whole sync.
    pub async fn ingest_league(&self, provider_league_id: &str) -> Result<LeagueRecord> {
        let league_data = self.client.get_league(provider_league_id).await?;

        let season = league_data
            .season
            .parse::<i32>()
            .unwrap_or_else(|_| Utc::now().year());
        let week = league_data.settings.get("leg").and_then(|v| v.as_i64()).map(|w| w as i32);

        let league = self
            .store
            .upsert_league(&NewLeague {
                provider: Provider::Sleeper,
                provider_league_id: provider_league_id.to_string(),
                name: league_data.name.clone(),
                sport: map_sport(&league_data.sport),
                season,
                week,
                num_teams: league_data.total_rosters,
                scoring_type: Some(scoring_type_from_settings(&league_data.scoring_settings)),
            })
            .await?;

        self.ingest_rosters(&league, provider_league_id).await?;

        let current_week = week.unwrap_or(1).max(1);
        for week in (current_week - MATCHUP_LOOKBACK_WEEKS).max(1)..=current_week {
            if let Err(error) = self.ingest_matchups(&league, provider_league_id, week).await {
                warn!(week, "Failed to ingest matchups: {error}");
            }
        }
        for week in (current_week - TRANSACTION_LOOKBACK_WEEKS).max(1)..=current_week {
            if let Err(error) = self.ingest_transactions(&league, provider_league_id, week).await
            {
                warn!(week, "Failed to ingest transactions: {error}");
            }
        }

        self.store.touch_last_sync(league.id).await?;
        info!(league_id = league.id, name = %league.name, "Sleeper league synced");

        Ok(league)
    }

    async fn ingest_rosters(
        &self,
        league: &LeagueRecord,
        provider_league_id: &str,
    ) -> Result<()> {
        let rosters = self.client.get_rosters(provider_league_id).await?;
        let users = self.client.get_users(provider_league_id).await?;
        let user_lookup: HashMap<&str, &SleeperUser> =
            users.iter().map(|u| (u.user_id.as_str(), u)).collect();

        for roster in &rosters {
            let user = roster.owner_id.as_deref().and_then(|id| user_lookup.get(id).copied());

            // Prefer the custom team name from user metadata, then the
            // user's display name
            let team_name = user.and_then(|u| {
                u.metadata
                    .get("team_name")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .or_else(|| u.display_name.clone())
            });
            let owner_name = user.and_then(|u| u.display_name.clone());

            let settings = &roster.settings;
            self.store
                .upsert_roster(
                    league.id,
                    &NewRoster {
                        provider_roster_id: roster.roster_id.to_string(),
                        provider_owner_id: roster.owner_id.clone(),
                        team_name,
                        owner_name,
                        wins: read_i32(settings, "wins"),
                        losses: read_i32(settings, "losses"),
                        ties: read_i32(settings, "ties"),
                        points_for: read_f64(settings, "fpts"),
                        points_against: read_f64(settings, "fpts_against"),
                        faab_budget_used: settings
                            .get("waiver_budget_used")
                            .and_then(|v| v.as_i64())
                            .map(|v| v as i32),
                        waiver_position: settings
                            .get("waiver_position")
                            .and_then(|v| v.as_i64())
                            .map(|v| v as i32),
                    },
                )
                .await?;
        }

        Ok(())
    }

    async fn ingest_matchups(
        &self,
        league: &LeagueRecord,
        provider_league_id: &str,
        week: i32,
    ) -> Result<()> {
        let entries = self.client.get_matchups(provider_league_id, week).await?;

        // Pair up the two rosters sharing each matchup_id; entries without
        // one are byes
        let mut groups: HashMap<i64, Vec<&SleeperMatchupEntry>> = HashMap::new();
        for entry in &entries {
            if let Some(matchup_id) = entry.matchup_id {
                groups.entry(matchup_id).or_default().push(entry);
            }
        }

        for (matchup_id, teams) in groups {
            if teams.len() != 2 {
                continue;
            }
            let (team1, team2) = (teams[0], teams[1]);
            let team1_id = team1.roster_id.to_string();
            let team2_id = team2.roster_id.to_string();

            let (winner_roster_id, margin_of_victory) =
                winner_of(&team1_id, team1.points, &team2_id, team2.points);
            let is_complete = team1.points.is_some() && team2.points.is_some();

            self.store
                .upsert_matchup(
                    league.id,
                    &NewMatchup {
                        provider_matchup_id: format!(
                            "{provider_league_id}_{week}_{matchup_id}"
                        ),
                        week,
                        season: league.season,
                        team1_roster_id: team1_id,
                        team1_points: team1.points,
                        team1_projected: team1.points_projected,
                        team2_roster_id: Some(team2_id),
                        team2_points: team2.points,
                        team2_projected: team2.points_projected,
                        winner_roster_id,
                        margin_of_victory,
                        is_complete,
                        is_playoff: false,
                    },
                )
                .await?;
        }

        Ok(())
    }

    async fn ingest_transactions(
        &self,
        league: &LeagueRecord,
        provider_league_id: &str,
        week: i32,
    ) -> Result<()> {
        let transactions = self.client.get_transactions(provider_league_id, week).await?;

        for transaction in &transactions {
            let roster_id = match transaction.roster_ids.as_ref().and_then(|ids| ids.first()) {
                Some(id) => id.to_string(),
                None => {
                    warn!(
                        transaction_id = %transaction.transaction_id,
                        "Transaction without roster ids skipped"
                    );
                    continue;
                }
            };

            let players_added = transaction
                .adds
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            let players_dropped = transaction
                .drops
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            self.store
                .upsert_transaction(
                    league.id,
                    &NewTransaction {
                        provider_transaction_id: transaction.transaction_id.clone(),
                        kind: map_transaction_kind(&transaction.kind),
                        status: map_transaction_status(transaction.status.as_deref()),
                        week,
                        faab_bid: faab_bid_for(transaction, &roster_id),
                        roster_id,
                        players_added,
                        players_dropped,
                        waiver_priority: None,
                        processed_at: transaction
                            .created
                            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
                    },
                )
                .await?;
        }

        Ok(())
    }
}

/// Map a Sleeper sport code to our sport enum, defaulting to football
pub fn map_sport(sport: &str) -> Sport {
    match sport.to_lowercase().as_str() {
        "nba" => Sport::Basketball,
        "mlb" => Sport::Baseball,
        "nhl" => Sport::Hockey,
        _ => Sport::Football,
    }
}

/// Classify scoring from the `rec` (points per reception) setting
pub fn scoring_type_from_settings(scoring_settings: &serde_json::Value) -> String {
    let rec_points = scoring_settings.get("rec").and_then(|v| v.as_f64()).unwrap_or(0.0);
    if rec_points >= 1.0 {
        "ppr".to_string()
    } else if rec_points > 0.0 {
        "half_ppr".to_string()
    } else {
        "standard".to_string()
    }
}

/// Determine the winner of a completed matchup.
///
/// Returns (winner roster id, margin). Incomplete matchups and ties record
/// no winner.
pub fn winner_of(
    team1_id: &str,
    team1_points: Option<f64>,
    team2_id: &str,
    team2_points: Option<f64>,
) -> (Option<String>, Option<f64>) {
    match (team1_points, team2_points) {
        (Some(p1), Some(p2)) if p1 > p2 => (Some(team1_id.to_string()), Some(p1 - p2)),
        (Some(p1), Some(p2)) if p2 > p1 => (Some(team2_id.to_string()), Some(p2 - p1)),
        _ => (None, None),
    }
}

/// Map a Sleeper transaction type, defaulting unknown types to add
pub fn map_transaction_kind(kind: &str) -> TransactionKind {
    match kind {
        "waiver" => TransactionKind::Waiver,
        "free_agent" => TransactionKind::FreeAgent,
        "trade" => TransactionKind::Trade,
        "drop" => TransactionKind::Drop,
        _ => TransactionKind::Add,
    }
}

/// Map a Sleeper transaction status, defaulting to completed
pub fn map_transaction_status(status: Option<&str>) -> TransactionStatus {
    match status {
        Some("failed") => TransactionStatus::Failed,
        Some("pending") => TransactionStatus::Pending,
        _ => TransactionStatus::Completed,
    }
}

fn read_i32(settings: &serde_json::Value, key: &str) -> i32 {
    settings.get(key).and_then(|v| v.as_i64()).unwrap_or(0) as i32
}

fn read_f64(settings: &serde_json::Value, key: &str) -> f64 {
    settings.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// FAAB bid for the acting roster, from the transaction's waiver budget map
fn faab_bid_for(transaction: &SleeperTransaction, roster_id: &str) -> Option<i32> {
    transaction
        .waiver_budget
        .as_ref()
        .and_then(|budget| budget.as_object())
        .and_then(|map| map.get(roster_id))
        .and_then(|bid| bid.as_i64())
        .map(|bid| bid as i32)
}
