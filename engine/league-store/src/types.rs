//! Record types for normalized league data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported fantasy sports providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "provider_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Sleeper,
    Yahoo,
}

/// Sport a league is played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sport_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Basketball,
    Baseball,
    Hockey,
}

/// Kind of roster transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Add,
    Drop,
    Trade,
    Waiver,
    FreeAgent,
}

impl TransactionKind {
    /// Provider-facing name for the kind (matches the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Add => "add",
            TransactionKind::Drop => "drop",
            TransactionKind::Trade => "trade",
            TransactionKind::Waiver => "waiver",
            TransactionKind::FreeAgent => "free_agent",
        }
    }
}

/// Processing status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// A fantasy league tracked by the service
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeagueRecord {
    pub id: i64,
    pub provider: Provider,
    pub provider_league_id: String,
    pub name: String,
    pub sport: Sport,
    pub season: i32,
    pub week: Option<i32>,
    pub num_teams: i32,
    pub scoring_type: Option<String>,

    /// GroupMe bot this league publishes to (None disables publishing)
    pub groupme_bot_id: Option<String>,

    pub enable_power_rankings: bool,
    pub enable_waiver_recaps: bool,
    pub enable_llm_rendering: bool,
    pub persona: Option<String>,

    /// Recap schedule: lowercase weekday name + HH:MM, per recap kind
    pub power_rankings_day: String,
    pub power_rankings_time: String,
    pub waiver_recap_day: String,
    pub waiver_recap_time: String,

    pub is_active: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// A team roster within a league, with season-to-date performance
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RosterRecord {
    pub id: i64,
    pub league_id: i64,
    pub provider_roster_id: String,
    pub provider_owner_id: Option<String>,
    pub team_name: Option<String>,
    pub owner_name: Option<String>,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub points_for: f64,
    pub points_against: f64,

    /// Current and previous power rank. The engine computes new ranks each
    /// run; the caller persists them here as the baseline for the next run.
    pub power_rank: Option<i32>,
    pub power_rank_previous: Option<i32>,

    pub faab_budget_used: Option<i32>,
    pub waiver_position: Option<i32>,
}

/// A head-to-head matchup for a specific week
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchupRecord {
    pub id: i64,
    pub league_id: i64,
    pub provider_matchup_id: String,
    pub week: i32,
    pub season: i32,
    pub team1_roster_id: String,
    pub team1_points: Option<f64>,
    pub team1_projected: Option<f64>,

    /// None for bye weeks
    pub team2_roster_id: Option<String>,
    pub team2_points: Option<f64>,
    pub team2_projected: Option<f64>,

    /// None until the matchup completes, and for tied matchups
    pub winner_roster_id: Option<String>,
    pub margin_of_victory: Option<f64>,
    pub is_complete: bool,
    pub is_playoff: bool,
}

/// A roster transaction (waiver claim, trade, add, drop)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: i64,
    pub league_id: i64,
    pub provider_transaction_id: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub week: i32,

    /// Primary roster involved
    pub roster_id: String,

    /// Raw provider JSON payloads of player references
    pub players_added: Option<String>,
    pub players_dropped: Option<String>,

    pub faab_bid: Option<i32>,
    pub waiver_priority: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// League fields owned by the ingestor (admin settings are not touched on sync)
#[derive(Debug, Clone)]
pub struct NewLeague {
    pub provider: Provider,
    pub provider_league_id: String,
    pub name: String,
    pub sport: Sport,
    pub season: i32,
    pub week: Option<i32>,
    pub num_teams: i32,
    pub scoring_type: Option<String>,
}

/// Roster fields owned by the ingestor
#[derive(Debug, Clone)]
pub struct NewRoster {
    pub provider_roster_id: String,
    pub provider_owner_id: Option<String>,
    pub team_name: Option<String>,
    pub owner_name: Option<String>,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub points_for: f64,
    pub points_against: f64,
    pub faab_budget_used: Option<i32>,
    pub waiver_position: Option<i32>,
}

/// Matchup fields owned by the ingestor
#[derive(Debug, Clone)]
pub struct NewMatchup {
    pub provider_matchup_id: String,
    pub week: i32,
    pub season: i32,
    pub team1_roster_id: String,
    pub team1_points: Option<f64>,
    pub team1_projected: Option<f64>,
    pub team2_roster_id: Option<String>,
    pub team2_points: Option<f64>,
    pub team2_projected: Option<f64>,
    pub winner_roster_id: Option<String>,
    pub margin_of_victory: Option<f64>,
    pub is_complete: bool,
    pub is_playoff: bool,
}

/// Transaction fields owned by the ingestor
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub provider_transaction_id: String,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub week: i32,
    pub roster_id: String,
    pub players_added: Option<String>,
    pub players_dropped: Option<String>,
    pub faab_bid: Option<i32>,
    pub waiver_priority: Option<i32>,
    pub processed_at: Option<DateTime<Utc>>,
}
