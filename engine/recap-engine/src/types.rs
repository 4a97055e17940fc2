//! Derived value types produced by the recap engine
//!
//! Everything here is computed fresh per summary request, never persisted,
//! and immutable once built.

use league_store::TransactionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One team's result in one matchup-week. Exactly two of these exist per
/// completed two-team matchup; bye weeks produce none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub roster_id: String,
    pub team_name: String,
    pub owner_name: String,
    pub points_scored: f64,
    pub points_projected: f64,
    pub win: bool,
    pub opponent_name: String,
    pub opponent_points: f64,
    /// Absolute point differential, always >= 0
    pub margin: f64,
}

/// Direction of a team's rank change since the previous computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Same => write!(f, "same"),
        }
    }
}

/// A team's position in the power rankings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerRankingEntry {
    /// 1-based dense rank
    pub rank: i32,
    /// Rank at the previous computation; None for teams never ranked before
    pub previous_rank: Option<i32>,
    pub roster_id: String,
    pub team_name: String,
    pub owner_name: String,
    /// "W-L" or "W-L-T" when ties are present
    pub record: String,
    pub points_for: f64,
    pub points_against: f64,
    pub power_score: f64,
    pub trend: Trend,
    /// previous_rank - rank; positive means the team climbed
    pub movement: i32,
}

/// Human-readable summary of one roster transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub kind: TransactionKind,
    pub team_name: String,
    pub owner_name: String,
    pub players_added: Vec<String>,
    pub players_dropped: Vec<String>,
    pub faab_spent: Option<i32>,
    pub notes: String,
}

/// A winner/loser pairing of performances from the same matchup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupResult {
    pub winner: PerformanceRecord,
    pub loser: PerformanceRecord,
}

/// Complete weekly summary for a league, the aggregate root consumed by
/// the renderer. Identity is (league_name, week, season).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub league_name: String,
    pub week: i32,
    pub season: i32,

    // Performance data
    pub performances: Vec<PerformanceRecord>,
    pub highest_scorer: PerformanceRecord,
    pub lowest_scorer: PerformanceRecord,
    pub biggest_blowout: MatchupResult,
    pub closest_matchup: MatchupResult,

    // Power rankings
    pub power_rankings: Vec<PowerRankingEntry>,
    pub biggest_climber: Option<PowerRankingEntry>,
    pub biggest_fall: Option<PowerRankingEntry>,

    // Transactions
    pub transactions: Vec<TransactionSummary>,
    pub total_faab_spent: i64,
    pub most_active_trader: Option<String>,

    // League stats
    pub average_score: f64,
    pub total_points: f64,
    /// Team names currently in playoff position, top 6 by rank
    pub playoff_picture: Vec<String>,
}
