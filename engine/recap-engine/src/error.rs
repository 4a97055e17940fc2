//! Error types for the recap engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while deriving a weekly summary
///
/// Only structural problems surface here. Data-quality problems (malformed
/// player payloads, missing roster references) are absorbed with placeholder
/// values so one bad record never aborts a whole summary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("League {0} not found")]
    LeagueNotFound(i64),

    /// A week with no playable matchups cannot produce extremal statistics
    #[error("No completed matchups for league {league_id} week {week}")]
    NoPerformances { league_id: i64, week: i32 },

    #[error("Store error: {0}")]
    Store(#[from] league_store::StoreError),
}
