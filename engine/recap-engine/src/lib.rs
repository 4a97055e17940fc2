//! # Recap Engine
//!
//! Weekly analytics derivation for fantasy leagues: turns stored rosters,
//! matchups, and transactions into one ranked, trend-annotated
//! [`WeeklySummary`].
//!
//! Every component is a deterministic function of the stored state, with
//! no internal concurrency or hidden mutable state. The one piece of
//! cross-call state, the power-rank movement baseline, is an explicit
//! input (read from each roster's `power_rank_previous`) and an explicit
//! output (the new ranks inside the summary, which the caller persists).

pub mod error;
pub mod performance;
pub mod rankings;
pub mod summary;
pub mod transactions;
pub mod types;

pub use error::{EngineError, Result};
pub use performance::extract_performances;
pub use rankings::{calculate_power_rankings, power_score};
pub use summary::SummaryGenerator;
pub use transactions::{
    most_active_trader, parse_player_list, summarize_transactions, total_faab_spent,
};
pub use types::{
    MatchupResult, PerformanceRecord, PowerRankingEntry, TransactionSummary, Trend, WeeklySummary,
};

// Re-export the transaction kind used inside summaries
pub use league_store::TransactionKind;
