//! # League Store
//!
//! Persistence layer for normalized fantasy league data. Providers write
//! leagues, rosters, matchups, and transactions through the upsert methods;
//! the recap engine reads them back through the same [`LeagueStore`] trait.
//!
//! Two backends are provided:
//!
//! - **PgLeagueStore**: Postgres via sqlx, with embedded migrations
//! - **InMemoryLeagueStore**: in-process maps, for tests and local runs

pub mod backend;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod types;

pub use backend::LeagueStore;
pub use error::{Result, StoreError};
pub use memory::InMemoryLeagueStore;
pub use postgres::PgLeagueStore;
pub use types::{
    LeagueRecord, MatchupRecord, NewLeague, NewMatchup, NewRoster, NewTransaction, Provider,
    RosterRecord, Sport, TransactionKind, TransactionRecord, TransactionStatus,
};
