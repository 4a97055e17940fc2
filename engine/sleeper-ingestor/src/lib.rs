//! # Sleeper Ingestor
//!
//! Fetches league data from the Sleeper API and normalizes it into the
//! league store: league metadata, rosters with season records, weekly
//! matchups (paired by matchup id, with winner determination), and
//! transactions with FAAB bids.

pub mod client;
pub mod error;
pub mod ingestor;

pub use client::{SleeperClient, DEFAULT_API_BASE_URL};
pub use error::{IngestError, Result};
pub use ingestor::SleeperIngestor;
