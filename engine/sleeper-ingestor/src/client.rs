//! Sleeper API client

use crate::error::{IngestError, Result};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://api.sleeper.app/v1";

/// Sleeper league response
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperLeague {
    pub league_id: String,
    pub name: String,
    pub season: String,
    pub total_rosters: i32,
    pub sport: String,
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub scoring_settings: serde_json::Value,
}

/// Sleeper roster response
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    pub roster_id: i64,
    pub owner_id: Option<String>,
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// Sleeper user response
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// One roster's side of a weekly matchup; two entries share a matchup_id
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperMatchupEntry {
    /// None for bye weeks
    pub matchup_id: Option<i64>,
    pub roster_id: i64,
    pub points: Option<f64>,
    #[serde(default)]
    pub points_projected: Option<f64>,
}

/// Sleeper transaction response
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperTransaction {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub roster_ids: Option<Vec<i64>>,
    /// Map of player_id -> roster_id
    pub adds: Option<serde_json::Value>,
    pub drops: Option<serde_json::Value>,
    /// Map of roster_id -> FAAB amount
    pub waiver_budget: Option<serde_json::Value>,
    /// Creation timestamp in epoch milliseconds
    pub created: Option<i64>,
}

/// HTTP client for the Sleeper API
#[derive(Debug, Clone)]
pub struct SleeperClient {
    base_url: String,
    client: reqwest::Client,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: reqwest::Client::new() }
    }

    /// Get league information
    pub async fn get_league(&self, league_id: &str) -> Result<SleeperLeague> {
        let url = format!("{}/league/{}", self.base_url, league_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!("Failed to get league {}: {}", league_id, response.status()),
            });
        }

        Ok(response.json().await?)
    }

    /// Get all rosters in a league
    pub async fn get_rosters(&self, league_id: &str) -> Result<Vec<SleeperRoster>> {
        let url = format!("{}/league/{}/rosters", self.base_url, league_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!("Failed to get rosters: {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }

    /// Get all users in a league
    pub async fn get_users(&self, league_id: &str) -> Result<Vec<SleeperUser>> {
        let url = format!("{}/league/{}/users", self.base_url, league_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!("Failed to get users: {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }

    /// Get matchups for a week. A 404 means the week hasn't been played
    /// yet and returns an empty list.
    pub async fn get_matchups(
        &self,
        league_id: &str,
        week: i32,
    ) -> Result<Vec<SleeperMatchupEntry>> {
        let url = format!("{}/league/{}/matchups/{}", self.base_url, league_id, week);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!("Failed to get matchups for week {week}: {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }

    /// Get transactions for a week, with the same 404 tolerance as
    /// [`Self::get_matchups`]
    pub async fn get_transactions(
        &self,
        league_id: &str,
        week: i32,
    ) -> Result<Vec<SleeperTransaction>> {
        let url = format!("{}/league/{}/transactions/{}", self.base_url, league_id, week);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!(
                    "Failed to get transactions for week {week}: {}",
                    response.status()
                ),
            });
        }

        Ok(response.json().await?)
    }

    /// Health check against the NFL state endpoint
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/state/nfl", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IngestError::Api {
                message: format!("Health check failed: {}", response.status()),
            });
        }

        Ok(())
    }
}

impl Default for SleeperClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
