//! Service state and top-level operations

use crate::config::ServiceConfig;
use crate::publisher::GroupMePublisher;
use crate::recaps::{RecapService, ServiceError};
use anyhow::Result;
use league_store::{LeagueRecord, LeagueStore, PgLeagueStore, Provider};
use recap_renderer::{OpenAiRewriter, ProseRewriter, RecapStyle};
use sleeper_ingestor::{SleeperClient, SleeperIngestor};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a sync pass over all leagues
#[derive(Debug, Default)]
pub struct SyncReport {
    pub successful: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// System health snapshot
#[derive(Debug)]
pub struct HealthStatus {
    pub database_ok: bool,
    pub sleeper_api_ok: bool,
    pub active_leagues: usize,
}

/// Shared state wiring the store, ingestor, and recap service together
pub struct ServiceState {
    pub config: ServiceConfig,
    store: Arc<dyn LeagueStore>,
    sleeper: SleeperClient,
    ingestor: SleeperIngestor,
    recaps: RecapService,
}

impl ServiceState {
    /// Connect to Postgres and build the full service state
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        let store: Arc<dyn LeagueStore> = Arc::new(
            PgLeagueStore::connect(&config.database.url, config.database.max_connections).await?,
        );
        Ok(Self::with_store(config, store))
    }

    /// Build service state over any store backend
    pub fn with_store(config: ServiceConfig, store: Arc<dyn LeagueStore>) -> Self {
        let sleeper = SleeperClient::new(config.sleeper.api_base_url.clone());
        let ingestor = SleeperIngestor::new(sleeper.clone(), store.clone());

        let rewriter: Option<Arc<dyn ProseRewriter>> = match config.rewrite_api_key() {
            Some(api_key) => {
                info!("LLM prose rewriting enabled with model {}", config.rewrite.model);
                Some(Arc::new(OpenAiRewriter::new(api_key, config.rewrite.model.clone())))
            }
            None => None,
        };

        let publisher = GroupMePublisher::new(config.groupme.api_base_url.clone());
        let recaps =
            RecapService::new(store.clone(), publisher, config.groupme.enabled, rewriter);

        Self { config, store, sleeper, ingestor, recaps }
    }

    pub fn recaps(&self) -> &RecapService {
        &self.recaps
    }

    pub async fn list_active_leagues(&self) -> Result<Vec<LeagueRecord>> {
        Ok(self.store.list_active_leagues().await?)
    }

    /// Sync one league by provider league id
    pub async fn sync_league(&self, provider_league_id: &str) -> Result<LeagueRecord> {
        Ok(self.ingestor.ingest_league(provider_league_id).await?)
    }

    /// Sync provider data for every active league.
    ///
    /// One league failing never stops the rest; failures are counted and
    /// logged. Yahoo leagues are skipped since only Sleeper ingestion is
    /// wired up.
    pub async fn sync_all_leagues(&self) -> Result<SyncReport> {
        let leagues = self.store.list_active_leagues().await?;
        info!("Syncing {} leagues", leagues.len());

        let mut report = SyncReport::default();
        for league in &leagues {
            match league.provider {
                Provider::Sleeper => {
                    match self.ingestor.ingest_league(&league.provider_league_id).await {
                        Ok(_) => report.successful += 1,
                        Err(e) => {
                            warn!("Sync failed for league {}: {e}", league.id);
                            report.failed += 1;
                        }
                    }
                }
                Provider::Yahoo => {
                    report.skipped += 1;
                }
            }
        }

        info!(
            successful = report.successful,
            failed = report.failed,
            skipped = report.skipped,
            "League sync pass complete"
        );
        Ok(report)
    }

    /// Scheduled power rankings recap: reviews the previous completed week
    pub async fn run_power_rankings(&self, league: &LeagueRecord) -> Result<(), ServiceError> {
        let current_week = league.week.unwrap_or(1);
        let review_week = (current_week - 1).max(1);

        let recap = self
            .recaps
            .power_rankings_recap(league.id, Some(review_week), RecapStyle::Standard, true)
            .await?;
        info!(
            league_id = league.id,
            week = review_week,
            chars = recap.len(),
            "Generated power rankings recap"
        );
        Ok(())
    }

    /// Scheduled waiver recap: covers the current week's moves
    pub async fn run_waiver_recap(&self, league: &LeagueRecord) -> Result<(), ServiceError> {
        let week = league.week.unwrap_or(1);

        let recap = self.recaps.waiver_recap(league.id, Some(week), true).await?;
        info!(
            league_id = league.id,
            week,
            chars = recap.len(),
            "Generated waiver recap"
        );
        Ok(())
    }

    /// Verify database and provider connectivity
    pub async fn health_check(&self) -> HealthStatus {
        let (database_ok, active_leagues) = match self.store.list_active_leagues().await {
            Ok(leagues) => (true, leagues.len()),
            Err(e) => {
                warn!("Database health check failed: {e}");
                (false, 0)
            }
        };

        let sleeper_api_ok = match self.sleeper.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Sleeper health check failed: {e}");
                false
            }
        };

        HealthStatus { database_ok, sleeper_api_ok, active_leagues }
    }
}
