//! Recap generation and publishing operations

use crate::publisher::GroupMePublisher;
use league_store::{LeagueRecord, LeagueStore, StoreError};
use recap_engine::{EngineError, SummaryGenerator, WeeklySummary};
use recap_renderer::{
    render, render_waiver_report, render_with_rewriter, ProseRewriter, RecapStyle,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors from recap operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("{kind} recaps are disabled for league {league_id}")]
    RecapsDisabled { league_id: i64, kind: &'static str },
}

/// Generates and publishes recaps for leagues
pub struct RecapService {
    store: Arc<dyn LeagueStore>,
    publisher: GroupMePublisher,
    publishing_enabled: bool,
    rewriter: Option<Arc<dyn ProseRewriter>>,
}

impl RecapService {
    pub fn new(
        store: Arc<dyn LeagueStore>,
        publisher: GroupMePublisher,
        publishing_enabled: bool,
        rewriter: Option<Arc<dyn ProseRewriter>>,
    ) -> Self {
        Self { store, publisher, publishing_enabled, rewriter }
    }

    /// Generate (and optionally publish) a power rankings recap.
    ///
    /// Also persists the newly computed ranks as the movement baseline for
    /// the next computation; the engine itself never writes state.
    pub async fn power_rankings_recap(
        &self,
        league_id: i64,
        week: Option<i32>,
        style: RecapStyle,
        publish: bool,
    ) -> Result<String, ServiceError> {
        let league = self.require_league(league_id).await?;
        if !league.enable_power_rankings {
            return Err(ServiceError::RecapsDisabled { league_id, kind: "Power rankings" });
        }

        let week = week.or(league.week).unwrap_or(1);
        let summary = SummaryGenerator::new(self.store.as_ref()).generate(league_id, week).await?;

        self.persist_rank_baseline(&summary, league_id).await?;

        let body = self.styled_summary_text(&league, &summary, style).await;
        let text = format!("🏆 POWER RANKINGS - {} Week {}\n\n{}", league.name, week, body);

        if publish {
            self.publish_to_league(&league, &text).await;
        }

        Ok(text)
    }

    /// Generate (and optionally publish) a waiver wire recap
    pub async fn waiver_recap(
        &self,
        league_id: i64,
        week: Option<i32>,
        publish: bool,
    ) -> Result<String, ServiceError> {
        let league = self.require_league(league_id).await?;
        if !league.enable_waiver_recaps {
            return Err(ServiceError::RecapsDisabled { league_id, kind: "Waiver" });
        }

        let week = week.or(league.week).unwrap_or(1);
        let summary = SummaryGenerator::new(self.store.as_ref()).generate(league_id, week).await?;

        let base_text = render_waiver_report(&summary);

        // Quiet weeks get the short message back but are not posted
        if summary.transactions.is_empty() {
            return Ok(base_text);
        }

        let text = self.rewritten_or(&league, base_text).await;

        if publish {
            self.publish_to_league(&league, &text).await;
        }

        Ok(text)
    }

    async fn require_league(&self, league_id: i64) -> Result<LeagueRecord, ServiceError> {
        Ok(self
            .store
            .get_league(league_id)
            .await?
            .ok_or(EngineError::LeagueNotFound(league_id))?)
    }

    async fn persist_rank_baseline(
        &self,
        summary: &WeeklySummary,
        league_id: i64,
    ) -> Result<(), ServiceError> {
        let ranks: HashMap<String, i32> =
            summary.power_rankings.iter().map(|e| (e.roster_id.clone(), e.rank)).collect();
        self.store.update_power_ranks(league_id, &ranks).await?;
        Ok(())
    }

    /// Render the summary, going through the LLM rewriter when the league
    /// has opted in and one is configured
    async fn styled_summary_text(
        &self,
        league: &LeagueRecord,
        summary: &WeeklySummary,
        style: RecapStyle,
    ) -> String {
        if league.enable_llm_rendering {
            if let (Some(persona), Some(rewriter)) =
                (league.persona.as_deref(), self.rewriter.as_deref())
            {
                return render_with_rewriter(summary, style, persona, Some(rewriter)).await;
            }
        }
        render(summary, style)
    }

    /// Rewrite arbitrary base text when the league has opted in; otherwise
    /// return it unchanged
    async fn rewritten_or(&self, league: &LeagueRecord, base_text: String) -> String {
        if league.enable_llm_rendering {
            if let (Some(persona), Some(rewriter)) =
                (league.persona.as_deref(), self.rewriter.as_deref())
            {
                match rewriter.rewrite(&base_text, persona).await {
                    Ok(text) => return text,
                    Err(e) => {
                        tracing::warn!("Prose rewrite failed, using deterministic text: {e}");
                    }
                }
            }
        }
        base_text
    }

    async fn publish_to_league(&self, league: &LeagueRecord, text: &str) {
        if !self.publishing_enabled {
            debug!("Publishing disabled, skipping delivery for league {}", league.id);
            return;
        }

        match &league.groupme_bot_id {
            Some(bot_id) => {
                match self
                    .publisher
                    .send_with_retry(bot_id, text, 3, Duration::from_secs(1))
                    .await
                {
                    Ok(()) => info!("Published recap for league {}", league.id),
                    Err(e) => error!("Failed to publish recap for league {}: {e}", league.id),
                }
            }
            None => debug!("League {} has no GroupMe bot configured", league.id),
        }
    }
}
