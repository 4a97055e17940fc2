//! Scheduling loop for recurring syncs and recaps
//!
//! In-process scheduler: a sync task refreshes provider data on a fixed
//! interval, and a recap task polls each league's configured weekday/time
//! slots (UTC) and fires each slot at most once per day. Every scheduled
//! operation runs through exponential-backoff retry.

use crate::config::RetryConfig;
use crate::service::ServiceState;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, sleep};
use tracing::{error, info, warn};

/// Which recap slot fired, for once-per-day tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RecapSlot {
    PowerRankings,
    WaiverReport,
}

/// Scheduler for the recap service
pub struct RecapScheduler {
    state: Arc<ServiceState>,
    fired: Mutex<HashMap<(i64, RecapSlot), NaiveDate>>,
}

impl RecapScheduler {
    pub fn new(state: Arc<ServiceState>) -> Self {
        Self { state, fired: Mutex::new(HashMap::new()) }
    }

    /// Start the scheduler (runs indefinitely)
    pub async fn start(self: Arc<Self>) -> Result<()> {
        info!("Starting recap scheduler");

        // Periodic provider sync
        {
            let state = self.state.clone();
            tokio::spawn(async move {
                Self::run_sync_loop(state).await;
            });
        }

        // Recap schedule polling
        {
            let scheduler = self.clone();
            tokio::spawn(async move {
                scheduler.run_recap_loop().await;
            });
        }

        // Keep the main task alive
        loop {
            sleep(Duration::from_secs(60)).await;
        }
    }

    async fn run_sync_loop(state: Arc<ServiceState>) {
        let period =
            Duration::from_secs(state.config.scheduler.sync_interval_minutes * 60);
        let retry = state.config.scheduler.retry.clone();
        let mut ticker = interval(period);

        loop {
            ticker.tick().await;

            match run_with_retry(
                || {
                    let state = Arc::clone(&state);
                    async move { state.sync_all_leagues().await }
                },
                &retry,
            )
            .await
            {
                Ok(report) => info!("Scheduled sync complete: {report:?}"),
                Err(e) => error!("Scheduled sync failed after retries: {e}"),
            }
        }
    }

    async fn run_recap_loop(self: Arc<Self>) {
        let mut ticker =
            interval(Duration::from_secs(self.state.config.scheduler.poll_interval_secs));

        loop {
            ticker.tick().await;
            if let Err(e) = self.check_due_recaps(Utc::now()).await {
                error!("Recap schedule check failed: {e}");
            }
        }
    }

    async fn check_due_recaps(&self, now: DateTime<Utc>) -> Result<()> {
        let leagues = self.state.list_active_leagues().await?;
        let retry = self.state.config.scheduler.retry.clone();

        for league in &leagues {
            // No delivery target means nothing to schedule
            if league.groupme_bot_id.is_none() {
                continue;
            }

            if league.enable_power_rankings
                && schedule_due(&league.power_rankings_day, &league.power_rankings_time, now)
                && self.mark_fired(league.id, RecapSlot::PowerRankings, now.date_naive()).await
            {
                info!(league_id = league.id, "Power rankings slot due");
                if let Err(e) = run_with_retry(
                    || {
                        let state = self.state.clone();
                        async move { state.run_power_rankings(league).await.map_err(Into::into) }
                    },
                    &retry,
                )
                .await
                {
                    error!("Power rankings failed for league {}: {e}", league.id);
                }
            }

            if league.enable_waiver_recaps
                && schedule_due(&league.waiver_recap_day, &league.waiver_recap_time, now)
                && self.mark_fired(league.id, RecapSlot::WaiverReport, now.date_naive()).await
            {
                info!(league_id = league.id, "Waiver recap slot due");
                if let Err(e) = run_with_retry(
                    || {
                        let state = self.state.clone();
                        async move { state.run_waiver_recap(league).await.map_err(Into::into) }
                    },
                    &retry,
                )
                .await
                {
                    error!("Waiver recap failed for league {}: {e}", league.id);
                }
            }
        }

        Ok(())
    }

    /// Record that a slot fired today. Returns false when it already fired,
    /// so each slot runs at most once per day.
    async fn mark_fired(&self, league_id: i64, slot: RecapSlot, today: NaiveDate) -> bool {
        let mut fired = self.fired.lock().await;
        // Stale entries from previous days can go
        fired.retain(|_, date| *date == today);

        match fired.get(&(league_id, slot)) {
            Some(_) => false,
            None => {
                fired.insert((league_id, slot), today);
                true
            }
        }
    }
}

/// True when `now` falls on the configured weekday at or past the
/// configured HH:MM (UTC). Unparseable times fall back to 09:00.
pub fn schedule_due(day: &str, time: &str, now: DateTime<Utc>) -> bool {
    let weekday = now.format("%A").to_string().to_lowercase();
    if weekday != day.to_lowercase() {
        return false;
    }

    let due_time = NaiveTime::parse_from_str(time, "%H:%M").unwrap_or_else(|_| {
        warn!("Unparseable schedule time {time:?}, defaulting to 09:00");
        NaiveTime::from_hms_opt(9, 0, 0).expect("valid constant time")
    });

    now.time() >= due_time
}

/// Run an operation with exponential-backoff retry
pub async fn run_with_retry<F, Fut, T>(mut f: F, retry_config: &RetryConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = Duration::from_secs(retry_config.initial_delay_secs);

    for attempt in 1..=retry_config.max_retries {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt == retry_config.max_retries {
                    return Err(e);
                }

                warn!("Attempt {attempt} failed: {e}, retrying in {delay:?}");
                sleep(delay).await;

                delay = Duration::from_secs(
                    (delay.as_secs() as f64 * retry_config.backoff_multiplier)
                        .min(retry_config.max_delay_secs as f64) as u64,
                );
            }
        }
    }

    unreachable!()
}
