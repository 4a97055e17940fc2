//! # Recap CLI
//!
//! One-shot operations against the recap service: sync provider data,
//! generate a recap for a league, or check system health.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use league_recap_service::{ServiceConfig, ServiceState};
use recap_renderer::RecapStyle;

/// CLI for league syncing and recap generation
#[derive(Parser)]
#[command(name = "recap-cli")]
#[command(about = "Generate and publish fantasy league recaps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync provider data for one league or all active leagues
    Sync {
        /// Provider league id; syncs every active league when omitted
        #[arg(long)]
        league: Option<String>,
    },
    /// Generate a recap and print it
    Recap {
        /// Internal league id
        #[arg(long)]
        league_id: i64,

        /// Week number (defaults to the league's current week)
        #[arg(long)]
        week: Option<i32>,

        /// Recap kind: power-rankings or waiver
        #[arg(long, default_value = "power-rankings")]
        kind: String,

        /// Rendering style: standard, emoji, formal, casual
        #[arg(long, default_value = "standard")]
        style: String,

        /// Also publish to the league's GroupMe bot
        #[arg(long)]
        publish: bool,
    },
    /// Show system health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env()?;
    let state = Arc::new(ServiceState::new(config).await?);

    match cli.command {
        Commands::Sync { league } => match league {
            Some(provider_league_id) => {
                let league = state.sync_league(&provider_league_id).await?;
                println!("Synced league {} ({})", league.name, league.id);
            }
            None => {
                let report = state.sync_all_leagues().await?;
                println!(
                    "Sync complete: {} succeeded, {} failed, {} skipped",
                    report.successful, report.failed, report.skipped
                );
            }
        },
        Commands::Recap { league_id, week, kind, style, publish } => {
            let style: RecapStyle = style.parse().map_err(anyhow::Error::msg)?;

            let text = match kind.as_str() {
                "power-rankings" => {
                    state.recaps().power_rankings_recap(league_id, week, style, publish).await?
                }
                "waiver" => state.recaps().waiver_recap(league_id, week, publish).await?,
                other => anyhow::bail!("unknown recap kind: {other}"),
            };

            println!("{text}");
        }
        Commands::Health => {
            let health = state.health_check().await;
            println!("Database:    {}", if health.database_ok { "ok" } else { "unreachable" });
            println!(
                "Sleeper API: {}",
                if health.sleeper_api_ok { "ok" } else { "unreachable" }
            );
            println!("Active leagues: {}", health.active_leagues);
        }
    }

    Ok(())
}
