//! # Recap Renderer
//!
//! Turns a [`recap_engine::WeeklySummary`] into publishable text. The
//! deterministic templates are the contract; the LLM rewriter is an
//! optional decorator that restyles their output and falls back to it on
//! any failure.

pub mod deterministic;
pub mod error;
pub mod rewrite;

pub use deterministic::{format_movement, render, render_waiver_report, RecapStyle};
pub use error::RewriteError;
pub use rewrite::{build_rewrite_prompt, render_with_rewriter, OpenAiRewriter, ProseRewriter};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use recap_engine::{
        MatchupResult, PerformanceRecord, PowerRankingEntry, TransactionSummary, Trend,
        WeeklySummary,
    };

    fn performance(
        roster_id: &str,
        team: &str,
        points: f64,
        win: bool,
        opponent: &str,
        opponent_points: f64,
    ) -> PerformanceRecord {
        PerformanceRecord {
            roster_id: roster_id.to_string(),
            team_name: team.to_string(),
            owner_name: format!("{team} Owner"),
            points_scored: points,
            points_projected: points,
            win,
            opponent_name: opponent.to_string(),
            opponent_points,
            margin: (points - opponent_points).abs(),
        }
    }

    fn entry(roster_id: &str, team: &str, rank: i32, movement: i32) -> PowerRankingEntry {
        PowerRankingEntry {
            rank,
            previous_rank: Some(rank + movement),
            roster_id: roster_id.to_string(),
            team_name: team.to_string(),
            owner_name: format!("{team} Owner"),
            record: "2-1".to_string(),
            points_for: 300.0,
            points_against: 280.0,
            power_score: 350.0,
            trend: if movement > 0 {
                Trend::Up
            } else if movement < 0 {
                Trend::Down
            } else {
                Trend::Same
            },
            movement,
        }
    }

    pub fn create_test_summary() -> WeeklySummary {
        let performances = vec![
            performance("1", "Alpha", 120.0, true, "Delta", 70.0),
            performance("4", "Delta", 70.0, false, "Alpha", 120.0),
            performance("2", "Beta", 101.0, true, "Gamma", 99.0),
            performance("3", "Gamma", 99.0, false, "Beta", 101.0),
        ];

        let rankings = vec![
            entry("1", "Alpha", 1, 1),
            entry("2", "Beta", 2, -1),
            entry("3", "Gamma", 3, 0),
            entry("4", "Delta", 4, 0),
        ];

        let transaction = TransactionSummary {
            kind: recap_engine::TransactionKind::Waiver,
            team_name: "Beta".to_string(),
            owner_name: "Beta Owner".to_string(),
            players_added: vec!["Player A".to_string()],
            players_dropped: vec!["Player B".to_string()],
            faab_spent: Some(15),
            notes: "Picked up Player A for $15, dropped Player B".to_string(),
        };

        WeeklySummary {
            league_name: "The Gridiron Gang".to_string(),
            week: 3,
            season: 2025,
            highest_scorer: performances[0].clone(),
            lowest_scorer: performances[1].clone(),
            biggest_blowout: MatchupResult {
                winner: performances[0].clone(),
                loser: performances[1].clone(),
            },
            closest_matchup: MatchupResult {
                winner: performances[2].clone(),
                loser: performances[3].clone(),
            },
            performances,
            biggest_climber: Some(rankings[0].clone()),
            biggest_fall: Some(rankings[1].clone()),
            power_rankings: rankings,
            transactions: vec![transaction],
            total_faab_spent: 15,
            most_active_trader: Some("Beta Owner".to_string()),
            average_score: 97.5,
            total_points: 390.0,
            playoff_picture: vec![
                "Alpha".to_string(),
                "Beta".to_string(),
                "Gamma".to_string(),
                "Delta".to_string(),
            ],
        }
    }
}
