//! Deterministic recap templates
//!
//! Fast, zero-cost rendering of a [`WeeklySummary`] into chat-ready text.
//! Always produces valid standalone output; the LLM layer in
//! [`crate::rewrite`] is purely cosmetic on top of these strings.

use recap_engine::WeeklySummary;
use std::str::FromStr;

/// Formatting style for deterministic rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecapStyle {
    #[default]
    Standard,
    Emoji,
    Formal,
    Casual,
}

impl FromStr for RecapStyle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(RecapStyle::Standard),
            "emoji" => Ok(RecapStyle::Emoji),
            "formal" => Ok(RecapStyle::Formal),
            "casual" => Ok(RecapStyle::Casual),
            other => Err(format!("unknown recap style: {other}")),
        }
    }
}

/// Render a weekly summary in the requested style
pub fn render(summary: &WeeklySummary, style: RecapStyle) -> String {
    match style {
        RecapStyle::Standard => render_standard(summary),
        RecapStyle::Emoji => render_emoji(summary),
        RecapStyle::Formal => render_formal(summary),
        RecapStyle::Casual => render_casual(summary),
    }
}

/// Movement marker for power rankings: (↑n), (↓n), or (→)
pub fn format_movement(movement: i32) -> String {
    if movement > 0 {
        format!("(↑{movement})")
    } else if movement < 0 {
        format!("(↓{})", movement.abs())
    } else {
        "(→)".to_string()
    }
}

fn render_standard(summary: &WeeklySummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("📊 {} - Week {} Recap", summary.league_name, summary.week));
    lines.push("=".repeat(40));
    lines.push(String::new());

    lines.push("🏆 WEEKLY HIGHLIGHTS".to_string());
    lines.push(format!(
        "• High Score: {} ({:.1} pts)",
        summary.highest_scorer.team_name, summary.highest_scorer.points_scored
    ));
    lines.push(format!(
        "• Low Score: {} ({:.1} pts)",
        summary.lowest_scorer.team_name, summary.lowest_scorer.points_scored
    ));
    lines.push(format!(
        "• Biggest Blowout: {} over {} by {:.1}",
        summary.biggest_blowout.winner.team_name,
        summary.biggest_blowout.loser.team_name,
        summary.biggest_blowout.winner.margin
    ));
    lines.push(format!(
        "• Closest Game: {} vs {} ({:.1} pt margin)",
        summary.closest_matchup.winner.team_name,
        summary.closest_matchup.loser.team_name,
        summary.closest_matchup.winner.margin
    ));
    lines.push(String::new());

    lines.push("📈 POWER RANKINGS".to_string());
    for team in summary.power_rankings.iter().take(5) {
        lines.push(format!(
            "{}. {} ({}) {}",
            team.rank,
            team.team_name,
            team.record,
            format_movement(team.movement)
        ));
    }
    if let Some(climber) = &summary.biggest_climber {
        lines.push(format!("📈 Biggest Climber: {} (+{})", climber.team_name, climber.movement));
    }
    if let Some(faller) = &summary.biggest_fall {
        lines.push(format!("📉 Biggest Fall: {} ({})", faller.team_name, faller.movement));
    }
    lines.push(String::new());

    if !summary.transactions.is_empty() {
        lines.push("💰 WAIVER WIRE ACTIVITY".to_string());
        lines.push(format!("• Total FAAB Spent: ${}", summary.total_faab_spent));
        if let Some(trader) = &summary.most_active_trader {
            lines.push(format!("• Most Active: {trader}"));
        }
        for transaction in summary.transactions.iter().take(3) {
            lines.push(format!("• {}: {}", transaction.owner_name, transaction.notes));
        }
        lines.push(String::new());
    }

    lines.push("📊 LEAGUE STATS".to_string());
    lines.push(format!("• League Average: {:.1} pts", summary.average_score));
    lines.push(format!("• Total Points: {:.1}", summary.total_points));
    lines.push(String::new());

    lines.push("🏈 PLAYOFF PICTURE".to_string());
    for (position, team) in summary.playoff_picture.iter().enumerate() {
        lines.push(format!("{}. {}", position + 1, team));
    }

    lines.join("\n")
}

fn render_emoji(summary: &WeeklySummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("🏈 {} Week {} 🏈", summary.league_name, summary.week));
    lines.push("🔥🔥🔥🔥🔥🔥🔥🔥🔥🔥".to_string());
    lines.push(String::new());

    lines.push(format!("👑 WEEK {} CHAMPION", summary.week));
    lines.push(format!(
        "{} 💪 {:.1} pts",
        summary.highest_scorer.team_name, summary.highest_scorer.points_scored
    ));
    lines.push(String::new());

    lines.push("💩 TOILET BOWL WINNER".to_string());
    lines.push(format!(
        "{} 😢 {:.1} pts",
        summary.lowest_scorer.team_name, summary.lowest_scorer.points_scored
    ));
    lines.push(String::new());

    lines.push("💀 BIGGEST MASSACRE".to_string());
    lines.push(format!(
        "{} destroyed {}",
        summary.biggest_blowout.winner.team_name, summary.biggest_blowout.loser.team_name
    ));
    lines.push(format!("Margin: {:.1} pts 💥", summary.biggest_blowout.winner.margin));
    lines.push(String::new());

    lines.push("👑 POWER RANKINGS 👑".to_string());
    let medals = ["🥇", "🥈", "🥉", "4️⃣", "5️⃣"];
    for (index, team) in summary.power_rankings.iter().take(5).enumerate() {
        let movement = if team.movement > 0 {
            "📈"
        } else if team.movement < 0 {
            "📉"
        } else {
            "➡️"
        };
        lines.push(format!("{} {} {} {}", medals[index], team.team_name, team.record, movement));
    }
    lines.push(String::new());

    if !summary.transactions.is_empty() {
        lines.push("💰 WAIVER WIRE MADNESS 💰".to_string());
        lines.push(format!("Total FAAB: ${} 💸", summary.total_faab_spent));
        for transaction in summary.transactions.iter().take(3) {
            let marker = match transaction.faab_spent {
                Some(bid) if bid > 50 => "🤑",
                _ => "💰",
            };
            lines.push(format!("{} {}: {}", marker, transaction.owner_name, transaction.notes));
        }
    }

    lines.join("\n")
}

fn render_formal(summary: &WeeklySummary) -> String {
    let mut lines = Vec::new();

    lines.push(summary.league_name.clone());
    lines.push(format!("Week {} Fantasy Report", summary.week));
    lines.push(format!("Season {}", summary.season));
    lines.push("-".repeat(50));
    lines.push(String::new());

    lines.push("EXECUTIVE SUMMARY".to_string());
    lines.push(format!(
        "The {} completed Week {} of the {} season.",
        summary.league_name, summary.week, summary.season
    ));
    lines.push(format!(
        "League average scoring was {:.1} points per team.",
        summary.average_score
    ));
    lines.push(format!("Total league points scored: {:.1}", summary.total_points));
    lines.push(String::new());

    lines.push("WEEKLY PERFORMANCE ANALYSIS".to_string());
    lines.push(format!(
        "Highest Scoring Team: {} ({:.1} points)",
        summary.highest_scorer.team_name, summary.highest_scorer.points_scored
    ));
    lines.push(format!(
        "Lowest Scoring Team: {} ({:.1} points)",
        summary.lowest_scorer.team_name, summary.lowest_scorer.points_scored
    ));
    lines.push(format!(
        "Most Dominant Victory: {} defeated {} by {:.1} points",
        summary.biggest_blowout.winner.team_name,
        summary.biggest_blowout.loser.team_name,
        summary.biggest_blowout.winner.margin
    ));
    lines.push(String::new());

    lines.push("CURRENT STANDINGS AND POWER RANKINGS".to_string());
    for team in &summary.power_rankings {
        lines.push(format!(
            "{}. {} - Record: {}, Points For: {:.1}",
            team.rank, team.team_name, team.record, team.points_for
        ));
    }
    lines.push(String::new());

    if !summary.transactions.is_empty() {
        lines.push("ROSTER TRANSACTION SUMMARY".to_string());
        lines.push(format!(
            "Total Free Agent Acquisition Budget Spent: ${}",
            summary.total_faab_spent
        ));
        lines.push(format!("Number of Transactions: {}", summary.transactions.len()));
        if let Some(trader) = &summary.most_active_trader {
            lines.push(format!("Most Active Manager: {trader}"));
        }
    }

    lines.join("\n")
}

fn render_casual(summary: &WeeklySummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Yo {}! Week {} is in the books 📚",
        summary.league_name, summary.week
    ));
    lines.push(String::new());
    lines.push("Here's what went down...".to_string());
    lines.push(String::new());

    lines.push(format!("🔥 {} went OFF this week!", summary.highest_scorer.owner_name));
    lines.push(format!(
        "Their squad {} put up {:.1} points. Absolutely unreal.",
        summary.highest_scorer.team_name, summary.highest_scorer.points_scored
    ));
    lines.push(String::new());

    lines.push(format!(
        "😬 Meanwhile, {} had a rough week...",
        summary.lowest_scorer.owner_name
    ));
    lines.push(format!(
        "{} only managed {:.1} points. Ouch.",
        summary.lowest_scorer.team_name, summary.lowest_scorer.points_scored
    ));
    lines.push(String::new());

    lines.push(format!(
        "💀 {} absolutely DESTROYED {}",
        summary.biggest_blowout.winner.owner_name, summary.biggest_blowout.loser.owner_name
    ));
    lines.push(format!(
        "We're talking a {:.1} point beatdown. Someone call 911.",
        summary.biggest_blowout.winner.margin
    ));
    lines.push(String::new());

    lines.push("Current power rankings (don't @ me):".to_string());
    for team in summary.power_rankings.iter().take(5) {
        let movement = if team.movement > 0 {
            format!(" (up {})", team.movement)
        } else if team.movement < 0 {
            format!(" (down {})", team.movement.abs())
        } else {
            String::new()
        };
        lines.push(format!("{}. {} {}{}", team.rank, team.team_name, team.record, movement));
    }
    lines.push(String::new());

    if !summary.transactions.is_empty() {
        lines.push("Waiver wire was BUSY this week:".to_string());
        lines.push(format!(
            "Y'all spent ${} total on free agents 💸",
            summary.total_faab_spent
        ));
        for transaction in summary.transactions.iter().take(3) {
            lines.push(format!("• {}", transaction.notes));
        }
    }

    lines.join("\n")
}

/// Waiver-focused report covering a full week of transactions.
///
/// A week with no activity gets a short standalone message instead of an
/// empty report.
pub fn render_waiver_report(summary: &WeeklySummary) -> String {
    if summary.transactions.is_empty() {
        return format!(
            "📄 {} Week {} Waiver Report\n\nNo waiver activity this week. \
             Everyone's happy with their teams... or gave up. 🤷‍♂️",
            summary.league_name, summary.week
        );
    }

    let mut lines = Vec::new();

    lines.push(format!("💰 {} - Week {} Waiver Report", summary.league_name, summary.week));
    lines.push("=".repeat(45));
    lines.push(String::new());

    lines.push(format!("💸 Total FAAB Spent: ${}", summary.total_faab_spent));
    lines.push(format!("📊 Total Transactions: {}", summary.transactions.len()));
    if let Some(trader) = &summary.most_active_trader {
        lines.push(format!("🔥 Most Active: {trader}"));
    }
    lines.push(String::new());

    let big_spenders: Vec<_> = summary
        .transactions
        .iter()
        .filter(|t| t.faab_spent.is_some_and(|bid| bid >= 20))
        .collect();
    if !big_spenders.is_empty() {
        lines.push("💰 BIG SPENDERS".to_string());
        for transaction in big_spenders {
            lines.push(format!(
                "• {}: ${} on {}",
                transaction.owner_name,
                transaction.faab_spent.unwrap_or(0),
                transaction.players_added.join(", ")
            ));
        }
        lines.push(String::new());
    }

    lines.push("📋 ALL WAIVER ACTIVITY".to_string());
    for transaction in &summary.transactions {
        let faab_text = match transaction.faab_spent {
            Some(bid) if bid > 0 => format!(" (${bid})"),
            _ => String::new(),
        };
        lines.push(format!("• {}: {}{}", transaction.owner_name, transaction.notes, faab_text));
    }
    lines.push(String::new());

    if summary.total_faab_spent > 100 {
        lines.push("🔥 Hot waiver wire this week! Lots of movement.".to_string());
    } else if summary.total_faab_spent > 50 {
        lines.push("📈 Decent waiver activity. Some teams making moves.".to_string());
    } else {
        lines.push("😴 Pretty quiet on the waiver wire this week.".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_test_summary;

    #[test]
    fn test_movement_markers() {
        assert_eq!(format_movement(3), "(↑3)");
        assert_eq!(format_movement(-2), "(↓2)");
        assert_eq!(format_movement(0), "(→)");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("standard".parse::<RecapStyle>().unwrap(), RecapStyle::Standard);
        assert_eq!("EMOJI".parse::<RecapStyle>().unwrap(), RecapStyle::Emoji);
        assert!("sarcastic".parse::<RecapStyle>().is_err());
    }

    #[test]
    fn test_standard_render_covers_all_sections() {
        let summary = create_test_summary();
        let text = render(&summary, RecapStyle::Standard);

        assert!(text.contains("WEEKLY HIGHLIGHTS"));
        assert!(text.contains("High Score: Alpha (120.0 pts)"));
        assert!(text.contains("POWER RANKINGS"));
        assert!(text.contains("(↑1)"));
        assert!(text.contains("WAIVER WIRE ACTIVITY"));
        assert!(text.contains("LEAGUE STATS"));
        assert!(text.contains("PLAYOFF PICTURE"));
    }

    #[test]
    fn test_formal_render_lists_every_team() {
        let summary = create_test_summary();
        let text = render(&summary, RecapStyle::Formal);

        for entry in &summary.power_rankings {
            assert!(text.contains(&entry.team_name));
        }
        assert!(text.contains("EXECUTIVE SUMMARY"));
    }

    #[test]
    fn test_waiver_report_round_trips_notes() {
        let summary = create_test_summary();
        let text = render_waiver_report(&summary);

        assert!(text.contains("Week 3 Waiver Report"));
        assert!(text.contains("Picked up Player A for $15, dropped Player B"));
        assert!(text.contains("Total FAAB Spent: $15"));
    }

    #[test]
    fn test_waiver_report_quiet_week() {
        let mut summary = create_test_summary();
        summary.transactions.clear();

        let text = render_waiver_report(&summary);
        assert!(text.contains("No waiver activity this week"));
    }
}
