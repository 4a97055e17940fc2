//! Transaction summarization and aggregate statistics

use crate::types::TransactionSummary;
use league_store::{RosterRecord, TransactionKind, TransactionRecord};
use serde::Deserialize;
use std::collections::HashMap;

const UNKNOWN_PLAYER: &str = "Unknown Player";

/// A player reference as providers actually send them: a structured record
/// with a name, a bare string, or something else entirely.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlayerRef {
    Named { name: Option<String>, full_name: Option<String> },
    Raw(String),
    Other(serde_json::Value),
}

impl PlayerRef {
    /// Resolve a display name: `name`, then `full_name`, then a placeholder
    pub fn display_name(&self) -> String {
        match self {
            PlayerRef::Named { name, full_name } => name
                .clone()
                .or_else(|| full_name.clone())
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
            PlayerRef::Raw(value) => value.clone(),
            PlayerRef::Other(_) => UNKNOWN_PLAYER.to_string(),
        }
    }
}

/// Parse a raw player-list payload into display names.
///
/// Accepts a JSON array of player references or a Sleeper-style map keyed
/// by player id. An absent payload is an empty list; a payload that fails
/// to parse (or is some other JSON shape) collapses to a single placeholder
/// entry instead of failing the transaction.
pub fn parse_player_list(payload: Option<&str>) -> Vec<String> {
    let raw = match payload {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return vec![UNKNOWN_PLAYER.to_string()],
    };

    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match serde_json::from_value::<PlayerRef>(item) {
                Ok(player) => player.display_name(),
                Err(_) => UNKNOWN_PLAYER.to_string(),
            })
            .collect(),
        // Sleeper sends adds/drops as {player_id: roster_id}
        serde_json::Value::Object(map) => map.into_iter().map(|(key, _)| key).collect(),
        _ => vec![UNKNOWN_PLAYER.to_string()],
    }
}

/// Deterministic note text for a transaction
pub fn transaction_notes(
    kind: TransactionKind,
    added: &[String],
    dropped: &[String],
    faab: Option<i32>,
) -> String {
    let added = added.join(", ");
    let dropped = dropped.join(", ");

    match kind {
        TransactionKind::Trade => format!("Traded {dropped} for {added}"),
        TransactionKind::Waiver => {
            let bid = match faab {
                Some(bid) if bid > 0 => format!(" for ${bid}"),
                _ => String::new(),
            };
            format!("Picked up {added}{bid}, dropped {dropped}")
        }
        TransactionKind::Add => format!("Added {added}"),
        TransactionKind::Drop => format!("Dropped {dropped}"),
        other => format!("{}: +{added} -{dropped}", title_case(other.as_str())),
    }
}

/// Summarize a week's raw transactions.
///
/// A transaction whose roster cannot be resolved still produces a summary
/// with placeholder team/owner names; it is never dropped silently.
pub fn summarize_transactions(
    transactions: &[TransactionRecord],
    rosters: &HashMap<String, RosterRecord>,
) -> Vec<TransactionSummary> {
    transactions
        .iter()
        .map(|transaction| {
            let roster = rosters.get(&transaction.roster_id);
            let team_name = roster
                .and_then(|r| r.team_name.clone())
                .unwrap_or_else(|| format!("Team {}", transaction.roster_id));
            let owner_name = roster
                .and_then(|r| r.owner_name.clone())
                .unwrap_or_else(|| "Unknown".to_string());

            let players_added = parse_player_list(transaction.players_added.as_deref());
            let players_dropped = parse_player_list(transaction.players_dropped.as_deref());
            let notes = transaction_notes(
                transaction.kind,
                &players_added,
                &players_dropped,
                transaction.faab_bid,
            );

            TransactionSummary {
                kind: transaction.kind,
                team_name,
                owner_name,
                players_added,
                players_dropped,
                faab_spent: transaction.faab_bid,
                notes,
            }
        })
        .collect()
}

/// Total FAAB spent across a week; absent bids count as zero
pub fn total_faab_spent(summaries: &[TransactionSummary]) -> i64 {
    summaries.iter().map(|s| i64::from(s.faab_spent.unwrap_or(0))).sum()
}

/// Owner with the most transactions this week.
///
/// Ties resolve to the owner encountered first, which is why the tally is
/// insertion-ordered rather than a hash map. None when there are no
/// transactions.
pub fn most_active_trader(summaries: &[TransactionSummary]) -> Option<String> {
    let mut tally: Vec<(String, usize)> = Vec::new();

    for summary in summaries {
        match tally.iter_mut().find(|(owner, _)| owner == &summary.owner_name) {
            Some((_, count)) => *count += 1,
            None => tally.push((summary.owner_name.clone(), 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (owner, count) in tally {
        let replace = match &best {
            Some((_, best_count)) => count > *best_count,
            None => true,
        };
        if replace {
            best = Some((owner, count));
        }
    }

    best.map(|(owner, _)| owner)
}

/// Capitalize each alphabetic run, preserving separators ("free_agent" ->
/// "Free_Agent")
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alpha = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_store::TransactionStatus;

    fn create_test_transaction(
        kind: TransactionKind,
        roster_id: &str,
        added: Option<&str>,
        dropped: Option<&str>,
        faab: Option<i32>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            league_id: 1,
            provider_transaction_id: format!("tx-{roster_id}"),
            kind,
            status: TransactionStatus::Completed,
            week: 3,
            roster_id: roster_id.to_string(),
            players_added: added.map(str::to_string),
            players_dropped: dropped.map(str::to_string),
            faab_bid: faab,
            waiver_priority: None,
            processed_at: None,
        }
    }

    fn create_test_roster(roster_id: &str, owner: &str) -> RosterRecord {
        RosterRecord {
            id: 1,
            league_id: 1,
            provider_roster_id: roster_id.to_string(),
            provider_owner_id: None,
            team_name: Some(format!("{owner}'s Squad")),
            owner_name: Some(owner.to_string()),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0.0,
            points_against: 0.0,
            power_rank: None,
            power_rank_previous: None,
            faab_budget_used: None,
            waiver_position: None,
        }
    }

    #[test]
    fn test_player_name_resolution() {
        assert_eq!(parse_player_list(Some(r#"[{"name": "Player A"}]"#)), vec!["Player A"]);
        assert_eq!(
            parse_player_list(Some(r#"[{"full_name": "Player B"}]"#)),
            vec!["Player B"]
        );
        assert_eq!(parse_player_list(Some(r#"["Player C"]"#)), vec!["Player C"]);
        assert_eq!(parse_player_list(Some(r#"[42]"#)), vec!["Unknown Player"]);
        assert_eq!(parse_player_list(Some(r#"[{}]"#)), vec!["Unknown Player"]);
    }

    #[test]
    fn test_malformed_payload_collapses_to_placeholder() {
        assert_eq!(parse_player_list(Some("not json at all")), vec!["Unknown Player"]);
        assert_eq!(parse_player_list(Some(r#""just a string""#)), vec!["Unknown Player"]);
        assert_eq!(parse_player_list(None), Vec::<String>::new());
    }

    #[test]
    fn test_sleeper_map_payload_uses_keys() {
        let names = parse_player_list(Some(r#"{"4046": 3, "2133": 3}"#));
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"4046".to_string()));
        assert!(names.contains(&"2133".to_string()));
    }

    #[test]
    fn test_waiver_notes_round_trip() {
        let added = vec!["Player A".to_string()];
        let dropped = vec!["Player B".to_string()];

        assert_eq!(
            transaction_notes(TransactionKind::Waiver, &added, &dropped, Some(15)),
            "Picked up Player A for $15, dropped Player B"
        );
        assert_eq!(
            transaction_notes(TransactionKind::Waiver, &added, &dropped, None),
            "Picked up Player A, dropped Player B"
        );
        // A zero bid reads the same as no bid
        assert_eq!(
            transaction_notes(TransactionKind::Waiver, &added, &dropped, Some(0)),
            "Picked up Player A, dropped Player B"
        );
    }

    #[test]
    fn test_notes_per_kind() {
        let added = vec!["New Guy".to_string()];
        let dropped = vec!["Old Guy".to_string()];

        assert_eq!(
            transaction_notes(TransactionKind::Trade, &added, &dropped, None),
            "Traded Old Guy for New Guy"
        );
        assert_eq!(transaction_notes(TransactionKind::Add, &added, &dropped, None), "Added New Guy");
        assert_eq!(
            transaction_notes(TransactionKind::Drop, &added, &dropped, None),
            "Dropped Old Guy"
        );
        assert_eq!(
            transaction_notes(TransactionKind::FreeAgent, &added, &dropped, None),
            "Free_Agent: +New Guy -Old Guy"
        );
    }

    #[test]
    fn test_unresolved_roster_gets_placeholders() {
        let transactions = vec![create_test_transaction(
            TransactionKind::Add,
            "99",
            Some(r#"["Player A"]"#),
            None,
            None,
        )];

        let summaries = summarize_transactions(&transactions, &HashMap::new());

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].team_name, "Team 99");
        assert_eq!(summaries[0].owner_name, "Unknown");
    }

    #[test]
    fn test_faab_total_treats_missing_bids_as_zero() {
        let rosters: HashMap<String, RosterRecord> =
            [("1".to_string(), create_test_roster("1", "Sam"))].into_iter().collect();
        let transactions = vec![
            create_test_transaction(TransactionKind::Waiver, "1", Some("[]"), None, Some(15)),
            create_test_transaction(TransactionKind::Waiver, "1", Some("[]"), None, None),
            create_test_transaction(TransactionKind::Waiver, "1", Some("[]"), None, Some(7)),
        ];

        let summaries = summarize_transactions(&transactions, &rosters);
        assert_eq!(total_faab_spent(&summaries), 22);
    }

    #[test]
    fn test_most_active_trader_ties_go_to_first_seen() {
        let rosters: HashMap<String, RosterRecord> = [
            ("1".to_string(), create_test_roster("1", "Sam")),
            ("2".to_string(), create_test_roster("2", "Jo")),
        ]
        .into_iter()
        .collect();

        let transactions = vec![
            create_test_transaction(TransactionKind::Add, "1", None, None, None),
            create_test_transaction(TransactionKind::Add, "2", None, None, None),
            create_test_transaction(TransactionKind::Drop, "1", None, None, None),
            create_test_transaction(TransactionKind::Drop, "2", None, None, None),
        ];

        let summaries = summarize_transactions(&transactions, &rosters);
        assert_eq!(most_active_trader(&summaries), Some("Sam".to_string()));

        assert_eq!(most_active_trader(&[]), None);
    }
}
