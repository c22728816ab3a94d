//! Player search for the player picker.

use crate::model::Player;

/// Players whose name contains `query` (case-insensitive), sorted by name.
/// A blank query matches everyone.
pub fn search_players<'a>(players: &'a [Player], query: &str) -> Vec<&'a Player> {
    let needle = query.trim().to_lowercase();
    let mut found: Vec<&Player> = players
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect();
    found.sort_by_key(|p| p.name.to_lowercase());
    found
}

/// Whether `name` is already present (case-insensitive).
pub fn contains_name(players: &[Player], name: &str) -> bool {
    let name = name.trim();
    players.iter().any(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Player> {
        vec![
            Player::new("1", "Zoe"),
            Player::new("2", "anna"),
            Player::new("3", "Hannah"),
            Player::new("4", "Bert"),
        ]
    }

    #[test]
    fn blank_query_returns_everyone_sorted() {
        let players = roster();
        let names: Vec<&str> = search_players(&players, "  ")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["anna", "Bert", "Hannah", "Zoe"]);
    }

    #[test]
    fn query_matches_substrings_case_insensitively() {
        let players = roster();
        let names: Vec<&str> = search_players(&players, "ANN")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["anna", "Hannah"]);
        assert!(search_players(&players, "xyz").is_empty());
    }

    #[test]
    fn contains_name_ignores_case_and_padding() {
        let players = roster();
        assert!(contains_name(&players, " ZOE "));
        assert!(!contains_name(&players, "Zo"));
    }
}
