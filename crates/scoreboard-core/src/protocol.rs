//! JSON bodies exchanged between the server and its clients.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Match, TeamSide};

/// Body of `POST /api/matches/{id}/point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRequest {
    pub team: TeamSide,
}

/// Body returned by `POST /api/courts/{n}/free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeCourtResponse {
    pub freed: bool,
}

/// Body returned by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub available: bool,
    pub timestamp: String,
}

/// Error body for every non-2xx API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub timestamp: String,
}

/// Usage hint served at `GET /api/client-vmix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmixHint {
    pub message: String,
    pub example: String,
    pub timestamp: String,
}

/// One row of the vMix data source for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmixRow {
    pub match_id: String,
    pub team_a: String,
    pub team_b: String,
    pub points_a: u32,
    pub points_b: u32,
    pub games_a: u32,
    pub games_b: u32,
    pub game: u32,
    pub serving: String,
    pub court: String,
}

impl From<&Match> for VmixRow {
    fn from(m: &Match) -> Self {
        Self {
            match_id: m.id.clone(),
            team_a: m.team_a.display_name(),
            team_b: m.team_b.display_name(),
            points_a: m.score.points.get(TeamSide::TeamA),
            points_b: m.score.points.get(TeamSide::TeamB),
            games_a: m.score.games_won.get(TeamSide::TeamA),
            games_b: m.score.games_won.get(TeamSide::TeamB),
            game: m.score.current_game,
            serving: m
                .serving_player()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            court: m.court_number.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Match code validation
// ---------------------------------------------------------------------------

/// Characters a generated match code is drawn from.
pub const MATCH_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a generated match code.
pub const MATCH_CODE_LEN: usize = 6;

/// Why a string cannot be a match code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchCodeError {
    #[error("match code is empty")]
    Empty,
    #[error("match code has {0} characters, expected 6")]
    Length(usize),
    #[error("match code contains {0:?}; only lowercase letters and digits are used")]
    Character(char),
}

/// Check that `code` has the shape [`generate_code`](crate::store::generate_code)
/// produces: six lowercase ASCII letters or digits.
pub fn validate_match_code(code: &str) -> Result<(), MatchCodeError> {
    if code.is_empty() {
        return Err(MatchCodeError::Empty);
    }
    if let Some(c) = code
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit())
    {
        return Err(MatchCodeError::Character(c));
    }
    if code.len() != MATCH_CODE_LEN {
        return Err(MatchCodeError::Length(code.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::doubles;

    #[test]
    fn generated_codes_are_accepted() {
        for _ in 0..200 {
            let code = crate::store::generate_code();
            assert_eq!(validate_match_code(&code), Ok(()), "{code}");
        }
        assert_eq!(validate_match_code("k3v9q0"), Ok(()));
    }

    #[test]
    fn codes_must_be_six_characters() {
        assert_eq!(validate_match_code(""), Err(MatchCodeError::Empty));
        assert_eq!(validate_match_code("abc12"), Err(MatchCodeError::Length(5)));
        assert_eq!(validate_match_code("abc1234"), Err(MatchCodeError::Length(7)));
    }

    #[test]
    fn codes_reject_foreign_characters() {
        // Generated codes are lowercase; a capitalised code cannot exist.
        assert_eq!(validate_match_code("ABC123"), Err(MatchCodeError::Character('A')));
        assert_eq!(validate_match_code("ab/123"), Err(MatchCodeError::Character('/')));
        assert_eq!(validate_match_code("../adm"), Err(MatchCodeError::Character('.')));
        assert_eq!(validate_match_code("äbc12"), Err(MatchCodeError::Character('ä')));
        assert!(validate_match_code("abc 12").is_err());
    }

    #[test]
    fn vmix_row_flattens_match() {
        let m = Match::create("abc123".into(), doubles(Some(7)), Utc::now()).unwrap();
        let row = VmixRow::from(&m);
        assert_eq!(row.team_a, "Anna / Berit");
        assert_eq!(row.court, "7");
        assert_eq!(row.serving, "Anna");
        assert_eq!(row.game, 1);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["pointsA"], 0);
        assert_eq!(json["matchId"], "abc123");
    }

    #[test]
    fn timestamp_is_iso_utc() {
        let ts = timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
