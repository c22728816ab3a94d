//! Match records shared by the store, the flows and the wire protocol.
//!
//! Records are validated once, at the store boundary ([`Match::validate`]),
//! so render sites can rely on required fields being present.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// Lowest court number in the hall.
pub const MIN_COURT: u8 = 1;
/// Highest court number in the hall.
pub const MAX_COURT: u8 = 10;

// ---------------------------------------------------------------------------
// Court numbers
// ---------------------------------------------------------------------------

/// A validated court number in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CourtNumber(u8);

/// Why a raw value is not a court number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourtNumberError {
    #[error("court number must be an integer, got {0:?}")]
    NotAnInteger(String),
    #[error("court number {0} is outside 1..=10")]
    OutOfRange(i64),
}

impl CourtNumber {
    /// Validate an integer court number.
    pub fn new(value: i64) -> Result<Self, CourtNumberError> {
        if (i64::from(MIN_COURT)..=i64::from(MAX_COURT)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CourtNumberError::OutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every court in the hall, in order.
    pub fn all() -> impl Iterator<Item = CourtNumber> {
        (MIN_COURT..=MAX_COURT).map(CourtNumber)
    }
}

impl FromStr for CourtNumber {
    type Err = CourtNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| CourtNumberError::NotAnInteger(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<u8> for CourtNumber {
    type Error = CourtNumberError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<CourtNumber> for u8 {
    fn from(court: CourtNumber) -> Self {
        court.0
    }
}

impl fmt::Display for CourtNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Teams and sides
// ---------------------------------------------------------------------------

/// One of the two teams of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamSide {
    TeamA,
    TeamB,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::TeamA => TeamSide::TeamB,
            TeamSide::TeamB => TeamSide::TeamA,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeamSide::TeamA => "teamA",
            TeamSide::TeamB => "teamB",
        })
    }
}

/// Physical half of the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtSide {
    Left,
    Right,
}

impl CourtSide {
    pub fn opposite(self) -> Self {
        match self {
            CourtSide::Left => CourtSide::Right,
            CourtSide::Right => CourtSide::Left,
        }
    }
}

/// Which physical half each team currently plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtSides {
    pub team_a: CourtSide,
    pub team_b: CourtSide,
}

impl Default for CourtSides {
    fn default() -> Self {
        Self {
            team_a: CourtSide::Left,
            team_b: CourtSide::Right,
        }
    }
}

impl CourtSides {
    pub fn side_of(&self, team: TeamSide) -> CourtSide {
        match team {
            TeamSide::TeamA => self.team_a,
            TeamSide::TeamB => self.team_b,
        }
    }

    /// Teams change ends.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.team_a, &mut self.team_b);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Ordered players of one team (one for singles, two for doubles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Names joined the way scoreboards print doubles pairs.
    pub fn display_name(&self) -> String {
        self.players
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// A per-team counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPoints {
    pub team_a: u32,
    pub team_b: u32,
}

impl TeamPoints {
    pub fn get(&self, team: TeamSide) -> u32 {
        match team {
            TeamSide::TeamA => self.team_a,
            TeamSide::TeamB => self.team_b,
        }
    }

    pub fn get_mut(&mut self, team: TeamSide) -> &mut u32 {
        match team {
            TeamSide::TeamA => &mut self.team_a,
            TeamSide::TeamB => &mut self.team_b,
        }
    }
}

/// Final score of a completed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub team_a: u32,
    pub team_b: u32,
    pub winner: TeamSide,
}

/// Running score of a match.
///
/// A badminton match is one set of up to three games, so the set counter and
/// the game counter are the same number: `current_game` is the 1-based
/// index of the game in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub current_game: u32,
    pub points: TeamPoints,
    pub games_won: TeamPoints,
    pub completed_games: Vec<GameResult>,
    /// Set once a team has won the match on points. The court stays
    /// occupied until the match is explicitly finished.
    #[serde(default)]
    pub winner: Option<TeamSide>,
    /// Whether ends were already changed at 11 in the deciding game.
    #[serde(default)]
    pub decider_ends_changed: bool,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            current_game: 1,
            points: TeamPoints::default(),
            games_won: TeamPoints::default(),
            completed_games: Vec::new(),
            winner: None,
            decider_ends_changed: false,
        }
    }
}

/// Who is serving: team plus index into that team's player list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRef {
    pub team: TeamSide,
    pub player_index: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    InProgress,
    Finished,
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A single badminton contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub team_a: Team,
    pub team_b: Team,
    pub score: Score,
    pub current_server: ServerRef,
    pub court_sides: CourtSides,
    /// Court the match occupies; cleared when it finishes.
    pub court_number: Option<CourtNumber>,
    /// Court the match was assigned to, kept after it finishes.
    #[serde(default)]
    pub played_on: Option<CourtNumber>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Request to start a new match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub team_a: Vec<Player>,
    pub team_b: Vec<Player>,
    #[serde(default)]
    pub court_number: Option<CourtNumber>,
    #[serde(default)]
    pub first_server: Option<TeamSide>,
}

impl Match {
    /// Build a fresh, validated match from a creation request.
    pub fn create(
        id: String,
        request: NewMatch,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let m = Self {
            id,
            team_a: Team::new(request.team_a),
            team_b: Team::new(request.team_b),
            score: Score::default(),
            current_server: ServerRef {
                team: request.first_server.unwrap_or(TeamSide::TeamA),
                player_index: 0,
            },
            court_sides: CourtSides::default(),
            court_number: request.court_number,
            played_on: request.court_number,
            status: MatchStatus::InProgress,
            created_at: now,
            finished_at: None,
        };
        m.validate()?;
        Ok(m)
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::TeamA => &self.team_a,
            TeamSide::TeamB => &self.team_b,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Whether this match currently occupies `court`.
    pub fn is_active_on(&self, court: CourtNumber) -> bool {
        !self.is_finished() && self.court_number == Some(court)
    }

    /// End the match and release its court.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.status = MatchStatus::Finished;
        self.played_on = self.court_number.or(self.played_on);
        self.court_number = None;
        self.finished_at = Some(now);
    }

    /// The player currently serving.
    pub fn serving_player(&self) -> Option<&Player> {
        self.team(self.current_server.team)
            .players
            .get(usize::from(self.current_server.player_index))
    }

    /// Check the structural invariants of a record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("match id cannot be empty"));
        }
        for (label, team) in [("teamA", &self.team_a), ("teamB", &self.team_b)] {
            if team.players.is_empty() || team.players.len() > 2 {
                return Err(ValidationError::new(format!(
                    "{label} must have one or two players"
                )));
            }
            if team.players.iter().any(|p| p.name.trim().is_empty()) {
                return Err(ValidationError::new(format!(
                    "{label} has a player without a name"
                )));
            }
        }
        if self.team_a.players.len() != self.team_b.players.len() {
            return Err(ValidationError::new(
                "both teams must have the same number of players",
            ));
        }
        if usize::from(self.current_server.player_index)
            >= self.team(self.current_server.team).players.len()
        {
            return Err(ValidationError::new("server index out of range"));
        }
        if self.court_sides.team_a == self.court_sides.team_b {
            return Err(ValidationError::new("teams cannot share a court side"));
        }
        if self.is_finished() && self.court_number.is_some() {
            return Err(ValidationError::new(
                "a finished match cannot hold a court",
            ));
        }
        Ok(())
    }
}

/// Compact read-only view of a match for history lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: String,
    pub team_a: String,
    pub team_b: String,
    pub games: Vec<GameResult>,
    pub points: TeamPoints,
    pub winner: Option<TeamSide>,
    /// Court the match is or was played on.
    pub court_number: Option<CourtNumber>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Match> for MatchSummary {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.clone(),
            team_a: m.team_a.display_name(),
            team_b: m.team_b.display_name(),
            games: m.score.completed_games.clone(),
            points: m.score.points,
            winner: m.score.winner,
            court_number: m.court_number.or(m.played_on),
            status: m.status,
            created_at: m.created_at,
        }
    }
}
